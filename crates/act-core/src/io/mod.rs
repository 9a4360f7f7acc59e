//! Low-level, reusable filesystem primitives for the team registry, inbox,
//! and task engine.
//!
//! - **Atomic writes**: write-to-temp-then-rename so readers never observe a
//!   partially written file ([`atomic::write_atomic`]).
//! - **File locking**: advisory per-directory locks with exponential backoff
//!   ([`lock::acquire_lock`]), matching the `.lock` file convention used
//!   throughout `~/.claude/teams/` and `~/.claude/tasks/`.
//!
//! Round-trip preservation of unknown JSON fields is handled one layer up, in
//! the `schema` types themselves (`#[serde(flatten)] unknown_fields`), not
//! here — this module only moves bytes safely.

pub mod atomic;
pub mod error;
pub mod json;
pub mod lock;

pub use atomic::write_atomic;
pub use error::StoreError;
pub use json::{read_json, write_json_compact, write_json_pretty};
pub use lock::{acquire_lock, FileLock};

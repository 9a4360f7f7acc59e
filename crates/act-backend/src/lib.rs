//! Spawner and backend adapters: launching teammate processes under tmux,
//! and the remote-agent HTTP client for the opencode backend.

pub mod config;
pub mod error;
pub mod remote;
pub mod spawner;

pub use config::BackendConfig;
pub use error::{BackendError, BackendResult};
pub use spawner::{SpawnOptions, COLOR_PALETTE};

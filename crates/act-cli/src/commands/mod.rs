//! CLI command dispatch and execution

use clap::{Parser, Subcommand};

pub mod error;
mod inbox;
mod member;
mod send;
mod spawn;
mod task;
mod team;

pub use error::CommandError;

/// act - file-backed coordination for autonomous coding-agent teams
#[derive(Parser, Debug)]
#[command(
    name = "act",
    version,
    about = "File-backed coordination for autonomous coding-agent teams",
    long_about = "A thin CLI over the act-core/act-backend/act-handler library stack: team registry, task dependency graph, inbox messaging, and teammate spawning"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Team registry: create, delete, list, show config
    Team(team::TeamArgs),

    /// Spawn a teammate process under an existing team
    Spawn(spawn::SpawnArgs),

    /// Send or route a message, broadcast, or shutdown/plan handshake
    Send(send::SendArgs),

    /// Task dependency graph: create, update, list, get
    Task(task::TaskArgs),

    /// Read or poll an agent's inbox
    Inbox(inbox::InboxArgs),

    /// Force-remove a teammate (tmux kill + config cleanup)
    ForceKill(member::ForceKillArgs),

    /// Finish a graceful shutdown handshake: remove the teammate and reopen its tasks
    ShutdownApproved(member::ShutdownApprovedArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<(), CommandError> {
        match self.command {
            Commands::Team(args) => team::execute(args),
            Commands::Spawn(args) => spawn::execute(args),
            Commands::Send(args) => send::execute(args),
            Commands::Task(args) => task::execute(args),
            Commands::Inbox(args) => inbox::execute(args),
            Commands::ForceKill(args) => member::force_kill(args),
            Commands::ShutdownApproved(args) => member::shutdown_approved(args),
        }
    }
}

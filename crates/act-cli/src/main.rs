//! act - file-backed coordination for autonomous coding-agent teams
//!
//! A thin CLI over the act-core/act-backend/act-handler library stack,
//! providing team, task, send, and inbox commands with atomic file I/O.

use clap::Parser;

mod commands;

use commands::Cli;

fn main() {
    act_core::logging::init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

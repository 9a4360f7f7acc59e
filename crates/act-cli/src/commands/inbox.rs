//! Inbox command: read and poll a single agent's inbox.

use super::error::CommandError;
use act_handler::handler;
use clap::Args;

#[derive(Args, Debug)]
pub struct InboxArgs {
    #[command(subcommand)]
    command: InboxCommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum InboxCommand {
    /// Read an agent's inbox, optionally marking messages as read
    Read(ReadArgs),
    /// Block until an unread message arrives or the timeout elapses
    Poll(PollArgs),
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    team: String,
    agent: String,

    #[arg(long)]
    unread_only: bool,

    #[arg(long)]
    mark_as_read: bool,

    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub struct PollArgs {
    team: String,
    agent: String,

    #[arg(long, default_value_t = 30_000)]
    timeout_ms: u64,

    #[arg(long)]
    json: bool,
}

pub fn execute(args: InboxArgs) -> Result<(), CommandError> {
    match args.command {
        InboxCommand::Read(a) => read(a),
        InboxCommand::Poll(a) => poll(a),
    }
}

fn read(args: ReadArgs) -> Result<(), CommandError> {
    let messages = handler::read_inbox(&args.team, &args.agent, args.unread_only, args.mark_as_read, None)?;
    print_messages(&messages, args.json)
}

fn poll(args: PollArgs) -> Result<(), CommandError> {
    let messages = handler::poll_inbox(&args.team, &args.agent, args.timeout_ms, None)?;
    print_messages(&messages, args.json)
}

fn print_messages(messages: &[act_core::InboxMessage], json: bool) -> Result<(), CommandError> {
    if json {
        println!("{}", serde_json::to_string_pretty(messages)?);
    } else if messages.is_empty() {
        println!("No messages");
    } else {
        for msg in messages {
            let summary = msg.summary.as_deref().unwrap_or("");
            println!("[{}] {} — {}", msg.timestamp, msg.from, summary);
            println!("  {}", msg.text);
        }
    }
    Ok(())
}

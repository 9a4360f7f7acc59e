//! Team command implementation: create, delete, list, show config.

use super::error::CommandError;
use act_handler::{handler, Session};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct TeamArgs {
    #[command(subcommand)]
    command: TeamCommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum TeamCommand {
    /// Create a new team and register this session as its lead
    Create(CreateArgs),
    /// Delete a team (fails if teammates remain)
    Delete(DeleteArgs),
    /// List all teams on this machine
    List(ListArgs),
    /// Print a team's config.json
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Team name (letters, digits, hyphens, underscores; max 64 chars)
    team: String,

    #[arg(long, default_value = "")]
    description: String,

    #[arg(long, default_value = "sonnet")]
    lead_model: String,

    /// Working directory for the lead (defaults to the current directory)
    #[arg(long)]
    cwd: Option<PathBuf>,

    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    team: String,

    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    team: String,
}

pub fn execute(args: TeamArgs) -> Result<(), CommandError> {
    match args.command {
        TeamCommand::Create(a) => create(a),
        TeamCommand::Delete(a) => delete(a),
        TeamCommand::List(a) => list(a),
        TeamCommand::Config(a) => config(a),
    }
}

fn session_id() -> String {
    std::env::var("CLAUDE_SESSION_ID").unwrap_or_else(|_| format!("cli-{}", std::process::id()))
}

fn create(args: CreateArgs) -> Result<(), CommandError> {
    let cwd = match args.cwd {
        Some(p) => p,
        None => std::env::current_dir()?,
    };
    let mut session = Session::new(session_id());
    let result = handler::team_create(&mut session, &args.team, &args.description, &args.lead_model, &cwd, None)?;

    if args.json {
        let output = json!({
            "teamName": result.team_name,
            "teamFilePath": result.team_file_path,
            "leadAgentId": result.lead_agent_id,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Team '{}' created at {}", result.team_name, result.team_file_path);
        println!("  leadAgentId: {}", result.lead_agent_id);
    }
    Ok(())
}

fn delete(args: DeleteArgs) -> Result<(), CommandError> {
    let result = handler::team_delete(&args.team, None)?;
    if args.json {
        let output = json!({ "success": result.success, "message": result.message, "teamName": result.team_name });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", result.message);
    }
    Ok(())
}

fn list(args: ListArgs) -> Result<(), CommandError> {
    let teams_dir = act_core::home::get_home_dir()
        .map(|h| h.join(".claude/teams"))
        .map_err(|e| CommandError::Tool(e.to_string()))?;

    let mut names: Vec<String> = Vec::new();
    if teams_dir.exists() {
        for entry in std::fs::read_dir(&teams_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() && path.join("config.json").exists() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
    }
    names.sort();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&json!({ "teams": names }))?);
    } else if names.is_empty() {
        println!("No teams found");
    } else {
        println!("Teams:");
        for name in names {
            println!("  {name}");
        }
    }
    Ok(())
}

fn config(args: ConfigArgs) -> Result<(), CommandError> {
    let config = handler::read_config(&args.team, None)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

//! Spawn command: launch a teammate process under an existing team.

use super::error::CommandError;
use act_handler::{handler, Session};
use clap::Args;
use serde_json::json;

#[derive(Args, Debug)]
pub struct SpawnArgs {
    team: String,
    name: String,
    prompt: String,

    #[arg(long)]
    model: Option<String>,

    #[arg(long)]
    subagent_type: Option<String>,

    #[arg(long)]
    plan_mode_required: bool,

    /// claude | opencode (defaults to the first entry of CLAUDE_TEAMS_BACKENDS)
    #[arg(long)]
    backend: Option<String>,

    #[arg(long)]
    json: bool,
}

pub fn execute(args: SpawnArgs) -> Result<(), CommandError> {
    let session = Session::new(
        std::env::var("CLAUDE_SESSION_ID").unwrap_or_else(|_| format!("cli-{}", std::process::id())),
    );

    let result = handler::spawn_teammate_tool(
        &session,
        &args.team,
        &args.name,
        &args.prompt,
        args.model.as_deref(),
        args.subagent_type.as_deref(),
        args.plan_mode_required,
        args.backend.as_deref(),
        None,
    )?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "agentId": result.agent_id,
                "name": result.name,
                "teamName": result.team_name,
            }))?
        );
    } else {
        println!("Spawned '{}' ({}) on team '{}'", result.name, result.agent_id, result.team_name);
    }
    Ok(())
}

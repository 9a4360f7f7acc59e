//! Teammate-removal commands: force-kill (lead-initiated) and
//! shutdown-approved (teammate self-removal after a graceful handshake).

use super::error::CommandError;
use act_handler::handler;
use clap::Args;

#[derive(Args, Debug)]
pub struct ForceKillArgs {
    team: String,
    agent: String,

    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub struct ShutdownApprovedArgs {
    team: String,
    agent: String,

    #[arg(long)]
    json: bool,
}

pub fn force_kill(args: ForceKillArgs) -> Result<(), CommandError> {
    let result = handler::force_kill_teammate(&args.team, &args.agent, None)?;
    print_result(&result, args.json)
}

pub fn shutdown_approved(args: ShutdownApprovedArgs) -> Result<(), CommandError> {
    let result = handler::process_shutdown_approved(&args.team, &args.agent, None)?;
    print_result(&result, args.json)
}

fn print_result(result: &act_handler::result::SimpleResult, json: bool) -> Result<(), CommandError> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", result.message);
    }
    Ok(())
}

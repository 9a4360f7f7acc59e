//! Send command: message, broadcast, shutdown_request, shutdown_response,
//! plan_approval_response — one dispatch surface matching [`act_handler::handler::send_message`].

use super::error::CommandError;
use act_handler::handler::{self, SendMessageRequest};
use clap::Args;

/// Send or route a message within a team
#[derive(Args, Debug)]
pub struct SendArgs {
    team: String,

    /// message | broadcast | shutdown_request | shutdown_response | plan_approval_response
    #[arg(value_name = "KIND")]
    kind: String,

    /// Recipient agent name (ignored for broadcast)
    #[arg(long, default_value = "")]
    recipient: String,

    /// Message body or shutdown reason
    #[arg(long, default_value = "")]
    content: String,

    #[arg(long, default_value = "")]
    summary: String,

    /// Shutdown request id being responded to
    #[arg(long, default_value = "")]
    request_id: String,

    /// Approve/reject for shutdown_response and plan_approval_response
    #[arg(long)]
    approve: Option<bool>,

    /// Sender identity (defaults to "team-lead")
    #[arg(long, default_value = "")]
    from: String,

    #[arg(long)]
    json: bool,
}

pub fn execute(args: SendArgs) -> Result<(), CommandError> {
    let req = SendMessageRequest {
        recipient: args.recipient,
        content: args.content,
        summary: args.summary,
        request_id: args.request_id,
        approve: args.approve,
        sender: args.from,
    };

    let result = handler::send_message(&args.team, &args.kind, req, None)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.message);
    }
    Ok(())
}

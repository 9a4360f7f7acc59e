//! Task command: create, update, list, get — the dependency-graph surface.

use super::error::CommandError;
use act_handler::handler::{self, TaskCreateRequest};
use clap::Args;

#[derive(Args, Debug)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: TaskCommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum TaskCommand {
    Create(CreateArgs),
    Update(UpdateArgs),
    List(ListArgs),
    Get(GetArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    team: String,
    subject: String,

    #[arg(long, default_value = "")]
    description: String,

    #[arg(long, default_value = "")]
    active_form: String,

    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    team: String,
    task_id: String,

    #[arg(long)]
    status: Option<String>,

    #[arg(long)]
    owner: Option<String>,

    #[arg(long)]
    subject: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    active_form: Option<String>,

    #[arg(long = "add-blocks")]
    add_blocks: Vec<String>,

    #[arg(long = "add-blocked-by")]
    add_blocked_by: Vec<String>,

    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    team: String,

    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    team: String,
    task_id: String,
}

pub fn execute(args: TaskArgs) -> Result<(), CommandError> {
    match args.command {
        TaskCommand::Create(a) => create(a),
        TaskCommand::Update(a) => update(a),
        TaskCommand::List(a) => list(a),
        TaskCommand::Get(a) => get(a),
    }
}

fn create(args: CreateArgs) -> Result<(), CommandError> {
    let req = TaskCreateRequest {
        subject: args.subject,
        description: args.description,
        active_form: args.active_form,
        metadata: None,
    };
    let task = handler::task_create(&args.team, req, None)?;
    print_task(&task, args.json)
}

fn parse_status(s: &str) -> Result<act_core::TaskStatus, CommandError> {
    match s {
        "pending" => Ok(act_core::TaskStatus::Pending),
        "in_progress" => Ok(act_core::TaskStatus::InProgress),
        "completed" => Ok(act_core::TaskStatus::Completed),
        "deleted" => Ok(act_core::TaskStatus::Deleted),
        other => Err(CommandError::Tool(format!(
            "invalid status {other:?}: expected pending, in_progress, completed, or deleted"
        ))),
    }
}

fn update(args: UpdateArgs) -> Result<(), CommandError> {
    let status = args.status.as_deref().map(parse_status).transpose()?;
    let update = act_core::task::TaskUpdate {
        status,
        owner: args.owner,
        subject: args.subject,
        description: args.description,
        active_form: args.active_form,
        add_blocks: args.add_blocks,
        add_blocked_by: args.add_blocked_by,
        metadata: None,
    };
    let task = handler::task_update(&args.team, &args.task_id, update, None)?;
    print_task(&task, args.json)
}

fn list(args: ListArgs) -> Result<(), CommandError> {
    let tasks = handler::task_list(&args.team, None)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else if tasks.is_empty() {
        println!("No tasks found");
    } else {
        for task in &tasks {
            let owner = task.owner.as_deref().unwrap_or("-");
            println!("  [{}] {:?} {} (owner: {owner})", task.id, task.status, task.subject);
        }
    }
    Ok(())
}

fn get(args: GetArgs) -> Result<(), CommandError> {
    let task = handler::task_get(&args.team, &args.task_id, None)?;
    print_task(&task, true)
}

fn print_task(task: &act_core::TaskItem, json: bool) -> Result<(), CommandError> {
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        println!("[{}] {:?} {}", task.id, task.status, task.subject);
        if let Some(ref owner) = task.owner {
            println!("  owner: {owner}");
        }
        if !task.blocked_by.is_empty() {
            println!("  blockedBy: {}", task.blocked_by.join(", "));
        }
        if !task.blocks.is_empty() {
            println!("  blocks: {}", task.blocks.join(", "));
        }
    }
    Ok(())
}

//! Task dependency engine: one JSON file per task, a team-wide lock, and a
//! strict read-validate-mutate-write transaction for every update.
//!
//! Grounded on `tasks.py`. The whole team's task directory shares one
//! `.lock` file (not one lock per task) because validating a single edge
//! (cycle detection, blocked-by-completion) requires a consistent view of
//! every other task in the team.

use crate::error::{CoreError, CoreResult};
use crate::io::{acquire_lock, read_json, write_json_compact, StoreError};
use crate::paths;
use crate::schema::{TaskItem, TaskStatus};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

const LOCK_RETRIES: u32 = 5;

fn task_team_exists(team_name: &str, base_dir: Option<&Path>) -> bool {
    crate::team::team_exists(team_name, base_dir)
}

fn task_file_path(team_dir: &Path, task_id: &str) -> PathBuf {
    team_dir.join(format!("{task_id}.json"))
}

fn is_task_file(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return None;
    }
    stem.parse::<u64>().ok()?;
    Some(stem.to_string())
}

fn list_task_files(team_dir: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
    if !team_dir.exists() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in std::fs::read_dir(team_dir)? {
        let entry = entry?;
        let path = entry.path();
        if let Some(id) = is_task_file(&path) {
            out.push((id, path));
        }
    }
    Ok(out)
}

/// BFS from `to_id` through `blocked_by` edges (on-disk union pending);
/// true if it reaches `from_id`, meaning `from_id blocked_by to_id` would
/// close a cycle.
fn would_create_cycle(
    team_dir: &Path,
    from_id: &str,
    to_id: &str,
    pending_edges: &HashMap<String, HashSet<String>>,
) -> CoreResult<bool> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    queue.push_back(to_id.to_string());

    while let Some(current) = queue.pop_front() {
        if current == from_id {
            return Ok(true);
        }
        if visited.contains(&current) {
            continue;
        }
        visited.insert(current.clone());

        let fpath = task_file_path(team_dir, &current);
        if fpath.exists() {
            let task: TaskItem = read_json(&fpath)?;
            for d in task.blocked_by {
                if !visited.contains(&d) {
                    queue.push_back(d);
                }
            }
        }
        if let Some(extra) = pending_edges.get(&current) {
            for d in extra {
                if !visited.contains(d) {
                    queue.push_back(d.clone());
                }
            }
        }
    }
    Ok(false)
}

pub fn next_task_id(team_name: &str, base_dir: Option<&Path>) -> CoreResult<String> {
    let team_dir = paths::task_team_dir(team_name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    let files = list_task_files(&team_dir).map_err(|e| CoreError::Io(StoreError::Io { path: team_dir, source: e }))?;
    let max_id = files.iter().filter_map(|(id, _)| id.parse::<u64>().ok()).max();
    Ok(match max_id {
        Some(n) => (n + 1).to_string(),
        None => "1".to_string(),
    })
}

pub fn create_task(
    team_name: &str,
    subject: &str,
    description: &str,
    active_form: &str,
    metadata: Option<HashMap<String, serde_json::Value>>,
    base_dir: Option<&Path>,
) -> CoreResult<TaskItem> {
    if subject.trim().is_empty() {
        return Err(CoreError::InvalidInput("task subject must not be empty".to_string()));
    }
    if !task_team_exists(team_name, base_dir) {
        return Err(CoreError::NotFound(format!("team {team_name:?} does not exist")));
    }

    let team_dir = paths::task_team_dir(team_name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    std::fs::create_dir_all(&team_dir).map_err(|e| CoreError::Io(StoreError::Io { path: team_dir.clone(), source: e }))?;
    let lock_path = team_dir.join(".lock");
    let _lock = acquire_lock(&lock_path, LOCK_RETRIES)?;

    let task_id = next_task_id(team_name, base_dir)?;
    let mut task = TaskItem::new(task_id.clone(), subject.to_string(), description.to_string(), active_form.to_string());
    task.metadata = metadata;

    let fpath = task_file_path(&team_dir, &task_id);
    write_json_compact(&fpath, &task)?;
    Ok(task)
}

pub fn get_task(team_name: &str, task_id: &str, base_dir: Option<&Path>) -> CoreResult<TaskItem> {
    let team_dir = paths::task_team_dir(team_name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    let fpath = task_file_path(&team_dir, task_id);
    if !fpath.exists() {
        return Err(CoreError::NotFound(format!("task {task_id:?} not found in team {team_name:?}")));
    }
    Ok(read_json(&fpath)?)
}

pub fn list_tasks(team_name: &str, base_dir: Option<&Path>) -> CoreResult<Vec<TaskItem>> {
    if !task_team_exists(team_name, base_dir) {
        return Err(CoreError::NotFound(format!("team {team_name:?} does not exist")));
    }
    let team_dir = paths::task_team_dir(team_name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    let files = list_task_files(&team_dir).map_err(|e| CoreError::Io(StoreError::Io { path: team_dir, source: e }))?;
    let mut tasks = Vec::with_capacity(files.len());
    for (_, path) in files {
        tasks.push(read_json::<TaskItem>(&path)?);
    }
    tasks.sort_by_key(|t| t.id.parse::<u64>().unwrap_or(u64::MAX));
    Ok(tasks)
}

/// Fields a caller may update in one [`update_task`] call. `None` means
/// "leave unchanged"; `metadata` entries mapped to `Value::Null` delete that
/// key from the task's existing metadata.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub status: Option<TaskStatus>,
    pub owner: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub active_form: Option<String>,
    pub add_blocks: Vec<String>,
    pub add_blocked_by: Vec<String>,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

pub fn update_task(
    team_name: &str,
    task_id: &str,
    update: TaskUpdate,
    base_dir: Option<&Path>,
) -> CoreResult<TaskItem> {
    let team_dir = paths::task_team_dir(team_name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    let lock_path = team_dir.join(".lock");
    let fpath = task_file_path(&team_dir, task_id);
    let _lock = acquire_lock(&lock_path, LOCK_RETRIES)?;

    // --- Phase 1: read ---
    if !fpath.exists() {
        return Err(CoreError::NotFound(format!("task {task_id:?} not found in team {team_name:?}")));
    }
    let mut task: TaskItem = read_json(&fpath)?;

    // --- Phase 2: validate (no disk writes) ---
    let mut pending_edges: HashMap<String, HashSet<String>> = HashMap::new();

    for b in &update.add_blocks {
        if b == task_id {
            return Err(CoreError::Precondition(format!("task {task_id} cannot block itself")));
        }
        if !task_file_path(&team_dir, b).exists() {
            return Err(CoreError::NotFound(format!("referenced task {b:?} does not exist")));
        }
    }
    for b in &update.add_blocks {
        pending_edges.entry(b.clone()).or_default().insert(task_id.to_string());
    }

    for b in &update.add_blocked_by {
        if b == task_id {
            return Err(CoreError::Precondition(format!("task {task_id} cannot be blocked by itself")));
        }
        if !task_file_path(&team_dir, b).exists() {
            return Err(CoreError::NotFound(format!("referenced task {b:?} does not exist")));
        }
    }
    for b in &update.add_blocked_by {
        pending_edges.entry(task_id.to_string()).or_default().insert(b.clone());
    }

    for b in &update.add_blocks {
        if would_create_cycle(&team_dir, b, task_id, &pending_edges)? {
            return Err(CoreError::Precondition(format!(
                "adding block {task_id} -> {b} would create a circular dependency"
            )));
        }
    }
    for b in &update.add_blocked_by {
        if would_create_cycle(&team_dir, task_id, b, &pending_edges)? {
            return Err(CoreError::Precondition(format!(
                "adding dependency {task_id} blocked_by {b} would create a circular dependency"
            )));
        }
    }

    if let Some(new_status) = update.status {
        if new_status != TaskStatus::Deleted {
            let cur_order = task.status.order().expect("current status is never Deleted mid-transaction");
            let new_order = new_status.order().ok_or_else(|| {
                CoreError::InvalidInput(format!("invalid status transition target: {new_status:?}"))
            })?;
            if new_order < cur_order {
                return Err(CoreError::Precondition(format!(
                    "cannot transition from {:?} to {:?}",
                    task.status, new_status
                )));
            }

            let mut effective_blocked_by: HashSet<String> = task.blocked_by.iter().cloned().collect();
            effective_blocked_by.extend(update.add_blocked_by.iter().cloned());

            if matches!(new_status, TaskStatus::InProgress | TaskStatus::Completed) && !effective_blocked_by.is_empty() {
                for blocker_id in &effective_blocked_by {
                    let blocker_path = task_file_path(&team_dir, blocker_id);
                    if blocker_path.exists() {
                        let blocker: TaskItem = read_json(&blocker_path)?;
                        if blocker.status != TaskStatus::Completed {
                            return Err(CoreError::Precondition(format!(
                                "cannot set status to {new_status:?}: blocked by task {blocker_id} (status: {:?})",
                                blocker.status
                            )));
                        }
                    }
                }
            }
        }
    }

    // --- Phase 3: mutate in-memory ---
    let mut pending_writes: HashMap<PathBuf, TaskItem> = HashMap::new();

    if let Some(subject) = update.subject {
        task.subject = subject;
    }
    if let Some(description) = update.description {
        task.description = description;
    }
    if let Some(active_form) = update.active_form {
        task.active_form = active_form;
    }
    if let Some(owner) = update.owner {
        task.owner = Some(owner);
    }

    let read_or_pending = |pending_writes: &HashMap<PathBuf, TaskItem>, path: &Path| -> CoreResult<TaskItem> {
        if let Some(t) = pending_writes.get(path) {
            Ok(t.clone())
        } else {
            Ok(read_json(path)?)
        }
    };

    for b in &update.add_blocks {
        if !task.blocks.contains(b) {
            task.blocks.push(b.clone());
        }
        let b_path = task_file_path(&team_dir, b);
        let mut other = read_or_pending(&pending_writes, &b_path)?;
        if !other.blocked_by.contains(&task_id.to_string()) {
            other.blocked_by.push(task_id.to_string());
        }
        pending_writes.insert(b_path, other);
    }

    for b in &update.add_blocked_by {
        if !task.blocked_by.contains(b) {
            task.blocked_by.push(b.clone());
        }
        let b_path = task_file_path(&team_dir, b);
        let mut other = read_or_pending(&pending_writes, &b_path)?;
        if !other.blocks.contains(&task_id.to_string()) {
            other.blocks.push(task_id.to_string());
        }
        pending_writes.insert(b_path, other);
    }

    if let Some(metadata_patch) = update.metadata {
        let mut current = task.metadata.take().unwrap_or_default();
        for (k, v) in metadata_patch {
            if v.is_null() {
                current.remove(&k);
            } else {
                current.insert(k, v);
            }
        }
        task.metadata = if current.is_empty() { None } else { Some(current) };
    }

    let mut deleted = false;
    if let Some(new_status) = update.status {
        if new_status == TaskStatus::Deleted {
            deleted = true;
            task.status = TaskStatus::Deleted;
            for (id, path) in list_task_files(&team_dir).map_err(|e| CoreError::Io(StoreError::Io { path: team_dir.clone(), source: e }))? {
                if id == task_id {
                    continue;
                }
                let mut other = read_or_pending(&pending_writes, &path)?;
                let mut changed = false;
                if other.blocked_by.iter().any(|x| x == task_id) {
                    other.blocked_by.retain(|x| x != task_id);
                    changed = true;
                }
                if other.blocks.iter().any(|x| x == task_id) {
                    other.blocks.retain(|x| x != task_id);
                    changed = true;
                }
                if changed {
                    pending_writes.insert(path, other);
                }
            }
        } else {
            task.status = new_status;
            if new_status == TaskStatus::Completed {
                for (id, path) in list_task_files(&team_dir).map_err(|e| CoreError::Io(StoreError::Io { path: team_dir.clone(), source: e }))? {
                    if id == task_id {
                        continue;
                    }
                    let mut other = read_or_pending(&pending_writes, &path)?;
                    if other.blocked_by.iter().any(|x| x == task_id) {
                        other.blocked_by.retain(|x| x != task_id);
                        pending_writes.insert(path, other);
                    }
                }
            }
        }
    }

    // --- Phase 4: write ---
    for (path, other) in &pending_writes {
        write_json_compact(path, other)?;
    }
    if deleted {
        std::fs::remove_file(&fpath).map_err(|e| CoreError::Io(StoreError::Io { path: fpath.clone(), source: e }))?;
    } else {
        write_json_compact(&fpath, &task)?;
    }

    Ok(task)
}

pub fn reset_owner_tasks(team_name: &str, agent_name: &str, base_dir: Option<&Path>) -> CoreResult<()> {
    let team_dir = paths::task_team_dir(team_name, base_dir).map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    let lock_path = team_dir.join(".lock");
    let _lock = acquire_lock(&lock_path, LOCK_RETRIES)?;

    for (_, path) in list_task_files(&team_dir).map_err(|e| CoreError::Io(StoreError::Io { path: team_dir.clone(), source: e }))? {
        let mut task: TaskItem = read_json(&path)?;
        if task.owner.as_deref() == Some(agent_name) {
            if task.status != TaskStatus::Completed {
                task.status = TaskStatus::Pending;
            }
            task.owner = None;
            write_json_compact(&path, &task)?;
        }
    }
    Ok(())
}

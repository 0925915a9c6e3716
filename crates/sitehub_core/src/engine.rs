use crate::clock::{self, Clock};
use crate::error::AppError;
use crate::model::{Completion, Day, LogEntry, Member, Role, Task, TaskCategory};
use uuid::Uuid;

// Every operation here is a pure transformation: it takes the current Day and
// returns the next Day with exactly one log entry appended; persistence is the
// caller's job. Failures return the typed error and leave the input untouched.

pub fn toggle_task(
    day: &Day,
    member: &Member,
    task_id: &str,
    clock: &dyn Clock,
) -> Result<Day, AppError> {
    guard_open_for_edit(day, member)?;

    let trimmed_id = task_id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("task id is required"));
    }

    let now = clock::timestamp(clock)?;
    let mut updated = day.clone();
    let task = updated
        .tasks
        .iter_mut()
        .find(|task| task.id == trimmed_id)
        .ok_or_else(|| AppError::invalid_input("task not found"))?;

    // A worker's un-check is self-service and removes only their own
    // signature. A coordinator's un-check is a supervisory reset that
    // clears every signature on the task.
    let entry_text = if member.role == Role::Coordinator && task.is_done() {
        task.completions.clear();
        format!("{} reset: {}", member.name, task.text)
    } else if task.signed_by(&member.name) {
        task.completions.retain(|entry| entry.name != member.name);
        format!("{} removed: {}", member.name, task.text)
    } else {
        task.completions.push(Completion {
            name: member.name.clone(),
            signed_at: now.clone(),
        });
        format!("{} completed: {}", member.name, task.text)
    };

    updated.log.push(LogEntry {
        timestamp: now,
        text: entry_text,
    });

    Ok(updated)
}

pub fn add_adhoc_task(
    day: &Day,
    member: &Member,
    text: &str,
    clock: &dyn Clock,
) -> Result<Day, AppError> {
    guard_open_for_edit(day, member)?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("task text is required"));
    }

    let now = clock::timestamp(clock)?;
    let mut updated = day.clone();
    updated.tasks.push(Task {
        id: Uuid::new_v4().to_string(),
        text: trimmed.to_string(),
        category: TaskCategory::AdHoc,
        completions: Vec::new(),
        created_at: now.clone(),
    });
    updated.log.push(LogEntry {
        timestamp: now,
        text: format!("{} added ad-hoc: {trimmed}", member.name),
    });

    Ok(updated)
}

pub fn approve_day(day: &Day, member: &Member, clock: &dyn Clock) -> Result<Day, AppError> {
    if day.approved {
        return Err(AppError::permission_denied("day is already approved"));
    }
    if !member.role.can_approve() {
        return Err(AppError::permission_denied("only the lead can approve the day"));
    }

    let open_tasks = day.tasks.iter().filter(|task| !task.is_done()).count();
    if open_tasks > 0 {
        return Err(AppError::not_ready(format!(
            "{open_tasks} task(s) still unsigned"
        )));
    }

    let now = clock::timestamp(clock)?;
    let mut updated = day.clone();
    updated.approved = true;
    updated.approved_by = Some(member.name.clone());
    updated.approved_at = Some(now.clone());
    updated.log.push(LogEntry {
        timestamp: now,
        text: format!("{} approved the day", member.name),
    });

    Ok(updated)
}

fn guard_open_for_edit(day: &Day, member: &Member) -> Result<(), AppError> {
    if day.approved {
        return Err(AppError::permission_denied("day is approved and locked"));
    }
    if !member.role.can_edit_tasks() {
        return Err(AppError::permission_denied("role cannot edit tasks"));
    }
    Ok(())
}

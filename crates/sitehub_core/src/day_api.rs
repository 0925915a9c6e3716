use crate::clock::{self, Clock, SystemClock};
use crate::config::{self, Config};
use crate::engine;
use crate::error::AppError;
use crate::model::{Day, LogEntry, Member, Task, TaskCategory};
use crate::storage::json_store::{self, DayState};
use log::{debug, warn};
use std::path::Path;
use uuid::Uuid;

pub fn today() -> Result<String, AppError> {
    clock::today(&SystemClock)
}

pub fn get_or_create_day(date: &str) -> Result<Day, AppError> {
    let path = json_store::store_path()?;
    get_or_create_day_with_path(&path, &active_config(), date, &SystemClock)
}

pub fn toggle_task(date: &str, member: &Member, task_id: &str) -> Result<Day, AppError> {
    let path = json_store::store_path()?;
    toggle_task_with_path(&path, &active_config(), date, member, task_id, &SystemClock)
}

pub fn add_adhoc_task(date: &str, member: &Member, text: &str) -> Result<Day, AppError> {
    let path = json_store::store_path()?;
    add_adhoc_task_with_path(&path, &active_config(), date, member, text, &SystemClock)
}

pub fn approve_day(date: &str, member: &Member) -> Result<Day, AppError> {
    let path = json_store::store_path()?;
    approve_day_with_path(&path, &active_config(), date, member, &SystemClock)
}

pub fn day_log(date: &str) -> Result<Vec<LogEntry>, AppError> {
    Ok(get_or_create_day(date)?.log)
}

pub fn approved_day(date: &str) -> Result<Day, AppError> {
    let path = json_store::store_path()?;
    approved_day_with_path(&path, date)
}

fn active_config() -> Config {
    let load = config::load_config_with_fallback();
    if let Some(err) = load.error {
        warn!("config unreadable, using defaults: {err}");
    }
    load.config
}

fn load_state_or_recover(path: &Path) -> DayState {
    let load = json_store::load_state_with_fallback(path);
    if let Some(err) = load.error {
        warn!("store unreadable, starting from an empty state: {err}");
    }
    load.state
}

fn get_or_create_day_with_path(
    path: &Path,
    config: &Config,
    date: &str,
    clock: &dyn Clock,
) -> Result<Day, AppError> {
    let date = clock::parse_date(date)?;
    let mut state = load_state_or_recover(path);
    obtain_day(path, config, &date, clock, &mut state)
}

// Re-fetched from the store on every mutation; a Day is never cached across
// operations. Whole-record replace on save, last write wins.
fn toggle_task_with_path(
    path: &Path,
    config: &Config,
    date: &str,
    member: &Member,
    task_id: &str,
    clock: &dyn Clock,
) -> Result<Day, AppError> {
    let date = clock::parse_date(date)?;
    let mut state = load_state_or_recover(path);
    let day = obtain_day(path, config, &date, clock, &mut state)?;

    let updated = engine::toggle_task(&day, member, task_id, clock)?;
    state.days.insert(date.clone(), updated.clone());
    json_store::save_state(path, &state)?;
    debug!("{} toggled task {task_id} on {date}", member.name);

    Ok(updated)
}

fn add_adhoc_task_with_path(
    path: &Path,
    config: &Config,
    date: &str,
    member: &Member,
    text: &str,
    clock: &dyn Clock,
) -> Result<Day, AppError> {
    let date = clock::parse_date(date)?;
    let mut state = load_state_or_recover(path);
    let day = obtain_day(path, config, &date, clock, &mut state)?;

    let updated = engine::add_adhoc_task(&day, member, text, clock)?;
    state.days.insert(date.clone(), updated.clone());
    json_store::save_state(path, &state)?;
    debug!("{} added ad-hoc task on {date}", member.name);

    Ok(updated)
}

fn approve_day_with_path(
    path: &Path,
    config: &Config,
    date: &str,
    member: &Member,
    clock: &dyn Clock,
) -> Result<Day, AppError> {
    let date = clock::parse_date(date)?;
    let mut state = load_state_or_recover(path);
    let day = obtain_day(path, config, &date, clock, &mut state)?;

    let updated = engine::approve_day(&day, member, clock)?;
    state.days.insert(date.clone(), updated.clone());
    json_store::save_state(path, &state)?;
    debug!("{} approved {date}", member.name);

    Ok(updated)
}

fn approved_day_with_path(path: &Path, date: &str) -> Result<Day, AppError> {
    let date = clock::parse_date(date)?;
    let state = load_state_or_recover(path);

    match state.days.get(&date) {
        Some(day) if day.approved => Ok(day.clone()),
        _ => Err(AppError::not_ready(format!("{date} is not approved"))),
    }
}

fn obtain_day(
    path: &Path,
    config: &Config,
    date: &str,
    clock: &dyn Clock,
    state: &mut DayState,
) -> Result<Day, AppError> {
    if let Some(day) = state.days.get(date) {
        return Ok(day.clone());
    }

    let day = fresh_day(config, date, clock)?;
    state.days.insert(date.to_string(), day.clone());
    json_store::save_state(path, state)?;
    debug!("created {date} from the template ({} tasks)", day.tasks.len());

    Ok(day)
}

fn fresh_day(config: &Config, date: &str, clock: &dyn Clock) -> Result<Day, AppError> {
    let created_at = clock::timestamp(clock)?;
    let mut tasks =
        Vec::with_capacity(config.opening_tasks.len() + config.closing_tasks.len());
    for text in &config.opening_tasks {
        tasks.push(template_task(text, TaskCategory::Opening, &created_at));
    }
    for text in &config.closing_tasks {
        tasks.push(template_task(text, TaskCategory::Closing, &created_at));
    }

    Ok(Day {
        date: date.to_string(),
        site: config.site.clone(),
        tasks,
        approved: false,
        approved_by: None,
        approved_at: None,
        log: Vec::new(),
    })
}

fn template_task(text: &str, category: TaskCategory, created_at: &str) -> Task {
    Task {
        id: Uuid::new_v4().to_string(),
        text: text.to_string(),
        category,
        completions: Vec::new(),
        created_at: created_at.to_string(),
    }
}

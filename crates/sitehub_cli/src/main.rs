use clap::{CommandFactory, Parser};
use sitehub_cli::cli::{Cli, Command};
use sitehub_core::config;
use sitehub_core::day_api;
use sitehub_core::error::AppError;
use sitehub_core::logging;
use sitehub_core::model::{Day, LogEntry, Member, Task};
use sitehub_core::roster::Roster;
use sitehub_core::session::Session;
use std::io::{self, BufRead};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "done")]
    done: &'static str,
    #[tabled(rename = "category")]
    category: &'static str,
    #[tabled(rename = "task")]
    text: String,
    #[tabled(rename = "signed by")]
    signed_by: String,
    #[tabled(rename = "id")]
    id: String,
}

fn signer_names(task: &Task) -> String {
    task.completions
        .iter()
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn task_rows(day: &Day) -> Vec<TaskRow> {
    day.tasks
        .iter()
        .map(|task| TaskRow {
            done: if task.is_done() { "[x]" } else { "[ ]" },
            category: task.category.label(),
            text: task.text.clone(),
            signed_by: signer_names(task),
            id: task.id.clone(),
        })
        .collect()
}

fn print_day_plain(day: &Day) {
    println!("{} - {}", day.site, day.date);
    if day.approved {
        println!("Approved by {}", day.approved_by.as_deref().unwrap_or("-"));
    }
    println!("{}", Table::new(task_rows(day)));
}

fn print_day_json(day: &Day) -> Result<(), AppError> {
    let payload =
        serde_json::to_string_pretty(day).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn print_log_plain(entries: &[LogEntry]) {
    for entry in entries {
        println!("{} | {}", entry.timestamp, entry.text);
    }
}

fn print_log_json(entries: &[LogEntry]) -> Result<(), AppError> {
    let payload = serde_json::to_string_pretty(entries)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn print_report_plain(day: &Day) {
    println!("Daily checklist - {}", day.site);
    println!("Date: {}", day.date);
    println!();
    for task in &day.tasks {
        println!(
            "[{}] {} - signed by {}",
            task.category.label(),
            task.text,
            signer_names(task)
        );
    }
    println!();
    println!(
        "Finally approved by {} at {}",
        day.approved_by.as_deref().unwrap_or("-"),
        day.approved_at.as_deref().unwrap_or("-")
    );
}

fn last_log_line(day: &Day) -> &str {
    day.log
        .last()
        .map(|entry| entry.text.as_str())
        .unwrap_or("no changes")
}

fn active_roster() -> Result<Roster, AppError> {
    let load = config::load_config_with_fallback();
    if let Some(err) = load.error {
        eprintln!("WARNING: {err}");
    }
    Roster::from_config(&load.config)
}

fn resolve_member(
    user: Option<&str>,
    pin: Option<&str>,
    session_member: Option<&Member>,
) -> Result<Member, AppError> {
    if let (Some(user), Some(pin)) = (user, pin) {
        return active_roster()?.authenticate(user, pin);
    }
    if let Some(member) = session_member {
        return Ok(member.clone());
    }
    Err(AppError::invalid_input("log in first or pass --user and --pin"))
}

fn run_command(cli: Cli, session_member: Option<&Member>) -> Result<(), AppError> {
    let date = match cli.date.as_deref() {
        Some(value) => value.to_string(),
        None => day_api::today()?,
    };

    match cli.command {
        Command::Show => {
            let day = day_api::get_or_create_day(&date)?;
            if cli.json {
                print_day_json(&day)?;
            } else {
                print_day_plain(&day);
            }
        }
        Command::Toggle { id } => {
            let member = resolve_member(cli.user.as_deref(), cli.pin.as_deref(), session_member)?;
            let day = day_api::toggle_task(&date, &member, &id)?;
            if cli.json {
                print_day_json(&day)?;
            } else {
                println!("{}", last_log_line(&day));
            }
        }
        Command::Add { text } => {
            let member = resolve_member(cli.user.as_deref(), cli.pin.as_deref(), session_member)?;
            let day = day_api::add_adhoc_task(&date, &member, &text)?;
            if cli.json {
                print_day_json(&day)?;
            } else {
                println!("{}", last_log_line(&day));
            }
        }
        Command::Approve => {
            let member = resolve_member(cli.user.as_deref(), cli.pin.as_deref(), session_member)?;
            let day = day_api::approve_day(&date, &member)?;
            if cli.json {
                print_day_json(&day)?;
            } else {
                println!("{}", last_log_line(&day));
            }
        }
        Command::Log => {
            let entries = day_api::day_log(&date)?;
            if cli.json {
                print_log_json(&entries)?;
            } else {
                print_log_plain(&entries);
            }
        }
        Command::Report => {
            let day = day_api::approved_day(&date)?;
            if cli.json {
                print_day_json(&day)?;
            } else {
                print_report_plain(&day);
            }
        }
    }

    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
    println!("Session commands: login <user> <pin>, logout");
}

fn run_interactive() -> Result<(), AppError> {
    let roster = active_roster()?;
    let mut session = Session::new();
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        if args[0].eq_ignore_ascii_case("login") {
            if args.len() != 3 {
                eprintln!("ERROR: {}", AppError::invalid_input("usage: login <user> <pin>"));
                continue;
            }
            match session.login(&roster, &args[1], &args[2]) {
                Ok(member) => {
                    println!("Logged in as {} ({})", member.name, member.role.label());
                }
                Err(err) => eprintln!("ERROR: {}", err),
            }
            continue;
        }

        if args[0].eq_ignore_ascii_case("logout") {
            session.logout();
            println!("Logged out");
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("sitehub".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, session.current()) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn init_logging_from_env() {
    if let Ok(dir) = std::env::var("SITEHUB_LOG_DIR")
        && !dir.trim().is_empty()
        && let Err(err) = logging::init_logging(logging::default_log_level(), &dir)
    {
        eprintln!("WARNING: {err}");
    }
}

fn main() {
    init_logging_from_env();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli, None) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}

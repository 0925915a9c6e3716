use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sitehub", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Member id or name used to authenticate this invocation
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// PIN matching --user
    #[arg(long, global = true)]
    pub pin: Option<String>,

    /// Day to operate on (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true)]
    pub date: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the day's checklist, creating it from the template if needed
    ///
    /// Example: sitehub show --date 2026-03-01
    Show,
    /// Sign a task, or take your signature back if you already signed it
    ///
    /// Example: sitehub toggle 3f9d... --user oliver --pin 1111
    Toggle {
        id: String,
    },
    /// Append an ad-hoc task to the day
    ///
    /// Example: sitehub add "Sweep the ramp" --user emil --pin 2222
    Add {
        text: String,
    },
    /// Approve the day, locking it against further edits
    ///
    /// Example: sitehub approve --user jon --pin 9999
    Approve,
    /// Print the day's activity log
    ///
    /// Example: sitehub log --date 2026-03-01
    Log,
    /// Print the report for an approved day
    ///
    /// Example: sitehub report --date 2026-03-01
    Report,
}

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Build, explain and preview repeat rules for Adeo tasks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Work with repeat rule strings
    Rule(RuleCommand),
    /// Apply repeat rules to task records
    Task(TaskCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct RuleCommand {
    #[command(subcommand)]
    pub command: RuleSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RuleSubcommand {
    /// Build a rule from editor choices
    Build(RuleBuildCommand),
    /// Print the rule for a quick-pick preset
    Preset(RulePresetCommand),
    /// Show the editor fields a stored rule maps back to
    Parse(RuleParseCommand),
    /// Print the preset a rule corresponds to, or "custom"
    Classify(RuleTextCommand),
    /// Describe a rule in plain English
    Summary(RuleTextCommand),
    /// List the next occurrences of a rule
    Next(RuleNextCommand),
    /// Edit a rule interactively
    Edit(RuleEditCommand),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyArg {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Parser, Debug, Clone)]
pub struct RuleBuildCommand {
    /// How often the rule repeats
    #[arg(long, value_enum)]
    pub freq: FrequencyArg,
    /// Repeat every N periods (ignored for yearly rules)
    #[arg(long, default_value_t = 1)]
    pub interval: u32,
    /// Days of week for weekly rules (e.g. 'mon,wed,fri')
    #[arg(long)]
    pub on: Option<String>,
    /// Day of month for monthly and yearly rules (1-31 or 'last')
    #[arg(long, conflicts_with_all = ["ordinal", "weekday"])]
    pub day: Option<String>,
    /// Ordinal for "the Nth <day>" patterns (first, second, third, fourth, last)
    #[arg(long)]
    pub ordinal: Option<String>,
    /// Day for "the Nth <day>" patterns (a weekday name, 'weekday' or 'weekend-day')
    #[arg(long)]
    pub weekday: Option<String>,
    /// Month for yearly rules (name or number)
    #[arg(long)]
    pub month: Option<String>,
    /// Stop repeating after this date (e.g. '2025-12-31', 'next friday')
    #[arg(long, conflicts_with_all = ["count", "end_on"])]
    pub until: Option<String>,
    /// Stop repeating after N occurrences
    #[arg(long, conflicts_with = "end_on")]
    pub count: Option<u32>,
    /// End on a date, pre-filled relative to the anchor
    #[arg(long)]
    pub end_on: bool,
    /// Date the rule is anchored on (defaults to today)
    #[arg(long)]
    pub anchor: Option<String>,
    /// Print rule, start and summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct RulePresetCommand {
    /// One of: daily, weekdays, weekly, monthly, yearly
    pub name: String,
    /// Date the preset is anchored on (defaults to today)
    #[arg(long)]
    pub anchor: Option<String>,
    /// Print rule, start and summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct RuleParseCommand {
    /// A stored rule, e.g. 'FREQ=WEEKLY;BYDAY=MO,WE'
    pub rule: String,
    /// Print the selection as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct RuleTextCommand {
    /// A stored rule, e.g. 'FREQ=WEEKLY;BYDAY=MO,WE'
    pub rule: String,
}

#[derive(Parser, Debug, Clone)]
pub struct RuleNextCommand {
    /// A stored rule, e.g. 'FREQ=WEEKLY;BYDAY=MO,WE'
    pub rule: String,
    /// First date of the series (defaults to today)
    #[arg(long)]
    pub start: Option<String>,
    /// Time of day of each occurrence (HH:MM)
    #[arg(long)]
    pub at: Option<String>,
    /// Number of occurrences to show (defaults to the configured preview count)
    #[arg(long, short)]
    pub count: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct RuleEditCommand {
    /// The rule to start from; omit to create a new one
    pub rule: Option<String>,
    /// Date the rule is anchored on (defaults to today)
    #[arg(long)]
    pub anchor: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub command: TaskSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TaskSubcommand {
    /// Mark a task done, producing the next instance of a repeating task
    Complete(TaskCompleteCommand),
    /// Set or clear the repeat rule of a task
    Repeat(TaskRepeatCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct TaskCompleteCommand {
    /// Task JSON file ('-' reads stdin)
    pub file: PathBuf,
    /// Id for the next instance (defaults to the task id + 1)
    #[arg(long)]
    pub next_id: Option<i64>,
    /// Position for the next instance (defaults to the task position + 1)
    #[arg(long)]
    pub next_position: Option<i64>,
    /// Show a table instead of JSON
    #[arg(long)]
    pub table: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TaskRepeatCommand {
    /// Task JSON file ('-' reads stdin)
    pub file: PathBuf,
    /// Quick-pick preset anchored on the task's reminder date
    #[arg(long, conflicts_with_all = ["rule", "clear"])]
    pub preset: Option<String>,
    /// A full rule string
    #[arg(long, conflicts_with = "clear")]
    pub rule: Option<String>,
    /// Remove the repeat
    #[arg(long)]
    pub clear: bool,
}

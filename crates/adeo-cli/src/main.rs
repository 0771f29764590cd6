use adeo_core::error::CoreError;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod timezone;
mod views;

use cli::{Commands, RuleSubcommand, TaskSubcommand};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ADEO_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    if let Err(e) = run(cli) {
        handle_error(e);
        std::process::exit(1);
    }
}

fn run(cli: cli::Cli) -> anyhow::Result<()> {
    let config = config::Config::new()?;
    let ctx = commands::Context::new(config)?;
    tracing::debug!(now = %ctx.now, timezone = %ctx.config.timezone, "starting");

    match cli.command {
        Commands::Rule(rule) => match rule.command {
            RuleSubcommand::Build(command) => commands::rule::build(&ctx, command),
            RuleSubcommand::Preset(command) => commands::rule::preset(&ctx, command),
            RuleSubcommand::Parse(command) => commands::rule::parse(&ctx, command),
            RuleSubcommand::Classify(command) => commands::rule::classify(command),
            RuleSubcommand::Summary(command) => commands::rule::summary(command),
            RuleSubcommand::Next(command) => commands::rule::next(&ctx, command),
            RuleSubcommand::Edit(command) => commands::edit::edit_rule(&ctx, command),
        },
        Commands::Task(task) => match task.command {
            TaskSubcommand::Complete(command) => commands::task::complete(&ctx, command),
            TaskSubcommand::Repeat(command) => commands::task::repeat(&ctx, command),
        },
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidDate(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
                eprintln!("Use YYYY-MM-DD or a phrase like 'tomorrow' or 'next friday'.");
            }
            CoreError::InvalidRRule(s) => {
                eprintln!(
                    "{} Not a usable repeat rule: {}",
                    "Error:".style(error_style),
                    s.yellow()
                );
            }
            CoreError::UnknownPreset(name) => {
                eprintln!(
                    "{} Unknown preset '{}'.",
                    "Error:".style(error_style),
                    name.yellow()
                );
                eprintln!("Expected one of: daily, weekdays, weekly, monthly, yearly");
            }
            CoreError::Json(e) => {
                eprintln!("{} Malformed task JSON: {}", "Error:".style(error_style), e);
            }
            CoreError::Io(e) => {
                eprintln!("{} {}", "Error:".style(error_style), e);
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}

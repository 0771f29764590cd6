use adeo_core::error::CoreError;
use adeo_core::models::Task;
use adeo_core::recurrence::{build_preset_rule, RepeatRule, RepeatUpdate};
use anyhow::{bail, Result};
use std::io::Read;
use std::path::Path;
use tracing::info;

use super::Context;
use crate::cli::{TaskCompleteCommand, TaskRepeatCommand};
use crate::views::table::display_completion;

/// Reads a task record from a JSON file, or stdin for `-`.
pub fn read_task(path: &Path) -> Result<Task, CoreError> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&raw)?)
}

pub fn complete(ctx: &Context, command: TaskCompleteCommand) -> Result<()> {
    let task = read_task(&command.file)?;
    let next_id = match command.next_id {
        Some(id) => id,
        None => following(task.id, "id")?,
    };
    let next_position = match command.next_position {
        Some(position) => position,
        None => following(task.position, "position")?,
    };
    let task_id = task.id;

    let result = task.complete(ctx.now, next_id, next_position)?;
    match result.next() {
        Some(next) => info!(task = task_id, next = next.id, "rolled over to next instance"),
        None => info!(task = task_id, "completed"),
    }

    if command.table {
        display_completion(&result, ctx.date_format());
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}

/// The value after `current`, for numbering the next instance.
fn following(current: i64, field: &str) -> Result<i64, CoreError> {
    current.checked_add(1).ok_or_else(|| {
        CoreError::InvalidInput(format!("task {field} {current} has no successor; pass --next-{field}"))
    })
}

pub fn repeat(ctx: &Context, command: TaskRepeatCommand) -> Result<()> {
    let mut task = read_task(&command.file)?;
    let anchor = task.repeat_anchor(ctx.today());

    let update = if command.clear {
        None
    } else if let Some(name) = &command.preset {
        let preset = build_preset_rule(name, anchor)
            .ok_or_else(|| CoreError::UnknownPreset(name.clone()))?;
        Some(RepeatUpdate::new(&preset.rule, preset.start))
    } else if let Some(rule) = &command.rule {
        let rule = rule
            .parse::<RepeatRule>()
            .map_err(|e| CoreError::InvalidRRule(e.to_string()))?;
        Some(RepeatUpdate::new(&rule, anchor))
    } else {
        bail!("Pass one of --preset, --rule or --clear");
    };

    task.apply_repeat(update);
    println!("{}", serde_json::to_string_pretty(&task)?);
    Ok(())
}

use adeo_core::error::CoreError;
use adeo_core::recurrence::{
    build_preset_rule, classify_rule, parse_rule_to_selection, summarize, DayTarget, EndMode,
    Frequency, MonthDay, MonthMode, OccurrenceCalculator, Ordinal, RepeatRule, RuleParseError,
    Selection,
};
use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveTime};
use owo_colors::OwoColorize;
use serde_json::json;
use tracing::{debug, warn};

use super::Context;
use crate::cli::{
    FrequencyArg, RuleBuildCommand, RuleNextCommand, RuleParseCommand, RulePresetCommand,
    RuleTextCommand,
};
use crate::parser::{parse_date, parse_date_or_today, parse_month, parse_time, parse_weekdays};
use crate::views::table::{display_occurrences, display_selection};

impl From<FrequencyArg> for Frequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Daily => Frequency::Daily,
            FrequencyArg::Weekly => Frequency::Weekly,
            FrequencyArg::Monthly => Frequency::Monthly,
            FrequencyArg::Yearly => Frequency::Yearly,
        }
    }
}

pub fn build(ctx: &Context, command: RuleBuildCommand) -> Result<()> {
    let anchor = parse_date_or_today(command.anchor.as_deref(), ctx.today())?;
    let selection = selection_from_args(&command, ctx.today())?;
    let rule = ctx.config.rule_builder().build(&selection, anchor);
    debug!(%rule, %anchor, "built rule");
    print_rule(&rule, anchor, command.json)
}

/// Translates the build flags into editor fields.
pub fn selection_from_args(command: &RuleBuildCommand, today: NaiveDate) -> Result<Selection> {
    let frequency = Frequency::from(command.freq);
    let mut selection = Selection::new(frequency);
    selection.interval = command.interval.max(1);

    if let Some(on) = &command.on {
        if frequency != Frequency::Weekly {
            warn!("--on only applies to weekly rules; ignoring it");
        }
        selection.weekdays = parse_weekdays(on)?;
    }

    if let Some(day) = &command.day {
        selection.month_mode = MonthMode::DayOfMonth;
        selection.month_day = day
            .parse::<MonthDay>()
            .map_err(|e| CoreError::InvalidInput(e.to_string()))?;
    }
    if command.ordinal.is_some() || command.weekday.is_some() {
        selection.month_mode = MonthMode::OrdinalWeekday;
        if let Some(ordinal) = &command.ordinal {
            selection.ordinal = ordinal
                .parse::<Ordinal>()
                .map_err(|e| CoreError::InvalidInput(e.to_string()))?;
        }
        if let Some(weekday) = &command.weekday {
            selection.day_target = weekday
                .parse::<DayTarget>()
                .map_err(|e| CoreError::InvalidInput(e.to_string()))?;
        }
    }
    if let Some(month) = &command.month {
        if frequency != Frequency::Yearly {
            warn!("--month only applies to yearly rules; ignoring it");
        }
        selection.month = parse_month(month)?;
    }

    if let Some(until) = &command.until {
        selection.end_mode = EndMode::OnDate;
        selection.end_date = Some(parse_date(until, today)?);
    } else if let Some(count) = command.count {
        selection.end_mode = EndMode::After;
        selection.end_count = count;
    } else if command.end_on {
        selection.end_mode = EndMode::OnDate;
    }

    Ok(selection)
}

pub fn preset(ctx: &Context, command: RulePresetCommand) -> Result<()> {
    let anchor = parse_date_or_today(command.anchor.as_deref(), ctx.today())?;
    let preset = build_preset_rule(&command.name, anchor)
        .ok_or_else(|| CoreError::UnknownPreset(command.name.clone()))?;
    print_rule(&preset.rule, preset.start, command.json)
}

fn print_rule(rule: &RepeatRule, start: NaiveDate, as_json: bool) -> Result<()> {
    if as_json {
        let value = json!({
            "repeatRule": rule.to_string(),
            "repeatStart": start,
            "summary": rule.summary(),
            "classification": rule.classify().name(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", rule);
        println!("{}", rule.summary().dimmed());
    }
    Ok(())
}

pub fn parse(ctx: &Context, command: RuleParseCommand) -> Result<()> {
    match parse_rule_to_selection(&command.rule) {
        Some(selection) if command.json => {
            println!("{}", serde_json::to_string_pretty(&selection)?);
        }
        Some(selection) => display_selection(&selection, ctx.date_format()),
        None => println!("No recurrence."),
    }
    Ok(())
}

pub fn classify(command: RuleTextCommand) -> Result<()> {
    match classify_rule(&command.rule) {
        Some(classification) => println!("{}", classification),
        None => println!("none"),
    }
    Ok(())
}

pub fn summary(command: RuleTextCommand) -> Result<()> {
    match summarize(&command.rule) {
        Some(text) => println!("{}", text),
        None => println!("Does not repeat"),
    }
    Ok(())
}

pub fn next(ctx: &Context, command: RuleNextCommand) -> Result<()> {
    let rule = command.rule.parse::<RepeatRule>().map_err(|e| match e {
        RuleParseError::Empty => CoreError::InvalidInput("the rule is empty".to_string()),
        other => CoreError::InvalidRRule(other.to_string()),
    })?;

    let start = parse_date_or_today(command.start.as_deref(), ctx.today())?;
    let time = command
        .at
        .as_deref()
        .map(parse_time)
        .transpose()?
        .unwrap_or(NaiveTime::MIN);
    let dtstart = start.and_time(time);

    // A future start is itself the first occurrence worth listing.
    let after = if dtstart > ctx.now {
        dtstart - Duration::seconds(1)
    } else {
        ctx.now
    };

    let count = command.count.unwrap_or(ctx.config.preview_count);
    let occurrences = OccurrenceCalculator::new(&rule, dtstart)?.preview(after, count);
    println!("{} {}", "Repeats:".bold(), rule.summary());
    display_occurrences(&occurrences, ctx.now, ctx.date_format());
    Ok(())
}

use adeo_core::recurrence::rule::weekday_label;
use adeo_core::recurrence::{
    DaySet, DayTarget, EditSession, EndMode, Frequency, MonthDay, MonthMode, Ordinal,
};
use anyhow::Result;
use chrono::{Month, Weekday};
use dialoguer::{Input, MultiSelect, Select};
use owo_colors::OwoColorize;
use tracing::debug;

use super::Context;
use crate::cli::RuleEditCommand;
use crate::parser::{parse_date, parse_date_or_today};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const FREQUENCIES: [Frequency; 4] = [
    Frequency::Daily,
    Frequency::Weekly,
    Frequency::Monthly,
    Frequency::Yearly,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Frequency,
    Interval,
    Days,
    MonthPattern,
    Month,
    Ends,
    Save,
    Clear,
    Cancel,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Frequency => "Frequency",
            Action::Interval => "Interval",
            Action::Days => "Days of week",
            Action::MonthPattern => "Day in month",
            Action::Month => "Month",
            Action::Ends => "Ends",
            Action::Save => "Save",
            Action::Clear => "Remove repeat",
            Action::Cancel => "Cancel",
        }
    }

    /// Actions that make sense for the frequency being edited.
    fn available(frequency: Frequency) -> Vec<Action> {
        let mut actions = vec![Action::Frequency];
        match frequency {
            Frequency::Daily => actions.push(Action::Interval),
            Frequency::Weekly => actions.extend([Action::Interval, Action::Days]),
            Frequency::Monthly => actions.extend([Action::Interval, Action::MonthPattern]),
            Frequency::Yearly => actions.extend([Action::Month, Action::MonthPattern]),
        }
        actions.extend([Action::Ends, Action::Save, Action::Clear, Action::Cancel]);
        actions
    }
}

/// Runs the custom repeat editor on a terminal. The committed rule is the
/// only thing written to stdout.
pub fn edit_rule(ctx: &Context, command: RuleEditCommand) -> Result<()> {
    let anchor = parse_date_or_today(command.anchor.as_deref(), ctx.today())?;
    let mut session = EditSession::open_with(ctx.config.rule_builder(), command.rule.as_deref(), anchor);
    match session.original() {
        Some(original) => eprintln!("{} {}", "Editing:".bold(), original),
        None => eprintln!("{} starting weekly on {}", "New repeat:".bold(), anchor.format(ctx.date_format())),
    }

    loop {
        eprintln!("{} {}", "Preview:".bold(), session.preview().cyan());

        let actions = Action::available(session.selection().frequency);
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let choice = Select::new()
            .with_prompt("Edit repeat")
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[choice] {
            Action::Frequency => pick_frequency(&mut session)?,
            Action::Interval => pick_interval(&mut session)?,
            Action::Days => pick_days(&mut session)?,
            Action::MonthPattern => pick_month_pattern(&mut session)?,
            Action::Month => pick_month(&mut session)?,
            Action::Ends => pick_end(ctx, &mut session)?,
            Action::Save => {
                if !session.is_modified() {
                    eprintln!("{}", "No changes.".dimmed());
                }
                let update = session.commit();
                debug!(rule = %update.repeat_rule, start = %update.repeat_start, "saved repeat");
                println!("{}", update.repeat_rule);
                return Ok(());
            }
            Action::Clear => {
                session.clear();
                eprintln!("{}", "Repeat removed.".yellow());
                return Ok(());
            }
            Action::Cancel => {
                if let Some(original) = session.discard() {
                    eprintln!("Kept {}", original.summary());
                }
                return Ok(());
            }
        }
    }
}

fn pick_frequency(session: &mut EditSession) -> Result<()> {
    let current = session.selection().frequency;
    let labels = ["Daily", "Weekly", "Monthly", "Yearly"];
    let default = FREQUENCIES.iter().position(|f| *f == current).unwrap_or(0);
    let choice = Select::new()
        .with_prompt("Repeat")
        .items(&labels)
        .default(default)
        .interact()?;
    session.selection_mut().frequency = FREQUENCIES[choice];
    Ok(())
}

fn pick_interval(session: &mut EditSession) -> Result<()> {
    let unit = match session.selection().frequency {
        Frequency::Daily => "days",
        Frequency::Weekly => "weeks",
        _ => "months",
    };
    let interval: u32 = Input::new()
        .with_prompt(format!("Every how many {unit}"))
        .default(session.selection().interval)
        .validate_with(|n: &u32| if *n >= 1 { Ok(()) } else { Err("must be at least 1") })
        .interact_text()?;
    session.selection_mut().interval = interval;
    Ok(())
}

fn pick_days(session: &mut EditSession) -> Result<()> {
    let current = session.selection().weekdays;
    let labels: Vec<&str> = WEEK.iter().map(|d| weekday_label(*d)).collect();
    let checked: Vec<bool> = WEEK.iter().map(|d| current.contains(*d)).collect();
    let picked = MultiSelect::new()
        .with_prompt("On (space to toggle)")
        .items(&labels)
        .defaults(&checked)
        .interact()?;
    session.selection_mut().weekdays = picked.into_iter().map(|i| WEEK[i]).collect::<DaySet>();
    Ok(())
}

fn pick_month_pattern(session: &mut EditSession) -> Result<()> {
    let modes = ["On day", "On the"];
    let default = match session.selection().month_mode {
        MonthMode::DayOfMonth => 0,
        MonthMode::OrdinalWeekday => 1,
    };
    let mode = Select::new()
        .with_prompt("Repeat")
        .items(&modes)
        .default(default)
        .interact()?;

    if mode == 0 {
        let day: String = Input::new()
            .with_prompt("Day of month (1-31 or 'last')")
            .default(session.selection().month_day.to_string().replace("-1", "last"))
            .validate_with(|s: &String| s.parse::<MonthDay>().map(|_| ()).map_err(|e| e.to_string()))
            .interact_text()?;
        let selection = session.selection_mut();
        selection.month_mode = MonthMode::DayOfMonth;
        if let Ok(day) = day.parse() {
            selection.month_day = day;
        }
        return Ok(());
    }

    let ordinals: Vec<&str> = Ordinal::ALL.iter().map(|o| o.label()).collect();
    let current = session.selection().ordinal;
    let ordinal = Select::new()
        .with_prompt("Which")
        .items(&ordinals)
        .default(Ordinal::ALL.iter().position(|o| *o == current).unwrap_or(0))
        .interact()?;

    let targets: Vec<DayTarget> = WEEK
        .iter()
        .map(|d| DayTarget::Day(*d))
        .chain([DayTarget::Weekday, DayTarget::WeekendDay])
        .collect();
    let target_labels: Vec<&str> = targets.iter().map(|t| t.label()).collect();
    let current = session.selection().day_target;
    let target = Select::new()
        .with_prompt("Day")
        .items(&target_labels)
        .default(targets.iter().position(|t| *t == current).unwrap_or(0))
        .interact()?;

    let selection = session.selection_mut();
    selection.month_mode = MonthMode::OrdinalWeekday;
    selection.ordinal = Ordinal::ALL[ordinal];
    selection.day_target = targets[target];
    Ok(())
}

fn pick_month(session: &mut EditSession) -> Result<()> {
    let months: Vec<Month> = (1..=12u8).filter_map(|m| Month::try_from(m).ok()).collect();
    let labels: Vec<&str> = months.iter().map(|m| m.name()).collect();
    let current = session.selection().month;
    let choice = Select::new()
        .with_prompt("Month")
        .items(&labels)
        .default(months.iter().position(|m| *m == current).unwrap_or(0))
        .interact()?;
    session.selection_mut().month = months[choice];
    Ok(())
}

fn pick_end(ctx: &Context, session: &mut EditSession) -> Result<()> {
    let modes = ["Never", "On date", "After"];
    let default = match session.selection().end_mode {
        EndMode::Never => 0,
        EndMode::OnDate => 1,
        EndMode::After => 2,
    };
    let mode = Select::new()
        .with_prompt("Ends")
        .items(&modes)
        .default(default)
        .interact()?;

    match mode {
        1 => {
            let prefill = session
                .selection()
                .end_date
                .unwrap_or_else(|| ctx.config.rule_builder().default_until(session.anchor()));
            let today = ctx.today();
            let input: String = Input::new()
                .with_prompt("End date")
                .default(prefill.format("%Y-%m-%d").to_string())
                .validate_with(|s: &String| {
                    parse_date(s, today).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()?;
            let date = parse_date(&input, today)?;
            let selection = session.selection_mut();
            selection.end_mode = EndMode::OnDate;
            selection.end_date = Some(date);
        }
        2 => {
            let count: u32 = Input::new()
                .with_prompt("Occurrences")
                .default(session.selection().end_count)
                .validate_with(|n: &u32| if *n >= 1 { Ok(()) } else { Err("must be at least 1") })
                .interact_text()?;
            let selection = session.selection_mut();
            selection.end_mode = EndMode::After;
            selection.end_count = count;
        }
        _ => session.selection_mut().end_mode = EndMode::Never,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yearly_editor_has_no_interval() {
        let actions = Action::available(Frequency::Yearly);
        assert!(!actions.contains(&Action::Interval));
        assert!(actions.contains(&Action::Month));
    }

    #[test]
    fn weekly_editor_offers_days() {
        let actions = Action::available(Frequency::Weekly);
        assert!(actions.contains(&Action::Days));
        assert!(!actions.contains(&Action::MonthPattern));
        assert_eq!(actions.last(), Some(&Action::Cancel));
    }
}

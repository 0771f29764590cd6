use adeo_core::models::{CompletionResult, Task, TaskPriority};
use adeo_core::recurrence::rule::weekday_label;
use adeo_core::recurrence::{EndMode, Frequency, MonthMode, Selection};
use chrono::NaiveDateTime;
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};

/// Shows the editor fields a rule maps to. Fields that do not apply to the
/// frequency are left out.
pub fn display_selection(selection: &Selection, date_format: &str) {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);

    let mut add = |field: &str, value: String| {
        let mut row = Row::new();
        row.add_cell(Cell::new(field).add_attribute(Attribute::Bold));
        row.add_cell(Cell::new(value));
        table.add_row(row);
    };

    add("Frequency", selection.frequency.to_string());
    if selection.frequency != Frequency::Yearly {
        add("Interval", selection.interval.to_string());
    }

    match selection.frequency {
        Frequency::Daily => {}
        Frequency::Weekly => {
            let days: Vec<&str> = selection.weekdays.iter().map(weekday_label).collect();
            add("Days", if days.is_empty() { "None".to_string() } else { days.join(", ") });
        }
        Frequency::Monthly | Frequency::Yearly => {
            if selection.frequency == Frequency::Yearly {
                add("Month", selection.month.name().to_string());
            }
            match selection.month_mode {
                MonthMode::DayOfMonth => add("Day of month", selection.month_day.to_string()),
                MonthMode::OrdinalWeekday => add(
                    "On",
                    format!("{} {}", selection.ordinal.label(), selection.day_target.label()),
                ),
            }
        }
    }

    let end = match selection.end_mode {
        EndMode::Never => "Never".to_string(),
        EndMode::OnDate => selection
            .end_date
            .map(|d| format!("On {}", d.format(date_format)))
            .unwrap_or_else(|| "On a date".to_string()),
        EndMode::After => format!("After {} occurrences", selection.end_count),
    };
    add("Ends", end);

    println!("{table}");
}

/// Upcoming occurrences with a relative hint ("in 3 days").
pub fn display_occurrences(occurrences: &[NaiveDateTime], now: NaiveDateTime, date_format: &str) {
    if occurrences.is_empty() {
        println!("No upcoming occurrences.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Date", "Time", "When"]);

    for (index, at) in occurrences.iter().enumerate() {
        let mut row = Row::new();
        row.add_cell(Cell::new(index + 1));
        row.add_cell(Cell::new(at.format(date_format)));
        row.add_cell(Cell::new(at.format("%H:%M")));

        let when = Cell::new((*at - now).humanize());
        row.add_cell(if at.date() == now.date() {
            when.fg(Color::Yellow)
        } else {
            when
        });
        table.add_row(row);
    }

    println!("{table}");
}

/// The completed task and the instance it rolled over to.
pub fn display_completion(result: &CompletionResult, date_format: &str) {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Text", "Done", "Reminder", "Series", "Priority"]);

    table.add_row(task_row(result.completed(), date_format));
    if let Some(next) = result.next() {
        table.add_row(task_row(next, date_format));
    }

    println!("{table}");
}

fn task_row(task: &Task, date_format: &str) -> Row {
    let mut row = Row::new();
    row.add_cell(Cell::new(task.id));

    let mut text = String::new();
    if task.series_id.is_some() {
        text.push_str("↻ ");
    }
    text.push_str(&task.text);
    let mut text_cell = Cell::new(text);
    text_cell = if task.done {
        text_cell.add_attribute(Attribute::CrossedOut).fg(Color::DarkGrey)
    } else {
        match task.priority {
            TaskPriority::High => text_cell.fg(Color::Red).add_attribute(Attribute::Bold),
            TaskPriority::Medium => text_cell.fg(Color::Yellow),
            TaskPriority::Low => text_cell.fg(Color::Green),
            TaskPriority::None => text_cell,
        }
    };
    row.add_cell(text_cell);

    row.add_cell(if task.done {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no")
    });

    let reminder = match (task.reminder_date, task.reminder_time) {
        (Some(date), Some(time)) => format!("{} {}", date.format(date_format), time.format("%H:%M")),
        (Some(date), None) => date.format(date_format).to_string(),
        (None, _) => "None".to_string(),
    };
    row.add_cell(Cell::new(reminder));
    row.add_cell(Cell::new(
        task.series_id.map_or_else(|| "None".to_string(), |id| id.to_string()),
    ));
    row.add_cell(Cell::new(format!("{:?}", task.priority)));
    row
}

use chrono::{NaiveDateTime, Utc};
use rrule::RRuleSet;

use super::rule::{EndCondition, RepeatRule};
use crate::error::CoreError;

/// Computes concrete occurrence times for a rule, starting at `dtstart`.
///
/// Times are wall-clock times: they are fed to the rrule engine as UTC and
/// read back the same way, so no timezone shift is ever applied.
#[derive(Debug, Clone)]
pub struct OccurrenceCalculator {
    /// `None` when the rule ends before it starts.
    rrule_set: Option<RRuleSet>,
}

impl OccurrenceCalculator {
    /// # Errors
    /// `CoreError::InvalidRRule` when the rrule engine rejects the rule.
    pub fn new(rule: &RepeatRule, dtstart: NaiveDateTime) -> Result<Self, CoreError> {
        let ends_before_start = matches!(rule.end, EndCondition::Until(until) if until < dtstart.date());
        let rrule_set = if ends_before_start {
            None
        } else {
            let source = format!(
                "DTSTART:{}\nRRULE:{}",
                dtstart.format("%Y%m%dT%H%M%SZ"),
                rrule_body(rule)
            );
            let set = source
                .parse::<RRuleSet>()
                .map_err(|e| CoreError::InvalidRRule(format!("Failed to parse RRULE '{}': {}", rule, e)))?;
            Some(set)
        };

        Ok(Self { rrule_set })
    }

    /// First occurrence strictly after `after`, or `None` once the rule has
    /// run out.
    pub fn next_after(&self, after: NaiveDateTime) -> Option<NaiveDateTime> {
        self.preview(after, 1).into_iter().next()
    }

    /// Up to `count` occurrences strictly after `after`.
    pub fn preview(&self, after: NaiveDateTime, count: usize) -> Vec<NaiveDateTime> {
        let Some(set) = &self.rrule_set else {
            return Vec::new();
        };
        set.clone()
            .into_iter()
            .map(|dt| dt.with_timezone(&Utc).naive_utc())
            .filter(|dt| *dt > after)
            .take(count)
            .collect()
    }
}

/// The RFC 5545 body handed to the rrule engine. Identical to the stored
/// form except that `UNTIL` is widened to the end of that day, so an
/// occurrence at any time on the end date still counts.
fn rrule_body(rule: &RepeatRule) -> String {
    rule.clauses()
        .into_iter()
        .map(|(key, value)| match (key, rule.end) {
            ("UNTIL", EndCondition::Until(date)) => {
                format!("UNTIL={}T235959Z", date.format("%Y%m%d"))
            }
            _ => format!("{key}={value}"),
        })
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn calc(rule: &str, start: NaiveDateTime) -> OccurrenceCalculator {
        OccurrenceCalculator::new(&rule.parse().unwrap(), start).unwrap()
    }

    #[test]
    fn daily_next_is_following_day() {
        let start = at(2024, 1, 1, 9);
        assert_eq!(calc("FREQ=DAILY", start).next_after(start), Some(at(2024, 1, 2, 9)));
    }

    #[test]
    fn weekly_next_picks_next_listed_day() {
        // 2024-01-01 is a Monday.
        let start = at(2024, 1, 1, 0);
        assert_eq!(
            calc("FREQ=WEEKLY;BYDAY=MO,WE", start).next_after(start),
            Some(at(2024, 1, 3, 0))
        );
    }

    #[test]
    fn monthly_day_of_month() {
        let start = at(2024, 3, 15, 8);
        assert_eq!(
            calc("FREQ=MONTHLY;BYMONTHDAY=15", start).preview(start, 2),
            vec![at(2024, 4, 15, 8), at(2024, 5, 15, 8)]
        );
    }

    #[test]
    fn monthly_last_friday() {
        let start = at(2024, 1, 1, 0);
        assert_eq!(
            calc("FREQ=MONTHLY;BYDAY=FR;BYSETPOS=-1", start).preview(start, 2),
            vec![at(2024, 1, 26, 0), at(2024, 2, 23, 0)]
        );
    }

    #[test]
    fn interval_is_respected() {
        let start = at(2024, 1, 1, 0);
        assert_eq!(
            calc("FREQ=DAILY;INTERVAL=3", start).next_after(start),
            Some(at(2024, 1, 4, 0))
        );
    }

    #[test]
    fn count_limits_occurrences() {
        let start = at(2024, 1, 1, 0);
        assert_eq!(calc("FREQ=DAILY;COUNT=1", start).next_after(start), None);
        assert_eq!(calc("FREQ=DAILY;COUNT=3", start).preview(start, 10).len(), 2);
    }

    #[test]
    fn until_includes_its_own_day() {
        let start = at(2024, 1, 1, 18);
        let upcoming = calc("FREQ=DAILY;UNTIL=20240103", start).preview(start, 10);
        assert_eq!(upcoming, vec![at(2024, 1, 2, 18), at(2024, 1, 3, 18)]);
    }

    #[test]
    fn until_before_start_yields_nothing() {
        let start = at(2024, 6, 1, 0);
        assert!(calc("FREQ=DAILY;UNTIL=20240101", start).next_after(start).is_none());
    }

    #[test]
    fn rrule_body_widens_until() {
        let rule: RepeatRule = "FREQ=WEEKLY;BYDAY=TU;UNTIL=20241224".parse().unwrap();
        assert_eq!(rrule_body(&rule), "FREQ=WEEKLY;BYDAY=TU;UNTIL=20241224T235959Z");
    }
}

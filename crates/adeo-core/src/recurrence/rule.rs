use chrono::{Month, NaiveDate, Weekday};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Weekday codes in canonical Monday -> Sunday order.
pub const WEEKDAY_CODES: [&str; 7] = ["MO", "TU", "WE", "TH", "FR", "SA", "SU"];

const ALL_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_code(day: Weekday) -> &'static str {
    WEEKDAY_CODES[day.num_days_from_monday() as usize]
}

pub fn weekday_from_code(code: &str) -> Option<Weekday> {
    WEEKDAY_CODES
        .iter()
        .position(|c| *c == code)
        .map(|idx| ALL_DAYS[idx])
}

pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Accepts "mon", "monday", "MO", "m" style names.
pub fn parse_weekday_name(name: &str) -> Option<Weekday> {
    let day = match name.trim().to_lowercase().as_str() {
        "mo" | "mon" | "monday" | "m" => Weekday::Mon,
        "tu" | "tue" | "tues" | "tuesday" => Weekday::Tue,
        "we" | "wed" | "wednesday" | "w" => Weekday::Wed,
        "th" | "thu" | "thurs" | "thursday" => Weekday::Thu,
        "fr" | "fri" | "friday" | "f" => Weekday::Fri,
        "sa" | "sat" | "saturday" => Weekday::Sat,
        "su" | "sun" | "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

/// A set of weekdays. Iteration is always Monday -> Sunday, regardless of
/// insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DaySet(u8);

impl DaySet {
    pub const fn empty() -> Self {
        DaySet(0)
    }

    /// Monday through Friday.
    pub const fn weekdays() -> Self {
        DaySet(0b0001_1111)
    }

    /// Saturday and Sunday.
    pub const fn weekend() -> Self {
        DaySet(0b0110_0000)
    }

    pub fn single(day: Weekday) -> Self {
        let mut set = DaySet::empty();
        set.insert(day);
        set
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    pub fn remove(&mut self, day: Weekday) {
        self.0 &= !Self::bit(day);
    }

    pub fn toggle(&mut self, day: Weekday) {
        self.0 ^= Self::bit(day);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        ALL_DAYS.into_iter().filter(move |day| self.contains(*day))
    }

    /// Comma-joined two-letter codes, e.g. `MO,WE`.
    pub fn codes(&self) -> String {
        self.iter().map(weekday_code).collect::<Vec<_>>().join(",")
    }
}

impl FromIterator<Weekday> for DaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = DaySet::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl Serialize for DaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(weekday_code))
    }
}

/// Position selector for "the Nth weekday" in a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ordinal {
    #[default]
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl Ordinal {
    pub const ALL: [Ordinal; 5] = [
        Ordinal::First,
        Ordinal::Second,
        Ordinal::Third,
        Ordinal::Fourth,
        Ordinal::Last,
    ];

    /// The `BYSETPOS` value.
    pub fn setpos(self) -> i32 {
        match self {
            Ordinal::First => 1,
            Ordinal::Second => 2,
            Ordinal::Third => 3,
            Ordinal::Fourth => 4,
            Ordinal::Last => -1,
        }
    }

    pub fn from_setpos(value: i32) -> Option<Self> {
        match value {
            1 => Some(Ordinal::First),
            2 => Some(Ordinal::Second),
            3 => Some(Ordinal::Third),
            4 => Some(Ordinal::Fourth),
            -1 => Some(Ordinal::Last),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Ordinal::First => "First",
            Ordinal::Second => "Second",
            Ordinal::Third => "Third",
            Ordinal::Fourth => "Fourth",
            Ordinal::Last => "Last",
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid ordinal: {0}")]
pub struct ParseOrdinalError(String);

impl FromStr for Ordinal {
    type Err = ParseOrdinalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" | "1st" | "1" => Ok(Ordinal::First),
            "second" | "2nd" | "2" => Ok(Ordinal::Second),
            "third" | "3rd" | "3" => Ok(Ordinal::Third),
            "fourth" | "4th" | "4" => Ok(Ordinal::Fourth),
            "last" | "-1" => Ok(Ordinal::Last),
            _ => Err(ParseOrdinalError(s.to_string())),
        }
    }
}

/// What an ordinal picks: a named day, any weekday, or any weekend day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayTarget {
    Day(Weekday),
    Weekday,
    WeekendDay,
}

impl Default for DayTarget {
    fn default() -> Self {
        DayTarget::Day(Weekday::Mon)
    }
}

impl DayTarget {
    pub fn days(self) -> DaySet {
        match self {
            DayTarget::Day(day) => DaySet::single(day),
            DayTarget::Weekday => DaySet::weekdays(),
            DayTarget::WeekendDay => DaySet::weekend(),
        }
    }

    /// The `BYDAY` value.
    pub fn byday(self) -> String {
        self.days().codes()
    }

    /// Inverse of [`DayTarget::byday`]. Only a single code or one of the two
    /// fixed sets is accepted.
    pub fn from_byday(value: &str) -> Option<Self> {
        match value {
            "MO,TU,WE,TH,FR" => Some(DayTarget::Weekday),
            "SA,SU" => Some(DayTarget::WeekendDay),
            code => weekday_from_code(code).map(DayTarget::Day),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayTarget::Day(day) => weekday_label(day),
            DayTarget::Weekday => "Weekday",
            DayTarget::WeekendDay => "Weekend Day",
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid day: {0}")]
pub struct ParseDayTargetError(String);

impl FromStr for DayTarget {
    type Err = ParseDayTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match normalized.as_str() {
            "weekday" => Ok(DayTarget::Weekday),
            "weekendday" | "weekend" => Ok(DayTarget::WeekendDay),
            _ => parse_weekday_name(&normalized)
                .map(DayTarget::Day)
                .ok_or_else(|| ParseDayTargetError(s.to_string())),
        }
    }
}

/// A `BYMONTHDAY` value: 1..=31, or the last day of the month (`-1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthDay {
    Day(u8),
    Last,
}

impl Default for MonthDay {
    fn default() -> Self {
        MonthDay::Day(1)
    }
}

impl MonthDay {
    pub fn value(self) -> i32 {
        match self {
            MonthDay::Day(day) => i32::from(day),
            MonthDay::Last => -1,
        }
    }

    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            -1 => Some(MonthDay::Last),
            1..=31 => Some(MonthDay::Day(value as u8)),
            _ => None,
        }
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid day of month: {0} (expected 1-31 or 'last')")]
pub struct ParseMonthDayError(String);

impl FromStr for MonthDay {
    type Err = ParseMonthDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("last") {
            return Ok(MonthDay::Last);
        }
        trimmed
            .parse::<i32>()
            .ok()
            .and_then(MonthDay::from_value)
            .ok_or_else(|| ParseMonthDayError(s.to_string()))
    }
}

/// Where in a month (or in the target month of a year) the rule lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthPattern {
    Day(MonthDay),
    Ordinal(Ordinal, DayTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn code(self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid frequency: {0}")]
pub struct ParseFrequencyError(String);

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(Frequency::Daily),
            "weekly" | "week" => Ok(Frequency::Weekly),
            "monthly" | "month" => Ok(Frequency::Monthly),
            "yearly" | "year" | "annually" => Ok(Frequency::Yearly),
            _ => Err(ParseFrequencyError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "freq", rename_all = "lowercase")]
pub enum Pattern {
    Daily,
    Weekly {
        days: DaySet,
    },
    Monthly {
        on: Option<MonthPattern>,
    },
    Yearly {
        month: Option<Month>,
        on: Option<MonthPattern>,
    },
}

impl Pattern {
    pub fn frequency(&self) -> Frequency {
        match self {
            Pattern::Daily => Frequency::Daily,
            Pattern::Weekly { .. } => Frequency::Weekly,
            Pattern::Monthly { .. } => Frequency::Monthly,
            Pattern::Yearly { .. } => Frequency::Yearly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum EndCondition {
    #[default]
    Never,
    Until(NaiveDate),
    Count(u32),
}

/// A parsed repeat rule. Build it with [`crate::recurrence::RuleBuilder`] or
/// parse one with [`str::parse`]; its `Display` form is the canonical
/// `KEY=VALUE;...` string stored as `repeatRule`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatRule {
    pub pattern: Pattern,
    pub interval: u32,
    pub end: EndCondition,
}

impl RepeatRule {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            interval: 1,
            end: EndCondition::Never,
        }
    }

    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval.max(1);
        self
    }

    pub fn with_end(mut self, end: EndCondition) -> Self {
        self.end = end;
        self
    }

    pub fn frequency(&self) -> Frequency {
        self.pattern.frequency()
    }

    /// Ordered `(key, value)` clauses: FREQ, frequency clauses, INTERVAL,
    /// then UNTIL or COUNT.
    pub fn clauses(&self) -> Vec<(&'static str, String)> {
        let mut clauses = vec![("FREQ", self.frequency().code().to_string())];

        match &self.pattern {
            Pattern::Daily => {}
            Pattern::Weekly { days } => {
                if !days.is_empty() {
                    clauses.push(("BYDAY", days.codes()));
                }
            }
            Pattern::Monthly { on } => push_month_pattern(&mut clauses, on.as_ref()),
            Pattern::Yearly { month, on } => {
                if let Some(month) = month {
                    clauses.push(("BYMONTH", month.number_from_month().to_string()));
                }
                push_month_pattern(&mut clauses, on.as_ref());
            }
        }

        if self.interval > 1 {
            clauses.push(("INTERVAL", self.interval.to_string()));
        }

        match self.end {
            EndCondition::Never => {}
            EndCondition::Until(date) => clauses.push(("UNTIL", date.format("%Y%m%d").to_string())),
            EndCondition::Count(count) => clauses.push(("COUNT", count.to_string())),
        }

        clauses
    }
}

fn push_month_pattern(clauses: &mut Vec<(&'static str, String)>, on: Option<&MonthPattern>) {
    match on {
        Some(MonthPattern::Day(day)) => clauses.push(("BYMONTHDAY", day.to_string())),
        Some(MonthPattern::Ordinal(ordinal, target)) => {
            clauses.push(("BYDAY", target.byday()));
            clauses.push(("BYSETPOS", ordinal.setpos().to_string()));
        }
        None => {}
    }
}

impl fmt::Display for RepeatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .clauses()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(";");
        f.write_str(&joined)
    }
}

/// Why a rule string could not be turned into a [`RepeatRule`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleParseError {
    #[error("Rule string has no clauses")]
    Empty,
    #[error("Unrecognized frequency: '{0}'")]
    UnknownFrequency(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn day_set_iterates_monday_first() {
        let set: DaySet = [Weekday::Sun, Weekday::Wed, Weekday::Mon].into_iter().collect();
        assert_eq!(set.codes(), "MO,WE,SU");
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn day_set_toggle_and_remove() {
        let mut set = DaySet::weekdays();
        set.toggle(Weekday::Fri);
        set.remove(Weekday::Mon);
        assert_eq!(set.codes(), "TU,WE,TH");
        set.toggle(Weekday::Sat);
        assert!(set.contains(Weekday::Sat));
    }

    #[rstest]
    #[case(Ordinal::First, 1)]
    #[case(Ordinal::Second, 2)]
    #[case(Ordinal::Third, 3)]
    #[case(Ordinal::Fourth, 4)]
    #[case(Ordinal::Last, -1)]
    fn ordinal_setpos_mapping(#[case] ordinal: Ordinal, #[case] setpos: i32) {
        assert_eq!(ordinal.setpos(), setpos);
        assert_eq!(Ordinal::from_setpos(setpos), Some(ordinal));
    }

    #[rstest]
    #[case("MO,TU,WE,TH,FR", Some(DayTarget::Weekday))]
    #[case("SA,SU", Some(DayTarget::WeekendDay))]
    #[case("FR", Some(DayTarget::Day(Weekday::Fri)))]
    #[case("MO,WE", None)]
    #[case("XX", None)]
    fn day_target_from_byday(#[case] value: &str, #[case] expected: Option<DayTarget>) {
        assert_eq!(DayTarget::from_byday(value), expected);
    }

    #[rstest]
    #[case("weekday", DayTarget::Weekday)]
    #[case("Weekend Day", DayTarget::WeekendDay)]
    #[case("weekend-day", DayTarget::WeekendDay)]
    #[case("friday", DayTarget::Day(Weekday::Fri))]
    #[case("Tue", DayTarget::Day(Weekday::Tue))]
    fn day_target_from_str(#[case] input: &str, #[case] expected: DayTarget) {
        assert_eq!(input.parse::<DayTarget>(), Ok(expected));
    }

    #[test]
    fn month_day_bounds() {
        assert_eq!("15".parse::<MonthDay>(), Ok(MonthDay::Day(15)));
        assert_eq!("last".parse::<MonthDay>(), Ok(MonthDay::Last));
        assert_eq!("-1".parse::<MonthDay>(), Ok(MonthDay::Last));
        assert!("0".parse::<MonthDay>().is_err());
        assert!("32".parse::<MonthDay>().is_err());
    }

    #[test]
    fn display_orders_clauses() {
        let rule = RepeatRule::new(Pattern::Yearly {
            month: Some(Month::March),
            on: Some(MonthPattern::Ordinal(Ordinal::Second, DayTarget::WeekendDay)),
        })
        .with_end(EndCondition::Count(4));
        assert_eq!(rule.to_string(), "FREQ=YEARLY;BYMONTH=3;BYDAY=SA,SU;BYSETPOS=2;COUNT=4");
    }

    #[test]
    fn display_until_strips_separators() {
        let until = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let rule = RepeatRule::new(Pattern::Daily)
            .with_interval(2)
            .with_end(EndCondition::Until(until));
        assert_eq!(rule.to_string(), "FREQ=DAILY;INTERVAL=2;UNTIL=20240630");
    }

    #[test]
    fn with_interval_clamps_zero() {
        let rule = RepeatRule::new(Pattern::Daily).with_interval(0);
        assert_eq!(rule.interval, 1);
        assert_eq!(rule.to_string(), "FREQ=DAILY");
    }
}

use crate::date::resolve_local;
use chrono::prelude::*;
use chrono_tz::Tz;
use serde::{de::Visitor, Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    Daily,
    Weekdays,
    Weekly,
    Monthly,
}

impl Display for RecurrenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Daily => "daily",
            Self::Weekdays => "weekdays",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        };
        write!(f, "{}", kind)
    }
}

impl FromStr for RecurrenceKind {
    type Err = InvalidRecurrenceError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekdays" => Ok(Self::Weekdays),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(InvalidRecurrenceError::UnknownKind(kind.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidRecurrenceError {
    #[error("Unknown recurrence kind: {0}")]
    UnknownKind(String),
    #[error("A weekly recurrence needs at least one weekday")]
    EmptyWeekdays,
    #[error("Invalid weekday: {0}, expected 1 (Monday) to 7 (Sunday)")]
    InvalidWeekday(u8),
}

/// How often a `ReminderTemplate` repeats.
///
/// Weekdays are numbered 1 (Monday) to 7 (Sunday) and only kept for
/// `RecurrenceKind::Weekly`, where at least one is required.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RecurrenceRuleRaw")]
pub struct RecurrenceRule {
    kind: RecurrenceKind,
    weekdays: Vec<u8>,
}

#[derive(Deserialize)]
struct RecurrenceRuleRaw {
    kind: RecurrenceKind,
    #[serde(default)]
    weekdays: Vec<u8>,
}

impl TryFrom<RecurrenceRuleRaw> for RecurrenceRule {
    type Error = InvalidRecurrenceError;

    fn try_from(raw: RecurrenceRuleRaw) -> Result<Self, Self::Error> {
        Self::new(raw.kind, raw.weekdays)
    }
}

impl RecurrenceRule {
    pub fn new(kind: RecurrenceKind, mut weekdays: Vec<u8>) -> Result<Self, InvalidRecurrenceError> {
        if kind != RecurrenceKind::Weekly {
            return Ok(Self {
                kind,
                weekdays: Vec::new(),
            });
        }
        if let Some(invalid) = weekdays.iter().find(|wday| !(1..=7).contains(*wday)) {
            return Err(InvalidRecurrenceError::InvalidWeekday(*invalid));
        }
        weekdays.sort_unstable();
        weekdays.dedup();
        if weekdays.is_empty() {
            return Err(InvalidRecurrenceError::EmptyWeekdays);
        }
        Ok(Self { kind, weekdays })
    }

    pub fn daily() -> Self {
        Self {
            kind: RecurrenceKind::Daily,
            weekdays: Vec::new(),
        }
    }

    pub fn kind(&self) -> RecurrenceKind {
        self.kind
    }

    pub fn weekdays(&self) -> &[u8] {
        &self.weekdays
    }

    /// Whether the rule fires on `date`.
    ///
    /// `anchor` is only read by monthly rules, which repeat on the day of month of the
    /// anchor. A month without that day (the 31st in April, the 30th in February) has
    /// no occurrence at all: it is skipped, never clamped to the last day of the month.
    pub fn is_due_on(&self, anchor: NaiveDate, date: NaiveDate) -> bool {
        let wday = date.weekday().number_from_monday() as u8;
        match self.kind {
            RecurrenceKind::Daily => true,
            RecurrenceKind::Weekdays => wday <= 5,
            RecurrenceKind::Weekly => self.weekdays.contains(&wday),
            RecurrenceKind::Monthly => date.day() == anchor.day(),
        }
    }

    pub fn describe(&self, anchor: NaiveDate) -> String {
        match self.kind {
            RecurrenceKind::Daily => "every day".into(),
            RecurrenceKind::Weekdays => "every weekday".into(),
            RecurrenceKind::Weekly => {
                let days = self
                    .weekdays
                    .iter()
                    .filter_map(|wday| Weekday::try_from(wday - 1).ok())
                    .map(|wday| wday.to_string())
                    .collect::<Vec<_>>();
                format!("every {}", days.join(", "))
            }
            RecurrenceKind::Monthly => format!("on day {} of every month", anchor.day()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidTimeOfDayError {
    #[error("Malformed time of day: {0}, expected HH:MM")]
    Malformed(String),
    #[error("Time of day out of range: {0}")]
    OutOfRange(String),
}

/// Wall clock time, e.g. 18:00, at which a `ReminderTemplate` fires
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Result<Self, InvalidTimeOfDayError> {
        if hour > 23 || minute > 59 {
            return Err(InvalidTimeOfDayError::OutOfRange(format!(
                "{}:{}",
                hour, minute
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    fn as_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// The instant this time of day happens at on `date` in `tz`.
    /// See `resolve_local` for days where clocks are changed.
    pub fn on(&self, date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
        resolve_local(date.and_time(self.as_naive_time()), tz)
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = InvalidTimeOfDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidTimeOfDayError::Malformed(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(malformed)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(malformed());
        }
        let hour = hour.parse::<u32>().map_err(|_| malformed())?;
        let minute = minute.parse::<u32>().map_err(|_| malformed())?;
        Self::new(hour, minute)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct TimeOfDayVisitor;

        impl<'de> Visitor<'de> for TimeOfDayVisitor {
            type Value = TimeOfDay;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A time of day formatted as HH:MM")
            }

            fn visit_str<E>(self, value: &str) -> Result<TimeOfDay, E>
            where
                E: serde::de::Error,
            {
                value
                    .parse::<TimeOfDay>()
                    .map_err(|e| E::custom(e.to_string()))
            }
        }

        deserializer.deserialize_str(TimeOfDayVisitor)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono_tz::{Europe::Oslo, UTC};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule(kind: RecurrenceKind, weekdays: Vec<u8>) -> RecurrenceRule {
        RecurrenceRule::new(kind, weekdays).unwrap()
    }

    #[test]
    fn weekly_rule_requires_weekdays() {
        assert_eq!(
            RecurrenceRule::new(RecurrenceKind::Weekly, vec![]),
            Err(InvalidRecurrenceError::EmptyWeekdays)
        );
        assert_eq!(
            RecurrenceRule::new(RecurrenceKind::Weekly, vec![1, 8]),
            Err(InvalidRecurrenceError::InvalidWeekday(8))
        );
        assert_eq!(
            RecurrenceRule::new(RecurrenceKind::Weekly, vec![0]),
            Err(InvalidRecurrenceError::InvalidWeekday(0))
        );
    }

    #[test]
    fn weekdays_are_normalized() {
        let weekly = rule(RecurrenceKind::Weekly, vec![5, 1, 3, 1]);
        assert_eq!(weekly.weekdays(), &[1, 3, 5]);

        // Ignored by the other kinds
        let daily = rule(RecurrenceKind::Daily, vec![9]);
        assert!(daily.weekdays().is_empty());
    }

    #[test]
    fn daily_is_always_due() {
        let anchor = date(2021, 1, 1);
        let daily = RecurrenceRule::daily();
        for day in 1..=28 {
            assert!(daily.is_due_on(anchor, date(2021, 2, day)));
        }
    }

    #[test]
    fn weekdays_skip_the_weekend() {
        let anchor = date(2021, 1, 1);
        let weekdays = rule(RecurrenceKind::Weekdays, vec![]);
        // 2021-02-15 is a Monday
        for day in 15..=19 {
            assert!(weekdays.is_due_on(anchor, date(2021, 2, day)));
        }
        assert!(!weekdays.is_due_on(anchor, date(2021, 2, 20)));
        assert!(!weekdays.is_due_on(anchor, date(2021, 2, 21)));
    }

    #[test]
    fn weekly_matches_iso_weekdays() {
        let anchor = date(2021, 1, 1);
        let weekly = rule(RecurrenceKind::Weekly, vec![1, 3, 5]);
        assert!(weekly.is_due_on(anchor, date(2021, 2, 17))); // Wednesday
        assert!(!weekly.is_due_on(anchor, date(2021, 2, 18))); // Thursday

        let sunday = rule(RecurrenceKind::Weekly, vec![7]);
        assert!(sunday.is_due_on(anchor, date(2021, 2, 21)));
        assert!(!sunday.is_due_on(anchor, date(2021, 2, 20)));
    }

    #[test]
    fn monthly_repeats_on_anchor_day() {
        let monthly = rule(RecurrenceKind::Monthly, vec![]);
        let anchor = date(2021, 1, 15);
        assert!(monthly.is_due_on(anchor, date(2021, 2, 15)));
        assert!(monthly.is_due_on(anchor, date(2021, 3, 15)));
        assert!(!monthly.is_due_on(anchor, date(2021, 3, 16)));
    }

    #[test]
    fn monthly_skips_months_without_anchor_day() {
        let monthly = rule(RecurrenceKind::Monthly, vec![]);
        let anchor = date(2021, 1, 31);
        // April has 30 days: no occurrence at all that month
        for day in 1..=30 {
            assert!(!monthly.is_due_on(anchor, date(2021, 4, day)));
        }
        assert!(monthly.is_due_on(anchor, date(2021, 5, 31)));

        let anchor = date(2020, 1, 30);
        for day in 1..=29 {
            assert!(!monthly.is_due_on(anchor, date(2020, 2, day)));
        }
    }

    #[test]
    fn evaluation_is_repeatable() {
        let anchor = date(2021, 1, 31);
        let rules = vec![
            RecurrenceRule::daily(),
            rule(RecurrenceKind::Weekdays, vec![]),
            rule(RecurrenceKind::Weekly, vec![2, 6]),
            rule(RecurrenceKind::Monthly, vec![]),
        ];
        for r in &rules {
            for day in 1..=30 {
                let d = date(2021, 4, day);
                assert_eq!(r.is_due_on(anchor, d), r.is_due_on(anchor, d));
            }
        }
    }

    #[test]
    fn slot_is_wall_time_in_configured_timezone() {
        let time: TimeOfDay = "18:00".parse().unwrap();
        let wednesday = date(2021, 2, 17);
        assert_eq!(time.on(wednesday, &Oslo).timestamp_millis(), 1613581200000);
        assert_eq!(time.on(wednesday, &UTC).timestamp_millis(), 1613584800000);
        assert_eq!(time.on(wednesday, &Oslo), time.on(wednesday, &Oslo));
    }

    #[test]
    fn parses_time_of_day() {
        assert_eq!("18:00".parse::<TimeOfDay>(), TimeOfDay::new(18, 0));
        assert_eq!("7:05".parse::<TimeOfDay>(), TimeOfDay::new(7, 5));
        assert_eq!(" 23:59 ".parse::<TimeOfDay>(), TimeOfDay::new(23, 59));
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("12:60".parse::<TimeOfDay>().is_err());
        assert!("12".parse::<TimeOfDay>().is_err());
        assert!("12:5".parse::<TimeOfDay>().is_err());
        assert!("ab:cd".parse::<TimeOfDay>().is_err());
        assert_eq!(TimeOfDay::new(7, 5).unwrap().to_string(), "07:05");
    }

    #[test]
    fn rejects_invalid_rule_when_deserializing() {
        let valid: RecurrenceRule =
            serde_json::from_str(r#"{"kind":"weekly","weekdays":[3,1]}"#).unwrap();
        assert_eq!(valid.weekdays(), &[1, 3]);
        let daily: RecurrenceRule = serde_json::from_str(r#"{"kind":"daily"}"#).unwrap();
        assert_eq!(daily.kind(), RecurrenceKind::Daily);
        assert!(serde_json::from_str::<RecurrenceRule>(r#"{"kind":"weekly"}"#).is_err());
        assert!(serde_json::from_str::<RecurrenceRule>(r#"{"kind":"hourly"}"#).is_err());
    }

    #[test]
    fn describes_rules() {
        let anchor = date(2021, 1, 31);
        assert_eq!(RecurrenceRule::daily().describe(anchor), "every day");
        assert_eq!(
            rule(RecurrenceKind::Weekly, vec![1, 3]).describe(anchor),
            "every Mon, Wed"
        );
        assert_eq!(
            rule(RecurrenceKind::Monthly, vec![]).describe(anchor),
            "on day 31 of every month"
        );
    }
}

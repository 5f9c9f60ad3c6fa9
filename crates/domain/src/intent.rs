use crate::recurrence::{RecurrenceKind, RecurrenceRule, TimeOfDay};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("The intent classifier could not be reached: {0}")]
    Unavailable(String),
    #[error("Unknown intent action: {0}")]
    UnknownAction(String),
    #[error("Malformed intent: {0}")]
    Malformed(String),
}

/// The loosely typed record returned by the intent classifier.
/// Nothing should act on it before it has been turned into an `Intent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawIntent {
    pub action: String,
    pub reminder_text: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub recurrence_kind: Option<String>,
    pub weekdays: Option<Vec<u8>>,
    pub time_of_day: Option<String>,
    pub automation: Option<String>,
    pub reply: Option<String>,
}

impl RawIntent {
    pub fn chat() -> Self {
        Self {
            action: "chat".into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Automation {
    /// Lists what is left of today's reminders
    Agenda,
    Ping,
}

impl FromStr for Automation {
    type Err = ClassificationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "agenda" => Ok(Self::Agenda),
            "ping" => Ok(Self::Ping),
            _ => Err(ClassificationError::Malformed(format!(
                "unknown automation: {}",
                name
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    OneTime {
        text: String,
        remind_at: DateTime<Utc>,
    },
    Recurring {
        text: String,
        rule: RecurrenceRule,
        /// Falls back to the configured default reminder time when missing
        time_of_day: Option<TimeOfDay>,
    },
    List,
    Automation(Automation),
    Chat {
        reply: Option<String>,
    },
}

fn required_text(text: Option<String>) -> Result<String, ClassificationError> {
    match text.map(|t| t.trim().to_string()) {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(ClassificationError::Malformed(
            "missing reminder text".into(),
        )),
    }
}

fn malformed(e: impl std::fmt::Display) -> ClassificationError {
    ClassificationError::Malformed(e.to_string())
}

impl TryFrom<RawIntent> for Intent {
    type Error = ClassificationError;

    fn try_from(raw: RawIntent) -> Result<Self, Self::Error> {
        match raw.action.trim().to_lowercase().as_str() {
            "one_time" => {
                let text = required_text(raw.reminder_text)?;
                let remind_at = raw.scheduled_at.ok_or_else(|| {
                    ClassificationError::Malformed("missing scheduled time".into())
                })?;
                Ok(Self::OneTime { text, remind_at })
            }
            "recurring" => {
                let text = required_text(raw.reminder_text)?;
                let kind = raw
                    .recurrence_kind
                    .ok_or_else(|| ClassificationError::Malformed("missing recurrence".into()))?
                    .parse::<RecurrenceKind>()
                    .map_err(malformed)?;
                let rule = RecurrenceRule::new(kind, raw.weekdays.unwrap_or_default())
                    .map_err(malformed)?;
                let time_of_day = raw
                    .time_of_day
                    .map(|t| t.parse::<TimeOfDay>())
                    .transpose()
                    .map_err(malformed)?;
                Ok(Self::Recurring {
                    text,
                    rule,
                    time_of_day,
                })
            }
            "list" => Ok(Self::List),
            "automation" => {
                let name = raw.automation.ok_or_else(|| {
                    ClassificationError::Malformed("missing automation name".into())
                })?;
                Ok(Self::Automation(name.parse()?))
            }
            "chat" => Ok(Self::Chat { reply: raw.reply }),
            _ => Err(ClassificationError::UnknownAction(raw.action)),
        }
    }
}

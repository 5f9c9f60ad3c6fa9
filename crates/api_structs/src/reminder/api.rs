use crate::dtos::{OccurrenceDTO, ReminderTemplateDTO};
use nudge_domain::{NaiveDate, Occurrence, RecurrenceKind, ReminderTemplate, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
pub struct UserPathParams {
    pub user_id: ID,
}

pub mod list_reminders {
    use super::*;

    pub type PathParams = UserPathParams;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub upcoming: Vec<OccurrenceDTO>,
        pub templates: Vec<ReminderTemplateDTO>,
    }

    impl APIResponse {
        pub fn new(upcoming: Vec<Occurrence>, templates: Vec<ReminderTemplate>) -> Self {
            Self {
                upcoming: upcoming.into_iter().map(OccurrenceDTO::new).collect(),
                templates: templates
                    .into_iter()
                    .map(ReminderTemplateDTO::new)
                    .collect(),
            }
        }
    }
}

pub mod create_template {
    use super::*;

    pub type PathParams = UserPathParams;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub message: String,
        pub kind: RecurrenceKind,
        #[serde(default)]
        pub weekdays: Vec<u8>,
        /// "HH:MM", the configured default reminder time is used when missing
        pub time_of_day: Option<String>,
        /// Defaults to today in the configured time zone
        pub anchor_date: Option<NaiveDate>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub template: ReminderTemplateDTO,
    }

    impl APIResponse {
        pub fn new(template: ReminderTemplate) -> Self {
            Self {
                template: ReminderTemplateDTO::new(template),
            }
        }
    }
}

pub mod create_reminder {
    use super::*;

    pub type PathParams = UserPathParams;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub message: String,
        pub remind_at: i64,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminder: OccurrenceDTO,
    }

    impl APIResponse {
        pub fn new(reminder: Occurrence) -> Self {
            Self {
                reminder: OccurrenceDTO::new(reminder),
            }
        }
    }
}

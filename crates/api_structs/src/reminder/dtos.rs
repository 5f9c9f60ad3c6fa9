use nudge_domain::{NaiveDate, Occurrence, RecurrenceRule, ReminderTemplate, TimeOfDay, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceDTO {
    pub id: ID,
    pub user_id: ID,
    pub message: String,
    pub remind_at: i64,
    pub delivered: bool,
    pub template_id: Option<ID>,
    pub slot_date: Option<NaiveDate>,
}

impl OccurrenceDTO {
    pub fn new(occurrence: Occurrence) -> Self {
        Self {
            id: occurrence.id,
            user_id: occurrence.user_id,
            message: occurrence.message,
            remind_at: occurrence.remind_at,
            delivered: occurrence.delivered,
            template_id: occurrence.template_id,
            slot_date: occurrence.slot_date,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderTemplateDTO {
    pub id: ID,
    pub user_id: ID,
    pub message: String,
    pub recurrence: RecurrenceRule,
    pub time_of_day: TimeOfDay,
    pub anchor_date: NaiveDate,
    pub created: i64,
    /// Human readable schedule, e.g. "every Mon, Wed at 18:00"
    pub description: String,
}

impl ReminderTemplateDTO {
    pub fn new(template: ReminderTemplate) -> Self {
        let description = template.describe();
        Self {
            id: template.id,
            user_id: template.user_id,
            message: template.message,
            recurrence: template.rule,
            time_of_day: template.time_of_day,
            anchor_date: template.anchor_date,
            created: template.created,
            description,
        }
    }
}

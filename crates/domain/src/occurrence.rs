use crate::{
    shared::entity::{Entity, ID},
    template::ReminderTemplate,
};
use chrono::NaiveDate;

/// A single deliverable reminder at a specific instant. Either created directly as a
/// one-time reminder or materialized from a `ReminderTemplate` for one local calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub id: ID,
    pub user_id: ID,
    pub message: String,
    /// Timestamp in millis at which the `User` should be reminded
    pub remind_at: i64,
    pub delivered: bool,
    /// The `ReminderTemplate` this was materialized from, `None` for one-time reminders
    pub template_id: Option<ID>,
    /// Local calendar day this was materialized for. Together with `template_id`
    /// it identifies the slot and is unique in the store.
    pub slot_date: Option<NaiveDate>,
}

impl Occurrence {
    pub fn one_time(user_id: ID, message: String, remind_at: i64) -> Self {
        Self {
            id: Default::default(),
            user_id,
            message,
            remind_at,
            delivered: false,
            template_id: None,
            slot_date: None,
        }
    }

    pub fn materialized(template: &ReminderTemplate, date: NaiveDate, remind_at: i64) -> Self {
        Self {
            id: Default::default(),
            user_id: template.user_id.clone(),
            message: template.message.clone(),
            remind_at,
            delivered: false,
            template_id: Some(template.id.clone()),
            slot_date: Some(date),
        }
    }

    pub fn is_due(&self, now: i64) -> bool {
        !self.delivered && self.remind_at <= now
    }
}

impl Entity for Occurrence {
    fn id(&self) -> &ID {
        &self.id
    }
}

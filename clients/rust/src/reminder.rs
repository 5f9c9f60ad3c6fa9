use crate::{APIResponse, BaseClient};
use nudge_api_structs::*;
use nudge_domain::{NaiveDate, RecurrenceKind, ID};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

pub struct CreateTemplateInput {
    pub user_id: ID,
    pub message: String,
    pub kind: RecurrenceKind,
    pub weekdays: Vec<u8>,
    pub time_of_day: Option<String>,
    pub anchor_date: Option<NaiveDate>,
}

pub struct CreateReminderInput {
    pub user_id: ID,
    pub message: String,
    pub remind_at: i64,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn list(&self, user_id: ID) -> APIResponse<list_reminders::APIResponse> {
        self.base
            .get(format!("users/{}/reminders", user_id), StatusCode::OK)
            .await
    }

    pub async fn create_template(
        &self,
        input: CreateTemplateInput,
    ) -> APIResponse<create_template::APIResponse> {
        let body = create_template::RequestBody {
            message: input.message,
            kind: input.kind,
            weekdays: input.weekdays,
            time_of_day: input.time_of_day,
            anchor_date: input.anchor_date,
        };
        self.base
            .post(
                body,
                format!("users/{}/templates", input.user_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn create_reminder(
        &self,
        input: CreateReminderInput,
    ) -> APIResponse<create_reminder::APIResponse> {
        let body = create_reminder::RequestBody {
            message: input.message,
            remind_at: input.remind_at,
        };
        self.base
            .post(
                body,
                format!("users/{}/reminders", input.user_id),
                StatusCode::CREATED,
            )
            .await
    }
}

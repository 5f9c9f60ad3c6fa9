use crate::error::NudgeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use nudge_api_structs::create_template::*;
use nudge_domain::{
    local_date, InvalidRecurrenceError, NaiveDate, RecurrenceKind, RecurrenceRule,
    ReminderTemplate, TimeOfDay, ID,
};
use nudge_infra::NudgeContext;

pub async fn create_template_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<NudgeContext>,
) -> Result<HttpResponse, NudgeError> {
    let body = body.0;
    let time_of_day = match body.time_of_day {
        Some(time_of_day) => Some(
            time_of_day
                .parse::<TimeOfDay>()
                .map_err(|e| NudgeError::BadClientData(e.to_string()))?,
        ),
        None => None,
    };

    let usecase = CreateReminderTemplateUseCase {
        user_id: path_params.user_id.clone(),
        message: body.message,
        kind: body.kind,
        weekdays: body.weekdays,
        time_of_day,
        anchor_date: body.anchor_date,
    };

    execute(usecase, &ctx)
        .await
        .map(|template| HttpResponse::Created().json(APIResponse::new(template)))
        .map_err(NudgeError::from)
}

#[derive(Debug)]
pub struct CreateReminderTemplateUseCase {
    pub user_id: ID,
    pub message: String,
    pub kind: RecurrenceKind,
    pub weekdays: Vec<u8>,
    /// Falls back to the configured default reminder time
    pub time_of_day: Option<TimeOfDay>,
    /// Falls back to today in the configured time zone
    pub anchor_date: Option<NaiveDate>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyMessage,
    InvalidRecurrence(InvalidRecurrenceError),
    UserNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for NudgeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyMessage => {
                Self::BadClientData("The reminder message cannot be empty".into())
            }
            UseCaseError::InvalidRecurrence(e) => Self::BadClientData(e.to_string()),
            UseCaseError::UserNotFound(user_id) => Self::NotFound(format!(
                "The user with id: {}, was not found.",
                user_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderTemplateUseCase {
    type Response = ReminderTemplate;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminderTemplate";

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Error> {
        let message = self.message.trim();
        if message.is_empty() {
            return Err(UseCaseError::EmptyMessage);
        }
        let rule = RecurrenceRule::new(self.kind, self.weekdays.clone())
            .map_err(UseCaseError::InvalidRecurrence)?;

        match ctx.repos.users.find(&self.user_id).await {
            Ok(Some(_)) => (),
            Ok(None) => return Err(UseCaseError::UserNotFound(self.user_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        }

        let now = ctx.sys.now();
        let anchor_date = self
            .anchor_date
            .unwrap_or_else(|| local_date(&now, &ctx.config.timezone));
        let template = ReminderTemplate::new(
            self.user_id.clone(),
            message.to_string(),
            rule,
            self.time_of_day.unwrap_or(ctx.config.default_reminder_time),
            anchor_date,
            now.timestamp_millis(),
        );

        ctx.repos
            .templates
            .insert(&template)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(template)
    }
}

use crate::error::NudgeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use nudge_api_structs::create_reminder::*;
use nudge_domain::{Occurrence, ID};
use nudge_infra::NudgeContext;

pub async fn create_reminder_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<NudgeContext>,
) -> Result<HttpResponse, NudgeError> {
    let body = body.0;
    let usecase = CreateOneTimeReminderUseCase {
        user_id: path_params.user_id.clone(),
        message: body.message,
        remind_at: body.remind_at,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(NudgeError::from)
}

#[derive(Debug)]
pub struct CreateOneTimeReminderUseCase {
    pub user_id: ID,
    pub message: String,
    pub remind_at: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EmptyMessage,
    InPast(i64),
    UserNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for NudgeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyMessage => {
                Self::BadClientData("The reminder message cannot be empty".into())
            }
            UseCaseError::InPast(remind_at) => Self::BadClientData(format!(
                "The reminder time: {}, has already passed",
                remind_at
            )),
            UseCaseError::UserNotFound(user_id) => Self::NotFound(format!(
                "The user with id: {}, was not found.",
                user_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateOneTimeReminderUseCase {
    type Response = Occurrence;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateOneTimeReminder";

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Error> {
        let message = self.message.trim();
        if message.is_empty() {
            return Err(UseCaseError::EmptyMessage);
        }
        if self.remind_at < ctx.sys.get_timestamp_millis() {
            return Err(UseCaseError::InPast(self.remind_at));
        }

        match ctx.repos.users.find(&self.user_id).await {
            Ok(Some(_)) => (),
            Ok(None) => return Err(UseCaseError::UserNotFound(self.user_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        }

        let reminder = Occurrence::one_time(
            self.user_id.clone(),
            message.to_string(),
            self.remind_at,
        );
        ctx.repos
            .occurrences
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}

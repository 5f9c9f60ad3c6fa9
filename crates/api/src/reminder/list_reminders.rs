use crate::error::NudgeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use nudge_api_structs::list_reminders::*;
use nudge_domain::{Occurrence, ReminderTemplate, ID};
use nudge_infra::NudgeContext;

pub async fn list_reminders_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<NudgeContext>,
) -> Result<HttpResponse, NudgeError> {
    let usecase = ListRemindersUseCase {
        user_id: path_params.user_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(res.upcoming, res.templates)))
        .map_err(NudgeError::from)
}

#[derive(Debug)]
pub struct ListRemindersUseCase {
    pub user_id: ID,
}

#[derive(Debug, PartialEq)]
pub struct UserReminders {
    /// Undelivered occurrences, earliest first
    pub upcoming: Vec<Occurrence>,
    pub templates: Vec<ReminderTemplate>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    UserNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for NudgeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(user_id) => Self::NotFound(format!(
                "The user with id: {}, was not found.",
                user_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ListRemindersUseCase {
    type Response = UserReminders;

    type Error = UseCaseError;

    const NAME: &'static str = "ListReminders";

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.users.find(&self.user_id).await {
            Ok(Some(_)) => (),
            Ok(None) => return Err(UseCaseError::UserNotFound(self.user_id.clone())),
            Err(_) => return Err(UseCaseError::StorageError),
        }

        let mut upcoming = ctx
            .repos
            .occurrences
            .find_pending_by_user(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        upcoming.sort_by_key(|o| o.remind_at);

        let mut templates = ctx
            .repos
            .templates
            .find_by_user(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        templates.sort_by_key(|t| t.created);

        Ok(UserReminders {
            upcoming,
            templates,
        })
    }
}

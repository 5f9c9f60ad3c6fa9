use crate::shared::usecase::UseCase;
use chrono::{DateTime, TimeZone, Utc};
use nudge_domain::{day_bounds, local_date, Automation, Tz, User};
use nudge_infra::NudgeContext;

/// Canned commands a user can run from the chat
#[derive(Debug)]
pub struct RunAutomationUseCase {
    pub user: User,
    pub automation: Automation,
    pub now: DateTime<Utc>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

fn format_time(ts: i64, tz: &Tz) -> String {
    match Utc.timestamp_millis_opt(ts).single() {
        Some(at) => at.with_timezone(tz).format("%H:%M").to_string(),
        None => "--:--".into(),
    }
}

impl RunAutomationUseCase {
    /// What is left of today: pending occurrences plus templates that fire later
    /// today and have not been materialized yet
    async fn agenda(&self, ctx: &NudgeContext) -> Result<String, UseCaseError> {
        let tz = ctx.config.timezone;
        let today = local_date(&self.now, &tz);
        let (day_start, day_end) = day_bounds(today, &tz);
        let (day_start, day_end) = (day_start.timestamp_millis(), day_end.timestamp_millis());

        let pending = ctx
            .repos
            .occurrences
            .find_pending_by_user(&self.user.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let mut items = pending
            .iter()
            .filter(|o| o.remind_at >= day_start && o.remind_at <= day_end)
            .map(|o| (o.remind_at, o.message.clone()))
            .collect::<Vec<_>>();

        let templates = ctx
            .repos
            .templates
            .find_by_user(&self.user.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let now = self.now.timestamp_millis();
        for template in templates.iter().filter(|t| t.is_due_on(today)) {
            let slot = template.slot_on(today, &tz).timestamp_millis();
            let materialized = pending.iter().any(|o| {
                o.template_id.as_ref() == Some(&template.id) && o.slot_date == Some(today)
            });
            if slot > now && !materialized {
                items.push((slot, template.message.clone()));
            }
        }

        if items.is_empty() {
            return Ok("Nothing left on your agenda today.".into());
        }
        items.sort_by_key(|(at, _)| *at);
        let lines = items
            .into_iter()
            .map(|(at, message)| format!("- {} {}", format_time(at, &tz), message))
            .collect::<Vec<_>>();
        Ok(format!("Today's agenda:\n{}", lines.join("\n")))
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RunAutomationUseCase {
    type Response = String;

    type Error = UseCaseError;

    const NAME: &'static str = "RunAutomation";

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Error> {
        match self.automation {
            Automation::Agenda => self.agenda(ctx).await,
            Automation::Ping => Ok("pong".into()),
        }
    }
}

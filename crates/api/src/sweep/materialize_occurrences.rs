use crate::shared::usecase::{execute, UseCase};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use nudge_domain::{day_bounds, local_date, Occurrence, ReminderTemplate, SweepError};
use nudge_infra::{InsertOccurrenceError, NudgeContext};
use tracing::{error, info};

/// Makes sure the template has exactly one occurrence for the local calendar day of `now`,
/// if the template is due that day. Safe to run any number of times for the same day.
#[derive(Debug)]
pub struct MaterializeTemplateUseCase {
    pub template: ReminderTemplate,
    pub now: DateTime<Utc>,
}

#[derive(Debug, PartialEq)]
pub struct MaterializeOutcome {
    pub created: bool,
}

impl MaterializeOutcome {
    fn skipped() -> Self {
        Self { created: false }
    }
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError(String),
}

#[async_trait::async_trait(?Send)]
impl UseCase for MaterializeTemplateUseCase {
    type Response = MaterializeOutcome;

    type Error = UseCaseError;

    const NAME: &'static str = "MaterializeTemplate";

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Error> {
        let tz = ctx.config.timezone;
        let today = local_date(&self.now, &tz);
        if !self.template.is_due_on(today) {
            return Ok(MaterializeOutcome::skipped());
        }

        let slot = self.template.slot_on(today, &tz).timestamp_millis();
        // Slots that passed before the template existed are not owed to the user
        if slot < self.template.created {
            return Ok(MaterializeOutcome::skipped());
        }

        let (day_start, day_end) = day_bounds(today, &tz);
        let existing = ctx
            .repos
            .occurrences
            .find_by_template_between(
                &self.template.id,
                day_start.timestamp_millis(),
                day_end.timestamp_millis(),
            )
            .await
            .map_err(|e| UseCaseError::StorageError(e.to_string()))?;
        if !existing.is_empty() {
            return Ok(MaterializeOutcome::skipped());
        }

        let occurrence = Occurrence::materialized(&self.template, today, slot);
        match ctx.repos.occurrences.insert(&occurrence).await {
            Ok(()) => {
                info!(
                    "Materialized occurrence {} of template {} for {}",
                    occurrence.id, self.template.id, today
                );
                Ok(MaterializeOutcome { created: true })
            }
            // A concurrent sweep got there first
            Err(InsertOccurrenceError::Duplicate { .. }) => Ok(MaterializeOutcome::skipped()),
            Err(InsertOccurrenceError::Storage(e)) => {
                Err(UseCaseError::StorageError(e.to_string()))
            }
        }
    }
}

/// Materializes today's occurrence of every template. A failing template is
/// reported and does not stop the others.
pub async fn materialize_all(ctx: &NudgeContext, now: DateTime<Utc>) -> (usize, Vec<SweepError>) {
    let templates = match ctx.repos.templates.find_all().await {
        Ok(templates) => templates,
        Err(e) => {
            error!("Unable to list reminder templates: {:?}", e);
            return (
                0,
                vec![SweepError::query(format!(
                    "Unable to list reminder templates: {}",
                    e
                ))],
            );
        }
    };

    let results = join_all(templates.into_iter().map(|template| async move {
        let template_id = template.id.clone();
        let usecase = MaterializeTemplateUseCase { template, now };
        (template_id, execute(usecase, ctx).await)
    }))
    .await;

    let mut materialized = 0;
    let mut errors = Vec::new();
    for (template_id, res) in results {
        match res {
            Ok(outcome) if outcome.created => materialized += 1,
            Ok(_) => (),
            Err(UseCaseError::StorageError(message)) => {
                errors.push(SweepError::template(&template_id, message))
            }
        }
    }

    (materialized, errors)
}

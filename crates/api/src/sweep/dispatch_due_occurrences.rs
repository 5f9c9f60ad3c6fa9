use crate::shared::{delivery::deliver, usecase::UseCase};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use nudge_domain::{Occurrence, SweepError, User, ID};
use nudge_infra::NudgeContext;
use std::collections::HashMap;
use tracing::{error, warn};

/// Delivers every undelivered occurrence that is due at `now` and marks it delivered.
/// Failed deliveries stay undelivered and are picked up again by the next run.
#[derive(Debug)]
pub struct DispatchDueOccurrencesUseCase {
    pub now: DateTime<Utc>,
}

#[derive(Debug, Default, PartialEq)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
    pub errors: Vec<SweepError>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError(String),
}

enum DispatchOutcome {
    Sent,
    /// Delivered, but the delivered flag could not be stored
    SentUnmarked(SweepError),
    Failed(SweepError),
}

pub fn reminder_text(occurrence: &Occurrence) -> String {
    format!("Reminder: {}", occurrence.message)
}

async fn dispatch(
    occurrence: Occurrence,
    users: &HashMap<ID, User>,
    ctx: &NudgeContext,
) -> DispatchOutcome {
    let user = match users.get(&occurrence.user_id) {
        Some(user) => user,
        None => {
            return DispatchOutcome::Failed(SweepError::occurrence(
                &occurrence.id,
                format!("Owner {} was not found", occurrence.user_id),
            ))
        }
    };

    if let Err(e) = deliver(ctx, &user.address, &reminder_text(&occurrence)).await {
        warn!(
            "Delivery of occurrence {} failed and will be retried: {}",
            occurrence.id, e
        );
        return DispatchOutcome::Failed(SweepError::occurrence(&occurrence.id, e.to_string()));
    }

    match ctx.repos.occurrences.mark_delivered(&occurrence.id).await {
        Ok(()) => DispatchOutcome::Sent,
        Err(e) => {
            error!(
                "Occurrence {} was delivered but could not be marked as delivered: {:?}",
                occurrence.id, e
            );
            DispatchOutcome::SentUnmarked(SweepError::occurrence(
                &occurrence.id,
                format!("Delivered but not marked as delivered: {}", e),
            ))
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchDueOccurrencesUseCase {
    type Response = DispatchReport;

    type Error = UseCaseError;

    const NAME: &'static str = "DispatchDueOccurrences";

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Error> {
        let due = ctx
            .repos
            .occurrences
            .find_due(self.now.timestamp_millis())
            .await
            .map_err(|e| UseCaseError::StorageError(e.to_string()))?;
        if due.is_empty() {
            return Ok(Default::default());
        }

        let mut user_ids = due.iter().map(|o| o.user_id.clone()).collect::<Vec<_>>();
        user_ids.sort_by_key(|id| id.as_string());
        user_ids.dedup();
        let users = ctx
            .repos
            .users
            .find_many(&user_ids)
            .await
            .map_err(|e| UseCaseError::StorageError(e.to_string()))?
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect::<HashMap<_, _>>();

        let outcomes = join_all(
            due.into_iter()
                .map(|occurrence| dispatch(occurrence, &users, ctx)),
        )
        .await;

        let mut report = DispatchReport::default();
        for outcome in outcomes {
            match outcome {
                DispatchOutcome::Sent => report.sent += 1,
                DispatchOutcome::SentUnmarked(e) => {
                    report.sent += 1;
                    report.errors.push(e);
                }
                DispatchOutcome::Failed(e) => {
                    report.failed += 1;
                    report.errors.push(e);
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{oslo, setup};
    use nudge_domain::SweepErrorScope;
    use std::time::Duration;

    #[actix_web::test]
    async fn delivers_due_occurrences_once() {
        let now = oslo(2021, 2, 17, 12, 0);
        let test = setup(now).await;
        let due = Occurrence::one_time(
            test.user.id.clone(),
            "Call mom".into(),
            oslo(2021, 2, 17, 11, 0).timestamp_millis(),
        );
        let later = Occurrence::one_time(
            test.user.id.clone(),
            "Buy milk".into(),
            oslo(2021, 2, 17, 13, 0).timestamp_millis(),
        );
        for o in [&due, &later] {
            test.ctx.repos.occurrences.insert(o).await.unwrap();
        }

        let mut usecase = DispatchDueOccurrencesUseCase { now };
        let report = usecase.execute(&test.ctx).await.unwrap();
        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, 0);
        assert!(report.errors.is_empty());
        assert_eq!(
            test.channel.deliveries_to(&test.user.address),
            vec!["Reminder: Call mom".to_string()]
        );

        let stored = test.ctx.repos.occurrences.find(&due.id).await.unwrap().unwrap();
        assert!(stored.delivered);
        let stored = test.ctx.repos.occurrences.find(&later.id).await.unwrap().unwrap();
        assert!(!stored.delivered);

        // Nothing is sent twice
        let report = usecase.execute(&test.ctx).await.unwrap();
        assert_eq!(report, DispatchReport::default());
        assert_eq!(test.channel.deliveries().len(), 1);
    }

    #[actix_web::test]
    async fn failed_delivery_is_retried_on_next_run() {
        let now = oslo(2021, 2, 17, 12, 0);
        let test = setup(now).await;
        let due = Occurrence::one_time(
            test.user.id.clone(),
            "Call mom".into(),
            now.timestamp_millis(),
        );
        test.ctx.repos.occurrences.insert(&due).await.unwrap();
        test.channel.fail_next(1);

        let mut usecase = DispatchDueOccurrencesUseCase { now };
        let report = usecase.execute(&test.ctx).await.unwrap();
        assert_eq!(report.sent, 0);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].scope, SweepErrorScope::Occurrence(due.id.clone()));
        let stored = test.ctx.repos.occurrences.find(&due.id).await.unwrap().unwrap();
        assert!(!stored.delivered);

        let report = usecase.execute(&test.ctx).await.unwrap();
        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, 0);
        let stored = test.ctx.repos.occurrences.find(&due.id).await.unwrap().unwrap();
        assert!(stored.delivered);
    }

    #[actix_web::test]
    async fn timed_out_delivery_counts_as_failed() {
        let now = oslo(2021, 2, 17, 12, 0);
        let mut test = setup(now).await;
        test.ctx.config.delivery_timeout = Duration::from_millis(20);
        test.channel.set_delay(Some(Duration::from_millis(500)));

        let due = Occurrence::one_time(
            test.user.id.clone(),
            "Call mom".into(),
            now.timestamp_millis(),
        );
        test.ctx.repos.occurrences.insert(&due).await.unwrap();

        let mut usecase = DispatchDueOccurrencesUseCase { now };
        let report = usecase.execute(&test.ctx).await.unwrap();
        assert_eq!(report.sent, 0);
        assert_eq!(report.failed, 1);
        let stored = test.ctx.repos.occurrences.find(&due.id).await.unwrap().unwrap();
        assert!(!stored.delivered);
    }

    #[actix_web::test]
    async fn one_failure_does_not_stop_the_batch() {
        let now = oslo(2021, 2, 17, 12, 0);
        let test = setup(now).await;
        let other = test
            .ctx
            .repos
            .users
            .upsert("+4791111111", 0)
            .await
            .unwrap();
        let orphan = Occurrence::one_time(ID::default(), "Nobody".into(), 0);
        let first = Occurrence::one_time(test.user.id.clone(), "First".into(), 1);
        let second = Occurrence::one_time(other.id.clone(), "Second".into(), 2);
        for o in [&orphan, &first, &second] {
            test.ctx.repos.occurrences.insert(o).await.unwrap();
        }

        let mut usecase = DispatchDueOccurrencesUseCase { now };
        let report = usecase.execute(&test.ctx).await.unwrap();
        assert_eq!(report.sent, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(
            report.errors[0].scope,
            SweepErrorScope::Occurrence(orphan.id.clone())
        );
        assert_eq!(
            test.channel.deliveries_to(&other.address),
            vec!["Reminder: Second".to_string()]
        );
    }
}

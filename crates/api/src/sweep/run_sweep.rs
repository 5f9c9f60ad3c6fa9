use super::dispatch_due_occurrences::{self, DispatchDueOccurrencesUseCase};
use super::materialize_occurrences::materialize_all;
use crate::error::NudgeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use nudge_api_structs::run_sweep::*;
use nudge_domain::{SweepError, SweepReport};
use nudge_infra::NudgeContext;
use tracing::info;

pub async fn run_sweep_controller(
    ctx: web::Data<NudgeContext>,
) -> Result<HttpResponse, NudgeError> {
    let usecase = RunSweepUseCase { now: ctx.sys.now() };

    execute(usecase, &ctx)
        .await
        .map(|report| HttpResponse::Ok().json(APIResponse::new(report)))
        .map_err(|e| match e {})
}

/// One materialize-then-dispatch cycle. Both steps are safe to repeat, so the
/// sweep can be triggered as often as wanted. Overlapping sweeps in one process
/// are serialized, a sweep that arrives while another runs waits for it and then
/// finds nothing left to send.
#[derive(Debug)]
pub struct RunSweepUseCase {
    pub now: DateTime<Utc>,
}

/// A sweep always completes, every failure ends up in the report
#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait(?Send)]
impl UseCase for RunSweepUseCase {
    type Response = SweepReport;

    type Error = UseCaseError;

    const NAME: &'static str = "RunSweep";

    async fn execute(&mut self, ctx: &NudgeContext) -> Result<Self::Response, Self::Error> {
        let _running = ctx.sweep_lock.lock().await;

        let (materialized, mut errors) = materialize_all(ctx, self.now).await;

        let usecase = DispatchDueOccurrencesUseCase { now: self.now };
        let (sent, failed) = match execute(usecase, ctx).await {
            Ok(report) => {
                errors.extend(report.errors);
                (report.sent, report.failed)
            }
            Err(dispatch_due_occurrences::UseCaseError::StorageError(message)) => {
                errors.push(SweepError::query(format!(
                    "Unable to find due occurrences: {}",
                    message
                )));
                (0, 0)
            }
        };

        let report = SweepReport {
            materialized,
            sent,
            failed,
            errors,
        };
        info!(
            "Sweep at {} done. Materialized: {}, sent: {}, failed: {}, errors: {}",
            self.now,
            report.materialized,
            report.sent,
            report.failed,
            report.errors.len()
        );
        Ok(report)
    }
}

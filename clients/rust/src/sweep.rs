use crate::{APIResponse, BaseClient};
use nudge_api_structs::run_sweep;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct SweepClient {
    base: Arc<BaseClient>,
}

impl SweepClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Triggers one sweep, as an external timer would
    pub async fn run(&self) -> APIResponse<run_sweep::APIResponse> {
        self.base.post((), "sweep".into(), StatusCode::OK).await
    }
}

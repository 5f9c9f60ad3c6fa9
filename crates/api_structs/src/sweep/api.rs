use crate::dtos::SweepReportDTO;
use nudge_domain::SweepReport;
use serde::{Deserialize, Serialize};

pub mod run_sweep {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub report: SweepReportDTO,
    }

    impl APIResponse {
        pub fn new(report: SweepReport) -> Self {
            Self {
                report: SweepReportDTO::new(report),
            }
        }
    }
}

use nudge_domain::{SweepError, SweepErrorScope, SweepReport, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SweepErrorDTO {
    /// "query", "template" or "occurrence"
    pub scope: String,
    pub id: Option<ID>,
    pub message: String,
}

impl SweepErrorDTO {
    pub fn new(error: SweepError) -> Self {
        let (scope, id) = match error.scope {
            SweepErrorScope::Query => ("query", None),
            SweepErrorScope::Template(id) => ("template", Some(id)),
            SweepErrorScope::Occurrence(id) => ("occurrence", Some(id)),
        };
        Self {
            scope: scope.into(),
            id,
            message: error.message,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SweepReportDTO {
    pub materialized: usize,
    pub sent: usize,
    pub failed: usize,
    pub errors: Vec<SweepErrorDTO>,
}

impl SweepReportDTO {
    pub fn new(report: SweepReport) -> Self {
        Self {
            materialized: report.materialized,
            sent: report.sent,
            failed: report.failed,
            errors: report.errors.into_iter().map(SweepErrorDTO::new).collect(),
        }
    }
}

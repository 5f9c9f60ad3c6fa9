use crate::shared::entity::ID;

#[derive(Debug, Clone, PartialEq)]
pub enum SweepErrorScope {
    /// Listing templates or due occurrences failed
    Query,
    Template(ID),
    Occurrence(ID),
}

/// A failure isolated to one item of a sweep. The rest of the sweep carried on.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepError {
    pub scope: SweepErrorScope,
    pub message: String,
}

impl SweepError {
    pub fn query(message: impl Into<String>) -> Self {
        Self {
            scope: SweepErrorScope::Query,
            message: message.into(),
        }
    }

    pub fn template(id: &ID, message: impl Into<String>) -> Self {
        Self {
            scope: SweepErrorScope::Template(id.clone()),
            message: message.into(),
        }
    }

    pub fn occurrence(id: &ID, message: impl Into<String>) -> Self {
        Self {
            scope: SweepErrorScope::Occurrence(id.clone()),
            message: message.into(),
        }
    }
}

/// Outcome of one materialize-then-dispatch cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepReport {
    pub materialized: usize,
    pub sent: usize,
    pub failed: usize,
    pub errors: Vec<SweepError>,
}

mod inmemory;
mod postgres;

pub use inmemory::InMemoryOccurrenceRepo;
use nudge_domain::{NaiveDate, Occurrence, ID};
pub use postgres::PostgresOccurrenceRepo;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsertOccurrenceError {
    #[error("Template {template_id} already has an occurrence on {date}")]
    Duplicate { template_id: ID, date: NaiveDate },
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[async_trait::async_trait]
pub trait IOccurrenceRepo: Send + Sync {
    /// Rejects a second occurrence for the same template and slot date
    async fn insert(&self, occurrence: &Occurrence) -> Result<(), InsertOccurrenceError>;
    async fn find(&self, occurrence_id: &ID) -> anyhow::Result<Option<Occurrence>>;
    /// Occurrences of a template with `start <= remind_at <= end`, delivered or not
    async fn find_by_template_between(
        &self,
        template_id: &ID,
        start: i64,
        end: i64,
    ) -> anyhow::Result<Vec<Occurrence>>;
    /// Undelivered occurrences with `remind_at <= now`
    async fn find_due(&self, now: i64) -> anyhow::Result<Vec<Occurrence>>;
    async fn find_pending_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Occurrence>>;
    async fn mark_delivered(&self, occurrence_id: &ID) -> anyhow::Result<()>;
}

mod inmemory;
mod postgres;

pub use inmemory::InMemoryTemplateRepo;
use nudge_domain::{ReminderTemplate, ID};
pub use postgres::PostgresTemplateRepo;

#[async_trait::async_trait]
pub trait ITemplateRepo: Send + Sync {
    async fn insert(&self, template: &ReminderTemplate) -> anyhow::Result<()>;
    async fn find_all(&self) -> anyhow::Result<Vec<ReminderTemplate>>;
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<ReminderTemplate>>;
}

mod occurrence;
mod shared;
mod template;
mod user;

pub use occurrence::{IOccurrenceRepo, InsertOccurrenceError};
use occurrence::{InMemoryOccurrenceRepo, PostgresOccurrenceRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use template::ITemplateRepo;
use template::{InMemoryTemplateRepo, PostgresTemplateRepo};
use tracing::info;
pub use user::IUserRepo;
use user::{InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn IUserRepo>,
    pub templates: Arc<dyn ITemplateRepo>,
    pub occurrences: Arc<dyn IOccurrenceRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB EXECUTING MIGRATION ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB EXECUTING MIGRATION ... [done]");

        Ok(Self {
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            templates: Arc::new(PostgresTemplateRepo::new(pool.clone())),
            occurrences: Arc::new(PostgresOccurrenceRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepo::new()),
            templates: Arc::new(InMemoryTemplateRepo::new()),
            occurrences: Arc::new(InMemoryOccurrenceRepo::new()),
        }
    }
}

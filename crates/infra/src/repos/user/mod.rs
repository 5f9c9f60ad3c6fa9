mod inmemory;
mod postgres;

pub use inmemory::InMemoryUserRepo;
use nudge_domain::{User, ID};
pub use postgres::PostgresUserRepo;

#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    /// Finds the `User` with the given channel address, creating it when missing
    async fn upsert(&self, address: &str, created: i64) -> anyhow::Result<User>;
    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>>;
    async fn find_many(&self, user_ids: &[ID]) -> anyhow::Result<Vec<User>>;
}

#[cfg(test)]
mod tests {
    use crate::setup_context;

    #[tokio::test]
    async fn upsert_is_keyed_by_address() {
        let ctx = setup_context().await.expect("To setup context");
        let address = format!("+47{}", nudge_domain::ID::default().as_string());

        let user = ctx
            .repos
            .users
            .upsert(&address, 10)
            .await
            .expect("To upsert user");
        assert_eq!(user.address, address);

        let same_user = ctx
            .repos
            .users
            .upsert(&address, 20)
            .await
            .expect("To upsert user");
        assert_eq!(same_user.id, user.id);
        assert_eq!(same_user.created, 10);

        let found = ctx.repos.users.find(&user.id).await.expect("To query user");
        assert_eq!(found, Some(user.clone()));

        let many = ctx
            .repos
            .users
            .find_many(&[user.id.clone(), Default::default()])
            .await
            .expect("To query users");
        assert_eq!(many, vec![user]);
    }

    #[tokio::test]
    async fn missing_user_is_not_an_error() {
        let ctx = setup_context().await.expect("To setup context");
        let found = ctx.repos.users.find(&Default::default()).await;
        assert!(matches!(found, Ok(None)));
    }
}

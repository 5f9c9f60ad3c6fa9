use super::IUserRepo;
use nudge_domain::{User, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    user_uid: Uuid,
    address: String,
    created: i64,
}

impl From<UserRaw> for User {
    fn from(raw: UserRaw) -> Self {
        Self {
            id: raw.user_uid.into(),
            address: raw.address,
            created: raw.created,
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn upsert(&self, address: &str, created: i64) -> anyhow::Result<User> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let user: UserRaw = sqlx::query_as(
            r#"
            INSERT INTO users(user_uid, address, created)
            VALUES($1, $2, $3)
            ON CONFLICT (address) DO UPDATE SET address = EXCLUDED.address
            RETURNING user_uid, address, created
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(address)
        .bind(created)
        .fetch_one(&self.pool)
        .await?;

        Ok(user.into())
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        let user: Option<UserRaw> = sqlx::query_as(
            r#"
            SELECT * FROM users AS u
            WHERE u.user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(|u| u.into()))
    }

    async fn find_many(&self, user_ids: &[ID]) -> anyhow::Result<Vec<User>> {
        let user_ids = user_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();

        let users: Vec<UserRaw> = sqlx::query_as(
            r#"
            SELECT * FROM users AS u
            WHERE u.user_uid = ANY($1)
            "#,
        )
        .bind(&user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users.into_iter().map(|u| u.into()).collect())
    }
}

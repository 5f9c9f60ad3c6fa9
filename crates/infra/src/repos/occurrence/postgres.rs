use super::{IOccurrenceRepo, InsertOccurrenceError};
use nudge_domain::{NaiveDate, Occurrence, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresOccurrenceRepo {
    pool: PgPool,
}

impl PostgresOccurrenceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OccurrenceRaw {
    occurrence_uid: Uuid,
    user_uid: Uuid,
    message: String,
    remind_at: i64,
    delivered: bool,
    template_uid: Option<Uuid>,
    slot_date: Option<NaiveDate>,
}

impl From<OccurrenceRaw> for Occurrence {
    fn from(raw: OccurrenceRaw) -> Self {
        Self {
            id: raw.occurrence_uid.into(),
            user_id: raw.user_uid.into(),
            message: raw.message,
            remind_at: raw.remind_at,
            delivered: raw.delivered,
            template_id: raw.template_uid.map(|id| id.into()),
            slot_date: raw.slot_date,
        }
    }
}

fn into_occurrences(rows: Vec<OccurrenceRaw>) -> Vec<Occurrence> {
    rows.into_iter().map(|o| o.into()).collect()
}

#[async_trait::async_trait]
impl IOccurrenceRepo for PostgresOccurrenceRepo {
    async fn insert(&self, occurrence: &Occurrence) -> Result<(), InsertOccurrenceError> {
        // One-time occurrences have NULL keys and never hit the unique index
        let res = sqlx::query(
            r#"
            INSERT INTO occurrences
            (occurrence_uid, user_uid, message, remind_at, delivered, template_uid, slot_date)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (template_uid, slot_date) DO NOTHING
            "#,
        )
        .bind(occurrence.id.inner_ref())
        .bind(occurrence.user_id.inner_ref())
        .bind(&occurrence.message)
        .bind(occurrence.remind_at)
        .bind(occurrence.delivered)
        .bind(occurrence.template_id.as_ref().map(|id| *id.inner_ref()))
        .bind(occurrence.slot_date)
        .execute(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        if res.rows_affected() == 0 {
            if let (Some(template_id), Some(date)) = (&occurrence.template_id, occurrence.slot_date)
            {
                return Err(InsertOccurrenceError::Duplicate {
                    template_id: template_id.clone(),
                    date,
                });
            }
        }
        Ok(())
    }

    async fn find(&self, occurrence_id: &ID) -> anyhow::Result<Option<Occurrence>> {
        let occurrence: Option<OccurrenceRaw> = sqlx::query_as(
            r#"
            SELECT * FROM occurrences AS o
            WHERE o.occurrence_uid = $1
            "#,
        )
        .bind(occurrence_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(occurrence.map(|o| o.into()))
    }

    async fn find_by_template_between(
        &self,
        template_id: &ID,
        start: i64,
        end: i64,
    ) -> anyhow::Result<Vec<Occurrence>> {
        let occurrences: Vec<OccurrenceRaw> = sqlx::query_as(
            r#"
            SELECT * FROM occurrences AS o
            WHERE o.template_uid = $1 AND
            o.remind_at >= $2 AND
            o.remind_at <= $3
            "#,
        )
        .bind(template_id.inner_ref())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_occurrences(occurrences))
    }

    async fn find_due(&self, now: i64) -> anyhow::Result<Vec<Occurrence>> {
        let occurrences: Vec<OccurrenceRaw> = sqlx::query_as(
            r#"
            SELECT * FROM occurrences AS o
            WHERE o.delivered = FALSE AND
            o.remind_at <= $1
            ORDER BY o.remind_at
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(into_occurrences(occurrences))
    }

    async fn find_pending_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Occurrence>> {
        let occurrences: Vec<OccurrenceRaw> = sqlx::query_as(
            r#"
            SELECT * FROM occurrences AS o
            WHERE o.user_uid = $1 AND
            o.delivered = FALSE
            ORDER BY o.remind_at
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(into_occurrences(occurrences))
    }

    async fn mark_delivered(&self, occurrence_id: &ID) -> anyhow::Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE occurrences
            SET delivered = TRUE
            WHERE occurrence_uid = $1
            "#,
        )
        .bind(occurrence_id.inner_ref())
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(anyhow::anyhow!("Occurrence {} not found", occurrence_id));
        }
        Ok(())
    }
}

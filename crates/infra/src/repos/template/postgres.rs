use super::ITemplateRepo;
use anyhow::Context;
use nudge_domain::{NaiveDate, RecurrenceKind, RecurrenceRule, ReminderTemplate, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresTemplateRepo {
    pool: PgPool,
}

impl PostgresTemplateRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TemplateRaw {
    template_uid: Uuid,
    user_uid: Uuid,
    message: String,
    recurrence_kind: String,
    weekdays: Vec<i16>,
    time_of_day: String,
    anchor_date: NaiveDate,
    created: i64,
}

impl TryFrom<TemplateRaw> for ReminderTemplate {
    type Error = anyhow::Error;

    fn try_from(raw: TemplateRaw) -> Result<Self, Self::Error> {
        let kind = raw.recurrence_kind.parse::<RecurrenceKind>()?;
        let weekdays = raw
            .weekdays
            .into_iter()
            .map(u8::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let rule = RecurrenceRule::new(kind, weekdays)
            .with_context(|| format!("Stored template {} has an invalid rule", raw.template_uid))?;

        Ok(Self {
            id: raw.template_uid.into(),
            user_id: raw.user_uid.into(),
            message: raw.message,
            rule,
            time_of_day: raw.time_of_day.parse()?,
            anchor_date: raw.anchor_date,
            created: raw.created,
        })
    }
}

fn into_templates(rows: Vec<TemplateRaw>) -> anyhow::Result<Vec<ReminderTemplate>> {
    rows.into_iter().map(ReminderTemplate::try_from).collect()
}

#[async_trait::async_trait]
impl ITemplateRepo for PostgresTemplateRepo {
    async fn insert(&self, template: &ReminderTemplate) -> anyhow::Result<()> {
        let weekdays = template
            .rule
            .weekdays()
            .iter()
            .map(|wday| *wday as i16)
            .collect::<Vec<_>>();

        sqlx::query(
            r#"
            INSERT INTO reminder_templates
            (template_uid, user_uid, message, recurrence_kind, weekdays, time_of_day, anchor_date, created)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(template.id.inner_ref())
        .bind(template.user_id.inner_ref())
        .bind(&template.message)
        .bind(template.rule.kind().to_string())
        .bind(&weekdays)
        .bind(template.time_of_day.to_string())
        .bind(template.anchor_date)
        .bind(template.created)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<ReminderTemplate>> {
        let rows: Vec<TemplateRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminder_templates
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        into_templates(rows)
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<ReminderTemplate>> {
        let rows: Vec<TemplateRaw> = sqlx::query_as(
            r#"
            SELECT * FROM reminder_templates AS t
            WHERE t.user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        into_templates(rows)
    }
}

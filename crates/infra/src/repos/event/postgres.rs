use super::IEventRepo;
use agenda_domain::{CalendarEvent, ID};
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct EventRaw {
    event_uid: Uuid,
    user_uid: Uuid,
    title: String,
    description: Option<String>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl From<EventRaw> for CalendarEvent {
    fn from(e: EventRaw) -> Self {
        Self {
            id: e.event_uid.into(),
            user_id: e.user_uid.into(),
            title: e.title,
            description: e.description,
            start_time: e.start_time,
            end_time: e.end_time,
            created: e.created,
            updated: e.updated,
        }
    }
}

pub(crate) const INSERT_EVENT: &str = r#"
    INSERT INTO events
    (event_uid, user_uid, title, description, start_time, end_time, created, updated)
    VALUES($1, $2, $3, $4, $5, $6, $7, $8)
"#;

pub(crate) const UPDATE_EVENT: &str = r#"
    UPDATE events SET
        title = $2,
        description = $3,
        start_time = $4,
        end_time = $5,
        updated = $6
    WHERE event_uid = $1
"#;

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, e: &CalendarEvent) -> anyhow::Result<()> {
        sqlx::query(INSERT_EVENT)
            .bind(e.id.inner_ref())
            .bind(e.user_id.inner_ref())
            .bind(&e.title)
            .bind(&e.description)
            .bind(e.start_time)
            .bind(e.end_time)
            .bind(e.created)
            .bind(e.updated)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                error!(
                    "Unable to insert calendar event: {:?}. DB returned error: {:?}",
                    e, err
                );
                err
            })?;
        Ok(())
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<CalendarEvent>> {
        let event = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events AS e
            WHERE e.event_uid = $1
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(event.map(CalendarEvent::from))
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<CalendarEvent>> {
        let events = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events AS e
            WHERE e.user_uid = $1
            ORDER BY e.start_time ASC
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(events.into_iter().map(CalendarEvent::from).collect())
    }

    async fn delete(&self, event_id: &ID) -> anyhow::Result<Option<CalendarEvent>> {
        let event = sqlx::query_as::<_, EventRaw>(
            r#"
            DELETE FROM events AS e
            WHERE e.event_uid = $1
            RETURNING *
            "#,
        )
        .bind(event_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(event.map(CalendarEvent::from))
    }
}

use super::IReminderRepo;
use agenda_domain::{
    DateTime, ItemType, NotificationMethod, OwningItem, Reminder, SentStatus, Utc, ID,
};
use anyhow::anyhow;
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ReminderRaw {
    reminder_uid: Uuid,
    user_uid: Uuid,
    item_type: String,
    item_uid: Uuid,
    reminder_time: DateTime<Utc>,
    notification_method: String,
    sent_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(r: ReminderRaw) -> anyhow::Result<Self> {
        let item_type = r.item_type.parse::<ItemType>().map_err(|e| anyhow!(e))?;
        let notification_method = r
            .notification_method
            .parse::<NotificationMethod>()
            .map_err(|e| anyhow!(e))?;
        let sent_status = r.sent_status.parse::<SentStatus>().map_err(|e| anyhow!(e))?;
        Ok(Self {
            id: r.reminder_uid.into(),
            user_id: r.user_uid.into(),
            item: OwningItem::from_parts(item_type, r.item_uid.into()),
            reminder_time: r.reminder_time,
            notification_method,
            sent_status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

pub(crate) const INSERT_REMINDER: &str = r#"
    INSERT INTO reminders
    (reminder_uid, user_uid, item_type, item_uid, reminder_time, notification_method, sent_status, created_at, updated_at)
    VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
"#;

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(INSERT_REMINDER)
            .bind(reminder.id.inner_ref())
            .bind(reminder.user_id.inner_ref())
            .bind(reminder.item.item_type().as_str())
            .bind(reminder.item.item_id().inner_ref())
            .bind(reminder.reminder_time)
            .bind(reminder.notification_method.as_str())
            .bind(reminder.sent_status.as_str())
            .bind(reminder.created_at)
            .bind(reminder.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Unable to insert reminder: {:?}. DB returned error: {:?}",
                    reminder, e
                );
                e
            })?;
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> anyhow::Result<Option<Reminder>> {
        let reminder = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        reminder.map(Reminder::try_from).transpose()
    }

    async fn find_by_item(
        &self,
        user_id: &ID,
        item: &OwningItem,
    ) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.user_uid = $1 AND r.item_type = $2 AND r.item_uid = $3
            ORDER BY r.reminder_time ASC
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(item.item_type().as_str())
        .bind(item.item_id().inner_ref())
        .fetch_all(&self.pool)
        .await?;

        reminders.into_iter().map(Reminder::try_from).collect()
    }

    async fn find_due(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.sent_status = $1 AND r.reminder_time <= $2
            ORDER BY r.reminder_time ASC
            "#,
        )
        .bind(SentStatus::Pending.as_str())
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to query due reminders. DB returned error: {:?}", e);
            e
        })?;

        reminders.into_iter().map(Reminder::try_from).collect()
    }

    async fn claim(&self, reminder_id: &ID, now: DateTime<Utc>) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET sent_status = $2, updated_at = $3
            WHERE reminder_uid = $1 AND sent_status = $4
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(SentStatus::InFlight.as_str())
        .bind(now)
        .bind(SentStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    async fn set_status(
        &self,
        reminder_id: &ID,
        status: SentStatus,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET sent_status = $2, updated_at = $3
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(status.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to set status {} on reminder {}. DB returned error: {:?}",
                status, reminder_id, e
            );
            e
        })?;
        Ok(())
    }
}

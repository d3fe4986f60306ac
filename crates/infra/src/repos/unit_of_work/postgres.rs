use super::{IUnitOfWork, IUnitOfWorkRepo};
use crate::repos::{
    event::{INSERT_EVENT, UPDATE_EVENT},
    reminder::INSERT_REMINDER,
    task::{INSERT_TASK, UPDATE_TASK},
};
use agenda_domain::{CalendarEvent, OwningItem, Reminder, SentStatus, Task, ID};
use sqlx::{Connection, PgPool, Postgres, Transaction};
use tracing::error;

pub struct PostgresUnitOfWorkRepo {
    pool: PgPool,
}

impl PostgresUnitOfWorkRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl IUnitOfWorkRepo for PostgresUnitOfWorkRepo {
    async fn begin(&self) -> anyhow::Result<Box<dyn IUnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresUnitOfWork { tx }))
    }
}

/// Reminder statements run in their own savepoint so that a failing
/// statement only rolls back itself and not the whole transaction.
pub struct PostgresUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait::async_trait]
impl IUnitOfWork for PostgresUnitOfWork {
    async fn insert_event(&mut self, e: &CalendarEvent) -> anyhow::Result<()> {
        sqlx::query(INSERT_EVENT)
            .bind(e.id.inner_ref())
            .bind(e.user_id.inner_ref())
            .bind(&e.title)
            .bind(&e.description)
            .bind(e.start_time)
            .bind(e.end_time)
            .bind(e.created)
            .bind(e.updated)
            .execute(&mut *self.tx)
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

    async fn save_event(&mut self, e: &CalendarEvent) -> anyhow::Result<()> {
        sqlx::query(UPDATE_EVENT)
            .bind(e.id.inner_ref())
            .bind(&e.title)
            .bind(&e.description)
            .bind(e.start_time)
            .bind(e.end_time)
            .bind(e.updated)
            .execute(&mut *self.tx)
            .await
            .map_err(|err| {
                error!(
                    "Unable to save calendar event: {:?}. DB returned error: {:?}",
                    e, err
                );
                err
            })?;
        Ok(())
    }

    async fn insert_task(&mut self, task: &Task) -> anyhow::Result<()> {
        sqlx::query(INSERT_TASK)
            .bind(task.id.inner_ref())
            .bind(task.user_id.inner_ref())
            .bind(&task.description)
            .bind(task.due_date)
            .bind(task.priority.as_i16())
            .bind(task.status.as_str())
            .bind(task.created)
            .bind(task.updated)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                error!(
                    "Unable to insert task: {:?}. DB returned error: {:?}",
                    task, e
                );
                e
            })?;
        Ok(())
    }

    async fn save_task(&mut self, task: &Task) -> anyhow::Result<()> {
        sqlx::query(UPDATE_TASK)
            .bind(task.id.inner_ref())
            .bind(&task.description)
            .bind(task.due_date)
            .bind(task.priority.as_i16())
            .bind(task.status.as_str())
            .bind(task.updated)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                error!(
                    "Unable to save task: {:?}. DB returned error: {:?}",
                    task, e
                );
                e
            })?;
        Ok(())
    }

    async fn delete_pending_reminders(
        &mut self,
        user_id: &ID,
        item: &OwningItem,
    ) -> anyhow::Result<u64> {
        let mut savepoint = Connection::begin(&mut *self.tx).await?;
        let res = sqlx::query(
            r#"
            DELETE FROM reminders AS r
            WHERE r.user_uid = $1 AND r.item_type = $2 AND r.item_uid = $3 AND r.sent_status = $4
            "#,
        )
        .bind(user_id.inner_ref())
        .bind(item.item_type().as_str())
        .bind(item.item_id().inner_ref())
        .bind(SentStatus::Pending.as_str())
        .execute(&mut *savepoint)
        .await?;
        savepoint.commit().await?;

        Ok(res.rows_affected())
    }

    async fn insert_reminder(&mut self, reminder: &Reminder) -> anyhow::Result<()> {
        let mut savepoint = Connection::begin(&mut *self.tx).await?;
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
            .execute(&mut *savepoint)
            .await?;
        savepoint.commit().await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

use super::ITaskRepo;
use agenda_domain::{NaiveDate, Task, TaskPriority, TaskStatus, ID};
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresTaskRepo {
    pool: PgPool,
}

impl PostgresTaskRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct TaskRaw {
    task_uid: Uuid,
    user_uid: Uuid,
    description: String,
    due_date: Option<NaiveDate>,
    priority: i16,
    status: String,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

impl TryFrom<TaskRaw> for Task {
    type Error = anyhow::Error;

    fn try_from(t: TaskRaw) -> anyhow::Result<Self> {
        let priority = TaskPriority::from_i16(t.priority)
            .ok_or_else(|| anyhow!("Invalid task priority stored: {}", t.priority))?;
        let status = t.status.parse::<TaskStatus>().map_err(|e| anyhow!(e))?;
        Ok(Self {
            id: t.task_uid.into(),
            user_id: t.user_uid.into(),
            description: t.description,
            due_date: t.due_date,
            priority,
            status,
            created: t.created,
            updated: t.updated,
        })
    }
}

pub(crate) const INSERT_TASK: &str = r#"
    INSERT INTO tasks
    (task_uid, user_uid, description, due_date, priority, status, created, updated)
    VALUES($1, $2, $3, $4, $5, $6, $7, $8)
"#;

pub(crate) const UPDATE_TASK: &str = r#"
    UPDATE tasks SET
        description = $2,
        due_date = $3,
        priority = $4,
        status = $5,
        updated = $6
    WHERE task_uid = $1
"#;

#[async_trait::async_trait]
impl ITaskRepo for PostgresTaskRepo {
    async fn insert(&self, task: &Task) -> anyhow::Result<()> {
        sqlx::query(INSERT_TASK)
            .bind(task.id.inner_ref())
            .bind(task.user_id.inner_ref())
            .bind(&task.description)
            .bind(task.due_date)
            .bind(task.priority.as_i16())
            .bind(task.status.as_str())
            .bind(task.created)
            .bind(task.updated)
            .execute(&self.pool)
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

    async fn save(&self, task: &Task) -> anyhow::Result<()> {
        sqlx::query(UPDATE_TASK)
            .bind(task.id.inner_ref())
            .bind(&task.description)
            .bind(task.due_date)
            .bind(task.priority.as_i16())
            .bind(task.status.as_str())
            .bind(task.updated)
            .execute(&self.pool)
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

    async fn find(&self, task_id: &ID) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, TaskRaw>(
            r#"
            SELECT * FROM tasks AS t
            WHERE t.task_uid = $1
            "#,
        )
        .bind(task_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        task.map(Task::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, TaskRaw>(
            r#"
            SELECT * FROM tasks AS t
            WHERE t.user_uid = $1
            ORDER BY t.due_date ASC NULLS LAST, t.created ASC
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        tasks.into_iter().map(Task::try_from).collect()
    }

    async fn delete(&self, task_id: &ID) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, TaskRaw>(
            r#"
            DELETE FROM tasks AS t
            WHERE t.task_uid = $1
            RETURNING *
            "#,
        )
        .bind(task_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        task.map(Task::try_from).transpose()
    }
}

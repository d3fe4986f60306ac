use super::IUserRepo;
use agenda_domain::{User, ID};
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

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
    username: String,
    email: Option<String>,
    created: DateTime<Utc>,
}

impl From<UserRaw> for User {
    fn from(raw: UserRaw) -> Self {
        Self {
            id: raw.user_uid.into(),
            username: raw.username,
            email: raw.email,
            created: raw.created,
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users(user_uid, username, email, created)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.created)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert user: {:?}. DB returned error: {:?}",
                user, e
            );
            e
        })?;

        Ok(())
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users AS u
            WHERE u.user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users AS u
            WHERE u.username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(User::from))
    }

    async fn delete(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, UserRaw>(
            r#"
            DELETE FROM users AS u
            WHERE u.user_uid = $1
            RETURNING *
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(User::from))
    }
}

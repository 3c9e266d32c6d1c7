use crate::infrastructure::db::{self, DbPool};
use crate::{domain::user::User, error::AppResult};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Storage for user records and their TTS settings
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;

    /// Persist the preferred service and every vendor key of `user`
    async fn update_tts_settings(&self, user: &User) -> AppResult<User>;

    async fn check_connection(&self) -> AppResult<()>;
}

pub struct PostgresUserRepository {
    pool: Arc<DbPool>,
}

impl PostgresUserRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let pool = self.pool.as_ref();
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    async fn update_tts_settings(&self, user: &User) -> AppResult<User> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET preferred_tts_service = $1,
                elevenlabs_api_key = $2,
                openai_api_key = $3,
                groq_api_key = $4,
                polly_credentials = $5,
                updated_at = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(user.preferred_tts_service)
        .bind(&user.elevenlabs_api_key)
        .bind(&user.openai_api_key)
        .bind(&user.groq_api_key)
        .bind(&user.polly_credentials)
        .bind(now)
        .bind(user.id)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    async fn check_connection(&self) -> AppResult<()> {
        db::check_connection(self.pool.as_ref()).await?;
        Ok(())
    }
}

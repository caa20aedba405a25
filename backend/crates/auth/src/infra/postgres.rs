//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, account_identifier, name, email, image, is_admin, join_date";

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_account_identifier(
        &self,
        account_identifier: &str,
    ) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE account_identifier = $1"
        ))
        .bind(account_identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_password_hash(&self, user_id: &UserId) -> AuthResult<Option<String>> {
        let hash: Option<Option<String>> =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE id = $1")
                .bind(user_id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        Ok(hash.flatten())
    }

    async fn get_or_create(&self, user: &NewUser) -> AuthResult<User> {
        let inserted = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (account_identifier, name, email, image, is_admin, join_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (account_identifier) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.account_identifier)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.image)
        .bind(user.is_admin)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            tracing::info!(user_id = %row.id, "Created user");
            return Ok(row.into_user());
        }

        self.find_by_account_identifier(&user.account_identifier)
            .await?
            .ok_or_else(|| AuthError::Internal("user vanished after conflict".to_string()))
    }

    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        let result = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (
                account_identifier, name, email, image, is_admin, join_date, password_hash
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.account_identifier)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.image)
        .bind(user.is_admin)
        .bind(Utc::now())
        .bind(user.password_hash.as_deref())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into_user()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AuthError::UserExists)
            }
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    account_identifier: String,
    name: String,
    email: String,
    image: String,
    is_admin: bool,
    join_date: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: UserId::from_uuid(self.id),
            account_identifier: self.account_identifier,
            name: self.name,
            email: self.email,
            image: self.image,
            is_admin: self.is_admin,
            join_date: self.join_date,
        }
    }
}

//! User store: the persistence seam for account records.
//!
//! The [`UserStore`] trait mirrors the four document-store operations the rest
//! of the system is written against (`find_one`, `find_one_and_update`,
//! `create`, `find_all`); [`SqlxUserStore`] is the SQLite-backed
//! implementation. Resolvers hold the store as `Arc<dyn UserStore>` so tests
//! can substitute their own implementation.

use crate::errors::{Error, Result};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;
use uuid::Uuid;

/// One account record as stored.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2 hash of the account password
    pub password: String,
    /// Authorization tier
    pub level: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field set for creating a new record. The password is expected to already be
/// hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub level: i64,
}

/// In-place update payload; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserUpdate {
    pub fn name<S: Into<String>>(name: S) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    pub fn email<S: Into<String>>(email: S) -> Self {
        Self { email: Some(email.into()), ..Self::default() }
    }

    pub fn password<S: Into<String>>(password: S) -> Self {
        Self { password: Some(password.into()), ..Self::default() }
    }
}

/// Persistence operations for account records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a single record by email
    async fn find_one(&self, email: &str) -> Result<Option<User>>;

    /// Atomically update the record matching `email` and return the updated
    /// row, or `None` when no record matched
    async fn find_one_and_update(&self, email: &str, update: UserUpdate) -> Result<Option<User>>;

    /// Insert a new record and return it
    async fn create(&self, user: NewUser) -> Result<User>;

    /// Materialize every record
    async fn find_all(&self) -> Result<Vec<User>>;
}

/// SQLite-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct SqlxUserStore {
    pool: DbPool,
}

impl SqlxUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, name, email, password, level, created_at, updated_at";

#[async_trait]
impl UserStore for SqlxUserStore {
    #[instrument(skip(self), fields(user_email = %email), name = "db_find_user")]
    async fn find_one(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch user by email"))
    }

    #[instrument(skip(self, update), fields(user_email = %email), name = "db_update_user")]
    async fn find_one_and_update(&self, email: &str, update: UserUpdate) -> Result<Option<User>> {
        // Single-statement find-and-update; row-level atomicity comes from the
        // store, not from this code.
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($1, name),
                email = COALESCE($2, email),
                password = COALESCE($3, password),
                updated_at = $4
            WHERE email = $5
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(update.name)
        .bind(update.email)
        .bind(update.password)
        .bind(Utc::now())
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to update user"))
    }

    #[instrument(skip(self, user), fields(user_email = %user.email), name = "db_create_user")]
    async fn create(&self, user: NewUser) -> Result<User> {
        let now = Utc::now();
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, name, email, password, level, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.level)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to create user"))
    }

    #[instrument(skip(self), name = "db_list_users")]
    async fn find_all(&self) -> Result<Vec<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at"))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to list users"))
    }
}

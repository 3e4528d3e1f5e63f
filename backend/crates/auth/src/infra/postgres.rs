//! PostgreSQL Repository Implementations
//!
//! Uniqueness of login identifiers is enforced by unique indexes (see
//! `database/migrations`); a losing concurrent insert surfaces as a
//! 23505 unique violation and is mapped to `AlreadyRegistered`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{admin::Admin, user::User};
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{
    Identifier, email::Email, password::PasswordDigest, phone::Phone, role::Role,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed credential repository for both namespaces
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map an insert failure, turning a unique violation into the
/// namespace-appropriate conflict.
fn map_insert_err(err: sqlx::Error, display: &'static str) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return AuthError::AlreadyRegistered(display);
        }
    }
    AuthError::Database(err)
}

// ============================================================================
// User Repository Implementation
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    phone: String,
    name: String,
    password_hash: String,
    games_played: i32,
    vouchers: i32,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            user_id: self.user_id.into(),
            phone: Phone::from_db(self.phone),
            name: self.name,
            password_hash: PasswordDigest::from_phc_string(self.password_hash)?,
            games_played: self.games_played,
            vouchers: self.vouchers,
            created_at: self.created_at,
        })
    }
}

impl CredentialRepository<User> for PgAuthRepository {
    async fn find_by_identifier(&self, identifier: &Phone) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                phone,
                name,
                password_hash,
                games_played,
                vouchers,
                created_at
            FROM users
            WHERE phone = $1
            "#,
        )
        .bind(identifier.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_subject(&self, subject: Uuid) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                phone,
                name,
                password_hash,
                games_played,
                vouchers,
                created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn insert(&self, record: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                phone,
                name,
                password_hash,
                games_played,
                vouchers,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.user_id.as_uuid())
        .bind(record.phone.as_str())
        .bind(&record.name)
        .bind(record.password_hash.as_phc_string())
        .bind(record.games_played)
        .bind(record.vouchers)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, Phone::DISPLAY))?;

        Ok(())
    }
}

// ============================================================================
// Admin Repository Implementation
// ============================================================================

#[derive(sqlx::FromRow)]
struct AdminRow {
    admin_id: Uuid,
    email: String,
    name: String,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl AdminRow {
    fn into_admin(self) -> AuthResult<Admin> {
        Ok(Admin {
            admin_id: self.admin_id.into(),
            email: Email::from_db(self.email),
            name: self.name,
            role: Role::from_code(&self.role).unwrap_or(Role::Admin),
            password_hash: PasswordDigest::from_phc_string(self.password_hash)?,
            created_at: self.created_at,
        })
    }
}

impl CredentialRepository<Admin> for PgAuthRepository {
    async fn find_by_identifier(&self, identifier: &Email) -> AuthResult<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            SELECT
                admin_id,
                email,
                name,
                role,
                password_hash,
                created_at
            FROM admins
            WHERE email = $1
            "#,
        )
        .bind(identifier.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_admin()).transpose()
    }

    async fn find_by_subject(&self, subject: Uuid) -> AuthResult<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            SELECT
                admin_id,
                email,
                name,
                role,
                password_hash,
                created_at
            FROM admins
            WHERE admin_id = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_admin()).transpose()
    }

    async fn insert(&self, record: &Admin) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO admins (
                admin_id,
                email,
                name,
                role,
                password_hash,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.admin_id.as_uuid())
        .bind(record.email.as_str())
        .bind(&record.name)
        .bind(record.role.code())
        .bind(record.password_hash.as_phc_string())
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, Email::DISPLAY))?;

        Ok(())
    }
}

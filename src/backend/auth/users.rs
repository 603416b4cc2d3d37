/**
 * User Model and Database Operations
 *
 * This module holds the stored user row, including credential state, and the
 * queries that create and mutate it. Client-facing views are built with
 * `UserProfile::from(&User)`.
 */

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::shared::{UserProfile, UserStatus};

const USER_COLUMNS: &str = "id, first_name, last_name, email, about, avatar, password_hash, \
     password_changed_at, password_reset_token, password_reset_expires, verified, otp_hash, \
     otp_expiry_time, status, created_at, updated_at";

/// User struct representing a row in the `users` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Lowercased email address
    pub email: String,
    pub about: Option<String>,
    pub avatar: Option<String>,
    /// bcrypt hash
    pub password_hash: Option<String>,
    pub password_changed_at: Option<DateTime<Utc>>,
    /// SHA-256 digest of the outstanding reset token
    pub password_reset_token: Option<String>,
    pub password_reset_expires: Option<DateTime<Utc>>,
    pub verified: bool,
    /// bcrypt hash of the outstanding OTP
    pub otp_hash: Option<String>,
    pub otp_expiry_time: Option<DateTime<Utc>>,
    #[sqlx(try_from = "String")]
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether an OTP is outstanding and not yet expired at `now`
    pub fn has_live_otp(&self, now: DateTime<Utc>) -> bool {
        self.otp_hash.is_some() && self.otp_expiry_time.is_some_and(|expiry| expiry > now)
    }

    /// Whether a reset token is outstanding and not yet expired at `now`
    pub fn has_live_reset_token(&self, now: DateTime<Utc>) -> bool {
        self.password_reset_token.is_some()
            && self.password_reset_expires.is_some_and(|expiry| expiry > now)
    }
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            about: user.about.clone(),
            avatar: user.avatar.clone(),
            verified: user.verified,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Fields accepted when creating or refreshing an unverified account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Profile fields that a user may change about themselves
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub about: Option<String>,
    pub avatar: Option<String>,
}

/// Create a new, unverified user
pub async fn create_user(pool: &SqlitePool, new_user: NewUser) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let query = format!(
        "INSERT INTO users (id, first_name, last_name, email, password_hash, verified, status, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, 0, $6, $7, $7) \
         RETURNING {USER_COLUMNS}"
    );

    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(UserStatus::Offline.as_str())
        .bind(now)
        .fetch_one(pool)
        .await
}

/// Refresh the name and password of a user who registered but never verified
pub async fn update_unverified_user(
    pool: &SqlitePool,
    id: Uuid,
    new_user: NewUser,
) -> Result<User, sqlx::Error> {
    let query = format!(
        "UPDATE users SET first_name = $1, last_name = $2, password_hash = $3, updated_at = $4 \
         WHERE id = $5 AND verified = 0 \
         RETURNING {USER_COLUMNS}"
    );

    sqlx::query_as::<_, User>(&query)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.password_hash)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Get user by email
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    sqlx::query_as::<_, User>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Get user by ID
pub async fn get_user_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Get the user holding a reset token digest
pub async fn get_user_by_reset_token(
    pool: &SqlitePool,
    digest: &str,
) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE password_reset_token = $1");
    sqlx::query_as::<_, User>(&query)
        .bind(digest)
        .fetch_optional(pool)
        .await
}

/// Store a hashed OTP and its expiry
pub async fn set_otp(
    pool: &SqlitePool,
    id: Uuid,
    otp_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET otp_hash = $1, otp_expiry_time = $2, updated_at = $3 WHERE id = $4")
        .bind(otp_hash)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Mark the user verified and consume the OTP
///
/// Only succeeds while `otp_hash` is still the stored OTP, so of two
/// concurrent verifications with the same code exactly one returns `true`.
pub async fn mark_verified(
    pool: &SqlitePool,
    id: Uuid,
    otp_hash: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET verified = 1, otp_hash = NULL, otp_expiry_time = NULL, updated_at = $1 \
         WHERE id = $2 AND verified = 0 AND otp_hash = $3",
    )
    .bind(Utc::now())
    .bind(id)
    .bind(otp_hash)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Store or clear the reset token digest
pub async fn set_password_reset(
    pool: &SqlitePool,
    id: Uuid,
    digest: Option<&str>,
    expires_at: Option<DateTime<Utc>>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET password_reset_token = $1, password_reset_expires = $2, updated_at = $3 \
         WHERE id = $4",
    )
    .bind(digest)
    .bind(expires_at)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Replace the password by redeeming a reset token
///
/// The write only happens while `reset_digest` is stored and unexpired at
/// `changed_at`; it clears the token in the same statement. Returns `false`
/// when the token was already redeemed or has expired.
pub async fn redeem_reset_token(
    pool: &SqlitePool,
    id: Uuid,
    reset_digest: &str,
    password_hash: &str,
    changed_at: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET password_hash = $1, password_changed_at = $2, \
         password_reset_token = NULL, password_reset_expires = NULL, updated_at = $2 \
         WHERE id = $3 AND password_reset_token = $4 AND password_reset_expires > $2",
    )
    .bind(password_hash)
    .bind(changed_at)
    .bind(id)
    .bind(reset_digest)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Apply profile changes; `None` fields are left as they are
pub async fn update_profile(
    pool: &SqlitePool,
    id: Uuid,
    changes: ProfileChanges,
) -> Result<User, sqlx::Error> {
    let query = format!(
        "UPDATE users SET \
         first_name = COALESCE($1, first_name), \
         last_name = COALESCE($2, last_name), \
         about = COALESCE($3, about), \
         avatar = COALESCE($4, avatar), \
         updated_at = $5 \
         WHERE id = $6 \
         RETURNING {USER_COLUMNS}"
    );

    sqlx::query_as::<_, User>(&query)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .bind(changes.about)
        .bind(changes.avatar)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Set the presence status
pub async fn set_status(pool: &SqlitePool, id: Uuid, status: UserStatus) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET status = $1 WHERE id = $2")
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::PasswordResetCode;

pub async fn create(
    pool: &PgPool,
    email: &str,
    code_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<PasswordResetCode, sqlx::Error> {
    sqlx::query_as::<_, PasswordResetCode>(
        "INSERT INTO password_reset_codes (email, code_hash, expires_at)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(email)
    .bind(code_hash)
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

pub async fn find_valid_by_hash(
    pool: &PgPool,
    code_hash: &str,
) -> Result<Option<PasswordResetCode>, sqlx::Error> {
    sqlx::query_as::<_, PasswordResetCode>(
        "SELECT * FROM password_reset_codes
         WHERE code_hash = $1 AND expires_at > now()",
    )
    .bind(code_hash)
    .fetch_optional(pool)
    .await
}

/// Delete-and-return the code in one statement, checking the email it was
/// issued for. Of two concurrent resets racing on the same code, exactly one
/// gets the row back.
pub async fn consume(
    pool: &PgPool,
    code_hash: &str,
    email: &str,
) -> Result<Option<PasswordResetCode>, sqlx::Error> {
    sqlx::query_as::<_, PasswordResetCode>(
        "DELETE FROM password_reset_codes
         WHERE code_hash = $1 AND email = $2 AND expires_at > now()
         RETURNING *",
    )
    .bind(code_hash)
    .bind(email)
    .fetch_optional(pool)
    .await
}

//! Sensitive-access session persistence repository
//!
//! Sessions are inserted once at creation and never updated apart from the
//! one-shot revocation timestamp; they persist indefinitely as part of the
//! audit trail.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::access::session::SensitiveAccessSession;

type SessionRow = (
    Uuid,
    Uuid,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

fn row_to_session(row: SessionRow) -> SensitiveAccessSession {
    let (token, user_id, level, justification, created_at, expires_at, revoked_at) = row;
    SensitiveAccessSession {
        token,
        user_id,
        // Unknown level text falls back to basic, which never elevates
        level: level.parse().unwrap_or_default(),
        justification,
        created_at,
        expires_at,
        revoked_at,
    }
}

const SESSION_COLUMNS: &str =
    "token, user_id, level, justification, created_at, expires_at, revoked_at";

pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, session: &SensitiveAccessSession) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO sensitive_access_sessions
                (token, user_id, level, justification, created_at, expires_at, revoked_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(session.token)
        .bind(session.user_id)
        .bind(session.level.as_str())
        .bind(&session.justification)
        .bind(session.created_at)
        .bind(session.expires_at)
        .bind(session.revoked_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find(&self, token: Uuid) -> Result<Option<SensitiveAccessSession>, sqlx::Error> {
        let row = sqlx::query_as::<_, SessionRow>(&format!(
            "SELECT {} FROM sensitive_access_sessions WHERE token = $1",
            SESSION_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_session))
    }

    /// Set `revoked_at` only if still unset, then return the stored row.
    pub async fn revoke(
        &self,
        token: Uuid,
        revoked_at: DateTime<Utc>,
    ) -> Result<Option<SensitiveAccessSession>, sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE sensitive_access_sessions
            SET revoked_at = $2
            WHERE token = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(token)
        .bind(revoked_at)
        .execute(&self.pool)
        .await?;

        self.find(token).await
    }
}

//! Audit log persistence repository
//!
//! Append-only inserts plus the newest-first paginated query used by the
//! audit dashboard. Optional filters use the `($n IS NULL OR ...)` pattern
//! so one statement covers every filter combination.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AuditFilter, AuditLogEntry, Page};

type AuditRow = (
    Uuid,
    Uuid,
    String,
    Uuid,
    String,
    String,
    String,
    DateTime<Utc>,
);

fn row_to_entry(row: AuditRow) -> AuditLogEntry {
    let (id, user_id, table_name, record_id, field_accessed, access_reason, origin, created_at) =
        row;
    AuditLogEntry {
        id,
        user_id,
        table_name,
        record_id,
        field_accessed,
        access_reason,
        origin,
        created_at,
    }
}

const AUDIT_COLUMNS: &str =
    "id, user_id, table_name, record_id, field_accessed, access_reason, origin, created_at";

const FILTER_CLAUSE: &str = r#"
    ($1::uuid IS NULL OR user_id = $1)
    AND ($2::text IS NULL OR field_accessed = $2)
    AND ($3::timestamptz IS NULL OR created_at >= $3)
    AND ($4::timestamptz IS NULL OR created_at <= $4)
"#;

pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn append(&self, entry: &AuditLogEntry) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO sensitive_data_audit
                (id, user_id, table_name, record_id, field_accessed, access_reason, origin, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.table_name)
        .bind(entry.record_id)
        .bind(&entry.field_accessed)
        .bind(&entry.access_reason)
        .bind(&entry.origin)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn query(
        &self,
        filter: &AuditFilter,
        page: u32,
        page_size: u32,
    ) -> Result<Page<AuditLogEntry>, sqlx::Error> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM sensitive_data_audit WHERE {}",
            FILTER_CLAUSE
        ))
        .bind(filter.user_id)
        .bind(filter.field_accessed.as_deref())
        .bind(filter.from)
        .bind(filter.to)
        .fetch_one(&self.pool)
        .await?;

        let offset = (page.saturating_sub(1) as i64) * page_size as i64;
        let rows = sqlx::query_as::<_, AuditRow>(&format!(
            r#"
            SELECT {}
            FROM sensitive_data_audit
            WHERE {}
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#,
            AUDIT_COLUMNS, FILTER_CLAUSE
        ))
        .bind(filter.user_id)
        .bind(filter.field_accessed.as_deref())
        .bind(filter.from)
        .bind(filter.to)
        .bind(page_size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            items: rows.into_iter().map(row_to_entry).collect(),
            total: total.max(0) as u64,
            page,
            page_size,
        })
    }

    pub async fn list_all(&self) -> Result<Vec<AuditLogEntry>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AuditRow>(&format!(
            "SELECT {} FROM sensitive_data_audit ORDER BY created_at ASC",
            AUDIT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_entry).collect())
    }

    pub async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sensitive_data_audit WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

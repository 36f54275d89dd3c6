//! Driver record persistence repository
//!
//! The basic listing is a distinct query that selects only non-sensitive
//! columns, so PII never leaves the database for unprivileged contexts.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{BasicDriverInfo, DriverRecord};

type DriverRow = (
    Uuid,
    String,
    String,
    String,
    Option<NaiveDate>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    bool,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn row_to_driver(row: DriverRow) -> DriverRecord {
    let (
        id,
        full_name,
        national_id,
        license_number,
        license_expiry,
        phone,
        email,
        address,
        avatar_url,
        is_active,
        created_at,
        updated_at,
    ) = row;
    DriverRecord {
        id,
        full_name,
        national_id,
        license_number,
        license_expiry,
        phone,
        email,
        address,
        avatar_url,
        is_active,
        created_at,
        updated_at,
    }
}

const DRIVER_COLUMNS: &str = "id, full_name, national_id, license_number, license_expiry, \
     phone, email, address, avatar_url, is_active, created_at, updated_at";

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, driver_id: Uuid) -> Result<Option<DriverRecord>, sqlx::Error> {
        let row = sqlx::query_as::<_, DriverRow>(&format!(
            "SELECT {} FROM drivers WHERE id = $1",
            DRIVER_COLUMNS
        ))
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_driver))
    }

    /// Non-sensitive listing; sensitive columns are never selected here.
    pub async fn list_basic(&self) -> Result<Vec<BasicDriverInfo>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (Uuid, String, Option<String>, bool)>(
            r#"
            SELECT id, full_name, avatar_url, is_active
            FROM drivers
            ORDER BY full_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, avatar_url, is_active)| BasicDriverInfo {
                id,
                name,
                avatar_url,
                is_active,
            })
            .collect())
    }

    pub async fn list(&self) -> Result<Vec<DriverRecord>, sqlx::Error> {
        let rows = sqlx::query_as::<_, DriverRow>(&format!(
            "SELECT {} FROM drivers ORDER BY created_at ASC",
            DRIVER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_driver).collect())
    }

    /// Insert or overwrite by id; returns true when the row was new.
    pub async fn upsert(&self, driver: &DriverRecord) -> Result<bool, sqlx::Error> {
        let row = sqlx::query_as::<_, (bool,)>(
            r#"
            INSERT INTO drivers
                (id, full_name, national_id, license_number, license_expiry,
                 phone, email, address, avatar_url, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                national_id = EXCLUDED.national_id,
                license_number = EXCLUDED.license_number,
                license_expiry = EXCLUDED.license_expiry,
                phone = EXCLUDED.phone,
                email = EXCLUDED.email,
                address = EXCLUDED.address,
                avatar_url = EXCLUDED.avatar_url,
                is_active = EXCLUDED.is_active,
                updated_at = EXCLUDED.updated_at
            RETURNING (xmax = 0)
            "#,
        )
        .bind(driver.id)
        .bind(&driver.full_name)
        .bind(&driver.national_id)
        .bind(&driver.license_number)
        .bind(driver.license_expiry)
        .bind(&driver.phone)
        .bind(&driver.email)
        .bind(&driver.address)
        .bind(&driver.avatar_url)
        .bind(driver.is_active)
        .bind(driver.created_at)
        .bind(driver.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }
}

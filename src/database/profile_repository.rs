//! Profile persistence repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::access::level::Role;
use crate::models::Profile;

type ProfileRow = (
    Uuid,
    Uuid,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn row_to_profile(row: ProfileRow) -> Profile {
    let (id, user_id, email, display_name, role, created_at, updated_at) = row;
    Profile {
        id,
        user_id,
        email,
        display_name,
        // Unknown role text falls back to the least privileged tier
        role: role.parse().unwrap_or_default(),
        created_at,
        updated_at,
    }
}

const PROFILE_COLUMNS: &str = "id, user_id, email, display_name, role, created_at, updated_at";

pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM profiles WHERE user_id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_profile))
    }

    pub async fn find(&self, profile_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_profile))
    }

    /// Insert unless a profile already exists for the user id, then return
    /// whatever is stored. `ON CONFLICT DO NOTHING` + re-select keeps two
    /// concurrent first sign-ins from creating two profiles.
    pub async fn insert_if_absent(&self, profile: &Profile) -> Result<Profile, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, user_id, email, display_name, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&profile.email)
        .bind(&profile.display_name)
        .bind(profile.role.as_str())
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        let stored = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM profiles WHERE user_id = $1",
            PROFILE_COLUMNS
        ))
        .bind(profile.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_profile(stored))
    }

    pub async fn update_role(
        &self,
        profile_id: Uuid,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            UPDATE profiles
            SET role = $2, updated_at = $3
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(profile_id)
        .bind(role.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_profile))
    }

    pub async fn delete(&self, profile_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(profile_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list(&self) -> Result<Vec<Profile>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM profiles ORDER BY created_at ASC",
            PROFILE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_profile).collect())
    }
}

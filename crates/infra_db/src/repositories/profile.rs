//! Profile repository implementation

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::UserId;
use domain_expense::{ProfileUpdate, UserProfile};

use crate::error::DatabaseError;

/// A row of the `users` table
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub invoice_payment_day: Option<i32>,
    pub invoice_closing_day: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        UserProfile {
            id: UserId::from(row.id),
            email: row.email,
            full_name: row.full_name,
            avatar_url: row.avatar_url,
            invoice_payment_day: row.invoice_payment_day,
            invoice_closing_day: row.invoice_closing_day,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for the `users` table
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Option<ProfileRow>, DatabaseError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, email, full_name, avatar_url, invoice_payment_day,
                    invoice_closing_day, updated_at
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Inserts the profile or overwrites its editable fields
    ///
    /// Invoice days the update leaves out keep their stored value.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        email: &str,
        update: &ProfileUpdate,
    ) -> Result<ProfileRow, DatabaseError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "INSERT INTO users (
                id, email, full_name, avatar_url, invoice_payment_day, invoice_closing_day
             ) VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                full_name = EXCLUDED.full_name,
                avatar_url = EXCLUDED.avatar_url,
                invoice_payment_day = CASE WHEN $7 THEN users.invoice_payment_day
                                           ELSE EXCLUDED.invoice_payment_day END,
                invoice_closing_day = CASE WHEN $8 THEN users.invoice_closing_day
                                           ELSE EXCLUDED.invoice_closing_day END,
                updated_at = now()
             RETURNING id, email, full_name, avatar_url, invoice_payment_day,
                       invoice_closing_day, updated_at",
        )
        .bind(user_id)
        .bind(email)
        .bind(update.full_name.trim())
        .bind(update.avatar_url())
        .bind(update.invoice_payment_day.value())
        .bind(update.invoice_closing_day.value())
        .bind(update.invoice_payment_day.is_keep())
        .bind(update.invoice_closing_day.is_keep())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

//! Profile DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_expense::UserProfile;

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub invoice_payment_day: Option<i32>,
    pub invoice_closing_day: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.into(),
            email: profile.email,
            full_name: profile.full_name,
            avatar_url: profile.avatar_url,
            invoice_payment_day: profile.invoice_payment_day,
            invoice_closing_day: profile.invoice_closing_day,
            updated_at: profile.updated_at,
        }
    }
}

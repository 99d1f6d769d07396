//! User profiles
//!
//! The profile row belongs to the auth provider's user and carries the
//! credit card statement days used by the installment core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::{Validate, ValidationError};

use core_kernel::UserId;
use domain_billing::{BillingError, InvoiceSettings};

/// A user's profile as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub invoice_payment_day: Option<i32>,
    pub invoice_closing_day: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(id: UserId, email: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            full_name: full_name.into(),
            avatar_url: None,
            invoice_payment_day: None,
            invoice_closing_day: None,
            updated_at: Utc::now(),
        }
    }

    /// Statement days for the installment core
    ///
    /// Stored values outside 1..=31 are an error rather than being clamped.
    pub fn invoice_settings(&self) -> Result<InvoiceSettings, BillingError> {
        InvoiceSettings::from_profile(
            self.invoice_payment_day.map(i64::from),
            self.invoice_closing_day.map(i64::from),
        )
    }

    /// Applies an already validated update
    ///
    /// Invoice days left out of the update keep their stored value.
    pub fn apply(&mut self, update: &ProfileUpdate, now: DateTime<Utc>) {
        self.full_name = update.full_name.trim().to_string();
        self.avatar_url = update.avatar_url().map(str::to_string);
        update.invoice_payment_day.apply_to(&mut self.invoice_payment_day);
        update.invoice_closing_day.apply_to(&mut self.invoice_closing_day);
        self.updated_at = now;
    }
}

/// One optional setting in a partial update
///
/// On the wire a missing key is `Keep`, `null` is `Clear` and a value is
/// `Set`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettingUpdate<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T: Copy> SettingUpdate<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, SettingUpdate::Keep)
    }

    /// The value to write, `None` for both `Keep` and `Clear`
    pub fn value(&self) -> Option<T> {
        match self {
            SettingUpdate::Set(value) => Some(*value),
            SettingUpdate::Keep | SettingUpdate::Clear => None,
        }
    }

    pub fn apply_to(&self, stored: &mut Option<T>) {
        match self {
            SettingUpdate::Keep => {}
            SettingUpdate::Clear => *stored = None,
            SettingUpdate::Set(value) => *stored = Some(*value),
        }
    }
}

impl<T> From<Option<T>> for SettingUpdate<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => SettingUpdate::Set(value),
            None => SettingUpdate::Clear,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for SettingUpdate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(SettingUpdate::from)
    }
}

impl<T: Serialize> Serialize for SettingUpdate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SettingUpdate::Set(value) => serializer.serialize_some(value),
            SettingUpdate::Keep | SettingUpdate::Clear => serializer.serialize_none(),
        }
    }
}

fn valid_day(day: &SettingUpdate<i32>) -> Result<(), ValidationError> {
    match day.value() {
        Some(day) if !(1..=31).contains(&day) => Err(ValidationError::new("range")
            .with_message("day must be between 1 and 31".into())),
        _ => Ok(()),
    }
}

/// Profile form data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 3, max = 100, message = "full name must have 3 to 100 characters"))]
    pub full_name: String,
    /// An empty string clears the avatar
    #[validate(url(message = "invalid URL"))]
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[validate(custom(function = "valid_day"))]
    #[serde(default, skip_serializing_if = "SettingUpdate::is_keep")]
    pub invoice_payment_day: SettingUpdate<i32>,
    #[validate(custom(function = "valid_day"))]
    #[serde(default, skip_serializing_if = "SettingUpdate::is_keep")]
    pub invoice_closing_day: SettingUpdate<i32>,
}

impl ProfileUpdate {
    /// A name-only update that leaves the invoice days untouched
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            ..Default::default()
        }
    }

    pub fn with_payment_day(mut self, day: i32) -> Self {
        self.invoice_payment_day = SettingUpdate::Set(day);
        self
    }

    pub fn with_closing_day(mut self, day: i32) -> Self {
        self.invoice_closing_day = SettingUpdate::Set(day);
        self
    }

    /// Drops an empty avatar URL so it clears the field instead of failing
    /// URL validation
    pub fn normalized(mut self) -> Self {
        if self.avatar_url.as_deref().map(str::trim) == Some("") {
            self.avatar_url = None;
        }
        self
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

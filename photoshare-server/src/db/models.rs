//! Typed rows for the photos and users tables
//!
//! Column names are camelCase and quoted in SQL; serde output matches them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Id of the single conventional user row.
pub const DEFAULT_USER_ID: &str = "current-user";

/// Photo record (table `photos`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub filename: String,
    pub original_name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: String,
    pub created_at: String,
    pub qr_code_data: Option<String>,
    pub is_public: Option<i32>,
}

impl Photo {
    /// Missing visibility means the column default: public.
    pub fn is_visible(&self) -> bool {
        self.is_public.unwrap_or(1) != 0
    }
}

/// User profile record (table `users`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub profession: Option<String>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub crypto_signature: Option<String>,
    pub updated_at: Option<String>,
}

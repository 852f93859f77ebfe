//! User Entity
//!
//! Buyers are identified by email (natural key, used as the document id).
//! A user record is created on first booking and overwritten field-by-field
//! on later bookings; inventory operations never delete one.

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Buyer contact details as submitted with a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub full_name: String,
    pub email: String,
    pub city: String,
    pub state: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Email, the natural key.
    #[serde(rename = "_id")]
    pub email: String,

    pub full_name: String,
    pub city: String,
    pub state: String,
    pub phone_number: String,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display form used in ticket listings: `Full Name (email)`.
    pub fn display(&self) -> String {
        format!("{} ({})", self.full_name, self.email)
    }
}

impl From<UserInfo> for User {
    fn from(info: UserInfo) -> Self {
        let now = Utc::now();
        Self {
            email: info.email,
            full_name: info.full_name,
            city: info.city,
            state: info.state,
            phone_number: info.phone_number,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_name_then_email() {
        let user = User::from(UserInfo {
            full_name: "Ana Torres".to_string(),
            email: "ana@example.com".to_string(),
            city: "Hermosillo".to_string(),
            state: "Sonora".to_string(),
            phone_number: "5255123456".to_string(),
        });
        assert_eq!(user.display(), "Ana Torres (ana@example.com)");
    }
}

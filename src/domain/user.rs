use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A registered user. Pre-seeded reference data; the balance is the only
/// mutable field, decremented by every expense created on the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque store-assigned id. Blank until the first save.
    #[serde(default)]
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: &str, email: &str, full_name: &str, balance: Decimal) -> Self {
        Self {
            id: String::new(),
            username: username.to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            balance,
            created_at: Utc::now(),
        }
    }
}

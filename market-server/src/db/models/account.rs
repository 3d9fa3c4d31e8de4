//! Account Model

use serde::{Deserialize, Serialize};
use shared::models::{AccountResponse, Role};
use surrealdb::RecordId;

/// Stored account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: RecordId,
    /// Lowercased, unique
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: i64,
}

/// Create account payload (password already hashed)
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: i64,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email,
            display_name: account.display_name,
            role: account.role,
            created_at: account.created_at,
        }
    }
}

//! User Model

use serde::{Deserialize, Serialize};

/// Platform role of a user account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Vendor,
    Admin,
}

/// User account
///
/// Authentication and session issuance are handled outside this system;
/// callers arrive already identified by user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub role: Role,
    /// Epoch milliseconds
    pub created_at: i64,
}

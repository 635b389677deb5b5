//! User rows. Accounts are created by the authentication service; this crate
//! only reads them (and seeds them in tests and local development).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wishly_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}

//! Read-only user records referenced by `Mark::user_id`.
//!
//! Authentication lives outside the core; the store only resolves ids.

use super::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub username: String,
}

use serde::Serialize;

use super::UserId;

/// Account row as read for authentication and ownership checks
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    #[serde(skip)]
    pub is_active: bool,
}

//! User Entity

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_object::{UserId, role::Role};

/// User profile
///
/// Users come either from the trusted auth provider (keyed by the provider's
/// account identifier) or from basic registration (`basic-<email>`).
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub account_identifier: String,
    pub name: String,
    pub email: String,
    pub image: String,
    pub is_admin: bool,
    pub join_date: DateTime<Utc>,
}

impl User {
    /// Role minted into this user's tokens
    pub fn role(&self) -> Role {
        if self.is_admin {
            Role::Admin
        } else {
            Role::Standard
        }
    }
}

/// User to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub account_identifier: String,
    pub name: String,
    pub email: String,
    pub image: String,
    pub is_admin: bool,
    /// PHC string; only for basic registration
    pub password_hash: Option<String>,
}

impl NewUser {
    pub fn into_user(self, id: UserId, join_date: DateTime<Utc>) -> User {
        User {
            id,
            account_identifier: self.account_identifier,
            name: self.name,
            email: self.email,
            image: self.image,
            is_admin: self.is_admin,
            join_date,
        }
    }
}

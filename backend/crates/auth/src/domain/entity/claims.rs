//! Token Claims
//!
//! The identity attached to every authenticated request.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::{UserId, role::Role};

/// Claims carried in a session token
///
/// Immutable once issued; there is no server-side revocation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject; nil for machine callers
    pub id: UserId,
    pub role: Role,
    /// Expiry in unix seconds; absent for long-lived tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

impl Claims {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role, exp: None }
    }

    /// Identity of a worker from the execution fleet
    pub fn worker() -> Self {
        Self::new(UserId::nil(), Role::Worker)
    }

    /// Identity attached when authentication is switched off
    pub fn development() -> Self {
        Self::new(UserId::nil(), Role::Admin)
    }

    pub fn has_role(&self, required: Role) -> bool {
        self.role.at_least(required)
    }

    /// The caller may act on resources owned by `owner`
    ///
    /// Owners always may; otherwise `elevated` or higher is required.
    pub fn can_access(&self, owner: &UserId, elevated: Role) -> bool {
        (!self.id.is_nil() && &self.id == owner) || self.has_role(elevated)
    }

    /// Resolve the user a request acts for
    ///
    /// A nil or matching `requested` id means the caller. Acting for someone
    /// else is reserved to admins; `None` means the request must be refused.
    pub fn acting_user(&self, requested: Option<UserId>) -> Option<UserId> {
        match requested {
            None => Some(self.id),
            Some(requested) if requested.is_nil() || requested == self.id => Some(self.id),
            Some(requested) if self.role.is_admin() => Some(requested),
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let id = UserId::new();
        let claims = Claims::new(id, Role::Worker);
        let json = serde_json::to_value(claims).unwrap();
        assert_eq!(json, serde_json::json!({ "id": id.to_string(), "role": 1 }));

        let parsed: Claims =
            serde_json::from_value(serde_json::json!({ "id": id.to_string(), "role": 0, "exp": 5 }))
                .unwrap();
        assert_eq!(parsed.role, Role::Standard);
        assert_eq!(parsed.exp, Some(5));
    }

    #[test]
    fn test_acting_user() {
        let me = UserId::new();
        let other = UserId::new();

        let standard = Claims::new(me, Role::Standard);
        assert_eq!(standard.acting_user(None), Some(me));
        assert_eq!(standard.acting_user(Some(UserId::nil())), Some(me));
        assert_eq!(standard.acting_user(Some(me)), Some(me));
        assert_eq!(standard.acting_user(Some(other)), None);

        let admin = Claims::new(me, Role::Admin);
        assert_eq!(admin.acting_user(Some(other)), Some(other));
    }

    #[test]
    fn test_can_access() {
        let owner = UserId::new();
        assert!(Claims::new(owner, Role::Standard).can_access(&owner, Role::Worker));
        assert!(!Claims::new(UserId::new(), Role::Standard).can_access(&owner, Role::Worker));
        assert!(Claims::worker().can_access(&owner, Role::Worker));
        assert!(!Claims::worker().can_access(&owner, Role::Admin));
        // a nil subject never owns anything
        assert!(!Claims::new(UserId::nil(), Role::Standard).can_access(&UserId::nil(), Role::Admin));
    }
}

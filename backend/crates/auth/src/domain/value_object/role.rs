use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Caller role carried in session tokens
///
/// Declaration order is the privilege order: `Standard < Worker < Admin`.
/// The derived `Ord` relies on it, so new roles must be inserted at the
/// position matching their privilege. On the wire a role is its integer id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, Serialize, Deserialize,
)]
#[serde(try_from = "i16", into = "i16")]
#[repr(i16)]
pub enum Role {
    /// Regular end user
    #[default]
    #[display("standard")]
    Standard = 0,
    /// Execution fleet; reports results back
    #[display("worker")]
    Worker = 1,
    #[display("admin")]
    Admin = 2,
}

impl Role {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Role::Standard),
            1 => Some(Role::Worker),
            2 => Some(Role::Admin),
            _ => None,
        }
    }

    /// `self` has at least the privileges of `required`
    #[inline]
    pub fn at_least(&self, required: Role) -> bool {
        *self >= required
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl TryFrom<i16> for Role {
    type Error = String;

    fn try_from(id: i16) -> Result<Self, Self::Error> {
        Role::from_id(id).ok_or_else(|| format!("invalid role id: {id}"))
    }
}

impl From<Role> for i16 {
    fn from(role: Role) -> Self {
        role.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_order() {
        assert!(Role::Standard < Role::Worker);
        assert!(Role::Worker < Role::Admin);

        assert!(Role::Worker.at_least(Role::Worker));
        assert!(Role::Admin.at_least(Role::Worker));
        assert!(!Role::Standard.at_least(Role::Worker));
        assert!(!Role::Worker.at_least(Role::Admin));
    }

    #[test]
    fn test_ids() {
        for role in [Role::Standard, Role::Worker, Role::Admin] {
            assert_eq!(Role::from_id(role.id()), Some(role));
        }
        assert_eq!(Role::from_id(3), None);
        assert_eq!(Role::from_id(-1), None);
    }

    #[test]
    fn test_wire_format_is_integer() {
        assert_eq!(serde_json::to_string(&Role::Worker).unwrap(), "1");
        assert_eq!(serde_json::from_str::<Role>("2").unwrap(), Role::Admin);
        assert!(serde_json::from_str::<Role>("7").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Role::Standard.to_string(), "standard");
        assert_eq!(Role::Worker.to_string(), "worker");
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}

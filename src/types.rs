// Permission bitmask and persisted row model

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

bitflags! {
    /// Independently grantable capabilities on a paste.
    ///
    /// Persisted as a single unsigned bitmask per (user, paste) pair.
    /// Bits read back from storage are retained even when they do not
    /// match a named flag, so the stored mask stays authoritative.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Permission: u32 {
        /// View the paste.
        const READ  = 1 << 0;
        /// Edit the paste body.
        const WRITE = 1 << 1;
        /// Change other users' permissions on the paste.
        const GRANT = 1 << 2;
    }
}

impl Permission {
    /// Every named capability.
    pub const ALL: Self = Self::READ.union(Self::WRITE).union(Self::GRANT);
}

/// One persisted permission row, keyed by (user, paste).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionRow {
    pub user_id: i64,
    pub paste_id: String,
    pub permissions: Permission,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PermissionRow {
    /// Zero-permission row for a pair with nothing persisted yet.
    pub fn new(user_id: i64, paste_id: &str) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            paste_id: paste_id.to_string(),
            permissions: Permission::empty(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_bits_are_disjoint() {
        assert!((Permission::READ & Permission::WRITE).is_empty());
        assert!((Permission::READ & Permission::GRANT).is_empty());
        assert!((Permission::WRITE & Permission::GRANT).is_empty());
        assert_eq!(
            Permission::ALL,
            Permission::READ | Permission::WRITE | Permission::GRANT
        );
    }

    #[test]
    fn test_unknown_bits_survive_round_trip() {
        let raw = Permission::READ.bits() | (1 << 9);
        let mask = Permission::from_bits_retain(raw);
        assert_eq!(mask.bits(), raw);
        assert!(mask.intersects(Permission::READ));
        assert!(!mask.difference(Permission::READ).is_empty());
    }

    #[test]
    fn test_new_row_starts_empty() {
        let row = PermissionRow::new(42, "abcdef");
        assert_eq!(row.user_id, 42);
        assert_eq!(row.paste_id, "abcdef");
        assert!(row.permissions.is_empty());
    }
}

//! User account projection consumed by access resolution.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Lifecycle, RoleCode, UserId};

/// Authenticated user as seen by the access engine.
///
/// Platform roles are an unordered set; no role is "primary".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    user_id: UserId,
    roles: BTreeSet<RoleCode>,
    lifecycle: Lifecycle,
}

impl UserAccount {
    /// Creates a user account projection.
    #[must_use]
    pub fn new(
        user_id: UserId,
        roles: impl IntoIterator<Item = RoleCode>,
        lifecycle: Lifecycle,
    ) -> Self {
        Self {
            user_id,
            roles: roles.into_iter().collect(),
            lifecycle,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the platform roles held by the user.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<RoleCode> {
        &self.roles
    }

    /// Returns whether the user holds the platform role `code`.
    #[must_use]
    pub fn has_role(&self, code: &str) -> bool {
        self.roles.iter().any(|role| role.is(code))
    }

    /// Returns whether the platform administrator bypass applies.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(RoleCode::ADMIN)
    }

    /// Returns whether the account is usable.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }
}

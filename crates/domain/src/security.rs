use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by access administration use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a company role is created.
    AccessRoleCreated,
    /// Emitted when a role is assigned to a user.
    AccessAssignmentCreated,
    /// Emitted when an assignment is soft-deleted.
    AccessAssignmentRevoked,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessRoleCreated => "access.role.created",
            Self::AccessAssignmentCreated => "access.assignment.created",
            Self::AccessAssignmentRevoked => "access.assignment.revoked",
        }
    }
}

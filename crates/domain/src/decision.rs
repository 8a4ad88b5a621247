use serde::{Deserialize, Serialize};

/// Reason attached to an access decision.
///
/// Reasons are meant for logs; callers show a generic message on deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionReason {
    /// Platform administrator bypass.
    AdminBypass,
    /// The user holds no active assignment in the company.
    NoRolesAssigned,
    /// Granted by a company-wide assignment.
    PermissionGrantedGlobal,
    /// Granted by an area- or subarea-scoped assignment.
    PermissionGrantedScoped,
    /// Granted by the caller-supplied check.
    CustomCheckGranted,
    /// No assignment grants the permission.
    PermissionDenied,
    /// The permission code is missing or revoked in the catalog.
    UnknownPermissionCode,
    /// The user account is revoked.
    UserInactive,
}

impl DecisionReason {
    /// Returns a stable wire value for this reason.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdminBypass => "ADMIN_BYPASS",
            Self::NoRolesAssigned => "NO_ROLES_ASSIGNED",
            Self::PermissionGrantedGlobal => "PERMISSION_GRANTED_GLOBAL",
            Self::PermissionGrantedScoped => "PERMISSION_GRANTED_SCOPED",
            Self::CustomCheckGranted => "CUSTOM_CHECK_GRANTED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::UnknownPermissionCode => "UNKNOWN_PERMISSION_CODE",
            Self::UserInactive => "USER_INACTIVE",
        }
    }
}

/// Outcome of one access resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    allowed: bool,
    reason: DecisionReason,
}

impl AccessDecision {
    /// Allow with the given reason.
    #[must_use]
    pub fn allow(reason: DecisionReason) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    /// Deny with the given reason.
    #[must_use]
    pub fn deny(reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }

    /// Returns whether access is allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Returns the decision reason.
    #[must_use]
    pub fn reason(&self) -> DecisionReason {
        self.reason
    }
}

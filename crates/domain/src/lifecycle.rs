use std::str::FromStr;

use folio_core::AppError;
use serde::{Deserialize, Serialize};

/// Soft-delete state carried by every scope-relevant record.
///
/// Records are never hard-deleted; revoking one hides it from resolution
/// while the row stays available for the audit trail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Visible to resolution.
    #[default]
    Active,
    /// Soft-deleted.
    Revoked,
}

impl Lifecycle {
    /// Maps a persisted `active` flag onto a lifecycle state.
    #[must_use]
    pub fn from_active_flag(active: bool) -> Self {
        if active { Self::Active } else { Self::Revoked }
    }

    /// Returns whether the record takes part in resolution.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns a stable storage value for this state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Revoked => "revoked",
        }
    }
}

impl FromStr for Lifecycle {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "revoked" => Ok(Self::Revoked),
            _ => Err(AppError::Validation(format!(
                "unknown lifecycle state '{value}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Lifecycle;

    #[test]
    fn active_flag_maps_onto_lifecycle() {
        assert_eq!(Lifecycle::from_active_flag(true), Lifecycle::Active);
        assert_eq!(Lifecycle::from_active_flag(false), Lifecycle::Revoked);
        assert!(!Lifecycle::Revoked.is_active());
    }
}

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use folio_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value).map(Self).map_err(|error| {
                    AppError::Validation(format!(concat!("invalid ", $label, " '{}': {}"), value, error))
                })
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for a user account.
    UserId,
    "user id"
);
uuid_identifier!(
    /// Unique identifier for a role.
    RoleId,
    "role id"
);
uuid_identifier!(
    /// Unique identifier for a user role assignment.
    AssignmentId,
    "assignment id"
);
uuid_identifier!(
    /// Unique identifier for an area.
    AreaId,
    "area id"
);
uuid_identifier!(
    /// Unique identifier for a subarea.
    SubareaId,
    "subarea id"
);
uuid_identifier!(
    /// Unique identifier for a folder in the document tree.
    FolderId,
    "folder id"
);

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{AreaId, FolderId};

    #[test]
    fn identifiers_parse_their_display_form() {
        let area_id = AreaId::new();
        let parsed = AreaId::from_str(area_id.to_string().as_str());
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap_or_default(), area_id);
    }

    #[test]
    fn invalid_identifier_names_its_kind() {
        let parsed = FolderId::from_str("folder-1");
        assert!(
            matches!(parsed, Err(folio_core::AppError::Validation(message)) if message.contains("folder id"))
        );
    }
}

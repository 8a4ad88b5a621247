use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use folio_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::Lifecycle;

const CODE_MAX_LENGTH: usize = 64;

/// Stable code naming a permission, e.g. `file_write_subarea`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionCode(String);

impl PermissionCode {
    /// Code guarding role and assignment administration.
    pub const USER_ROLE_MANAGE: &'static str = "user_role_manage";

    /// Creates a validated permission code.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        validate_code(value.into(), "permission code").map(Self)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for PermissionCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for PermissionCode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionCode> for String {
    fn from(value: PermissionCode) -> Self {
        value.0
    }
}

/// Validates a lower snake case catalog code.
pub(crate) fn validate_code(value: String, label: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{label} must not be empty")));
    }

    if trimmed.len() > CODE_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "{label} must not exceed {CODE_MAX_LENGTH} characters"
        )));
    }

    let is_snake_case = trimmed
        .chars()
        .all(|character| character.is_ascii_lowercase() || character.is_ascii_digit() || character == '_');
    if !is_snake_case {
        return Err(AppError::Validation(format!(
            "{label} '{trimmed}' must be lower snake case"
        )));
    }

    Ok(trimmed.to_owned())
}

/// Category a permission belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCategory {
    /// Area administration.
    Area,
    /// Subarea administration.
    Subarea,
    /// File access.
    File,
    /// User administration.
    User,
    /// Company administration.
    Company,
    /// Platform-level operations.
    System,
}

impl PermissionCategory {
    /// Returns a stable storage value for this category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::Subarea => "subarea",
            Self::File => "file",
            Self::User => "user",
            Self::Company => "company",
            Self::System => "system",
        }
    }
}

impl FromStr for PermissionCategory {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "area" => Ok(Self::Area),
            "subarea" => Ok(Self::Subarea),
            "file" => Ok(Self::File),
            "user" => Ok(Self::User),
            "company" => Ok(Self::Company),
            "system" => Ok(Self::System),
            _ => Err(AppError::Validation(format!(
                "unknown permission category '{value}'"
            ))),
        }
    }
}

/// Action a permission may allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    /// Create a resource.
    Create,
    /// Read a resource.
    Read,
    /// Update a resource.
    Update,
    /// Delete a resource.
    Delete,
    /// List resources.
    List,
    /// Download file content.
    Download,
    /// Upload file content.
    Upload,
    /// Assign roles or ownership.
    Assign,
}

impl PermissionAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::List => "list",
            Self::Download => "download",
            Self::Upload => "upload",
            Self::Assign => "assign",
        }
    }

    /// Returns all known actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionAction] = &[
            PermissionAction::Create,
            PermissionAction::Read,
            PermissionAction::Update,
            PermissionAction::Delete,
            PermissionAction::List,
            PermissionAction::Download,
            PermissionAction::Upload,
            PermissionAction::Assign,
        ];

        ALL
    }
}

impl FromStr for PermissionAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "list" => Ok(Self::List),
            "download" => Ok(Self::Download),
            "upload" => Ok(Self::Upload),
            "assign" => Ok(Self::Assign),
            _ => Err(AppError::Validation(format!(
                "unknown permission action '{value}'"
            ))),
        }
    }
}

/// Named capability with the actions it allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    code: PermissionCode,
    category: PermissionCategory,
    actions: BTreeSet<PermissionAction>,
    lifecycle: Lifecycle,
}

impl Permission {
    /// Creates a permission; at least one action is required.
    pub fn new(
        code: PermissionCode,
        category: PermissionCategory,
        actions: impl IntoIterator<Item = PermissionAction>,
        lifecycle: Lifecycle,
    ) -> AppResult<Self> {
        let actions: BTreeSet<PermissionAction> = actions.into_iter().collect();
        if actions.is_empty() {
            return Err(AppError::Validation(format!(
                "permission '{code}' must allow at least one action"
            )));
        }

        Ok(Self {
            code,
            category,
            actions,
            lifecycle,
        })
    }

    /// Returns the stable permission code.
    #[must_use]
    pub fn code(&self) -> &PermissionCode {
        &self.code
    }

    /// Returns the permission category.
    #[must_use]
    pub fn category(&self) -> PermissionCategory {
        self.category
    }

    /// Returns the actions this permission allows.
    #[must_use]
    pub fn actions(&self) -> &BTreeSet<PermissionAction> {
        &self.actions
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Returns whether the permission is visible to resolution.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    /// Returns whether this permission grants `code` for `action`.
    #[must_use]
    pub fn grants(&self, code: &PermissionCode, action: PermissionAction) -> bool {
        &self.code == code && self.actions.contains(&action)
    }

    /// Returns a copy marked as revoked.
    #[must_use]
    pub fn revoked(mut self) -> Self {
        self.lifecycle = Lifecycle::Revoked;
        self
    }
}

use folio_core::{AppError, AppResult, CompanyId};
use serde::{Deserialize, Serialize};

use crate::{
    AreaId, AssignmentId, Lifecycle, Permission, PermissionAction, PermissionCode, Role, RoleId,
    SubareaId, UserId,
};

/// Scope an assignment is narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssignmentScope {
    /// Applies to the whole company.
    Company,
    /// Applies to one area.
    Area {
        /// Assigned area.
        area_id: AreaId,
    },
    /// Applies to one subarea of an area.
    Subarea {
        /// Area owning the subarea.
        area_id: AreaId,
        /// Assigned subarea.
        subarea_id: SubareaId,
    },
}

impl AssignmentScope {
    /// Builds a scope from optional persisted columns.
    pub fn from_parts(area_id: Option<AreaId>, subarea_id: Option<SubareaId>) -> AppResult<Self> {
        match (area_id, subarea_id) {
            (None, None) => Ok(Self::Company),
            (Some(area_id), None) => Ok(Self::Area { area_id }),
            (Some(area_id), Some(subarea_id)) => Ok(Self::Subarea {
                area_id,
                subarea_id,
            }),
            (None, Some(subarea_id)) => Err(AppError::Validation(format!(
                "subarea '{subarea_id}' requires its area on the assignment"
            ))),
        }
    }

    /// Returns the area column value.
    #[must_use]
    pub fn area_id(&self) -> Option<AreaId> {
        match self {
            Self::Company => None,
            Self::Area { area_id } | Self::Subarea { area_id, .. } => Some(*area_id),
        }
    }

    /// Returns the subarea column value.
    #[must_use]
    pub fn subarea_id(&self) -> Option<SubareaId> {
        match self {
            Self::Subarea { subarea_id, .. } => Some(*subarea_id),
            _ => None,
        }
    }

    /// Returns whether the scope covers the whole company.
    #[must_use]
    pub fn is_company_wide(&self) -> bool {
        matches!(self, Self::Company)
    }
}

/// Persisted binding of a user to a role within a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRoleAssignment {
    /// Assignment identifier.
    pub assignment_id: AssignmentId,
    /// Assigned user.
    pub user_id: UserId,
    /// Assigned role.
    pub role_id: RoleId,
    /// Company the assignment lives in.
    pub company_id: CompanyId,
    /// Area/subarea narrowing.
    pub scope: AssignmentScope,
    /// Permissions granted on top of the role.
    pub additional_permissions: Vec<PermissionCode>,
    /// Permissions withheld from this assignment.
    pub denied_permissions: Vec<PermissionCode>,
    /// Lifecycle state.
    pub lifecycle: Lifecycle,
    /// Administrator who created the assignment.
    pub assigned_by: UserId,
}

impl UserRoleAssignment {
    /// Returns the tuple that must be unique among active assignments.
    #[must_use]
    pub fn uniqueness_key(&self) -> AssignmentKey {
        AssignmentKey {
            user_id: self.user_id,
            role_id: self.role_id,
            company_id: self.company_id,
            scope: self.scope,
        }
    }
}

/// Identity of an assignment slot: one user, role, company and scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssignmentKey {
    /// Assigned user.
    pub user_id: UserId,
    /// Assigned role.
    pub role_id: RoleId,
    /// Company scope.
    pub company_id: CompanyId,
    /// Area/subarea narrowing.
    pub scope: AssignmentScope,
}

/// Assignment with role and permission references resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentSnapshot {
    /// Assignment identifier.
    pub assignment_id: AssignmentId,
    /// Company the assignment lives in.
    pub company_id: CompanyId,
    /// Area/subarea narrowing.
    pub scope: AssignmentScope,
    /// Assigned role with its permissions.
    pub role: Role,
    /// Additional permissions resolved from the catalog.
    pub additional_permissions: Vec<Permission>,
    /// Denied permissions resolved from the catalog.
    pub denied_permissions: Vec<Permission>,
    /// Lifecycle state of the assignment itself.
    pub lifecycle: Lifecycle,
}

impl AssignmentSnapshot {
    /// Returns whether this assignment withholds `code`.
    #[must_use]
    pub fn denies(&self, code: &PermissionCode) -> bool {
        self.denied_permissions
            .iter()
            .any(|permission| permission.code() == code)
    }

    /// Evaluates this assignment alone for `code` and `action`.
    ///
    /// A denial only silences this assignment; other assignments of the
    /// same user are evaluated independently.
    #[must_use]
    pub fn grants(&self, code: &PermissionCode, action: PermissionAction) -> bool {
        if self.denies(code) {
            return false;
        }

        self.additional_permissions
            .iter()
            .any(|permission| permission.is_active() && permission.grants(code, action))
            || (self.role.is_active() && self.role.grants(code, action))
    }
}

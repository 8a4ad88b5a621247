use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use folio_core::{AppError, AppResult, CompanyId};
use serde::{Deserialize, Serialize};

use crate::permission::validate_code;
use crate::{Lifecycle, Permission, PermissionAction, PermissionCode, RoleId};

/// Stable code naming a role, e.g. `area_manager`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleCode(String);

impl RoleCode {
    /// Platform administrator; the only role that bypasses resolution.
    pub const ADMIN: &'static str = "admin";
    /// Company administrator, scoped to the permissions of its role.
    pub const COMPANY_ADMIN: &'static str = "company_admin";
    /// Manager responsible for an area.
    pub const AREA_MANAGER: &'static str = "area_manager";
    /// Manager responsible for a subarea.
    pub const SUBAREA_MANAGER: &'static str = "subarea_manager";
    /// User responsible for file work inside an area or subarea.
    pub const USER_RESPONSIBLE: &'static str = "user_responsible";
    /// Regular company user.
    pub const USER: &'static str = "user";

    /// Creates a validated role code.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        validate_code(value.into(), "role code").map(Self)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether this code equals `code`.
    #[must_use]
    pub fn is(&self, code: &str) -> bool {
        self.0 == code
    }
}

impl Display for RoleCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for RoleCode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleCode> for String {
    fn from(value: RoleCode) -> Self {
        value.0
    }
}

/// Named bundle of permissions, either system-wide or owned by one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    role_id: RoleId,
    code: RoleCode,
    company_id: Option<CompanyId>,
    permissions: Vec<Permission>,
    lifecycle: Lifecycle,
}

impl Role {
    /// Creates a system role visible to every company.
    #[must_use]
    pub fn system(
        role_id: RoleId,
        code: RoleCode,
        permissions: Vec<Permission>,
        lifecycle: Lifecycle,
    ) -> Self {
        Self {
            role_id,
            code,
            company_id: None,
            permissions: dedupe_permissions(permissions),
            lifecycle,
        }
    }

    /// Creates a role owned by one company.
    #[must_use]
    pub fn company(
        role_id: RoleId,
        code: RoleCode,
        company_id: CompanyId,
        permissions: Vec<Permission>,
        lifecycle: Lifecycle,
    ) -> Self {
        Self {
            role_id,
            code,
            company_id: Some(company_id),
            permissions: dedupe_permissions(permissions),
            lifecycle,
        }
    }

    /// Rebuilds a role from persisted columns.
    ///
    /// A system role must not carry a company and a company role must.
    pub fn from_parts(
        role_id: RoleId,
        code: RoleCode,
        is_system: bool,
        company_id: Option<CompanyId>,
        permissions: Vec<Permission>,
        lifecycle: Lifecycle,
    ) -> AppResult<Self> {
        match (is_system, company_id) {
            (true, None) => Ok(Self::system(role_id, code, permissions, lifecycle)),
            (false, Some(company_id)) => Ok(Self::company(
                role_id,
                code,
                company_id,
                permissions,
                lifecycle,
            )),
            (true, Some(_)) => Err(AppError::Validation(format!(
                "system role '{code}' must not belong to a company"
            ))),
            (false, None) => Err(AppError::Validation(format!(
                "company role '{code}' must belong to a company"
            ))),
        }
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Returns the role code.
    #[must_use]
    pub fn code(&self) -> &RoleCode {
        &self.code
    }

    /// Returns whether the role is system-managed.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.company_id.is_none()
    }

    /// Returns the owning company for company roles.
    #[must_use]
    pub fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    /// Returns the role's permissions in declaration order.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        self.permissions.as_slice()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Returns whether the role is visible to resolution.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    /// Returns whether the role may be used inside `company_id`.
    #[must_use]
    pub fn is_visible_to(&self, company_id: CompanyId) -> bool {
        self.company_id.is_none_or(|owner| owner == company_id)
    }

    /// Returns the role with revoked permissions removed.
    #[must_use]
    pub fn with_active_permissions(mut self) -> Self {
        self.permissions.retain(Permission::is_active);
        self
    }

    /// Returns the role stripped of every permission.
    #[must_use]
    pub fn without_permissions(mut self) -> Self {
        self.permissions.clear();
        self
    }

    /// Returns whether any active permission of the role grants `code` for `action`.
    #[must_use]
    pub fn grants(&self, code: &PermissionCode, action: PermissionAction) -> bool {
        self.permissions
            .iter()
            .any(|permission| permission.is_active() && permission.grants(code, action))
    }
}

fn dedupe_permissions(permissions: Vec<Permission>) -> Vec<Permission> {
    let mut seen = HashSet::new();
    permissions
        .into_iter()
        .filter(|permission| seen.insert(permission.code().clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use folio_core::CompanyId;

    use super::{Role, RoleCode};
    use crate::{Lifecycle, Permission, PermissionAction, PermissionCategory, PermissionCode, RoleId};

    fn permission(code: &str) -> Permission {
        Permission::new(
            PermissionCode::new(code).unwrap_or_else(|_| unreachable!()),
            PermissionCategory::Area,
            [PermissionAction::Read],
            Lifecycle::Active,
        )
        .unwrap_or_else(|_| unreachable!())
    }

    fn code(value: &str) -> RoleCode {
        RoleCode::new(value).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn company_role_without_company_is_rejected() {
        let role = Role::from_parts(
            RoleId::new(),
            code("auditor"),
            false,
            None,
            Vec::new(),
            Lifecycle::Active,
        );
        assert!(role.is_err());
    }

    #[test]
    fn system_role_with_company_is_rejected() {
        let role = Role::from_parts(
            RoleId::new(),
            code(RoleCode::ADMIN),
            true,
            Some(CompanyId::new()),
            Vec::new(),
            Lifecycle::Active,
        );
        assert!(role.is_err());
    }

    #[test]
    fn permissions_keep_order_and_drop_duplicates() {
        let role = Role::system(
            RoleId::new(),
            code(RoleCode::AREA_MANAGER),
            vec![permission("area_read"), permission("file_read"), permission("area_read")],
            Lifecycle::Active,
        );

        let codes: Vec<&str> = role
            .permissions()
            .iter()
            .map(|permission| permission.code().as_str())
            .collect();
        assert_eq!(codes, vec!["area_read", "file_read"]);
    }

    #[test]
    fn company_role_is_invisible_to_other_companies() {
        let owner = CompanyId::new();
        let role = Role::company(
            RoleId::new(),
            code("auditor"),
            owner,
            Vec::new(),
            Lifecycle::Active,
        );

        assert!(role.is_visible_to(owner));
        assert!(!role.is_visible_to(CompanyId::new()));
        assert!(!role.is_system());
    }

    #[test]
    fn revoked_permission_grants_nothing() {
        let role = Role::system(
            RoleId::new(),
            code(RoleCode::USER),
            vec![permission("area_read").revoked()],
            Lifecycle::Active,
        );
        let area_read = PermissionCode::new("area_read").unwrap_or_else(|_| unreachable!());

        assert!(!role.grants(&area_read, PermissionAction::Read));
    }
}

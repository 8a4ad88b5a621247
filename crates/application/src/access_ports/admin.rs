use async_trait::async_trait;

use folio_core::{AppResult, CompanyId};
use folio_domain::{
    AreaId, AssignmentId, AssignmentScope, PermissionCode, Role, RoleCode, RoleId, SubareaId,
    UserId, UserRoleAssignment,
};

/// Input payload for creating company roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Role code, unique among the company's roles and system roles.
    pub code: RoleCode,
    /// Permissions bundled by the role, in order.
    pub permissions: Vec<PermissionCode>,
}

/// Input payload for assigning a role to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignRoleInput {
    /// User receiving the role.
    pub user_id: UserId,
    /// Role being assigned.
    pub role_id: RoleId,
    /// Optional area narrowing.
    pub area_id: Option<AreaId>,
    /// Optional subarea narrowing.
    pub subarea_id: Option<SubareaId>,
    /// Permissions granted on top of the role.
    pub additional_permissions: Vec<PermissionCode>,
    /// Permissions withheld from this assignment.
    pub denied_permissions: Vec<PermissionCode>,
}

/// Validated assignment ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    /// User receiving the role.
    pub user_id: UserId,
    /// Role being assigned.
    pub role_id: RoleId,
    /// Company the assignment lives in.
    pub company_id: CompanyId,
    /// Validated area/subarea narrowing.
    pub scope: AssignmentScope,
    /// Permissions granted on top of the role.
    pub additional_permissions: Vec<PermissionCode>,
    /// Permissions withheld from this assignment.
    pub denied_permissions: Vec<PermissionCode>,
    /// Administrator creating the assignment.
    pub assigned_by: UserId,
}

/// Repository port for role and assignment administration.
#[async_trait]
pub trait AssignmentAdminRepository: Send + Sync {
    /// Creates a company role bundling the given permissions.
    async fn create_role(&self, company_id: CompanyId, input: CreateRoleInput) -> AppResult<Role>;

    /// Persists a new active assignment.
    ///
    /// Fails with `AppError::Conflict` when an active assignment already
    /// occupies the same user, role, company and scope.
    async fn create_assignment(&self, input: NewAssignment) -> AppResult<UserRoleAssignment>;

    /// Soft-deletes an active assignment and returns it in its revoked state.
    async fn revoke_assignment(
        &self,
        company_id: CompanyId,
        assignment_id: AssignmentId,
    ) -> AppResult<UserRoleAssignment>;

    /// Lists active assignments in a company.
    async fn list_active_assignments(
        &self,
        company_id: CompanyId,
    ) -> AppResult<Vec<UserRoleAssignment>>;
}

use std::sync::Arc;

use folio_core::{AppError, AppResult, CompanyId};
use folio_domain::{
    AssignmentId, AssignmentScope, AuditAction, PermissionAction, PermissionCode, Role,
    UserAccount, UserRoleAssignment,
};

use crate::{
    AccessRequest, AccessService, AssignRoleInput, AssignmentAdminRepository, AuditEvent,
    AuditRepository, CreateRoleInput, NewAssignment,
};

mod assignments;
mod roles;

#[cfg(test)]
mod tests;

/// Administrative use-cases for company roles and user assignments.
///
/// Every call is gated on `user_role_manage` for the acting user.
#[derive(Clone)]
pub struct AssignmentAdminService {
    access_service: AccessService,
    repository: Arc<dyn AssignmentAdminRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl AssignmentAdminService {
    /// Creates a new service from its dependencies.
    #[must_use]
    pub fn new(
        access_service: AccessService,
        repository: Arc<dyn AssignmentAdminRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            access_service,
            repository,
            audit_repository,
        }
    }

    async fn require_role_manage_permission(
        &self,
        actor: &UserAccount,
        company_id: CompanyId,
        action: PermissionAction,
        request: &AccessRequest,
    ) -> AppResult<()> {
        self.access_service
            .require_access(
                actor,
                company_id,
                PermissionCode::USER_ROLE_MANAGE,
                action,
                request,
            )
            .await
    }

    async fn ensure_known_permissions(&self, codes: &[PermissionCode]) -> AppResult<()> {
        for code in codes {
            if self
                .access_service
                .permission_catalog()
                .lookup(code.as_str())
                .await?
                .is_none()
            {
                return Err(AppError::Validation(format!(
                    "unknown permission code '{code}'"
                )));
            }
        }

        Ok(())
    }
}

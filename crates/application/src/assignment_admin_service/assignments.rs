use tracing::info;

use super::*;

impl AssignmentAdminService {
    /// Lists active assignments of a company.
    pub async fn list_assignments(
        &self,
        actor: &UserAccount,
        company_id: CompanyId,
    ) -> AppResult<Vec<UserRoleAssignment>> {
        self.require_role_manage_permission(
            actor,
            company_id,
            PermissionAction::List,
            &AccessRequest::company(),
        )
        .await?;

        self.repository.list_active_assignments(company_id).await
    }

    /// Assigns a role to a user and emits an audit event.
    ///
    /// Area managers may assign inside their own area: the permission
    /// check runs against the requested scope.
    pub async fn assign_role(
        &self,
        actor: &UserAccount,
        company_id: CompanyId,
        input: AssignRoleInput,
    ) -> AppResult<UserRoleAssignment> {
        let scope = self
            .access_service
            .build_scope(company_id, input.area_id, input.subarea_id)
            .await?;
        self.require_role_manage_permission(
            actor,
            company_id,
            PermissionAction::Assign,
            &AccessRequest::scoped(scope),
        )
        .await?;

        let role = self
            .access_service
            .role_catalog()
            .find_visible(input.role_id, company_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{}' not found", input.role_id)))?;

        self.ensure_known_permissions(&input.additional_permissions)
            .await?;
        self.ensure_known_permissions(&input.denied_permissions)
            .await?;

        let assignment = self
            .repository
            .create_assignment(NewAssignment {
                user_id: input.user_id,
                role_id: role.role_id(),
                company_id,
                scope: AssignmentScope::from_parts(scope.area_id(), scope.subarea_id())?,
                additional_permissions: input.additional_permissions,
                denied_permissions: input.denied_permissions,
                assigned_by: actor.user_id(),
            })
            .await?;

        info!(
            assignment_id = %assignment.assignment_id,
            user_id = %assignment.user_id,
            company_id = %company_id,
            role = role.code().as_str(),
            "role assigned"
        );

        self.audit_repository
            .append_event(AuditEvent {
                company_id,
                actor: actor.user_id(),
                action: AuditAction::AccessAssignmentCreated,
                resource_type: "access_assignment".to_owned(),
                resource_id: assignment.assignment_id.to_string(),
                detail: Some(format!(
                    "assigned role '{}' to '{}'",
                    role.code(),
                    assignment.user_id
                )),
            })
            .await?;

        Ok(assignment)
    }

    /// Soft-deletes an assignment and emits an audit event.
    pub async fn revoke_assignment(
        &self,
        actor: &UserAccount,
        company_id: CompanyId,
        assignment_id: AssignmentId,
    ) -> AppResult<UserRoleAssignment> {
        self.require_role_manage_permission(
            actor,
            company_id,
            PermissionAction::Assign,
            &AccessRequest::company(),
        )
        .await?;

        let assignment = self
            .repository
            .revoke_assignment(company_id, assignment_id)
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                company_id,
                actor: actor.user_id(),
                action: AuditAction::AccessAssignmentRevoked,
                resource_type: "access_assignment".to_owned(),
                resource_id: assignment_id.to_string(),
                detail: Some(format!("revoked assignment of '{}'", assignment.user_id)),
            })
            .await?;

        Ok(assignment)
    }
}

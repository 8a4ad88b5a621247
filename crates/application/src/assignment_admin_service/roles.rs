use super::*;

impl AssignmentAdminService {
    /// Creates a company role and emits an audit event.
    pub async fn create_role(
        &self,
        actor: &UserAccount,
        company_id: CompanyId,
        input: CreateRoleInput,
    ) -> AppResult<Role> {
        self.require_role_manage_permission(
            actor,
            company_id,
            PermissionAction::Create,
            &AccessRequest::company(),
        )
        .await?;
        self.ensure_known_permissions(&input.permissions).await?;

        let role = self.repository.create_role(company_id, input).await?;

        self.audit_repository
            .append_event(AuditEvent {
                company_id,
                actor: actor.user_id(),
                action: AuditAction::AccessRoleCreated,
                resource_type: "access_role".to_owned(),
                resource_id: role.role_id().to_string(),
                detail: Some(format!("created role '{}'", role.code())),
            })
            .await?;

        Ok(role)
    }
}

use folio_application::{AssignmentAdminRepository, CreateRoleInput, NewAssignment};

use super::*;

#[async_trait]
impl AssignmentAdminRepository for InMemoryAccessRepository {
    async fn create_role(&self, company_id: CompanyId, input: CreateRoleInput) -> AppResult<Role> {
        self.ensure_permissions_exist(&input.permissions).await?;

        let stored = {
            let mut roles = self.roles.write().await;
            let taken = roles.values().any(|role| {
                role.code == input.code
                    && role.company_id.is_none_or(|owner| owner == company_id)
            });
            if taken {
                return Err(AppError::Conflict(format!(
                    "role '{}' already exists for company '{company_id}'",
                    input.code
                )));
            }

            let stored = StoredRole {
                role_id: RoleId::new(),
                code: input.code,
                company_id: Some(company_id),
                permission_codes: input.permissions,
                lifecycle: Lifecycle::Active,
            };
            roles.insert(stored.role_id, stored.clone());
            stored
        };

        self.materialize_role(&stored).await
    }

    async fn create_assignment(&self, input: NewAssignment) -> AppResult<UserRoleAssignment> {
        if !self.roles.read().await.contains_key(&input.role_id) {
            return Err(AppError::NotFound(format!(
                "role '{}' was not found",
                input.role_id
            )));
        }
        self.ensure_permissions_exist(&input.additional_permissions)
            .await?;
        self.ensure_permissions_exist(&input.denied_permissions)
            .await?;

        let assignment = UserRoleAssignment {
            assignment_id: AssignmentId::new(),
            user_id: input.user_id,
            role_id: input.role_id,
            company_id: input.company_id,
            scope: input.scope,
            additional_permissions: input.additional_permissions,
            denied_permissions: input.denied_permissions,
            lifecycle: Lifecycle::Active,
            assigned_by: input.assigned_by,
        };

        let mut assignments = self.assignments.write().await;
        let key = assignment.uniqueness_key();
        let duplicate = assignments
            .values()
            .any(|existing| existing.lifecycle.is_active() && existing.uniqueness_key() == key);
        if duplicate {
            return Err(AppError::Conflict(format!(
                "user '{}' already holds role '{}' in this scope",
                assignment.user_id, assignment.role_id
            )));
        }

        assignments.insert(assignment.assignment_id, assignment.clone());
        Ok(assignment)
    }

    async fn revoke_assignment(
        &self,
        company_id: CompanyId,
        assignment_id: AssignmentId,
    ) -> AppResult<UserRoleAssignment> {
        let mut assignments = self.assignments.write().await;
        let assignment = assignments
            .get_mut(&assignment_id)
            .filter(|assignment| {
                assignment.company_id == company_id && assignment.lifecycle.is_active()
            })
            .ok_or_else(|| {
                AppError::NotFound(format!("assignment '{assignment_id}' was not found"))
            })?;

        assignment.lifecycle = Lifecycle::Revoked;
        Ok(assignment.clone())
    }

    async fn list_active_assignments(
        &self,
        company_id: CompanyId,
    ) -> AppResult<Vec<UserRoleAssignment>> {
        let mut values: Vec<UserRoleAssignment> = self
            .assignments
            .read()
            .await
            .values()
            .filter(|assignment| {
                assignment.company_id == company_id && assignment.lifecycle.is_active()
            })
            .cloned()
            .collect();
        values.sort_by_key(|assignment| {
            (
                assignment.user_id.to_string(),
                assignment.assignment_id.to_string(),
            )
        });

        Ok(values)
    }
}

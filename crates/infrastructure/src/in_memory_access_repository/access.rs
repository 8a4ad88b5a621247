use std::collections::HashSet;

use folio_application::AccessRepository;
use folio_domain::AssignmentSnapshot;

use super::*;

#[async_trait]
impl AccessRepository for InMemoryAccessRepository {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_active_assignments(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<Vec<AssignmentSnapshot>> {
        let assignments: Vec<UserRoleAssignment> = self
            .assignments
            .read()
            .await
            .values()
            .filter(|assignment| {
                assignment.user_id == user_id
                    && assignment.company_id == company_id
                    && assignment.lifecycle.is_active()
            })
            .cloned()
            .collect();

        let mut snapshots = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let stored_role = self.roles.read().await.get(&assignment.role_id).cloned();
            let Some(stored_role) = stored_role else {
                continue;
            };

            snapshots.push(AssignmentSnapshot {
                assignment_id: assignment.assignment_id,
                company_id: assignment.company_id,
                scope: assignment.scope,
                role: self.materialize_role(&stored_role).await?,
                additional_permissions: self
                    .resolve_codes(&assignment.additional_permissions)
                    .await,
                denied_permissions: self.resolve_codes(&assignment.denied_permissions).await,
                lifecycle: assignment.lifecycle,
            });
        }

        Ok(snapshots)
    }

    async fn find_permission(&self, code: &str) -> AppResult<Option<Permission>> {
        let Ok(code) = PermissionCode::new(code) else {
            return Ok(None);
        };

        Ok(self.permissions.read().await.get(&code).cloned())
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(self.permissions.read().await.values().cloned().collect())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let stored = self.roles.read().await.get(&role_id).cloned();
        match stored {
            Some(stored) => self.materialize_role(&stored).await.map(Some),
            None => Ok(None),
        }
    }

    async fn find_area(&self, area_id: AreaId) -> AppResult<Option<Area>> {
        Ok(self.areas.read().await.get(&area_id).cloned())
    }

    async fn find_subarea(&self, subarea_id: SubareaId) -> AppResult<Option<SubArea>> {
        Ok(self.subareas.read().await.get(&subarea_id).cloned())
    }

    async fn find_folder_ancestry_chain(&self, folder_id: FolderId) -> AppResult<Vec<FolderId>> {
        let folders = self.folders.read().await;
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = folders.get(&folder_id);

        while let Some(folder) = current {
            if !visited.insert(folder.folder_id) {
                break;
            }
            chain.push(folder.folder_id);
            current = folder.parent_id.and_then(|parent_id| folders.get(&parent_id));
        }

        Ok(chain)
    }
}

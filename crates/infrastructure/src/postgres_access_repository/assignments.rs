use folio_application::AccessRepository;
use folio_domain::{Area, AssignmentSnapshot, FolderId, SubArea, UserAccount};

use super::*;

impl PostgresAccessRepository {
    pub(super) async fn load_overrides(
        &self,
        assignment_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Overrides>> {
        let rows = sqlx::query_as::<_, OverrideRow>(
            r#"
            SELECT
                overrides.assignment_id,
                overrides.effect,
                permissions.code,
                permissions.category,
                permissions.actions,
                permissions.active
            FROM assignment_permission_overrides AS overrides
            INNER JOIN permissions
                ON permissions.id = overrides.permission_id
            WHERE overrides.assignment_id = ANY($1)
            ORDER BY permissions.code
            "#,
        )
        .bind(assignment_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load assignment overrides: {error}"))
        })?;

        group_overrides(rows)
    }

    async fn find_active_assignments_impl(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<Vec<AssignmentSnapshot>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT
                id AS assignment_id,
                user_id,
                role_id,
                company_id,
                area_id,
                subarea_id,
                active,
                assigned_by
            FROM user_role_assignments
            WHERE user_id = $1
                AND company_id = $2
                AND active
            ORDER BY assigned_at, id
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(company_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load assignments: {error}")))?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let role_ids: Vec<Uuid> = rows.iter().map(|row| row.role_id).collect();
        let roles: HashMap<RoleId, Role> = self
            .find_roles_impl(&role_ids)
            .await?
            .into_iter()
            .map(|role| (role.role_id(), role))
            .collect();
        let assignment_ids: Vec<Uuid> = rows.iter().map(|row| row.assignment_id).collect();
        let mut overrides = self.load_overrides(&assignment_ids).await?;

        let mut snapshots = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(role) = roles.get(&RoleId::from_uuid(row.role_id)) else {
                continue;
            };
            let Overrides { granted, denied } =
                overrides.remove(&row.assignment_id).unwrap_or_default();

            snapshots.push(AssignmentSnapshot {
                assignment_id: AssignmentId::from_uuid(row.assignment_id),
                company_id: CompanyId::from_uuid(row.company_id),
                scope: decode_scope(row.area_id, row.subarea_id)?,
                role: role.clone(),
                additional_permissions: granted,
                denied_permissions: denied,
                lifecycle: Lifecycle::from_active_flag(row.active),
            });
        }

        Ok(snapshots)
    }
}

#[async_trait]
impl AccessRepository for PostgresAccessRepository {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        self.find_user_impl(user_id).await
    }

    async fn find_active_assignments(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<Vec<AssignmentSnapshot>> {
        self.find_active_assignments_impl(user_id, company_id).await
    }

    async fn find_permission(&self, code: &str) -> AppResult<Option<Permission>> {
        self.find_permission_impl(code).await
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.list_permissions_impl().await
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        self.find_role_impl(role_id).await
    }

    async fn find_area(&self, area_id: AreaId) -> AppResult<Option<Area>> {
        self.find_area_impl(area_id).await
    }

    async fn find_subarea(&self, subarea_id: SubareaId) -> AppResult<Option<SubArea>> {
        self.find_subarea_impl(subarea_id).await
    }

    async fn find_folder_ancestry_chain(&self, folder_id: FolderId) -> AppResult<Vec<FolderId>> {
        self.find_folder_ancestry_chain_impl(folder_id).await
    }
}

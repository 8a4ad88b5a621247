use folio_domain::{Area, FolderId, SubArea, UserAccount};

use super::*;

#[derive(Debug, FromRow)]
struct UserRow {
    user_id: Uuid,
    active: bool,
    roles: Vec<String>,
}

#[derive(Debug, FromRow)]
struct AreaRow {
    area_id: Uuid,
    company_id: Uuid,
    responsible_user_id: Option<Uuid>,
    folder_id: Uuid,
    active: bool,
}

#[derive(Debug, FromRow)]
struct SubareaRow {
    subarea_id: Uuid,
    area_id: Uuid,
    company_id: Uuid,
    responsible_user_id: Option<Uuid>,
    folder_id: Uuid,
    active: bool,
}

impl PostgresAccessRepository {
    pub(super) async fn find_user_impl(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        let Some(row) = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                users.id AS user_id,
                users.active,
                COALESCE(
                    array_agg(platform_roles.role_code ORDER BY platform_roles.role_code)
                        FILTER (WHERE platform_roles.role_code IS NOT NULL),
                    '{}'
                ) AS roles
            FROM users
            LEFT JOIN user_platform_roles AS platform_roles
                ON platform_roles.user_id = users.id
            WHERE users.id = $1
            GROUP BY users.id
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user: {error}")))?
        else {
            return Ok(None);
        };

        let roles = row
            .roles
            .iter()
            .map(|code| RoleCode::new(code.as_str()))
            .collect::<AppResult<Vec<_>>>()
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to decode roles of user '{}': {error}",
                    row.user_id
                ))
            })?;

        Ok(Some(UserAccount::new(
            UserId::from_uuid(row.user_id),
            roles,
            Lifecycle::from_active_flag(row.active),
        )))
    }

    pub(super) async fn find_area_impl(&self, area_id: AreaId) -> AppResult<Option<Area>> {
        let row = sqlx::query_as::<_, AreaRow>(
            r#"
            SELECT
                id AS area_id,
                company_id,
                responsible_user_id,
                folder_id,
                active
            FROM areas
            WHERE id = $1
            "#,
        )
        .bind(area_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find area: {error}")))?;

        Ok(row.map(|row| Area {
            area_id: AreaId::from_uuid(row.area_id),
            company_id: CompanyId::from_uuid(row.company_id),
            responsible_user_id: row.responsible_user_id.map(UserId::from_uuid),
            folder_id: FolderId::from_uuid(row.folder_id),
            lifecycle: Lifecycle::from_active_flag(row.active),
        }))
    }

    pub(super) async fn find_subarea_impl(
        &self,
        subarea_id: SubareaId,
    ) -> AppResult<Option<SubArea>> {
        let row = sqlx::query_as::<_, SubareaRow>(
            r#"
            SELECT
                id AS subarea_id,
                area_id,
                company_id,
                responsible_user_id,
                folder_id,
                active
            FROM subareas
            WHERE id = $1
            "#,
        )
        .bind(subarea_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find subarea: {error}")))?;

        Ok(row.map(|row| SubArea {
            subarea_id: SubareaId::from_uuid(row.subarea_id),
            area_id: AreaId::from_uuid(row.area_id),
            company_id: CompanyId::from_uuid(row.company_id),
            responsible_user_id: row.responsible_user_id.map(UserId::from_uuid),
            folder_id: FolderId::from_uuid(row.folder_id),
            lifecycle: Lifecycle::from_active_flag(row.active),
        }))
    }

    pub(super) async fn find_folder_ancestry_chain_impl(
        &self,
        folder_id: FolderId,
    ) -> AppResult<Vec<FolderId>> {
        let rows = sqlx::query_scalar::<_, Uuid>(
            r#"
            WITH RECURSIVE ancestry (folder_id, parent_id, depth, visited) AS (
                SELECT id, parent_id, 1, ARRAY[id]
                FROM folders
                WHERE id = $1
                UNION ALL
                SELECT folders.id, folders.parent_id, ancestry.depth + 1, ancestry.visited || folders.id
                FROM folders
                INNER JOIN ancestry
                    ON folders.id = ancestry.parent_id
                WHERE NOT folders.id = ANY(ancestry.visited)
            )
            SELECT folder_id
            FROM ancestry
            ORDER BY depth
            "#,
        )
        .bind(folder_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to walk folder ancestry: {error}"))
        })?;

        Ok(rows.into_iter().map(FolderId::from_uuid).collect())
    }
}

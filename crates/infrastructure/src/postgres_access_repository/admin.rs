use std::collections::BTreeSet;

use folio_application::{AssignmentAdminRepository, CreateRoleInput, NewAssignment};
use sqlx::{Postgres, Transaction};

use super::*;

const ASSIGNMENT_COLUMNS: &str = r#"
    id AS assignment_id,
    user_id,
    role_id,
    company_id,
    area_id,
    subarea_id,
    active,
    assigned_by
"#;

async fn begin(pool: &PgPool) -> AppResult<Transaction<'static, Postgres>> {
    pool.begin()
        .await
        .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
}

async fn commit(transaction: Transaction<'static, Postgres>) -> AppResult<()> {
    transaction
        .commit()
        .await
        .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))
}

async fn insert_override(
    transaction: &mut Transaction<'static, Postgres>,
    assignment_id: Uuid,
    code: &PermissionCode,
    effect: &str,
) -> AppResult<()> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO assignment_permission_overrides (assignment_id, permission_id, effect)
        SELECT $1, permissions.id, $3
        FROM permissions
        WHERE permissions.code = $2
        "#,
    )
    .bind(assignment_id)
    .bind(code.as_str())
    .bind(effect)
    .execute(&mut **transaction)
    .await
    .map_err(|error| {
        AppError::Internal(format!("failed to persist assignment override: {error}"))
    })?;

    if inserted.rows_affected() == 0 {
        return Err(AppError::Validation(format!(
            "unknown permission code '{code}'"
        )));
    }

    Ok(())
}

impl PostgresAccessRepository {
    async fn list_assignment_rows(
        &self,
        rows: Vec<AssignmentRow>,
    ) -> AppResult<Vec<UserRoleAssignment>> {
        let assignment_ids: Vec<Uuid> = rows.iter().map(|row| row.assignment_id).collect();
        let overrides = self.load_overrides(&assignment_ids).await?;

        rows.into_iter()
            .map(|row| {
                let assignment_overrides = overrides.get(&row.assignment_id);
                assignment_from_row(row, assignment_overrides)
            })
            .collect()
    }
}

#[async_trait]
impl AssignmentAdminRepository for PostgresAccessRepository {
    async fn create_role(&self, company_id: CompanyId, input: CreateRoleInput) -> AppResult<Role> {
        let mut transaction = begin(&self.pool).await?;

        let shadows_system_role = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM roles WHERE is_system AND code = $1
            )
            "#,
        )
        .bind(input.code.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check role code: {error}")))?;
        if shadows_system_role {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists as a system role",
                input.code
            )));
        }

        let role_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO roles (code, is_system, company_id)
            VALUES ($1, false, $2)
            RETURNING id
            "#,
        )
        .bind(input.code.as_str())
        .bind(company_id.as_uuid())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            if is_violation(&error, UNIQUE_VIOLATION) {
                return AppError::Conflict(format!(
                    "role '{}' already exists for company '{company_id}'",
                    input.code
                ));
            }
            AppError::Internal(format!("failed to create role: {error}"))
        })?;

        let mut seen = BTreeSet::new();
        let unique_permissions = input
            .permissions
            .iter()
            .filter(|code| seen.insert(code.as_str()));
        for (position, code) in unique_permissions.enumerate() {
            let inserted = sqlx::query(
                r#"
                INSERT INTO role_permissions (role_id, permission_id, position)
                SELECT $1, permissions.id, $3
                FROM permissions
                WHERE permissions.code = $2
                "#,
            )
            .bind(role_id)
            .bind(code.as_str())
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to persist role permissions: {error}"))
            })?;

            if inserted.rows_affected() == 0 {
                return Err(AppError::Validation(format!(
                    "unknown permission code '{code}'"
                )));
            }
        }

        commit(transaction).await?;

        self.find_role_impl(RoleId::from_uuid(role_id))
            .await?
            .ok_or_else(|| AppError::Internal(format!("role '{role_id}' vanished after insert")))
    }

    async fn create_assignment(&self, input: NewAssignment) -> AppResult<UserRoleAssignment> {
        let mut transaction = begin(&self.pool).await?;

        let row = sqlx::query_as::<_, AssignmentRow>(&format!(
            r#"
            INSERT INTO user_role_assignments (
                user_id,
                role_id,
                company_id,
                area_id,
                subarea_id,
                assigned_by
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ASSIGNMENT_COLUMNS}
            "#
        ))
        .bind(input.user_id.as_uuid())
        .bind(input.role_id.as_uuid())
        .bind(input.company_id.as_uuid())
        .bind(input.scope.area_id().map(|area_id| area_id.as_uuid()))
        .bind(input.scope.subarea_id().map(|subarea_id| subarea_id.as_uuid()))
        .bind(input.assigned_by.as_uuid())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            if is_violation(&error, UNIQUE_VIOLATION) {
                return AppError::Conflict(format!(
                    "user '{}' already holds role '{}' in this scope",
                    input.user_id, input.role_id
                ));
            }
            if is_violation(&error, FOREIGN_KEY_VIOLATION) {
                return AppError::NotFound(format!(
                    "user '{}', role '{}' or scope of the assignment was not found",
                    input.user_id, input.role_id
                ));
            }
            AppError::Internal(format!("failed to create assignment: {error}"))
        })?;

        let granted: BTreeSet<&PermissionCode> = input.additional_permissions.iter().collect();
        let denied: BTreeSet<&PermissionCode> = input.denied_permissions.iter().collect();
        for code in &granted {
            insert_override(&mut transaction, row.assignment_id, code, "grant").await?;
        }
        for code in &denied {
            insert_override(&mut transaction, row.assignment_id, code, "deny").await?;
        }

        commit(transaction).await?;

        let mut assignment = assignment_from_row(row, None)?;
        assignment.additional_permissions = granted.into_iter().cloned().collect();
        assignment.denied_permissions = denied.into_iter().cloned().collect();
        Ok(assignment)
    }

    async fn revoke_assignment(
        &self,
        company_id: CompanyId,
        assignment_id: AssignmentId,
    ) -> AppResult<UserRoleAssignment> {
        let row = sqlx::query_as::<_, AssignmentRow>(&format!(
            r#"
            UPDATE user_role_assignments
            SET active = false, revoked_at = now()
            WHERE id = $1
                AND company_id = $2
                AND active
            RETURNING {ASSIGNMENT_COLUMNS}
            "#
        ))
        .bind(assignment_id.as_uuid())
        .bind(company_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to revoke assignment: {error}")))?
        .ok_or_else(|| AppError::NotFound(format!("assignment '{assignment_id}' was not found")))?;

        self.list_assignment_rows(vec![row])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("revoked assignment vanished".to_owned()))
    }

    async fn list_active_assignments(
        &self,
        company_id: CompanyId,
    ) -> AppResult<Vec<UserRoleAssignment>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(&format!(
            r#"
            SELECT {ASSIGNMENT_COLUMNS}
            FROM user_role_assignments
            WHERE company_id = $1
                AND active
            ORDER BY user_id, assigned_at, id
            "#
        ))
        .bind(company_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list assignments: {error}")))?;

        self.list_assignment_rows(rows).await
    }
}

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use folio_core::{AppError, AppResult, CompanyId};
use folio_domain::{
    AreaId, AssignmentId, AssignmentScope, Lifecycle, Permission, PermissionAction,
    PermissionCategory, PermissionCode, Role, RoleCode, RoleId, SubareaId, UserId,
    UserRoleAssignment,
};

mod admin;
mod assignments;
mod catalog;
mod scopes;


/// PostgreSQL-backed repository for access resolution and administration.
#[derive(Clone)]
pub struct PostgresAccessRepository {
    pool: PgPool,
}

impl PostgresAccessRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    code: String,
    category: String,
    actions: Vec<String>,
    active: bool,
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role_id: Uuid,
    role_code: String,
    is_system: bool,
    company_id: Option<Uuid>,
    role_active: bool,
    permission_code: Option<String>,
    permission_category: Option<String>,
    permission_actions: Option<Vec<String>>,
    permission_active: Option<bool>,
}

#[derive(Debug, FromRow)]
struct AssignmentRow {
    assignment_id: Uuid,
    user_id: Uuid,
    role_id: Uuid,
    company_id: Uuid,
    area_id: Option<Uuid>,
    subarea_id: Option<Uuid>,
    active: bool,
    assigned_by: Uuid,
}

#[derive(Debug, FromRow)]
struct OverrideRow {
    assignment_id: Uuid,
    effect: String,
    code: String,
    category: String,
    actions: Vec<String>,
    active: bool,
}

const ROLE_SELECT: &str = r#"
    SELECT
        roles.id AS role_id,
        roles.code AS role_code,
        roles.is_system,
        roles.company_id,
        roles.active AS role_active,
        permissions.code AS permission_code,
        permissions.category AS permission_category,
        permissions.actions AS permission_actions,
        permissions.active AS permission_active
    FROM roles
    LEFT JOIN role_permissions
        ON role_permissions.role_id = roles.id
    LEFT JOIN permissions
        ON permissions.id = role_permissions.permission_id
"#;

fn decode_permission(
    code: &str,
    category: &str,
    actions: &[String],
    active: bool,
) -> AppResult<Permission> {
    let decode_error =
        |error: AppError| AppError::Internal(format!("failed to decode permission '{code}': {error}"));

    let actions = actions
        .iter()
        .map(|action| PermissionAction::from_str(action))
        .collect::<AppResult<Vec<_>>>()
        .map_err(decode_error)?;

    Permission::new(
        PermissionCode::new(code).map_err(decode_error)?,
        PermissionCategory::from_str(category).map_err(decode_error)?,
        actions,
        Lifecycle::from_active_flag(active),
    )
    .map_err(decode_error)
}

impl TryFrom<PermissionRow> for Permission {
    type Error = AppError;

    fn try_from(row: PermissionRow) -> Result<Self, Self::Error> {
        decode_permission(&row.code, &row.category, &row.actions, row.active)
    }
}

/// Folds joined role/permission rows into roles, keeping row order.
fn aggregate_roles(rows: Vec<RoleRow>) -> AppResult<Vec<Role>> {
    let mut order = Vec::new();
    let mut grouped: HashMap<Uuid, (RoleRow, Vec<Permission>)> = HashMap::new();

    for row in rows {
        let permission = match (
            row.permission_code.as_deref(),
            row.permission_category.as_deref(),
            row.permission_actions.as_deref(),
            row.permission_active,
        ) {
            (Some(code), Some(category), Some(actions), Some(active)) => {
                Some(decode_permission(code, category, actions, active)?)
            }
            _ => None,
        };

        let entry = grouped.entry(row.role_id).or_insert_with(|| {
            order.push(row.role_id);
            (row, Vec::new())
        });
        entry.1.extend(permission);
    }

    order
        .into_iter()
        .filter_map(|role_id| grouped.remove(&role_id))
        .map(|(row, permissions)| {
            let code = RoleCode::new(row.role_code.as_str()).map_err(|error| {
                AppError::Internal(format!(
                    "failed to decode role '{}': {error}",
                    row.role_code
                ))
            })?;

            Role::from_parts(
                RoleId::from_uuid(row.role_id),
                code,
                row.is_system,
                row.company_id.map(CompanyId::from_uuid),
                permissions,
                Lifecycle::from_active_flag(row.role_active),
            )
            .map_err(|error| AppError::Internal(format!("failed to decode role: {error}")))
        })
        .collect()
}

/// Overrides of one assignment, split by effect.
#[derive(Debug, Default)]
struct Overrides {
    granted: Vec<Permission>,
    denied: Vec<Permission>,
}

fn group_overrides(rows: Vec<OverrideRow>) -> AppResult<HashMap<Uuid, Overrides>> {
    let mut grouped: HashMap<Uuid, Overrides> = HashMap::new();
    for row in rows {
        let permission = decode_permission(&row.code, &row.category, &row.actions, row.active)?;
        let overrides = grouped.entry(row.assignment_id).or_default();
        match row.effect.as_str() {
            "grant" => overrides.granted.push(permission),
            "deny" => overrides.denied.push(permission),
            other => {
                return Err(AppError::Internal(format!(
                    "unknown override effect '{other}'"
                )));
            }
        }
    }

    Ok(grouped)
}

fn assignment_from_row(
    row: AssignmentRow,
    overrides: Option<&Overrides>,
) -> AppResult<UserRoleAssignment> {
    let codes = |permissions: Option<&Vec<Permission>>| -> Vec<PermissionCode> {
        permissions
            .map(|permissions| {
                permissions
                    .iter()
                    .map(|permission| permission.code().clone())
                    .collect()
            })
            .unwrap_or_default()
    };

    Ok(UserRoleAssignment {
        assignment_id: AssignmentId::from_uuid(row.assignment_id),
        user_id: UserId::from_uuid(row.user_id),
        role_id: RoleId::from_uuid(row.role_id),
        company_id: CompanyId::from_uuid(row.company_id),
        scope: decode_scope(row.area_id, row.subarea_id)?,
        additional_permissions: codes(overrides.map(|overrides| &overrides.granted)),
        denied_permissions: codes(overrides.map(|overrides| &overrides.denied)),
        lifecycle: Lifecycle::from_active_flag(row.active),
        assigned_by: UserId::from_uuid(row.assigned_by),
    })
}

fn decode_scope(area_id: Option<Uuid>, subarea_id: Option<Uuid>) -> AppResult<AssignmentScope> {
    AssignmentScope::from_parts(
        area_id.map(AreaId::from_uuid),
        subarea_id.map(SubareaId::from_uuid),
    )
    .map_err(|error| AppError::Internal(format!("failed to decode assignment scope: {error}")))
}

fn is_violation(error: &sqlx::Error, code: &str) -> bool {
    matches!(error, sqlx::Error::Database(database_error)
        if database_error.code().as_deref() == Some(code))
}

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

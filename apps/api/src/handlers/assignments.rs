use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use folio_application::AssignRoleInput;
use folio_core::{AppError, CompanyId};
use folio_domain::{AssignmentId, PermissionCode};

use crate::actor::Actor;
use crate::dto::{AssignRoleRequest, AssignmentResponse};
use crate::error::ApiResult;
use crate::handlers::{parse_id, parse_optional_id};
use crate::state::AppState;

pub async fn list_assignments_handler(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(company_id): Path<String>,
) -> ApiResult<Json<Vec<AssignmentResponse>>> {
    let company_id: CompanyId = parse_id(&company_id)?;

    let assignments = state
        .assignment_admin_service
        .list_assignments(&actor, company_id)
        .await?
        .into_iter()
        .map(AssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(company_id): Path<String>,
    Json(payload): Json<AssignRoleRequest>,
) -> ApiResult<(StatusCode, Json<AssignmentResponse>)> {
    let company_id: CompanyId = parse_id(&company_id)?;
    let input = AssignRoleInput {
        user_id: parse_id(&payload.user_id)?,
        role_id: parse_id(&payload.role_id)?,
        area_id: parse_optional_id(payload.area_id.as_deref())?,
        subarea_id: parse_optional_id(payload.subarea_id.as_deref())?,
        additional_permissions: permission_codes(payload.additional_permissions)?,
        denied_permissions: permission_codes(payload.denied_permissions)?,
    };

    let assignment = state
        .assignment_admin_service
        .assign_role(&actor, company_id, input)
        .await?;

    Ok((StatusCode::CREATED, Json(AssignmentResponse::from(assignment))))
}

pub async fn revoke_assignment_handler(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((company_id, assignment_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let company_id: CompanyId = parse_id(&company_id)?;
    let assignment_id: AssignmentId = parse_id(&assignment_id)?;

    state
        .assignment_admin_service
        .revoke_assignment(&actor, company_id, assignment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn permission_codes(values: Vec<String>) -> Result<Vec<PermissionCode>, AppError> {
    values
        .into_iter()
        .map(|value| PermissionCode::new(value.trim()))
        .collect()
}

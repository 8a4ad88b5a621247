use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use folio_application::CreateRoleInput;
use folio_core::CompanyId;
use folio_domain::RoleCode;

use crate::actor::Actor;
use crate::dto::{CreateRoleRequest, RoleResponse};
use crate::error::ApiResult;
use crate::handlers::assignments::permission_codes;
use crate::handlers::parse_id;
use crate::state::AppState;

pub async fn create_role_handler(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(company_id): Path<String>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let company_id: CompanyId = parse_id(&company_id)?;
    let input = CreateRoleInput {
        code: RoleCode::new(payload.code.trim())?,
        permissions: permission_codes(payload.permissions)?,
    };

    let role = state
        .assignment_admin_service
        .create_role(&actor, company_id, input)
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

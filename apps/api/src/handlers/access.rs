use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use folio_application::{AccessCheck, AccessRequest, ResourceOwnerCheck};
use folio_core::{AppError, CompanyId};
use folio_domain::{AreaId, FolderId, PermissionAction, SubareaId, UserId};

use crate::dto::{
    AccessDecisionResponse, ResolveAccessRequest, ResponsibilityResponse, ScopeCheckRequest,
    ScopeCheckResponse,
};
use crate::error::ApiResult;
use crate::handlers::{parse_id, parse_optional_id};
use crate::state::AppState;

pub async fn resolve_access_handler(
    State(state): State<AppState>,
    Json(payload): Json<ResolveAccessRequest>,
) -> ApiResult<Json<AccessDecisionResponse>> {
    let user_id: UserId = parse_id(&payload.user_id)?;
    let company_id: CompanyId = parse_id(&payload.company_id)?;
    let action = PermissionAction::from_str(payload.action.trim())?;
    let area_id: Option<AreaId> = parse_optional_id(payload.area_id.as_deref())?;
    let subarea_id: Option<SubareaId> = parse_optional_id(payload.subarea_id.as_deref())?;
    let target_folder_id: Option<FolderId> =
        parse_optional_id(payload.target_folder_id.as_deref())?;
    let resource_owner_id: Option<UserId> =
        parse_optional_id(payload.resource_owner_id.as_deref())?;

    let user = state.access_service.find_user(user_id).await?;

    let scope = if area_id.is_some() || subarea_id.is_some() {
        Some(
            state
                .access_service
                .build_scope(company_id, area_id, subarea_id)
                .await?,
        )
    } else {
        None
    };
    let request = AccessRequest {
        scope,
        target_folder_id,
    };

    let owner_check = resource_owner_id.map(ResourceOwnerCheck::new);
    let decision = state
        .access_service
        .resolve_access(
            &user,
            company_id,
            payload.permission_code.trim(),
            action,
            &request,
            owner_check.as_ref().map(|check| check as &dyn AccessCheck),
        )
        .await?;

    Ok(Json(AccessDecisionResponse::from(decision)))
}

pub async fn scope_check_handler(
    State(state): State<AppState>,
    Json(payload): Json<ScopeCheckRequest>,
) -> ApiResult<Json<ScopeCheckResponse>> {
    let user_id: UserId = parse_id(&payload.user_id)?;
    let company_id: CompanyId = parse_id(&payload.company_id)?;
    let target_folder_id: Option<FolderId> =
        parse_optional_id(payload.target_folder_id.as_deref())?;
    let area_id: Option<AreaId> = parse_optional_id(payload.area_id.as_deref())?;

    let user = state.access_service.find_user(user_id).await?;
    let within_scope = match (target_folder_id, area_id) {
        (Some(folder_id), None) => {
            state
                .access_service
                .is_in_user_scope(&user, company_id, folder_id)
                .await?
        }
        (None, Some(area_id)) => {
            state
                .access_service
                .is_area_in_user_scope(&user, company_id, area_id)
                .await?
        }
        _ => {
            return Err(AppError::Validation(
                "exactly one of target_folder_id and area_id is required".to_owned(),
            )
            .into());
        }
    };

    Ok(Json(ScopeCheckResponse { within_scope }))
}

pub async fn area_responsible_handler(
    State(state): State<AppState>,
    Path((company_id, area_id, user_id)): Path<(String, String, String)>,
) -> ApiResult<Json<ResponsibilityResponse>> {
    let company_id: CompanyId = parse_id(&company_id)?;
    let area_id: AreaId = parse_id(&area_id)?;
    let user_id: UserId = parse_id(&user_id)?;

    let user = state.access_service.find_user(user_id).await?;
    let responsible = state
        .access_service
        .is_area_responsible(&user, company_id, area_id)
        .await?;

    Ok(Json(ResponsibilityResponse { responsible }))
}

pub async fn subarea_responsible_handler(
    State(state): State<AppState>,
    Path((company_id, subarea_id, user_id)): Path<(String, String, String)>,
) -> ApiResult<Json<ResponsibilityResponse>> {
    let company_id: CompanyId = parse_id(&company_id)?;
    let subarea_id: SubareaId = parse_id(&subarea_id)?;
    let user_id: UserId = parse_id(&user_id)?;

    let user = state.access_service.find_user(user_id).await?;
    let responsible = state
        .access_service
        .is_subarea_responsible(&user, company_id, subarea_id)
        .await?;

    Ok(Json(ResponsibilityResponse { responsible }))
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for one access resolution.
///
/// `area_id`/`subarea_id` take precedence over `target_folder_id` when both
/// are present.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/resolve-access-request.ts"
)]
pub struct ResolveAccessRequest {
    pub user_id: String,
    pub company_id: String,
    pub permission_code: String,
    pub action: String,
    #[serde(default)]
    pub area_id: Option<String>,
    #[serde(default)]
    pub subarea_id: Option<String>,
    #[serde(default)]
    pub target_folder_id: Option<String>,
    /// Owner of the resource, consulted when no assignment grants access.
    #[serde(default)]
    pub resource_owner_id: Option<String>,
}

/// API representation of an access decision.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-decision-response.ts"
)]
pub struct AccessDecisionResponse {
    pub allowed: bool,
    pub reason: String,
}

/// Incoming payload for scope checks.
///
/// Exactly one of `target_folder_id` and `area_id` must be present.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/scope-check-request.ts"
)]
pub struct ScopeCheckRequest {
    pub user_id: String,
    pub company_id: String,
    #[serde(default)]
    pub target_folder_id: Option<String>,
    #[serde(default)]
    pub area_id: Option<String>,
}

/// Result of a folder scope check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/scope-check-response.ts"
)]
pub struct ScopeCheckResponse {
    pub within_scope: bool,
}

/// Result of an area or subarea responsibility check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/responsibility-response.ts"
)]
pub struct ResponsibilityResponse {
    pub responsible: bool,
}

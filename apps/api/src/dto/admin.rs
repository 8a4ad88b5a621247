use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for company role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub code: String,
    pub permissions: Vec<String>,
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub code: String,
    pub company_id: Option<String>,
    pub is_system: bool,
    pub permissions: Vec<String>,
}

/// Incoming payload for role assignment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-role-request.ts"
)]
pub struct AssignRoleRequest {
    pub user_id: String,
    pub role_id: String,
    #[serde(default)]
    pub area_id: Option<String>,
    #[serde(default)]
    pub subarea_id: Option<String>,
    #[serde(default)]
    pub additional_permissions: Vec<String>,
    #[serde(default)]
    pub denied_permissions: Vec<String>,
}

/// API representation of a user role assignment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assignment-response.ts"
)]
pub struct AssignmentResponse {
    pub assignment_id: String,
    pub user_id: String,
    pub role_id: String,
    pub company_id: String,
    pub area_id: Option<String>,
    pub subarea_id: Option<String>,
    pub additional_permissions: Vec<String>,
    pub denied_permissions: Vec<String>,
    pub active: bool,
    pub assigned_by: String,
}

/// API representation of a catalog permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub code: String,
    pub category: String,
    pub actions: Vec<String>,
    pub active: bool,
}

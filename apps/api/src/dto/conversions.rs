use folio_domain::{AccessDecision, Permission, Role, UserRoleAssignment};

use super::access::AccessDecisionResponse;
use super::admin::{AssignmentResponse, PermissionResponse, RoleResponse};

impl From<AccessDecision> for AccessDecisionResponse {
    fn from(value: AccessDecision) -> Self {
        Self {
            allowed: value.is_allowed(),
            reason: value.reason().as_str().to_owned(),
        }
    }
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.role_id().to_string(),
            code: value.code().as_str().to_owned(),
            company_id: value.company_id().map(|company_id| company_id.to_string()),
            is_system: value.is_system(),
            permissions: value
                .permissions()
                .iter()
                .map(|permission| permission.code().as_str().to_owned())
                .collect(),
        }
    }
}

impl From<UserRoleAssignment> for AssignmentResponse {
    fn from(value: UserRoleAssignment) -> Self {
        Self {
            assignment_id: value.assignment_id.to_string(),
            user_id: value.user_id.to_string(),
            role_id: value.role_id.to_string(),
            company_id: value.company_id.to_string(),
            area_id: value.scope.area_id().map(|area_id| area_id.to_string()),
            subarea_id: value.scope.subarea_id().map(|subarea_id| subarea_id.to_string()),
            additional_permissions: value
                .additional_permissions
                .into_iter()
                .map(String::from)
                .collect(),
            denied_permissions: value
                .denied_permissions
                .into_iter()
                .map(String::from)
                .collect(),
            active: value.lifecycle.is_active(),
            assigned_by: value.assigned_by.to_string(),
        }
    }
}

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        Self {
            code: value.code().as_str().to_owned(),
            category: value.category().as_str().to_owned(),
            actions: value
                .actions()
                .iter()
                .map(|action| action.as_str().to_owned())
                .collect(),
            active: value.is_active(),
        }
    }
}

mod access;
mod admin;
mod conversions;
mod health;

pub use access::{
    AccessDecisionResponse, ResolveAccessRequest, ResponsibilityResponse, ScopeCheckRequest,
    ScopeCheckResponse,
};
pub use admin::{
    AssignRoleRequest, AssignmentResponse, CreateRoleRequest, PermissionResponse, RoleResponse,
};
pub use health::{HealthDependencyStatus, HealthResponse};

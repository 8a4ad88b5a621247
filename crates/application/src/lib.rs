//! Application services and ports for permission resolution.

#![forbid(unsafe_code)]

mod access_ports;
mod access_service;
mod assignment_admin_service;
mod assignment_store;
mod catalog;
mod scope_resolver;

#[cfg(test)]
mod test_support;

pub use access_ports::{
    AccessCheck, AccessRepository, AssignRoleInput, AssignmentAdminRepository, AuditEvent,
    AuditRepository, CreateRoleInput, NewAssignment, ResourceOwnerCheck,
};
pub use access_service::{AccessRequest, AccessService};
pub use assignment_admin_service::AssignmentAdminService;
pub use assignment_store::AssignmentStore;
pub use catalog::{PermissionCatalog, RoleCatalog};
pub use scope_resolver::ScopeResolver;

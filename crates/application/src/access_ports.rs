mod admin;
mod audit;
mod check;
mod repository;

pub use admin::{AssignRoleInput, AssignmentAdminRepository, CreateRoleInput, NewAssignment};
pub use audit::{AuditEvent, AuditRepository};
pub use check::{AccessCheck, ResourceOwnerCheck};
pub use repository::AccessRepository;

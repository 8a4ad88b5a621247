//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod assignment;
mod decision;
mod identifiers;
mod lifecycle;
mod permission;
mod role;
mod scope;
mod security;
mod user;

pub use assignment::{AssignmentKey, AssignmentScope, AssignmentSnapshot, UserRoleAssignment};
pub use decision::{AccessDecision, DecisionReason};
pub use identifiers::{AreaId, AssignmentId, FolderId, RoleId, SubareaId, UserId};
pub use lifecycle::Lifecycle;
pub use permission::{Permission, PermissionAction, PermissionCategory, PermissionCode};
pub use role::{Role, RoleCode};
pub use scope::{AccessScope, Area, Folder, SubArea};
pub use security::AuditAction;
pub use user::UserAccount;

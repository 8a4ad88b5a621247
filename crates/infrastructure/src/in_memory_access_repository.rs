use std::collections::HashMap;

use async_trait::async_trait;
use folio_application::{AuditEvent, AuditRepository};
use folio_core::{AppError, AppResult, CompanyId};
use folio_domain::{
    Area, AreaId, AssignmentId, Folder, FolderId, Lifecycle, Permission, PermissionCode, Role,
    RoleCode, RoleId, SubArea, SubareaId, UserAccount, UserId, UserRoleAssignment,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::system_catalog::{system_permissions, system_roles};

mod access;
mod admin;


/// Role as stored: permissions are referenced by code and resolved on read.
#[derive(Debug, Clone)]
struct StoredRole {
    role_id: RoleId,
    code: RoleCode,
    company_id: Option<CompanyId>,
    permission_codes: Vec<PermissionCode>,
    lifecycle: Lifecycle,
}

/// In-memory access repository implementation.
///
/// Used for tests and database-less runs of the API.
#[derive(Debug, Default)]
pub struct InMemoryAccessRepository {
    users: RwLock<HashMap<UserId, UserAccount>>,
    permissions: RwLock<HashMap<PermissionCode, Permission>>,
    roles: RwLock<HashMap<RoleId, StoredRole>>,
    assignments: RwLock<HashMap<AssignmentId, UserRoleAssignment>>,
    areas: RwLock<HashMap<AreaId, Area>>,
    subareas: RwLock<HashMap<SubareaId, SubArea>>,
    folders: RwLock<HashMap<FolderId, Folder>>,
    audit_events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAccessRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with the system permissions and roles.
    pub async fn with_system_catalog() -> AppResult<Self> {
        let repository = Self::new();
        let permissions = system_permissions()?;
        let roles = system_roles()?;
        debug!(
            permissions = permissions.len(),
            roles = roles.len(),
            "seeding in-memory system catalog"
        );

        for permission in permissions {
            repository.put_permission(permission).await;
        }
        for (code, permission_codes) in roles {
            repository
                .put_stored_role(StoredRole {
                    role_id: RoleId::new(),
                    code,
                    company_id: None,
                    permission_codes,
                    lifecycle: Lifecycle::Active,
                })
                .await;
        }

        Ok(repository)
    }

    /// Inserts or replaces a user.
    pub async fn put_user(&self, user: UserAccount) {
        self.users.write().await.insert(user.user_id(), user);
    }

    /// Inserts or replaces a permission.
    pub async fn put_permission(&self, permission: Permission) {
        self.permissions
            .write()
            .await
            .insert(permission.code().clone(), permission);
    }

    /// Inserts or replaces a role.
    ///
    /// Permissions missing from the catalog are added; catalog entries that
    /// already exist keep their lifecycle, so a revoked permission stays
    /// revoked.
    pub async fn put_role(&self, role: Role) {
        {
            let mut permissions = self.permissions.write().await;
            for permission in role.permissions() {
                permissions
                    .entry(permission.code().clone())
                    .or_insert_with(|| permission.clone());
            }
        }
        self.put_stored_role(StoredRole {
            role_id: role.role_id(),
            code: role.code().clone(),
            company_id: role.company_id(),
            permission_codes: role
                .permissions()
                .iter()
                .map(|permission| permission.code().clone())
                .collect(),
            lifecycle: role.lifecycle(),
        })
        .await;
    }

    /// Inserts or replaces a folder.
    pub async fn put_folder(&self, folder: Folder) {
        self.folders.write().await.insert(folder.folder_id, folder);
    }

    /// Inserts or replaces an area.
    pub async fn put_area(&self, area: Area) {
        self.areas.write().await.insert(area.area_id, area);
    }

    /// Inserts or replaces a subarea.
    pub async fn put_subarea(&self, subarea: SubArea) {
        self.subareas.write().await.insert(subarea.subarea_id, subarea);
    }

    /// Finds a role by code among system roles and the company's own roles.
    pub async fn find_role_by_code(
        &self,
        company_id: CompanyId,
        code: &str,
    ) -> AppResult<Option<Role>> {
        let stored = self
            .roles
            .read()
            .await
            .values()
            .find(|role| {
                role.code.is(code) && role.company_id.is_none_or(|owner| owner == company_id)
            })
            .cloned();

        match stored {
            Some(stored) => self.materialize_role(&stored).await.map(Some),
            None => Ok(None),
        }
    }

    /// Returns appended audit events in insertion order.
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.audit_events.read().await.clone()
    }

    async fn put_stored_role(&self, role: StoredRole) {
        self.roles.write().await.insert(role.role_id, role);
    }

    async fn materialize_role(&self, stored: &StoredRole) -> AppResult<Role> {
        let permissions = self.resolve_codes(&stored.permission_codes).await;
        Role::from_parts(
            stored.role_id,
            stored.code.clone(),
            stored.company_id.is_none(),
            stored.company_id,
            permissions,
            stored.lifecycle,
        )
    }

    async fn resolve_codes(&self, codes: &[PermissionCode]) -> Vec<Permission> {
        let permissions = self.permissions.read().await;
        codes
            .iter()
            .filter_map(|code| permissions.get(code).cloned())
            .collect()
    }

    async fn ensure_permissions_exist(&self, codes: &[PermissionCode]) -> AppResult<()> {
        let permissions = self.permissions.read().await;
        match codes.iter().find(|code| !permissions.contains_key(*code)) {
            Some(code) => Err(AppError::Validation(format!(
                "unknown permission code '{code}'"
            ))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuditRepository for InMemoryAccessRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.audit_events.write().await.push(event);
        Ok(())
    }
}

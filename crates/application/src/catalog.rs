use std::sync::Arc;

use folio_core::{AppResult, CompanyId};
use folio_domain::{Permission, Role, RoleId};

use crate::AccessRepository;

/// Lookup of active permissions by code.
#[derive(Clone)]
pub struct PermissionCatalog {
    repository: Arc<dyn AccessRepository>,
}

impl PermissionCatalog {
    /// Creates a catalog over the access repository.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessRepository>) -> Self {
        Self { repository }
    }

    /// Finds an active permission; revoked permissions are invisible.
    pub async fn lookup(&self, code: &str) -> AppResult<Option<Permission>> {
        Ok(self
            .repository
            .find_permission(code)
            .await?
            .filter(Permission::is_active))
    }

    /// Lists active permissions ordered by code.
    pub async fn list(&self) -> AppResult<Vec<Permission>> {
        let mut permissions: Vec<Permission> = self
            .repository
            .list_permissions()
            .await?
            .into_iter()
            .filter(Permission::is_active)
            .collect();
        permissions.sort_by(|left, right| left.code().cmp(right.code()));

        Ok(permissions)
    }
}

/// Lookup of roles and their effective permissions.
#[derive(Clone)]
pub struct RoleCatalog {
    repository: Arc<dyn AccessRepository>,
}

impl RoleCatalog {
    /// Creates a catalog over the access repository.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessRepository>) -> Self {
        Self { repository }
    }

    /// Returns the active permissions of a role.
    ///
    /// A revoked or missing role resolves to an empty set rather than an
    /// error, so a deactivated role silently grants nothing.
    pub async fn permissions_of(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        let Some(role) = self.repository.find_role(role_id).await? else {
            return Ok(Vec::new());
        };
        if !role.is_active() {
            return Ok(Vec::new());
        }

        Ok(role.with_active_permissions().permissions().to_vec())
    }

    /// Finds an active role usable inside `company_id`.
    pub async fn find_visible(
        &self,
        role_id: RoleId,
        company_id: CompanyId,
    ) -> AppResult<Option<Role>> {
        Ok(self
            .repository
            .find_role(role_id)
            .await?
            .filter(|role| role.is_active() && role.is_visible_to(company_id)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use folio_core::CompanyId;
    use folio_domain::{Lifecycle, PermissionAction, Role, RoleCode, RoleId};

    use crate::test_support::{FakeAccessRepository, permission, role};

    use super::{PermissionCatalog, RoleCatalog};

    #[tokio::test]
    async fn revoked_permissions_are_invisible_to_lookup_and_list() {
        let repository = Arc::new(FakeAccessRepository::default());
        repository
            .add_permission(permission("file_read", &[PermissionAction::Read]))
            .await;
        repository
            .add_permission(permission("file_delete", &[PermissionAction::Delete]).revoked())
            .await;
        let catalog = PermissionCatalog::new(repository.clone());

        assert!(matches!(catalog.lookup("file_read").await, Ok(Some(_))));
        assert!(matches!(catalog.lookup("file_delete").await, Ok(None)));

        let listed = catalog.list().await.unwrap_or_default();
        let codes: Vec<&str> = listed.iter().map(|item| item.code().as_str()).collect();
        assert_eq!(codes, vec!["file_read"]);
    }

    #[tokio::test]
    async fn permissions_of_drops_revoked_roles_and_permissions() {
        let repository = Arc::new(FakeAccessRepository::default());
        let active = role(
            RoleCode::USER,
            vec![
                permission("file_read", &[PermissionAction::Read]),
                permission("area_read", &[PermissionAction::Read]).revoked(),
            ],
        );
        let revoked = Role::system(
            RoleId::new(),
            RoleCode::new(RoleCode::AREA_MANAGER).unwrap_or_else(|_| unreachable!()),
            vec![permission("area_update", &[PermissionAction::Update])],
            Lifecycle::Revoked,
        );
        repository.add_role(active.clone()).await;
        repository.add_role(revoked.clone()).await;
        let catalog = RoleCatalog::new(repository.clone());

        let granted = catalog
            .permissions_of(active.role_id())
            .await
            .unwrap_or_default();
        assert_eq!(granted.len(), 1);
        assert_eq!(granted[0].code().as_str(), "file_read");

        let none = catalog.permissions_of(revoked.role_id()).await;
        assert!(matches!(none, Ok(permissions) if permissions.is_empty()));
        let missing = catalog.permissions_of(RoleId::new()).await;
        assert!(matches!(missing, Ok(permissions) if permissions.is_empty()));
    }

    #[tokio::test]
    async fn company_roles_are_visible_only_to_their_company() {
        let repository = Arc::new(FakeAccessRepository::default());
        let owner = CompanyId::new();
        let company_role = Role::company(
            RoleId::new(),
            RoleCode::new("auditor").unwrap_or_else(|_| unreachable!()),
            owner,
            Vec::new(),
            Lifecycle::Active,
        );
        repository.add_role(company_role.clone()).await;
        let catalog = RoleCatalog::new(repository.clone());

        let visible = catalog.find_visible(company_role.role_id(), owner).await;
        assert!(matches!(visible, Ok(Some(_))));

        let hidden = catalog
            .find_visible(company_role.role_id(), CompanyId::new())
            .await;
        assert!(matches!(hidden, Ok(None)));
    }
}

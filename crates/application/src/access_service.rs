use std::sync::Arc;

use folio_core::{AppError, AppResult, CompanyId};
use folio_domain::{AccessScope, AreaId, FolderId, SubareaId, UserAccount, UserId};

use crate::{AccessRepository, AssignmentStore, PermissionCatalog, RoleCatalog, ScopeResolver};

mod resolve;
mod responsibility;


/// Target of an access request beyond the company itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessRequest {
    /// Explicit, already validated area/subarea scope.
    pub scope: Option<AccessScope>,
    /// Folder whose ancestry decides scoped assignments when no scope is given.
    pub target_folder_id: Option<FolderId>,
}

impl AccessRequest {
    /// Request against the company as a whole.
    #[must_use]
    pub fn company() -> Self {
        Self::default()
    }

    /// Request narrowed to an explicit scope.
    #[must_use]
    pub fn scoped(scope: AccessScope) -> Self {
        Self {
            scope: Some(scope),
            target_folder_id: None,
        }
    }

    /// Request against one folder of the document tree.
    #[must_use]
    pub fn folder(folder_id: FolderId) -> Self {
        Self {
            scope: None,
            target_folder_id: Some(folder_id),
        }
    }

    /// Returns the explicit scope when it names an area or subarea.
    ///
    /// A company-wide scope narrows nothing, so the folder target decides.
    fn narrowing_scope(&self) -> Option<AccessScope> {
        self.scope
            .filter(|scope| scope.area_id().is_some() || scope.subarea_id().is_some())
    }
}

/// Application service answering permission and scope questions.
///
/// Stateless between calls: every resolution re-reads the stores.
#[derive(Clone)]
pub struct AccessService {
    repository: Arc<dyn AccessRepository>,
    permission_catalog: PermissionCatalog,
    role_catalog: RoleCatalog,
    assignment_store: AssignmentStore,
    scope_resolver: ScopeResolver,
}

impl AccessService {
    /// Creates the service and its collaborators over one repository.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessRepository>) -> Self {
        Self {
            permission_catalog: PermissionCatalog::new(repository.clone()),
            role_catalog: RoleCatalog::new(repository.clone()),
            assignment_store: AssignmentStore::new(repository.clone()),
            scope_resolver: ScopeResolver::new(repository.clone()),
            repository,
        }
    }

    /// Returns the permission catalog.
    #[must_use]
    pub fn permission_catalog(&self) -> &PermissionCatalog {
        &self.permission_catalog
    }

    /// Returns the role catalog.
    #[must_use]
    pub fn role_catalog(&self) -> &RoleCatalog {
        &self.role_catalog
    }

    /// Returns the scope resolver.
    #[must_use]
    pub fn scope_resolver(&self) -> &ScopeResolver {
        &self.scope_resolver
    }

    /// Loads the account a resolution is evaluated for.
    pub async fn find_user(&self, user_id: UserId) -> AppResult<UserAccount> {
        self.repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }

    /// Validates an area/subarea pair into a request scope.
    pub async fn build_scope(
        &self,
        company_id: CompanyId,
        area_id: Option<AreaId>,
        subarea_id: Option<SubareaId>,
    ) -> AppResult<AccessScope> {
        self.scope_resolver
            .build_scope(company_id, area_id, subarea_id)
            .await
    }
}

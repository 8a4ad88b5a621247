use async_trait::async_trait;

use folio_core::{AppResult, CompanyId};
use folio_domain::{
    Area, AreaId, AssignmentSnapshot, FolderId, Permission, Role, RoleId, SubArea, SubareaId,
    UserAccount, UserId,
};

/// Read-only repository port consumed by access resolution.
///
/// Implementations return records in every lifecycle state; lifecycle
/// filtering happens once in the catalogs and the assignment store.
#[async_trait]
pub trait AccessRepository: Send + Sync {
    /// Finds a user account projection.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>>;

    /// Lists assignments of a user in a company, each fully resolved.
    ///
    /// Revoked assignments may be omitted by the store; callers must not
    /// rely on them being present.
    async fn find_active_assignments(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<Vec<AssignmentSnapshot>>;

    /// Finds a permission by code.
    async fn find_permission(&self, code: &str) -> AppResult<Option<Permission>>;

    /// Lists every permission in the catalog.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Finds a role by identifier.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Finds an area by identifier.
    async fn find_area(&self, area_id: AreaId) -> AppResult<Option<Area>>;

    /// Finds a subarea by identifier.
    async fn find_subarea(&self, subarea_id: SubareaId) -> AppResult<Option<SubArea>>;

    /// Returns the ancestry of a folder, leaf first, ending at the root.
    ///
    /// The first entry is the folder itself. Unknown folders yield an
    /// empty chain.
    async fn find_folder_ancestry_chain(&self, folder_id: FolderId) -> AppResult<Vec<FolderId>>;
}

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use folio_core::{AppError, AppResult, CompanyId};
use folio_domain::{
    Area, AreaId, AssignmentId, AssignmentScope, AssignmentSnapshot, FolderId, Lifecycle,
    Permission, PermissionAction, PermissionCategory, PermissionCode, Role, RoleCode, RoleId,
    SubArea, SubareaId, UserAccount, UserId,
};
use tokio::sync::Mutex;

use crate::{AccessRepository, AuditEvent, AuditRepository};

pub(crate) fn permission(code: &str, actions: &[PermissionAction]) -> Permission {
    Permission::new(
        PermissionCode::new(code).unwrap_or_else(|_| unreachable!()),
        PermissionCategory::File,
        actions.iter().copied(),
        Lifecycle::Active,
    )
    .unwrap_or_else(|_| unreachable!())
}

pub(crate) fn role(code: &str, permissions: Vec<Permission>) -> Role {
    Role::system(
        RoleId::new(),
        RoleCode::new(code).unwrap_or_else(|_| unreachable!()),
        permissions,
        Lifecycle::Active,
    )
}

pub(crate) fn user(roles: &[&str]) -> UserAccount {
    UserAccount::new(
        UserId::new(),
        roles
            .iter()
            .map(|code| RoleCode::new(*code).unwrap_or_else(|_| unreachable!())),
        Lifecycle::Active,
    )
}

pub(crate) fn snapshot(
    company_id: CompanyId,
    scope: AssignmentScope,
    role: Role,
) -> AssignmentSnapshot {
    AssignmentSnapshot {
        assignment_id: AssignmentId::new(),
        company_id,
        scope,
        role,
        additional_permissions: Vec::new(),
        denied_permissions: Vec::new(),
        lifecycle: Lifecycle::Active,
    }
}

#[derive(Default)]
pub(crate) struct FakeAccessRepository {
    pub(crate) users: Mutex<HashMap<UserId, UserAccount>>,
    pub(crate) assignments: Mutex<HashMap<(UserId, CompanyId), Vec<AssignmentSnapshot>>>,
    pub(crate) permissions: Mutex<HashMap<String, Permission>>,
    pub(crate) roles: Mutex<HashMap<RoleId, Role>>,
    pub(crate) areas: Mutex<HashMap<AreaId, Area>>,
    pub(crate) subareas: Mutex<HashMap<SubareaId, SubArea>>,
    pub(crate) folder_parents: Mutex<HashMap<FolderId, Option<FolderId>>>,
    pub(crate) fail_reads: AtomicBool,
    pub(crate) ancestry_reads: AtomicUsize,
}

impl FakeAccessRepository {
    pub(crate) async fn add_permission(&self, permission: Permission) {
        self.permissions
            .lock()
            .await
            .insert(permission.code().as_str().to_owned(), permission);
    }

    pub(crate) async fn add_role(&self, role: Role) {
        for permission in role.permissions() {
            self.add_permission(permission.clone()).await;
        }
        self.roles.lock().await.insert(role.role_id(), role);
    }

    pub(crate) async fn add_user(&self, user: UserAccount) {
        self.users.lock().await.insert(user.user_id(), user);
    }

    pub(crate) async fn add_assignment(&self, user_id: UserId, snapshot: AssignmentSnapshot) {
        self.add_role(snapshot.role.clone()).await;
        for permission in &snapshot.additional_permissions {
            self.add_permission(permission.clone()).await;
        }
        self.assignments
            .lock()
            .await
            .entry((user_id, snapshot.company_id))
            .or_default()
            .push(snapshot);
    }

    pub(crate) async fn add_folder(&self, parent_id: Option<FolderId>) -> FolderId {
        let folder_id = FolderId::new();
        self.folder_parents.lock().await.insert(folder_id, parent_id);
        folder_id
    }

    pub(crate) async fn add_area(&self, company_id: CompanyId, folder_id: FolderId) -> Area {
        let area = Area {
            area_id: AreaId::new(),
            company_id,
            responsible_user_id: None,
            folder_id,
            lifecycle: Lifecycle::Active,
        };
        self.areas.lock().await.insert(area.area_id, area.clone());
        area
    }

    pub(crate) async fn add_subarea(&self, area: &Area, folder_id: FolderId) -> SubArea {
        let subarea = SubArea {
            subarea_id: SubareaId::new(),
            area_id: area.area_id,
            company_id: area.company_id,
            responsible_user_id: None,
            folder_id,
            lifecycle: Lifecycle::Active,
        };
        self.subareas
            .lock()
            .await
            .insert(subarea.subarea_id, subarea.clone());
        subarea
    }

    fn check_available(&self) -> AppResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Internal("store read timed out".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl AccessRepository for FakeAccessRepository {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        self.check_available()?;
        Ok(self.users.lock().await.get(&user_id).cloned())
    }

    async fn find_active_assignments(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<Vec<AssignmentSnapshot>> {
        self.check_available()?;
        Ok(self
            .assignments
            .lock()
            .await
            .get(&(user_id, company_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn find_permission(&self, code: &str) -> AppResult<Option<Permission>> {
        self.check_available()?;
        Ok(self.permissions.lock().await.get(code).cloned())
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.check_available()?;
        Ok(self.permissions.lock().await.values().cloned().collect())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        self.check_available()?;
        Ok(self.roles.lock().await.get(&role_id).cloned())
    }

    async fn find_area(&self, area_id: AreaId) -> AppResult<Option<Area>> {
        self.check_available()?;
        Ok(self.areas.lock().await.get(&area_id).cloned())
    }

    async fn find_subarea(&self, subarea_id: SubareaId) -> AppResult<Option<SubArea>> {
        self.check_available()?;
        Ok(self.subareas.lock().await.get(&subarea_id).cloned())
    }

    async fn find_folder_ancestry_chain(&self, folder_id: FolderId) -> AppResult<Vec<FolderId>> {
        self.check_available()?;
        self.ancestry_reads.fetch_add(1, Ordering::SeqCst);

        let parents = self.folder_parents.lock().await;
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = parents.contains_key(&folder_id).then_some(folder_id);
        while let Some(folder_id) = current {
            if !visited.insert(folder_id) {
                break;
            }
            chain.push(folder_id);
            current = parents.get(&folder_id).copied().flatten();
        }

        Ok(chain)
    }
}

#[derive(Default)]
pub(crate) struct FakeAuditRepository {
    pub(crate) events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

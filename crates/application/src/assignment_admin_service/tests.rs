use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use folio_core::{AppError, AppResult, CompanyId};
use folio_domain::{
    AreaId, AssignmentId, AssignmentScope, AuditAction, FolderId, Lifecycle, PermissionAction,
    PermissionCode, Role, RoleCode, RoleId, UserAccount, UserId, UserRoleAssignment,
};

use crate::test_support::{
    FakeAccessRepository, FakeAuditRepository, permission, role, snapshot, user,
};
use crate::{
    AccessService, AssignRoleInput, AssignmentAdminRepository, CreateRoleInput, NewAssignment,
};

use super::AssignmentAdminService;

#[derive(Default)]
struct FakeAssignmentAdminRepository {
    assignments: Mutex<Vec<UserRoleAssignment>>,
    roles: Mutex<Vec<Role>>,
}

#[async_trait]
impl AssignmentAdminRepository for FakeAssignmentAdminRepository {
    async fn create_role(&self, company_id: CompanyId, input: CreateRoleInput) -> AppResult<Role> {
        let role = Role::company(
            RoleId::new(),
            input.code,
            company_id,
            Vec::new(),
            Lifecycle::Active,
        );
        self.roles.lock().await.push(role.clone());
        Ok(role)
    }

    async fn create_assignment(&self, input: NewAssignment) -> AppResult<UserRoleAssignment> {
        let mut assignments = self.assignments.lock().await;
        let assignment = UserRoleAssignment {
            assignment_id: AssignmentId::new(),
            user_id: input.user_id,
            role_id: input.role_id,
            company_id: input.company_id,
            scope: input.scope,
            additional_permissions: input.additional_permissions,
            denied_permissions: input.denied_permissions,
            lifecycle: Lifecycle::Active,
            assigned_by: input.assigned_by,
        };
        if assignments.iter().any(|existing| {
            existing.lifecycle.is_active()
                && existing.uniqueness_key() == assignment.uniqueness_key()
        }) {
            return Err(AppError::Conflict("assignment already exists".to_owned()));
        }

        assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn revoke_assignment(
        &self,
        company_id: CompanyId,
        assignment_id: AssignmentId,
    ) -> AppResult<UserRoleAssignment> {
        let mut assignments = self.assignments.lock().await;
        let assignment = assignments
            .iter_mut()
            .find(|assignment| {
                assignment.assignment_id == assignment_id
                    && assignment.company_id == company_id
                    && assignment.lifecycle.is_active()
            })
            .ok_or_else(|| AppError::NotFound("assignment not found".to_owned()))?;
        assignment.lifecycle = Lifecycle::Revoked;
        Ok(assignment.clone())
    }

    async fn list_active_assignments(
        &self,
        company_id: CompanyId,
    ) -> AppResult<Vec<UserRoleAssignment>> {
        Ok(self
            .assignments
            .lock()
            .await
            .iter()
            .filter(|assignment| {
                assignment.company_id == company_id && assignment.lifecycle.is_active()
            })
            .cloned()
            .collect())
    }
}

struct Fixture {
    access_repository: Arc<FakeAccessRepository>,
    admin_repository: Arc<FakeAssignmentAdminRepository>,
    audit_repository: Arc<FakeAuditRepository>,
    service: AssignmentAdminService,
    company_id: CompanyId,
    assignable_role: Role,
}

fn role_manage(actions: &[PermissionAction]) -> folio_domain::Permission {
    permission(PermissionCode::USER_ROLE_MANAGE, actions)
}

async fn fixture() -> Fixture {
    let access_repository = Arc::new(FakeAccessRepository::default());
    let admin_repository = Arc::new(FakeAssignmentAdminRepository::default());
    let audit_repository = Arc::new(FakeAuditRepository::default());
    let assignable_role = role(
        RoleCode::USER_RESPONSIBLE,
        vec![permission("file_write_subarea", &[PermissionAction::Upload])],
    );
    access_repository.add_role(assignable_role.clone()).await;
    access_repository
        .add_permission(permission("file_download", &[PermissionAction::Download]))
        .await;

    let service = AssignmentAdminService::new(
        AccessService::new(access_repository.clone()),
        admin_repository.clone(),
        audit_repository.clone(),
    );

    Fixture {
        access_repository,
        admin_repository,
        audit_repository,
        service,
        company_id: CompanyId::new(),
        assignable_role,
    }
}

async fn company_admin(fixture: &Fixture) -> UserAccount {
    let actor = user(&[RoleCode::USER]);
    fixture
        .access_repository
        .add_assignment(
            actor.user_id(),
            snapshot(
                fixture.company_id,
                AssignmentScope::Company,
                role(
                    RoleCode::COMPANY_ADMIN,
                    vec![role_manage(&[
                        PermissionAction::Create,
                        PermissionAction::Assign,
                        PermissionAction::List,
                    ])],
                ),
            ),
        )
        .await;
    actor
}

fn assign_input(fixture: &Fixture, area_id: Option<AreaId>) -> AssignRoleInput {
    AssignRoleInput {
        user_id: UserId::new(),
        role_id: fixture.assignable_role.role_id(),
        area_id,
        subarea_id: None,
        additional_permissions: Vec::new(),
        denied_permissions: Vec::new(),
    }
}

#[tokio::test]
async fn company_admin_assigns_and_audits() {
    let fixture = fixture().await;
    let actor = company_admin(&fixture).await;
    let area = fixture
        .access_repository
        .add_area(fixture.company_id, FolderId::new())
        .await;

    let result = fixture
        .service
        .assign_role(&actor, fixture.company_id, assign_input(&fixture, Some(area.area_id)))
        .await;
    assert!(result.is_ok());

    let assignment = result.unwrap_or_else(|_| unreachable!());
    assert_eq!(assignment.scope, AssignmentScope::Area { area_id: area.area_id });
    assert_eq!(assignment.assigned_by, actor.user_id());

    let events = fixture.audit_repository.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::AccessAssignmentCreated);
    assert_eq!(events[0].resource_id, assignment.assignment_id.to_string());
}

#[tokio::test]
async fn duplicate_active_assignment_is_a_conflict() {
    let fixture = fixture().await;
    let actor = company_admin(&fixture).await;
    let input = assign_input(&fixture, None);

    let first = fixture
        .service
        .assign_role(&actor, fixture.company_id, input.clone())
        .await;
    assert!(first.is_ok());

    let second = fixture
        .service
        .assign_role(&actor, fixture.company_id, input)
        .await;
    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert_eq!(fixture.audit_repository.events.lock().await.len(), 1);
}

#[tokio::test]
async fn actor_without_role_manage_is_forbidden() {
    let fixture = fixture().await;
    let actor = user(&[RoleCode::USER]);
    fixture
        .access_repository
        .add_assignment(
            actor.user_id(),
            snapshot(
                fixture.company_id,
                AssignmentScope::Company,
                fixture.assignable_role.clone(),
            ),
        )
        .await;

    let result = fixture
        .service
        .assign_role(&actor, fixture.company_id, assign_input(&fixture, None))
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(fixture.admin_repository.assignments.lock().await.is_empty());
    assert!(fixture.audit_repository.events.lock().await.is_empty());
}

#[tokio::test]
async fn area_manager_assigns_only_inside_own_area() {
    let fixture = fixture().await;
    let own_area = fixture
        .access_repository
        .add_area(fixture.company_id, FolderId::new())
        .await;
    let other_area = fixture
        .access_repository
        .add_area(fixture.company_id, FolderId::new())
        .await;
    let manager = user(&[RoleCode::USER]);
    fixture
        .access_repository
        .add_assignment(
            manager.user_id(),
            snapshot(
                fixture.company_id,
                AssignmentScope::Area {
                    area_id: own_area.area_id,
                },
                role(
                    RoleCode::AREA_MANAGER,
                    vec![role_manage(&[PermissionAction::Assign])],
                ),
            ),
        )
        .await;

    let inside = fixture
        .service
        .assign_role(&manager, fixture.company_id, assign_input(&fixture, Some(own_area.area_id)))
        .await;
    assert!(inside.is_ok());

    let outside = fixture
        .service
        .assign_role(
            &manager,
            fixture.company_id,
            assign_input(&fixture, Some(other_area.area_id)),
        )
        .await;
    assert!(matches!(outside, Err(AppError::Forbidden(_))));

    let company_wide = fixture
        .service
        .assign_role(&manager, fixture.company_id, assign_input(&fixture, None))
        .await;
    assert!(matches!(company_wide, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn unknown_override_code_is_rejected() {
    let fixture = fixture().await;
    let actor = company_admin(&fixture).await;
    let mut input = assign_input(&fixture, None);
    input.denied_permissions =
        vec![PermissionCode::new("nonexistent_code").unwrap_or_else(|_| unreachable!())];

    let result = fixture
        .service
        .assign_role(&actor, fixture.company_id, input)
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn known_override_codes_are_stored() {
    let fixture = fixture().await;
    let actor = company_admin(&fixture).await;
    let download = PermissionCode::new("file_download").unwrap_or_else(|_| unreachable!());
    let mut input = assign_input(&fixture, None);
    input.additional_permissions = vec![download.clone()];

    let result = fixture
        .service
        .assign_role(&actor, fixture.company_id, input)
        .await;
    assert!(result.is_ok());
    assert_eq!(
        result
            .unwrap_or_else(|_| unreachable!())
            .additional_permissions,
        vec![download]
    );
}

#[tokio::test]
async fn role_of_another_company_is_not_found() {
    let fixture = fixture().await;
    let actor = company_admin(&fixture).await;
    let foreign_role = Role::company(
        RoleId::new(),
        RoleCode::new("auditor").unwrap_or_else(|_| unreachable!()),
        CompanyId::new(),
        Vec::new(),
        Lifecycle::Active,
    );
    fixture.access_repository.add_role(foreign_role.clone()).await;
    let mut input = assign_input(&fixture, None);
    input.role_id = foreign_role.role_id();

    let result = fixture
        .service
        .assign_role(&actor, fixture.company_id, input)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn subarea_outside_asserted_area_is_invalid() {
    let fixture = fixture().await;
    let actor = company_admin(&fixture).await;
    let area = fixture
        .access_repository
        .add_area(fixture.company_id, FolderId::new())
        .await;
    let other_area = fixture
        .access_repository
        .add_area(fixture.company_id, FolderId::new())
        .await;
    let subarea = fixture
        .access_repository
        .add_subarea(&other_area, FolderId::new())
        .await;
    let mut input = assign_input(&fixture, Some(area.area_id));
    input.subarea_id = Some(subarea.subarea_id);

    let result = fixture
        .service
        .assign_role(&actor, fixture.company_id, input)
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn revoke_soft_deletes_and_audits() {
    let fixture = fixture().await;
    let actor = company_admin(&fixture).await;
    let assignment = fixture
        .service
        .assign_role(&actor, fixture.company_id, assign_input(&fixture, None))
        .await
        .unwrap_or_else(|_| unreachable!());

    let revoked = fixture
        .service
        .revoke_assignment(&actor, fixture.company_id, assignment.assignment_id)
        .await;
    assert!(matches!(&revoked, Ok(assignment) if !assignment.lifecycle.is_active()));

    let listed = fixture
        .service
        .list_assignments(&actor, fixture.company_id)
        .await;
    assert!(matches!(listed, Ok(assignments) if assignments.is_empty()));

    let again = fixture
        .service
        .revoke_assignment(&actor, fixture.company_id, assignment.assignment_id)
        .await;
    assert!(matches!(again, Err(AppError::NotFound(_))));

    let events = fixture.audit_repository.events.lock().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].action, AuditAction::AccessAssignmentRevoked);
}

#[tokio::test]
async fn create_role_validates_permissions_and_audits() {
    let fixture = fixture().await;
    let actor = company_admin(&fixture).await;

    let unknown = fixture
        .service
        .create_role(
            &actor,
            fixture.company_id,
            CreateRoleInput {
                code: RoleCode::new("auditor").unwrap_or_else(|_| unreachable!()),
                permissions: vec![
                    PermissionCode::new("nonexistent_code").unwrap_or_else(|_| unreachable!()),
                ],
            },
        )
        .await;
    assert!(matches!(unknown, Err(AppError::Validation(_))));

    let created = fixture
        .service
        .create_role(
            &actor,
            fixture.company_id,
            CreateRoleInput {
                code: RoleCode::new("auditor").unwrap_or_else(|_| unreachable!()),
                permissions: vec![
                    PermissionCode::new("file_download").unwrap_or_else(|_| unreachable!()),
                ],
            },
        )
        .await;
    assert!(matches!(&created, Ok(role) if role.company_id() == Some(fixture.company_id)));

    let events = fixture.audit_repository.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::AccessRoleCreated);
    assert_eq!(fixture.admin_repository.roles.lock().await.len(), 1);
}

use folio_domain::{AssignmentSnapshot, RoleCode, UserAccount};

use super::*;

const AREA_RESPONSIBLE_ROLES: &[&str] = &[
    RoleCode::AREA_MANAGER,
    RoleCode::ADMIN,
    RoleCode::COMPANY_ADMIN,
];

const SUBAREA_RESPONSIBLE_ROLES: &[&str] = &[
    RoleCode::SUBAREA_MANAGER,
    RoleCode::AREA_MANAGER,
    RoleCode::ADMIN,
    RoleCode::COMPANY_ADMIN,
];

impl AccessService {
    /// Returns whether the user answers for an area.
    ///
    /// This checks role identity, not permissions: an assignment holding
    /// file-write permissions without a manager role does not qualify.
    pub async fn is_area_responsible(
        &self,
        user: &UserAccount,
        company_id: CompanyId,
        area_id: AreaId,
    ) -> AppResult<bool> {
        if user.is_admin() {
            return Ok(true);
        }
        if !user.is_active() {
            return Ok(false);
        }

        let assignments = self
            .assignment_store
            .active_assignments_for(user.user_id(), company_id)
            .await?;

        self.area_responsibility(user, company_id, area_id, &assignments)
            .await
    }

    /// Returns whether the user answers for a subarea.
    ///
    /// Without a direct subarea assignment the check escalates to the
    /// owning area.
    pub async fn is_subarea_responsible(
        &self,
        user: &UserAccount,
        company_id: CompanyId,
        subarea_id: SubareaId,
    ) -> AppResult<bool> {
        if user.is_admin() {
            return Ok(true);
        }
        if !user.is_active() {
            return Ok(false);
        }

        let Some(subarea) = self
            .scope_resolver
            .active_subarea(subarea_id, company_id)
            .await?
        else {
            return Ok(false);
        };

        if subarea.responsible_user_id == Some(user.user_id()) {
            return Ok(true);
        }

        let assignments = self
            .assignment_store
            .active_assignments_for(user.user_id(), company_id)
            .await?;

        let directly_responsible = assignments.iter().any(|assignment| {
            assignment.scope.subarea_id() == Some(subarea_id)
                && holds_any_role(assignment, SUBAREA_RESPONSIBLE_ROLES)
        });
        if directly_responsible {
            return Ok(true);
        }

        self.area_responsibility(user, company_id, subarea.area_id, &assignments)
            .await
    }

    async fn area_responsibility(
        &self,
        user: &UserAccount,
        company_id: CompanyId,
        area_id: AreaId,
        assignments: &[AssignmentSnapshot],
    ) -> AppResult<bool> {
        let Some(area) = self.scope_resolver.active_area(area_id, company_id).await? else {
            return Ok(false);
        };

        if area.responsible_user_id == Some(user.user_id()) {
            return Ok(true);
        }

        Ok(assignments.iter().any(|assignment| {
            let covers_area = assignment.scope.is_company_wide()
                || (assignment.scope.subarea_id().is_none()
                    && assignment.scope.area_id() == Some(area_id));
            covers_area && holds_any_role(assignment, AREA_RESPONSIBLE_ROLES)
        }))
    }
}

fn holds_any_role(assignment: &AssignmentSnapshot, codes: &[&str]) -> bool {
    assignment.role.is_active()
        && assignment.role.is_visible_to(assignment.company_id)
        && codes.iter().any(|code| assignment.role.code().is(code))
}

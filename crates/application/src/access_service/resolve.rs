use folio_core::AppError;
use folio_domain::{
    AccessDecision, AssignmentScope, AssignmentSnapshot, DecisionReason, FolderId,
    PermissionAction, UserAccount,
};
use tracing::{debug, warn};

use crate::AccessCheck;

use super::*;

impl AccessService {
    /// Decides whether `user` may perform `action` under `permission_code`.
    ///
    /// Evaluation short-circuits in this order: administrator bypass,
    /// missing assignments, unknown permission, company-wide assignments,
    /// area assignments, subarea assignments, then `custom_check`.
    /// Store failures are returned as errors and never become grants.
    pub async fn resolve_access(
        &self,
        user: &UserAccount,
        company_id: CompanyId,
        permission_code: &str,
        action: PermissionAction,
        request: &AccessRequest,
        custom_check: Option<&dyn AccessCheck>,
    ) -> AppResult<AccessDecision> {
        let decision = self
            .evaluate(user, company_id, permission_code, action, request, custom_check)
            .await
            .inspect_err(|error| {
                warn!(
                    user_id = %user.user_id(),
                    company_id = %company_id,
                    permission = permission_code,
                    error = %error,
                    "access resolution failed"
                );
            })?;

        debug!(
            user_id = %user.user_id(),
            company_id = %company_id,
            permission = permission_code,
            action = action.as_str(),
            allowed = decision.is_allowed(),
            reason = decision.reason().as_str(),
            "access resolved"
        );

        Ok(decision)
    }

    /// Ensures access is allowed, mapping a deny to `AppError::Forbidden`.
    ///
    /// The error message stays generic; the reason is only logged.
    pub async fn require_access(
        &self,
        user: &UserAccount,
        company_id: CompanyId,
        permission_code: &str,
        action: PermissionAction,
        request: &AccessRequest,
    ) -> AppResult<()> {
        let decision = self
            .resolve_access(user, company_id, permission_code, action, request, None)
            .await?;

        if decision.is_allowed() {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{}' is not allowed to {} with '{permission_code}'",
            user.user_id(),
            action.as_str()
        )))
    }

    /// Returns whether a folder lies inside one assignment's scope.
    pub async fn is_within_scope(
        &self,
        target_folder_id: FolderId,
        assignment: &AssignmentSnapshot,
    ) -> AppResult<bool> {
        self.scope_resolver
            .is_within_scope(target_folder_id, assignment)
            .await
    }

    /// Returns whether a folder lies inside any of the user's assignments.
    pub async fn is_in_user_scope(
        &self,
        user: &UserAccount,
        company_id: CompanyId,
        target_folder_id: FolderId,
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
        for assignment in &assignments {
            if self
                .scope_resolver
                .is_within_scope(target_folder_id, assignment)
                .await?
            {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Returns whether an area lies inside any of the user's assignments.
    ///
    /// The area is checked through its root folder, so an area assignment
    /// covers its own area and any area whose folder sits beneath it.
    /// Unknown, inactive or foreign areas are never in scope.
    pub async fn is_area_in_user_scope(
        &self,
        user: &UserAccount,
        company_id: CompanyId,
        area_id: AreaId,
    ) -> AppResult<bool> {
        if user.is_admin() {
            return Ok(true);
        }

        match self.scope_resolver.active_area(area_id, company_id).await? {
            Some(area) => self.is_in_user_scope(user, company_id, area.folder_id).await,
            None => Ok(false),
        }
    }

    async fn evaluate(
        &self,
        user: &UserAccount,
        company_id: CompanyId,
        permission_code: &str,
        action: PermissionAction,
        request: &AccessRequest,
        custom_check: Option<&dyn AccessCheck>,
    ) -> AppResult<AccessDecision> {
        if user.is_admin() {
            return Ok(AccessDecision::allow(DecisionReason::AdminBypass));
        }
        if !user.is_active() {
            return Ok(AccessDecision::deny(DecisionReason::UserInactive));
        }

        let assignments = self
            .assignment_store
            .active_assignments_for(user.user_id(), company_id)
            .await?;
        if assignments.is_empty() {
            return Ok(AccessDecision::deny(DecisionReason::NoRolesAssigned));
        }

        let Some(permission) = self.permission_catalog.lookup(permission_code).await? else {
            return Ok(AccessDecision::deny(DecisionReason::UnknownPermissionCode));
        };
        let code = permission.code();

        let granted_globally = assignments.iter().any(|assignment| {
            assignment.scope.is_company_wide() && assignment.grants(code, action)
        });
        if granted_globally {
            return Ok(AccessDecision::allow(DecisionReason::PermissionGrantedGlobal));
        }

        for assignment in assignments
            .iter()
            .filter(|assignment| matches!(assignment.scope, AssignmentScope::Area { .. }))
        {
            if assignment.grants(code, action) && self.area_tier_applies(assignment, request).await? {
                return Ok(AccessDecision::allow(DecisionReason::PermissionGrantedScoped));
            }
        }

        for assignment in assignments
            .iter()
            .filter(|assignment| matches!(assignment.scope, AssignmentScope::Subarea { .. }))
        {
            if assignment.grants(code, action)
                && self.subarea_tier_applies(assignment, request).await?
            {
                return Ok(AccessDecision::allow(DecisionReason::PermissionGrantedScoped));
            }
        }

        if let Some(check) = custom_check
            && check.allows(user, company_id).await?
        {
            return Ok(AccessDecision::allow(DecisionReason::CustomCheckGranted));
        }

        Ok(AccessDecision::deny(DecisionReason::PermissionDenied))
    }

    async fn area_tier_applies(
        &self,
        assignment: &AssignmentSnapshot,
        request: &AccessRequest,
    ) -> AppResult<bool> {
        if let Some(scope) = request.narrowing_scope() {
            return Ok(scope.area_id().is_some() && scope.area_id() == assignment.scope.area_id());
        }

        match request.target_folder_id {
            Some(folder_id) => self.scope_resolver.is_within_scope(folder_id, assignment).await,
            None => Ok(false),
        }
    }

    async fn subarea_tier_applies(
        &self,
        assignment: &AssignmentSnapshot,
        request: &AccessRequest,
    ) -> AppResult<bool> {
        if let Some(scope) = request.narrowing_scope() {
            return Ok(scope.subarea_id().is_some()
                && scope.subarea_id() == assignment.scope.subarea_id());
        }

        match request.target_folder_id {
            Some(folder_id) => self.scope_resolver.is_within_scope(folder_id, assignment).await,
            None => Ok(false),
        }
    }
}

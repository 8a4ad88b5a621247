use std::sync::Arc;

use folio_core::{AppResult, CompanyId};
use folio_domain::{AssignmentSnapshot, Permission, UserId};

use crate::AccessRepository;

/// Source of active, lifecycle-filtered assignments.
#[derive(Clone)]
pub struct AssignmentStore {
    repository: Arc<dyn AccessRepository>,
}

impl AssignmentStore {
    /// Creates a store over the access repository.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessRepository>) -> Self {
        Self { repository }
    }

    /// Returns the user's active assignments in `company_id`.
    ///
    /// Role permission sets and override sets come back without revoked
    /// permissions. A revoked role, or a company role owned by another
    /// company, keeps its assignment but contributes no permissions.
    pub async fn active_assignments_for(
        &self,
        user_id: UserId,
        company_id: CompanyId,
    ) -> AppResult<Vec<AssignmentSnapshot>> {
        let snapshots = self
            .repository
            .find_active_assignments(user_id, company_id)
            .await?;

        Ok(snapshots
            .into_iter()
            .filter(|snapshot| snapshot.lifecycle.is_active() && snapshot.company_id == company_id)
            .map(|snapshot| effective_snapshot(snapshot, company_id))
            .collect())
    }
}

fn effective_snapshot(mut snapshot: AssignmentSnapshot, company_id: CompanyId) -> AssignmentSnapshot {
    snapshot.role = if snapshot.role.is_active() && snapshot.role.is_visible_to(company_id) {
        snapshot.role.with_active_permissions()
    } else {
        snapshot.role.without_permissions()
    };
    snapshot.additional_permissions.retain(Permission::is_active);
    snapshot.denied_permissions.retain(Permission::is_active);
    snapshot
}

use std::sync::Arc;

use folio_core::{AppError, AppResult, CompanyId};
use folio_domain::{
    AccessScope, Area, AreaId, AssignmentScope, AssignmentSnapshot, FolderId, SubArea, SubareaId,
};

use crate::AccessRepository;

/// Decides whether folders fall inside an assignment's area or subarea.
#[derive(Clone)]
pub struct ScopeResolver {
    repository: Arc<dyn AccessRepository>,
}

impl ScopeResolver {
    /// Creates a resolver over the access repository.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessRepository>) -> Self {
        Self { repository }
    }

    /// Returns whether `target_folder_id` lies inside the assignment's scope.
    ///
    /// Company-wide assignments cover every folder. A subarea assignment
    /// covers only the subarea's own folder. An area assignment covers the
    /// area's root folder and everything below it, found by walking the
    /// target's ancestry towards the root.
    pub async fn is_within_scope(
        &self,
        target_folder_id: FolderId,
        assignment: &AssignmentSnapshot,
    ) -> AppResult<bool> {
        match assignment.scope {
            AssignmentScope::Company => Ok(true),
            AssignmentScope::Subarea { subarea_id, .. } => Ok(self
                .active_subarea(subarea_id, assignment.company_id)
                .await?
                .is_some_and(|subarea| subarea.folder_id == target_folder_id)),
            AssignmentScope::Area { area_id } => {
                let Some(area) = self.active_area(area_id, assignment.company_id).await? else {
                    return Ok(false);
                };

                self.is_under_folder(target_folder_id, area.folder_id).await
            }
        }
    }

    /// Validates an area/subarea pair into a request scope.
    ///
    /// Referenced records must be active and belong to `company_id`, and a
    /// subarea must sit under the asserted area. When only a subarea is
    /// given its owning area is filled in.
    pub async fn build_scope(
        &self,
        company_id: CompanyId,
        area_id: Option<AreaId>,
        subarea_id: Option<SubareaId>,
    ) -> AppResult<AccessScope> {
        match (area_id, subarea_id) {
            (None, None) => Ok(AccessScope::company()),
            (Some(area_id), None) => {
                self.active_area(area_id, company_id)
                    .await?
                    .ok_or_else(|| area_not_found(area_id, company_id))?;

                Ok(AccessScope::area(area_id))
            }
            (asserted_area_id, Some(subarea_id)) => {
                let subarea = self
                    .active_subarea(subarea_id, company_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!(
                            "subarea '{subarea_id}' was not found in company '{company_id}'"
                        ))
                    })?;

                if let Some(asserted_area_id) = asserted_area_id
                    && asserted_area_id != subarea.area_id
                {
                    return Err(AppError::Validation(format!(
                        "subarea '{subarea_id}' does not belong to area '{asserted_area_id}'"
                    )));
                }

                self.active_area(subarea.area_id, company_id)
                    .await?
                    .ok_or_else(|| area_not_found(subarea.area_id, company_id))?;

                Ok(AccessScope::subarea(subarea.area_id, subarea_id))
            }
        }
    }

    pub(crate) async fn active_area(
        &self,
        area_id: AreaId,
        company_id: CompanyId,
    ) -> AppResult<Option<Area>> {
        Ok(self
            .repository
            .find_area(area_id)
            .await?
            .filter(|area| area.lifecycle.is_active() && area.company_id == company_id))
    }

    pub(crate) async fn active_subarea(
        &self,
        subarea_id: SubareaId,
        company_id: CompanyId,
    ) -> AppResult<Option<SubArea>> {
        Ok(self
            .repository
            .find_subarea(subarea_id)
            .await?
            .filter(|subarea| subarea.lifecycle.is_active() && subarea.company_id == company_id))
    }

    async fn is_under_folder(&self, target_folder_id: FolderId, root: FolderId) -> AppResult<bool> {
        if target_folder_id == root {
            return Ok(true);
        }

        let chain = self
            .repository
            .find_folder_ancestry_chain(target_folder_id)
            .await?;

        Ok(chain.into_iter().any(|folder_id| folder_id == root))
    }
}

fn area_not_found(area_id: AreaId, company_id: CompanyId) -> AppError {
    AppError::NotFound(format!(
        "area '{area_id}' was not found in company '{company_id}'"
    ))
}

#[cfg(test)]
mod tests;

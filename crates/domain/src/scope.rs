use folio_core::CompanyId;
use serde::{Deserialize, Serialize};

use crate::{AreaId, FolderId, Lifecycle, SubareaId, UserId};

/// Top-level scope inside a company, rooted at one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// Area identifier.
    pub area_id: AreaId,
    /// Owning company.
    pub company_id: CompanyId,
    /// User answering for the area, when designated.
    pub responsible_user_id: Option<UserId>,
    /// Root folder of the area.
    pub folder_id: FolderId,
    /// Lifecycle state.
    pub lifecycle: Lifecycle,
}

/// Second-level scope nested under one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubArea {
    /// Subarea identifier.
    pub subarea_id: SubareaId,
    /// Parent area.
    pub area_id: AreaId,
    /// Owning company.
    pub company_id: CompanyId,
    /// User answering for the subarea, when designated.
    pub responsible_user_id: Option<UserId>,
    /// Folder holding the subarea's documents.
    pub folder_id: FolderId,
    /// Lifecycle state.
    pub lifecycle: Lifecycle,
}

/// Node of the document folder tree.
///
/// `parent_id` is fixed at creation, so the tree stays acyclic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Folder identifier.
    pub folder_id: FolderId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Parent folder; `None` for a root.
    pub parent_id: Option<FolderId>,
}

/// Area/subarea narrowing of an access request.
///
/// Built through scope construction, which guarantees the subarea lies
/// under the area when both are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessScope {
    area_id: Option<AreaId>,
    subarea_id: Option<SubareaId>,
}

impl AccessScope {
    /// Company-wide scope.
    #[must_use]
    pub fn company() -> Self {
        Self::default()
    }

    /// Scope narrowed to one area.
    #[must_use]
    pub fn area(area_id: AreaId) -> Self {
        Self {
            area_id: Some(area_id),
            subarea_id: None,
        }
    }

    /// Scope narrowed to a subarea of an area.
    #[must_use]
    pub fn subarea(area_id: AreaId, subarea_id: SubareaId) -> Self {
        Self {
            area_id: Some(area_id),
            subarea_id: Some(subarea_id),
        }
    }

    /// Returns the area, when narrowed.
    #[must_use]
    pub fn area_id(&self) -> Option<AreaId> {
        self.area_id
    }

    /// Returns the subarea, when narrowed.
    #[must_use]
    pub fn subarea_id(&self) -> Option<SubareaId> {
        self.subarea_id
    }
}

use async_trait::async_trait;
use folio_core::{AppResult, CompanyId};
use folio_domain::{UserAccount, UserId};

/// Caller-supplied predicate consulted after every assignment failed to grant.
#[async_trait]
pub trait AccessCheck: Send + Sync {
    /// Returns whether the check grants access to `user` in `company_id`.
    async fn allows(&self, user: &UserAccount, company_id: CompanyId) -> AppResult<bool>;
}

/// Grants access to the user recorded as the resource owner, e.g. a file's uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceOwnerCheck {
    owner: UserId,
}

impl ResourceOwnerCheck {
    /// Creates a check for resources owned by `owner`.
    #[must_use]
    pub fn new(owner: UserId) -> Self {
        Self { owner }
    }
}

#[async_trait]
impl AccessCheck for ResourceOwnerCheck {
    async fn allows(&self, user: &UserAccount, _company_id: CompanyId) -> AppResult<bool> {
        Ok(user.user_id() == self.owner)
    }
}

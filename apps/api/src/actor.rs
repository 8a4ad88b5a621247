use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use folio_core::AppError;
use folio_domain::{UserAccount, UserId};

use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::state::AppState;

/// Header naming the user on whose behalf an administrative call is made.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Account of the user performing an administrative call.
///
/// The calling service has already authenticated the user; this extractor
/// only loads the current account so permission checks see fresh state.
#[derive(Debug, Clone)]
pub struct Actor(pub UserAccount);

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized(format!("{ACTOR_HEADER} header is required")))?;

        let user_id: UserId = parse_id(raw)?;
        let account = state
            .access_service
            .find_user(user_id)
            .await
            .map_err(|error| match error {
                AppError::NotFound(_) => {
                    AppError::Unauthorized(format!("actor '{user_id}' is unknown"))
                }
                other => other,
            })?;

        Ok(Self(account))
    }
}

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use folio_core::AppError;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_internal_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    let Some(token) = token else {
        warn!("internal request rejected: missing bearer token");
        return Err(AppError::Unauthorized("bearer token required".to_owned()).into());
    };

    if !secrets_match(token, &state.internal_api_secret) {
        warn!("internal request rejected: invalid bearer token");
        return Err(AppError::Unauthorized("invalid bearer token".to_owned()).into());
    }

    Ok(next.run(request).await)
}

fn secrets_match(candidate: &str, expected: &str) -> bool {
    let candidate = candidate.as_bytes();
    let expected = expected.as_bytes();

    candidate.len() == expected.len() && bool::from(candidate.ct_eq(expected))
}

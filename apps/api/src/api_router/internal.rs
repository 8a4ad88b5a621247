use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};

use crate::state::AppState;
use crate::{handlers, middleware};

pub(super) fn build_internal_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/internal/access/resolve",
            post(handlers::access::resolve_access_handler),
        )
        .route(
            "/api/internal/access/scope",
            post(handlers::access::scope_check_handler),
        )
        .route(
            "/api/internal/companies/{company_id}/areas/{area_id}/responsible/{user_id}",
            get(handlers::access::area_responsible_handler),
        )
        .route(
            "/api/internal/companies/{company_id}/subareas/{subarea_id}/responsible/{user_id}",
            get(handlers::access::subarea_responsible_handler),
        )
        .route(
            "/api/internal/companies/{company_id}/assignments",
            get(handlers::assignments::list_assignments_handler)
                .post(handlers::assignments::assign_role_handler),
        )
        .route(
            "/api/internal/companies/{company_id}/assignments/{assignment_id}",
            delete(handlers::assignments::revoke_assignment_handler),
        )
        .route(
            "/api/internal/companies/{company_id}/roles",
            post(handlers::roles::create_role_handler),
        )
        .route(
            "/api/internal/permissions",
            get(handlers::permissions::list_permissions_handler),
        )
        .route_layer(from_fn_with_state(
            app_state,
            middleware::require_internal_auth,
        ))
}

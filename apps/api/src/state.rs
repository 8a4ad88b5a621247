use folio_application::{AccessService, AssignmentAdminService};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_service: AccessService,
    pub assignment_admin_service: AssignmentAdminService,
    pub internal_api_secret: String,
    pub postgres_pool: Option<PgPool>,
}

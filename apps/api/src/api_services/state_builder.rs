use std::sync::Arc;

use folio_application::{
    AccessRepository, AccessService, AssignmentAdminRepository, AssignmentAdminService,
    AuditRepository,
};
use folio_core::AppError;
use folio_domain::{Lifecycle, RoleCode, UserAccount, UserId};
use folio_infrastructure::{
    InMemoryAccessRepository, PostgresAccessRepository, PostgresAuditRepository,
};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub async fn build_app_state(
    config: &ApiConfig,
    postgres_pool: Option<PgPool>,
) -> Result<AppState, AppError> {
    let (access_repository, admin_repository, audit_repository): (
        Arc<dyn AccessRepository>,
        Arc<dyn AssignmentAdminRepository>,
        Arc<dyn AuditRepository>,
    ) = match &postgres_pool {
        Some(pool) => {
            let repository = Arc::new(PostgresAccessRepository::new(pool.clone()));
            (
                repository.clone(),
                repository,
                Arc::new(PostgresAuditRepository::new(pool.clone())),
            )
        }
        None => {
            warn!("DATABASE_URL is not set, access records are kept in memory");
            let repository = Arc::new(in_memory_repository(config.dev_admin_user_id).await?);
            (repository.clone(), repository.clone(), repository)
        }
    };

    let access_service = AccessService::new(access_repository);
    let assignment_admin_service =
        AssignmentAdminService::new(access_service.clone(), admin_repository, audit_repository);

    Ok(AppState {
        access_service,
        assignment_admin_service,
        internal_api_secret: config.internal_api_secret.clone(),
        postgres_pool,
    })
}

async fn in_memory_repository(
    dev_admin_user_id: Option<UserId>,
) -> Result<InMemoryAccessRepository, AppError> {
    let repository = InMemoryAccessRepository::with_system_catalog().await?;

    if let Some(user_id) = dev_admin_user_id {
        repository
            .put_user(UserAccount::new(
                user_id,
                [RoleCode::new(RoleCode::ADMIN)?],
                Lifecycle::Active,
            ))
            .await;
        info!(%user_id, "seeded development administrator");
    }

    Ok(repository)
}

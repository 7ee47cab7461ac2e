use std::sync::Arc;

use saas_authz::{
    Authorizer, CustomRoleHandler, DenyAnonymousHandler, MappedRoleCustomizer, RolesRequirement,
};
use saas_config::{AuthorizationConfig, Settings};
use saas_db::{PgPool, init_db_pool, run_migrations};
use tracing::info;

/// Role requirements of the two classes of guarded routes.
#[derive(Clone, Debug)]
pub struct RouteRequirements {
    pub reader: RolesRequirement,
    pub admin: RolesRequirement,
}

impl RouteRequirements {
    pub fn from_config(config: &AuthorizationConfig) -> Self {
        Self {
            reader: RolesRequirement::new(config.reader_roles.iter().cloned()),
            admin: RolesRequirement::new(config.admin_roles.iter().cloned()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub settings: Arc<Settings>,
    pub authorizer: Arc<Authorizer>,
    pub requirements: Arc<RouteRequirements>,
}

impl AppState {
    pub fn new(db: PgPool, settings: Settings) -> Self {
        let authorizer = build_authorizer(&settings.authorization);
        let requirements = RouteRequirements::from_config(&settings.authorization);

        Self {
            db,
            settings: Arc::new(settings),
            authorizer: Arc::new(authorizer),
            requirements: Arc::new(requirements),
        }
    }
}

/// Register the authorization handlers, anonymous rejection first.
pub fn build_authorizer(config: &AuthorizationConfig) -> Authorizer {
    let customizer: MappedRoleCustomizer = config.role_mappings.iter().cloned().collect();
    info!(mappings = customizer.len(), "Configured role customizer");

    Authorizer::new()
        .with_handler(Arc::new(DenyAnonymousHandler))
        .with_handler(Arc::new(CustomRoleHandler::new(Arc::new(customizer))))
}

/// Connect to the database, apply migrations and assemble the state.
pub async fn init_app_state(settings: Settings) -> anyhow::Result<AppState> {
    let db = init_db_pool(&settings.database).await?;
    run_migrations(&db).await?;

    Ok(AppState::new(db, settings))
}

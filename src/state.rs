use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CommunityService, HeroService, SeaOrmAuthService, SeaOrmCommunityService,
    SeaOrmHeroService,
};
use crate::uploads::UploadStore;

/// Everything a request handler can reach.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth: Arc<dyn AuthService>,

    pub heroes: Arc<dyn HeroService>,

    pub community: Arc<dyn CommunityService>,

    pub uploads: Arc<UploadStore>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Assembles a state from ready-made parts, e.g. with fake services in tests.
    #[must_use]
    pub fn new(
        config: Config,
        store: Store,
        auth: Arc<dyn AuthService>,
        heroes: Arc<dyn HeroService>,
        community: Arc<dyn CommunityService>,
        prometheus_handle: Option<PrometheusHandle>,
    ) -> Self {
        let uploads = Arc::new(UploadStore::new(&config.general.public_path));
        Self {
            config: Arc::new(config),
            store,
            auth,
            heroes,
            community,
            uploads,
            prometheus_handle,
        }
    }

    /// Connects the database, applies migrations, creates the bootstrap admin
    /// and the upload directories, and wires the `SeaORM` services.
    pub async fn from_config(
        config: Config,
        prometheus_handle: Option<PrometheusHandle>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        store.ensure_bootstrap_admin(&config.security).await?;

        let auth = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;
        let heroes = Arc::new(SeaOrmHeroService::new(store.clone())) as Arc<dyn HeroService>;
        let community =
            Arc::new(SeaOrmCommunityService::new(store.clone())) as Arc<dyn CommunityService>;

        let state = Self::new(config, store, auth, heroes, community, prometheus_handle);
        state.uploads.ensure_layout().await?;

        Ok(state)
    }
}

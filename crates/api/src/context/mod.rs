//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use castbridge_common::auth::PkceSessionStore;
use castbridge_core::{AuthService, BridgeService, IdentityRepository, MediaFetcher, ProviderClient};
use castbridge_domain::constants::{PKCE_SESSION_CAPACITY, PKCE_SESSION_TTL_SECS};
use castbridge_domain::{BridgeConfig, Result};
use castbridge_infra::{DbManager, HttpClient, HttpMediaFetcher, SqliteIdentityRepository, TwitterClient};
use tracing::info;

/// Application context - holds configuration and all services
pub struct AppContext {
    pub config: BridgeConfig,
    pub db: Arc<DbManager>,
    pub identities: Arc<dyn IdentityRepository>,
    pub auth: AuthService,
    pub bridge: BridgeService,
}

impl AppContext {
    /// Open the database, apply the schema and wire the production adapters.
    pub fn new(config: BridgeConfig) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .build()?;
        let provider = Arc::new(TwitterClient::new(http.clone()));
        let media = Arc::new(HttpMediaFetcher::new(http));

        info!(
            db_path = %db.path().display(),
            http_timeout_secs = config.http.timeout_secs,
            "application context initialised"
        );

        Ok(Self::with_components(config, db, provider, media))
    }

    /// Wire the services over explicit adapters.
    pub fn with_components(
        config: BridgeConfig,
        db: Arc<DbManager>,
        provider: Arc<dyn ProviderClient>,
        media: Arc<dyn MediaFetcher>,
    ) -> Self {
        let identities: Arc<dyn IdentityRepository> =
            Arc::new(SqliteIdentityRepository::new(Arc::clone(&db)));
        let sessions =
            PkceSessionStore::new(Duration::from_secs(PKCE_SESSION_TTL_SECS), PKCE_SESSION_CAPACITY);

        Self {
            auth: AuthService::new(Arc::clone(&identities), Arc::clone(&provider), sessions),
            bridge: BridgeService::new(Arc::clone(&identities), provider, media),
            identities,
            config,
            db,
        }
    }
}

use idbridge_platform_access::{AccountStore, InMemoryStore, ProfileStore};
use idbridge_provider::{ProviderRegistry, ReqwestTransport};
use idbridge_server::{
    AppState, ServerConfig,
    db::{PgAccountStore, PgProfileStore},
    router,
};
use idbridge_token::TokenService;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    let (accounts, profiles): (Arc<dyn AccountStore>, Arc<dyn ProfileStore>) =
        match &config.database_url {
            Some(database_url) => {
                let db_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(database_url)
                    .await
                    .expect("failed to connect to database");

                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations")
                    .run(&db_pool)
                    .await
                    .expect("failed to run migrations");

                (
                    Arc::new(PgAccountStore::new(db_pool.clone())),
                    Arc::new(PgProfileStore::new(db_pool)),
                )
            }
            None => {
                tracing::warn!("DATABASE_URL is not set, accounts are kept in memory");
                let store = Arc::new(InMemoryStore::new());
                let accounts: Arc<dyn AccountStore> = store.clone();
                let profiles: Arc<dyn ProfileStore> = store;
                (accounts, profiles)
            }
        };

    let tokens =
        Arc::new(TokenService::from_config(&config.token).expect("invalid token configuration"));

    let transport = ReqwestTransport::new(config.providers.http_timeout())
        .expect("failed to build HTTP client");
    let providers = ProviderRegistry::from_config(&config.providers, Arc::new(transport))
        .expect("invalid provider configuration");

    let app_state = Arc::new(AppState::new(providers, accounts, profiles, tokens));
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

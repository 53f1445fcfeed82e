use crate::config::UserConfig;
use crate::error::AppError;
use crate::handlers;
use crate::services::{Pinger, UserDb};
use axum::{
    routing::{get, post},
    Router,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: UserConfig,
    pub db: UserDb,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: UserConfig) -> Result<Self, AppError> {
        let db = UserDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let state = AppState {
            config: config.clone(),
            db: db.clone(),
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics_endpoint))
            .route(
                "/api/users",
                post(handlers::create_user).fallback(handlers::api_fallback),
            )
            .route(
                "/api/users/:number",
                get(handlers::get_user)
                    .put(handlers::update_user)
                    .fallback(handlers::api_fallback),
            )
            .fallback(handlers::api_fallback)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn db(&self) -> &UserDb {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve requests until the server future completes, with the self-ping
    /// loop running alongside. The pinger is cancelled once serving stops.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let shutdown = CancellationToken::new();
        let pinger = Pinger::new().spawn(shutdown.clone());

        let result = self.server.await;

        shutdown.cancel();
        pinger.await.ok();

        result
    }
}

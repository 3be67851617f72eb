//! Course catalog server: loads settings, prepares the store, serves the HTTP API.

use course_catalog::{
    app, ensure_database_exists, AllowAll, AppState, AuthMode, CourseService, CourseStore, JwtVerifier,
    MemoryCourseStore, PgCourseStore, Settings, StoreBackend, TokenVerifier,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("course_catalog=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;

    let store: Arc<dyn CourseStore> = match settings.store {
        StoreBackend::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let store = PgCourseStore::connect(&settings.database_url, settings.max_connections).await?;
            store.ensure_schema().await?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Arc::new(MemoryCourseStore::new())
        }
    };

    let verifier: Arc<dyn TokenVerifier> = match &settings.auth {
        AuthMode::Jwt { secret } => Arc::new(JwtVerifier::new(secret)),
        AuthMode::Disabled => {
            tracing::warn!("AUTH_DISABLED is set; every request is accepted");
            Arc::new(AllowAll)
        }
    };

    let state = AppState::new(CourseService::new(store, verifier));
    let router = app(state, settings.body_limit_bytes);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("course catalog listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}

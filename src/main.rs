use std::sync::Arc;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use calendar_server::auth::JwtIdentityProvider;
use calendar_server::config::Config;
use calendar_server::routes::{create_routes, AppState};
use calendar_server::services::EventStore;
use calendar_server::store::{EventRepository, InMemoryEventRepository, PgEventRepository};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calendar_server=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let repository: Arc<dyn EventRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await
                .expect("Failed to connect to database");

            tracing::info!("Successfully connected to database");

            sqlx::migrate!()
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            tracing::info!("Migrations run successfully");
            Arc::new(PgEventRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, events are kept in memory only");
            Arc::new(InMemoryEventRepository::new())
        }
    };

    let identity = Arc::new(JwtIdentityProvider::new(&config.jwt_secret));
    let state = AppState::new(EventStore::new(repository), identity);
    let app = create_routes(state, &config);

    let addr = config.socket_addr().expect("Invalid listen address");
    tracing::info!("Calendar API listening on http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}

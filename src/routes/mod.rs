use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth::IdentityProvider;
use crate::config::{create_cors_layer, create_security_headers_layer, Config};
use crate::handlers::{events, health_check};
use crate::services::EventStore;

#[derive(Clone)]
pub struct AppState {
    pub events: EventStore,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(events: EventStore, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { events, identity }
    }
}

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route(
            "/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/:id/status", patch(events::update_event_status))
}

pub fn create_routes(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/events", event_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(config.production))
        .layer(create_cors_layer(&config.cors_allowed_origins))
}

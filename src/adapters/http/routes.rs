//! Axum router configuration for the conversation API.
//!
//! Defines the route structure and middleware stack and wires routes to
//! their handlers.

use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::handlers::{list_blueprints, post_message, AppState};

/// Create the conversation API router.
///
/// # Routes
/// - `POST /conversations/messages` - Run one conversation turn
/// - `GET /blueprints` - List available service blueprints
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/conversations/messages", post(post_message))
        .route("/blueprints", get(list_blueprints))
}

/// Create the complete application router with middleware applied.
pub fn app_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(cors_layer(config))
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::blueprint::YamlBlueprintStore;
    use crate::adapters::memory::InMemoryConversationStore;
    use crate::adapters::nlu::{ScriptedClassifier, ScriptedExtractor};
    use crate::adapters::plugins::PluginManifest;
    use crate::adapters::presenter::TemplatePresenter;
    use crate::application::flow::FlowController;

    fn test_state() -> AppState {
        let blueprints = Arc::new(YamlBlueprintStore::from_blueprints(vec![]).unwrap());
        let registry = Arc::new(PluginManifest::builtin().build_registry().unwrap());
        let controller = Arc::new(FlowController::new(
            blueprints.clone(),
            Arc::new(InMemoryConversationStore::new()),
            Arc::new(ScriptedClassifier::new()),
            Arc::new(ScriptedExtractor::new()),
            Arc::new(TemplatePresenter::new()),
            registry,
        ));
        AppState {
            controller,
            blueprints,
        }
    }

    #[test]
    fn api_routes_creates_router() {
        let router = api_routes();
        let _: Router<()> = router.with_state(test_state());
    }

    #[test]
    fn app_router_applies_middleware_without_panic() {
        let config = ServerConfig::default();
        let _ = app_router(test_state(), &config);
    }
}

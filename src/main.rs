//! Formflow server entry point.
//!
//! Loads configuration, builds the adapter stack and serves the
//! conversation API.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use formflow::adapters::blueprint::YamlBlueprintStore;
use formflow::adapters::http::{app_router, AppState};
use formflow::adapters::memory::InMemoryConversationStore;
use formflow::adapters::nlu::{KeywordDataExtractor, KeywordIntentClassifier};
use formflow::adapters::plugins::PluginManifest;
use formflow::adapters::presenter::TemplatePresenter;
use formflow::application::flow::FlowController;
use formflow::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    let blueprints = Arc::new(YamlBlueprintStore::from_dir(&config.blueprints.dir)?);
    let registry = Arc::new(PluginManifest::builtin().build_registry()?);

    let controller = Arc::new(
        FlowController::new(
            blueprints.clone(),
            Arc::new(InMemoryConversationStore::new()),
            Arc::new(KeywordIntentClassifier::new()),
            Arc::new(KeywordDataExtractor::new()),
            Arc::new(TemplatePresenter::new()),
            registry,
        )
        .with_default_language(config.language.default_language.clone()),
    );

    let state = AppState {
        controller,
        blueprints,
    };
    let app = app_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    info!(%addr, environment = ?config.server.environment, "starting formflow server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

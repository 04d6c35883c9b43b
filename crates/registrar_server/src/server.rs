use crate::{api, state::AppState};
use axum::{Router, extract::DefaultBodyLimit, routing::get};
use registrar_core::prelude::{routes::*, *};
use registrar_engine::ReconciliationEngine;
use tower_http::trace::TraceLayer;

/// The builder for the Registrar Server.
#[derive(Clone, Debug, Default)]
pub struct RegistrarServer {
    config: RegistrarServerConfig,
}

impl RegistrarServer {
    pub fn new(config: RegistrarServerConfig) -> Self {
        Self { config }
    }
}

#[derive(Clone, Debug)]
pub struct RegistrarServerConfig {
    /// Maximum request body size in bytes.
    ///
    /// Defaults to 2 MiB.
    pub body_limit: usize,
}

impl Default for RegistrarServerConfig {
    fn default() -> Self {
        Self {
            body_limit: 2 * 1024 * 1024,
        }
    }
}

impl RegistrarServer {
    pub fn build<S: RegistrarServices>(self, engine: ReconciliationEngine<S>) -> Router {
        let RegistrarServerConfig { body_limit } = self.config;
        Router::new()
            .route(HEALTH, get(|| async { "OK" }))
            .route(
                DEFINITIONS,
                get(api::list_definitions).post(api::create_definition),
            )
            .route(DEFINITIONS_COUNT, get(api::count_definitions))
            .route(DEFINITION_BY_ID, get(api::get_definition))
            .layer(DefaultBodyLimit::max(body_limit))
            .layer(TraceLayer::new_for_http())
            .with_state(AppState { engine })
    }
}

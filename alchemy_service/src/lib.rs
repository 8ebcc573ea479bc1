//! The async/HTTP/concurrency layer: wraps the pure `alchemy_core`
//! solvers with a bounded concurrent multi-recipe driver, request
//! coordination, configuration, and the HTTP surface.

pub mod concurrency;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod http;
pub mod logging;

use std::sync::Arc;

use alchemy_core::Store;
use axum::Router;

use config::Config;
use coordinator::Coordinator;

/// Shared, cloneable application state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub coordinator: Arc<Coordinator>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Result<AppState, error::Error> {
        let store = Arc::new(store);
        let enumerator = Arc::new(concurrency::ConcurrentEnumerator::new(config.concurrency)?);
        let deadline = config.deadline;
        let config = Arc::new(config);
        let coordinator = Arc::new(Coordinator::new(store.clone(), enumerator, deadline));
        Ok(AppState {
            store,
            coordinator,
            config,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    http::router(state)
}

use std::sync::Arc;

use responder_core::{CancelFlag, Error, RouteEngine, loading::ServiceRegistry};

use crate::error::ApiError;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RouteEngine>,
    pub registry: Arc<ServiceRegistry>,
}

impl AppState {
    pub fn new(engine: RouteEngine, registry: ServiceRegistry) -> Self {
        Self {
            engine: Arc::new(engine),
            registry: Arc::new(registry),
        }
    }

    /// Runs an engine query on the blocking pool.
    ///
    /// If the request future is dropped (client disconnect or request
    /// timeout), the query's cancel flag is tripped and the search stops at
    /// its next node expansion.
    pub async fn run_query<T, F>(&self, query: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&RouteEngine, &ServiceRegistry, &CancelFlag) -> Result<T, Error>
            + Send
            + 'static,
    {
        let cancel = CancelFlag::new();
        let _cancel_on_drop = CancelOnDrop(cancel.clone());
        let engine = Arc::clone(&self.engine);
        let registry = Arc::clone(&self.registry);

        let result = tokio::task::spawn_blocking(move || query(&engine, &registry, &cancel))
            .await
            .map_err(|e| ApiError::Internal(format!("Query task failed: {e}")))?;
        result.map_err(ApiError::from)
    }
}

struct CancelOnDrop(CancelFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

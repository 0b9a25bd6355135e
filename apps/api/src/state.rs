use std::sync::Arc;

use crate::applications::JobApplicationRepository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable repository. Default: `SqlJobApplicationRepository` over the SQLite pool.
    pub repository: Arc<dyn JobApplicationRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn JobApplicationRepository>) -> Self {
        Self { repository }
    }
}

use std::sync::Arc;

use crate::agent::Agent;
use crate::config::Config;
use crate::extractors::Extractors;
use crate::storage::ProfileStore;
use crate::synthesis::Synthesizer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Persistence gateway. Filesystem-backed in production; tests substitute
    /// their own implementations.
    pub store: Arc<dyn ProfileStore>,
    pub extractors: Extractors,
    pub synthesizer: Arc<Synthesizer>,
    pub agent: Arc<Agent>,
}

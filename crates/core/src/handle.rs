use crate::search::SemanticSearch;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared, swappable reference to the live search engine.
///
/// Readers take a cheap `Arc` snapshot and score against it without holding the lock;
/// `publish` replaces the engine in a single write, so a reader never sees a partially
/// built index.
#[derive(Debug, Clone, Default)]
pub struct SearchHandle {
    live: Arc<RwLock<Option<Arc<SemanticSearch>>>>,
}

impl SearchHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<SemanticSearch>> {
        self.live
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_ready(&self) -> bool {
        self.current().is_some()
    }

    /// Installs `engine` and returns the one it replaced.
    pub fn publish(&self, engine: SemanticSearch) -> Option<Arc<SemanticSearch>> {
        let next = Arc::new(engine);
        let mut guard = self.live.write().unwrap_or_else(PoisonError::into_inner);
        guard.replace(next)
    }
}

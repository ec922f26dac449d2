use std::sync::Arc;

use crate::store::{EntityStore, InMemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
}

impl AppState {
    pub fn new(store: impl EntityStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }
}

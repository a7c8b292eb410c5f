use spotlist_core::SpotCatalog;
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    catalog: Arc<dyn SpotCatalog>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn SpotCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &dyn SpotCatalog {
        self.catalog.as_ref()
    }
}

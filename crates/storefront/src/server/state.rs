//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::auth::{RevocationList, TokenSigner};
use crate::config::Config;
use crate::repository::{MemoryStore, Paging, Repositories};
use crate::service::Services;

/// Application state shared across all request handlers.
///
/// Cloning is cheap; the service graph sits behind one [`Arc`].
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self {
            services: Arc::new(services),
        }
    }

    /// Wire the full service graph over a fresh in-memory store.
    pub fn in_memory(cfg: &Config) -> Self {
        let paging = Paging {
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
        };
        let signer = TokenSigner::new(cfg.token_secret.as_bytes(), cfg.token_ttl_secs);
        Self::new(Services::new(
            Repositories::in_memory(MemoryStore::new()),
            paging,
            &cfg.default_product_image,
            signer,
            RevocationList::new(),
        ))
    }
}

#[cfg(test)]
impl Default for AppState {
    /// An empty in-memory store with test configuration.
    fn default() -> Self {
        Self::in_memory(&crate::config::test_config())
    }
}

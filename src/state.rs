use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Store;
use crate::identity::IdentityProvider;

/// Shared collaborators handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            identity,
        }
    }
}

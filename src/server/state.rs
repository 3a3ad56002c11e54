//! Shared Server State
//!
//! Everything a request handler needs, constructed once at startup and
//! cloned per request. The store and the external collaborators are
//! injected here so tests can swap in mocks.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::SkillStore;
use crate::types::{GeneratorClient, SettlementClient};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<SkillStore>,
    pub generator: Arc<dyn GeneratorClient>,
    pub settlement: Arc<dyn SettlementClient>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<SkillStore>,
        generator: Arc<dyn GeneratorClient>,
        settlement: Arc<dyn SettlementClient>,
    ) -> Self {
        Self {
            config,
            store,
            generator,
            settlement,
        }
    }
}

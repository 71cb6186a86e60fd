//! User settings: the persisted preferences document and account operations.

mod account;
mod presentation;
mod social;
mod store;

pub use account::*;
pub use presentation::*;
pub use social::*;
pub use store::*;

use std::sync::Arc;

use crate::config::Config;
use crate::errors::StoreResult;

/// Real account backend when a service URL is configured, simulated otherwise.
pub fn account_service_from_config(config: &Config) -> StoreResult<Arc<dyn AccountService>> {
    match &config.api_base_url {
        Some(base_url) => Ok(Arc::new(HttpAccountService::new(
            base_url,
            config.api_key.clone(),
            config.request_timeout,
        )?)),
        None => Ok(Arc::new(SimulatedAccountService::default())),
    }
}

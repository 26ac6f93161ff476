pub mod auth;
pub mod config;
pub mod contacts;
pub mod sparks;

use std::sync::Arc;

use socialspark_core::{AuthProvider, Config, CoreError, KeyringAuth, NoAuth, SyncGateway};

/// Gateway for the configured API, using the stored token when there is one.
pub fn gateway(config: &Config) -> Result<SyncGateway, CoreError> {
    let stored = KeyringAuth::load();
    let auth: Arc<dyn AuthProvider> = if stored.is_authenticated() || config.api.require_auth {
        Arc::new(stored)
    } else {
        Arc::new(NoAuth)
    };
    Ok(SyncGateway::from_config(&config.api, auth)?)
}

pub fn runtime() -> Result<tokio::runtime::Runtime, CoreError> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

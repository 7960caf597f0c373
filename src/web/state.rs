use std::sync::Arc;

use crate::predict::{OpenNotifyClient, PositionError, PositionSource};

use super::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub positions: Arc<dyn PositionSource>,
}

impl AppState {
    pub fn new(config: Config, positions: Arc<dyn PositionSource>) -> Self {
        Self {
            config: Arc::new(config),
            positions,
        }
    }

    /// State backed by the HTTP position feed named in `config.upstream`
    pub fn from_config(config: Config) -> Result<Self, PositionError> {
        let client = OpenNotifyClient::new(config.upstream.url.clone(), config.upstream.timeout)?;
        log::info!(
            "Using position service {} (timeout {:?})",
            client.url(),
            config.upstream.timeout
        );
        Ok(Self::new(config, Arc::new(client)))
    }
}

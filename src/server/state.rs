use super::ServerConfig;
use crate::media_store::MediaStore;
use crate::user::TokenService;
use crate::AppStore;
use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

pub type GuardedAppStore = Arc<dyn AppStore>;
pub type GuardedMediaStore = Arc<dyn MediaStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub store: GuardedAppStore,
    pub media_store: GuardedMediaStore,
    pub token_service: TokenService,
}

impl FromRef<ServerState> for GuardedAppStore {
    fn from_ref(input: &ServerState) -> Self {
        input.store.clone()
    }
}

impl FromRef<ServerState> for GuardedMediaStore {
    fn from_ref(input: &ServerState) -> Self {
        input.media_store.clone()
    }
}

impl FromRef<ServerState> for TokenService {
    fn from_ref(input: &ServerState) -> Self {
        input.token_service.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

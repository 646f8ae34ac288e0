use std::sync::Arc;

use crate::auth::password::PasswordHasher;
use crate::config::AppConfig;
use crate::store::{MemoryStore, PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub passwords: PasswordHasher,
}

impl AppState {
    /// Connects to Postgres. Also returns the concrete gateway so the caller
    /// can run migrations against its pool.
    pub async fn init(config: AppConfig) -> anyhow::Result<(Self, PgStore)> {
        let pg = PgStore::connect(&config).await?;
        let state = Self::from_parts(Arc::new(pg.clone()), Arc::new(config))?;
        Ok((state, pg))
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let passwords = PasswordHasher::new(&config.password)?;
        Ok(Self {
            store,
            config,
            passwords,
        })
    }

    /// In-memory state for tests and local experiments.
    pub fn fake() -> Self {
        Self::from_parts(Arc::new(MemoryStore::new()), Arc::new(AppConfig::for_tests()))
            .expect("test password params are valid")
    }
}

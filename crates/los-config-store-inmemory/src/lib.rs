//! In-memory configuration store for the LOS configuration core
//!
//! This crate provides an in-memory implementation of the repository
//! interface defined in the los-config-core crate. It is primarily useful for
//! development, testing, and simple deployments where persistence is not required.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

pub mod repositories;
pub use repositories::InMemoryConfigurationRepository;

use los_config_core::{ConfigId, ConfigurationRecord, ConfigurationRepository, ConfigurationService};

/// Provider for in-memory configuration repositories
#[derive(Default)]
pub struct InMemoryStoreProvider {
    // Shared storage for configuration records
    records: Arc<RwLock<HashMap<ConfigId, ConfigurationRecord>>>,
}

impl InMemoryStoreProvider {
    /// Create a new in-memory store provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository over the shared storage
    pub fn create_repository(&self) -> Arc<dyn ConfigurationRepository> {
        debug!("Creating in-memory configuration repository");
        Arc::new(InMemoryConfigurationRepository::new(self.records.clone()))
    }

    /// Create a configuration service over the shared storage
    pub fn create_service(&self) -> ConfigurationService {
        ConfigurationService::new(self.create_repository())
    }
}

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use los_config_core::{ConfigError, ConfigId, ConfigKind, ConfigurationRecord, ConfigurationRepository};

/// In-memory implementation of the ConfigurationRepository
pub struct InMemoryConfigurationRepository {
    records: Arc<RwLock<HashMap<ConfigId, ConfigurationRecord>>>,
}

impl InMemoryConfigurationRepository {
    /// Create a new in-memory configuration repository
    pub fn new(records: Arc<RwLock<HashMap<ConfigId, ConfigurationRecord>>>) -> Self {
        Self { records }
    }

    /// Create a repository seeded with records
    pub fn with_records(records: impl IntoIterator<Item = ConfigurationRecord>) -> Self {
        let map = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self::new(Arc::new(RwLock::new(map)))
    }
}

impl Default for InMemoryConfigurationRepository {
    fn default() -> Self {
        Self::new(Arc::new(RwLock::new(HashMap::new())))
    }
}

#[async_trait]
impl ConfigurationRepository for InMemoryConfigurationRepository {
    async fn find_by_id(&self, id: &ConfigId) -> Result<Option<ConfigurationRecord>, ConfigError> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn find_by_subject(
        &self,
        kind: ConfigKind,
        subject_id: &str,
    ) -> Result<Vec<ConfigurationRecord>, ConfigError> {
        let records = self.records.read().await;

        let mut matching: Vec<ConfigurationRecord> = records
            .values()
            .filter(|r| r.kind == kind && r.subject_id == subject_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(matching)
    }

    async fn save(&self, record: &ConfigurationRecord) -> Result<(), ConfigError> {
        let mut records = self.records.write().await;

        if record.is_active() {
            let holder = records
                .values()
                .find(|other| other.id != record.id && other.is_active() && other.shares_scope_with(record));
            if let Some(holder) = holder {
                warn!(
                    config_id = %record.id,
                    holder_id = %holder.id,
                    scope = %record.scope,
                    "Rejected second ACTIVE record for scope"
                );
                return Err(ConfigError::Conflict(format!(
                    "configuration '{}' is already ACTIVE for {}",
                    holder.id,
                    record.label()
                )));
            }
        }

        records.insert(record.id.clone(), record.clone());
        debug!(config_id = %record.id, status = %record.status, "Saved configuration");
        Ok(())
    }

    async fn list(&self, kind: Option<ConfigKind>) -> Result<Vec<ConfigurationRecord>, ConfigError> {
        let records = self.records.read().await;

        let mut listed: Vec<ConfigurationRecord> = records
            .values()
            .filter(|r| kind.map_or(true, |k| r.kind == k))
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(listed)
    }
}

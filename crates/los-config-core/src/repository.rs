//! Persistence seam for configuration records.
//!
//! The core never stores anything itself. Implementations decide where
//! records live; they must hand back full snapshots so that resolution and
//! activation checks see a consistent view.

use async_trait::async_trait;

use crate::error::ConfigError;
use crate::record::{ConfigId, ConfigKind, ConfigurationRecord};

/// Repository for configuration records
#[async_trait]
pub trait ConfigurationRepository: Send + Sync {
    /// Find a record by ID
    async fn find_by_id(&self, id: &ConfigId) -> Result<Option<ConfigurationRecord>, ConfigError>;

    /// All records of one kind for a subject, in any scope and status
    async fn find_by_subject(
        &self,
        kind: ConfigKind,
        subject_id: &str,
    ) -> Result<Vec<ConfigurationRecord>, ConfigError>;

    /// Insert or replace a record.
    ///
    /// Must fail with `ConfigError::Conflict` if the write would leave two
    /// ACTIVE records for the same subject and scope.
    async fn save(&self, record: &ConfigurationRecord) -> Result<(), ConfigError>;

    /// List records, optionally restricted to one kind
    async fn list(&self, kind: Option<ConfigKind>) -> Result<Vec<ConfigurationRecord>, ConfigError>;
}

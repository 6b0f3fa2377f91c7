use chrono::Utc;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::activation::{check_activation, ActivationCheck};
use crate::error::ConfigError;
use crate::record::{ConfigId, ConfigKind, ConfigStatus, ConfigurationRecord};
use crate::repository::ConfigurationRepository;
use crate::resolver::{RequestScope, ResolvedConfig, ScopeResolver};
use crate::scope::{validate_scope_change, validate_scope_for_kind, ConfigScope};

/// Result of an activation attempt.
///
/// A blocked activation is not an error: the check is returned so the caller
/// can show its errors and warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationOutcome {
    pub check: ActivationCheck,

    /// Whether the record is now ACTIVE
    pub activated: bool,

    /// Records moved to DEPRECATED as part of the activation
    pub deprecated: Vec<ConfigId>,
}

/// Service for managing the lifecycle of configuration records
pub struct ConfigurationService {
    /// Repository for configuration records
    repository: Arc<dyn ConfigurationRepository>,

    /// Serializes writes per (kind, subject). One entry per subject ever
    /// written through this service; entries are never removed.
    subject_locks: DashMap<(ConfigKind, String), Arc<Mutex<()>>>,
}

impl ConfigurationService {
    /// Create a new configuration service
    pub fn new(repository: Arc<dyn ConfigurationRepository>) -> Self {
        Self {
            repository,
            subject_locks: DashMap::new(),
        }
    }

    fn subject_lock(&self, kind: ConfigKind, subject_id: &str) -> Arc<Mutex<()>> {
        self.subject_locks
            .entry((kind, subject_id.to_string()))
            .or_default()
            .clone()
    }

    async fn load(&self, id: &ConfigId) -> Result<ConfigurationRecord, ConfigError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ConfigError::NotFound(id.to_string()))
    }

    /// Store a new DRAFT record.
    ///
    /// The version is one above the highest version already stored for the
    /// same subject and scope.
    pub async fn create(
        &self,
        kind: ConfigKind,
        subject_id: &str,
        scope: ConfigScope,
        payload: serde_json::Value,
    ) -> Result<ConfigurationRecord, ConfigError> {
        let validation = validate_scope_for_kind(kind, &scope);
        if !validation.is_valid {
            return Err(ConfigError::InvalidScope(validation.errors));
        }

        let lock = self.subject_lock(kind, subject_id);
        let _guard = lock.lock().await;

        let siblings = self.repository.find_by_subject(kind, subject_id).await?;
        let version = siblings
            .iter()
            .filter(|r| r.scope.same_tuple(&scope))
            .map(|r| r.version)
            .max()
            .map_or(1, |v| v + 1);

        let now = Utc::now();
        let mut record = ConfigurationRecord::draft(ConfigId::generate(), kind, subject_id, scope, payload);
        record.version = version;
        record.created_at = Some(now);
        record.updated_at = Some(now);

        self.repository.save(&record).await?;

        tracing::info!(
            config_id = %record.id,
            kind = %kind,
            subject_id = %subject_id,
            scope = %record.scope,
            version,
            "Configuration created"
        );

        Ok(record)
    }

    /// Replace the payload of a record. The scope must be the stored one.
    pub async fn update(
        &self,
        id: &ConfigId,
        scope: &ConfigScope,
        payload: serde_json::Value,
    ) -> Result<ConfigurationRecord, ConfigError> {
        let record = self.load(id).await?;
        let lock = self.subject_lock(record.kind, &record.subject_id);
        let _guard = lock.lock().await;

        // Re-read under the lock so a concurrent status change is not overwritten
        let mut record = self.load(id).await?;

        let change = validate_scope_change(&record.scope, scope);
        if !change.is_valid {
            tracing::warn!(
                config_id = %id,
                from = %record.scope,
                to = %scope,
                "Rejected scope change"
            );
            return Err(ConfigError::ScopeImmutable(id.to_string()));
        }

        record.payload = payload;
        record.updated_at = Some(Utc::now());
        self.repository.save(&record).await?;

        tracing::info!(config_id = %id, "Configuration updated");

        Ok(record)
    }

    /// Activate a record if no ACTIVE record holds its scope.
    pub async fn activate(&self, id: &ConfigId) -> Result<ActivationOutcome, ConfigError> {
        self.activate_inner(id, false).await
    }

    /// Deprecate every ACTIVE record with the same scope, then activate.
    pub async fn supersede(&self, id: &ConfigId) -> Result<ActivationOutcome, ConfigError> {
        self.activate_inner(id, true).await
    }

    async fn activate_inner(&self, id: &ConfigId, supersede: bool) -> Result<ActivationOutcome, ConfigError> {
        let record = self.load(id).await?;
        let lock = self.subject_lock(record.kind, &record.subject_id);
        let _guard = lock.lock().await;

        // Re-read under the lock; a concurrent writer may have changed it
        let mut record = self.load(id).await?;
        let mut siblings = self
            .repository
            .find_by_subject(record.kind, &record.subject_id)
            .await?;

        let mut deprecated = Vec::new();
        if supersede && !record.is_active() && validate_scope_for_kind(record.kind, &record.scope).is_valid {
            let now = Utc::now();
            for sibling in siblings
                .iter_mut()
                .filter(|s| s.id != record.id && s.is_active() && s.shares_scope_with(&record))
            {
                sibling.status = ConfigStatus::Deprecated;
                sibling.updated_at = Some(now);
                self.repository.save(sibling).await?;
                deprecated.push(sibling.id.clone());
            }
        }

        let check = check_activation(&record, &siblings);
        if !check.can_activate {
            tracing::info!(
                config_id = %record.id,
                subject_id = %record.subject_id,
                errors = ?check.errors,
                "Activation blocked"
            );
            return Ok(ActivationOutcome {
                check,
                activated: false,
                deprecated,
            });
        }

        record.status = ConfigStatus::Active;
        record.updated_at = Some(Utc::now());
        self.repository.save(&record).await?;

        for warning in &check.warnings {
            tracing::warn!(config_id = %record.id, "{}", warning);
        }
        tracing::info!(
            config_id = %record.id,
            kind = %record.kind,
            subject_id = %record.subject_id,
            scope = %record.scope,
            deprecated = deprecated.len(),
            "Configuration activated"
        );

        Ok(ActivationOutcome {
            check,
            activated: true,
            deprecated,
        })
    }

    /// Retire a record
    pub async fn deprecate(&self, id: &ConfigId) -> Result<ConfigurationRecord, ConfigError> {
        let record = self.load(id).await?;
        let lock = self.subject_lock(record.kind, &record.subject_id);
        let _guard = lock.lock().await;

        let mut record = self.load(id).await?;
        if record.status != ConfigStatus::Deprecated {
            record.status = ConfigStatus::Deprecated;
            record.updated_at = Some(Utc::now());
            self.repository.save(&record).await?;
            tracing::info!(config_id = %id, subject_id = %record.subject_id, "Configuration deprecated");
        }

        Ok(record)
    }

    /// Resolve a record of any kind. Flows never resolve at branch level.
    pub async fn resolve(
        &self,
        kind: ConfigKind,
        subject_id: &str,
        request: &RequestScope,
    ) -> Result<ResolvedConfig, ConfigError> {
        let resolver = match kind {
            ConfigKind::Flow => ScopeResolver::flows(),
            _ => ScopeResolver::general(),
        };
        let records = self.repository.find_by_subject(kind, subject_id).await?;
        Ok(resolver.resolve(subject_id, request, &records)?)
    }

    /// Resolve the screen configuration for a request
    pub async fn resolve_screen(
        &self,
        screen_id: &str,
        request: &RequestScope,
    ) -> Result<ResolvedConfig, ConfigError> {
        self.resolve(ConfigKind::Screen, screen_id, request).await
    }

    /// Resolve the flow configuration for a request
    pub async fn resolve_flow(
        &self,
        flow_id: &str,
        request: &RequestScope,
    ) -> Result<ResolvedConfig, ConfigError> {
        self.resolve(ConfigKind::Flow, flow_id, request).await
    }
}

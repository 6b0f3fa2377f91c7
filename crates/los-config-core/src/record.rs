//! Configuration records as supplied by the persistence collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scope::ConfigScope;

/// Identifier of a configuration record: numeric or string on the wire
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigId {
    /// Numeric id
    Numeric(u64),
    /// String id
    Text(String),
}

impl ConfigId {
    /// Fresh random id
    pub fn generate() -> Self {
        ConfigId::Text(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigId::Numeric(id) => write!(f, "{}", id),
            ConfigId::Text(id) => f.write_str(id),
        }
    }
}

impl From<u64> for ConfigId {
    fn from(id: u64) -> Self {
        ConfigId::Numeric(id)
    }
}

impl From<&str> for ConfigId {
    fn from(id: &str) -> Self {
        ConfigId::Text(id.to_string())
    }
}

impl From<String> for ConfigId {
    fn from(id: String) -> Self {
        ConfigId::Text(id)
    }
}

/// The kind of object a record configures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigKind {
    Screen,
    Flow,
    Validation,
    FieldMapping,
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigKind::Screen => "SCREEN",
            ConfigKind::Flow => "FLOW",
            ConfigKind::Validation => "VALIDATION",
            ConfigKind::FieldMapping => "FIELD_MAPPING",
        };
        f.write_str(name)
    }
}

/// Lifecycle status of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfigStatus {
    /// Editable, never a resolution target
    Draft,
    /// The record in force for its subject and scope
    Active,
    /// Retired, explicitly or by activation of a sibling
    Deprecated,
}

impl fmt::Display for ConfigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigStatus::Draft => "DRAFT",
            ConfigStatus::Active => "ACTIVE",
            ConfigStatus::Deprecated => "DEPRECATED",
        };
        f.write_str(name)
    }
}

/// A configuration object for a screen, flow, validation rule set or field mapping.
///
/// `payload` is kind-specific and passed through unexamined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationRecord<P = serde_json::Value> {
    pub id: ConfigId,

    pub kind: ConfigKind,

    /// Screen or flow identifier the record applies to
    #[serde(alias = "screenId", alias = "flowId")]
    pub subject_id: String,

    pub scope: ConfigScope,

    pub status: ConfigStatus,

    #[serde(default = "default_version")]
    pub version: u32,

    pub payload: P,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_version() -> u32 {
    1
}

impl<P> ConfigurationRecord<P> {
    /// New DRAFT record at version 1
    pub fn draft(
        id: impl Into<ConfigId>,
        kind: ConfigKind,
        subject_id: impl Into<String>,
        scope: ConfigScope,
        payload: P,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            subject_id: subject_id.into(),
            scope,
            status: ConfigStatus::Draft,
            version: default_version(),
            payload,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ConfigStatus::Active
    }

    /// True when both records configure the same kind and subject under an identical scope tuple
    pub fn shares_scope_with<Q>(&self, other: &ConfigurationRecord<Q>) -> bool {
        self.kind == other.kind && self.subject_id == other.subject_id && self.scope.same_tuple(&other.scope)
    }

    /// Audit label, e.g. `SCREEN applicant-info @ PL > ACME`
    pub fn label(&self) -> String {
        format!("{} {} @ {}", self.kind, self.subject_id, self.scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_deserialization_accepts_subject_aliases() {
        let screen: ConfigurationRecord = serde_json::from_value(json!({
            "id": 42,
            "kind": "SCREEN",
            "screenId": "applicant-info",
            "scope": {"type": "PRODUCT", "productCode": "PL"},
            "status": "ACTIVE",
            "payload": {"layout": "two-column"}
        }))
        .unwrap();

        assert_eq!(screen.id, ConfigId::Numeric(42));
        assert_eq!(screen.subject_id, "applicant-info");
        assert_eq!(screen.version, 1);
        assert!(screen.is_active());
        assert_eq!(screen.payload["layout"], "two-column");

        let flow: ConfigurationRecord = serde_json::from_value(json!({
            "id": "flow-7",
            "kind": "FLOW",
            "flowId": "personal-loan-journey",
            "scope": {"type": "PARTNER", "productCode": "PL", "partnerCode": "ACME"},
            "status": "DRAFT",
            "version": 3,
            "payload": null
        }))
        .unwrap();

        assert_eq!(flow.id, ConfigId::from("flow-7"));
        assert_eq!(flow.kind, ConfigKind::Flow);
        assert_eq!(flow.version, 3);
    }

    #[test]
    fn test_shares_scope_with() {
        let a = ConfigurationRecord::draft(1u64, ConfigKind::Screen, "s1", ConfigScope::partner("PL", "ACME"), ());
        let b = ConfigurationRecord::draft(2u64, ConfigKind::Screen, "s1", ConfigScope::partner("PL", "ACME"), ());
        let other_partner = ConfigurationRecord::draft(3u64, ConfigKind::Screen, "s1", ConfigScope::partner("PL", "ZETA"), ());
        let other_kind = ConfigurationRecord::draft(4u64, ConfigKind::Validation, "s1", ConfigScope::partner("PL", "ACME"), ());

        assert!(a.shares_scope_with(&b));
        assert!(!a.shares_scope_with(&other_partner));
        assert!(!a.shares_scope_with(&other_kind));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ConfigId::generate(), ConfigId::generate());
    }

    #[test]
    fn test_label() {
        let record = ConfigurationRecord::draft(1u64, ConfigKind::Flow, "journey", ConfigScope::partner("PL", "ACME"), ());
        assert_eq!(record.label(), "FLOW journey @ PL > ACME");
    }
}

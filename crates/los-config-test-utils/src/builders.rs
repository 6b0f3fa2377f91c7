//! Builders for records and flows used across test suites.

use chrono::Utc;
use serde_json::{json, Value};

use los_config_core::{
    ConfigId, ConfigKind, ConfigScope, ConfigStatus, ConfigurationRecord, FlowConfig, ScreenFlowNode,
    ServiceBucket, ServiceCall, FLOW_END,
};

/// Fluent builder for `ConfigurationRecord`
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: ConfigurationRecord,
}

impl RecordBuilder {
    /// SCREEN record in DRAFT at product scope `PL`
    pub fn new(id: impl Into<ConfigId>, subject_id: &str) -> Self {
        Self {
            record: ConfigurationRecord::draft(
                id,
                ConfigKind::Screen,
                subject_id,
                ConfigScope::product("PL"),
                json!({ "subject": subject_id }),
            ),
        }
    }

    pub fn kind(mut self, kind: ConfigKind) -> Self {
        self.record.kind = kind;
        self
    }

    pub fn scope(mut self, scope: ConfigScope) -> Self {
        self.record.scope = scope;
        self
    }

    pub fn product(self, product_code: &str) -> Self {
        self.scope(ConfigScope::product(product_code))
    }

    pub fn partner(self, product_code: &str, partner_code: &str) -> Self {
        self.scope(ConfigScope::partner(product_code, partner_code))
    }

    pub fn branch(self, product_code: &str, partner_code: &str, branch_code: &str) -> Self {
        self.scope(ConfigScope::branch(product_code, partner_code, branch_code))
    }

    pub fn status(mut self, status: ConfigStatus) -> Self {
        self.record.status = status;
        self
    }

    pub fn active(self) -> Self {
        self.status(ConfigStatus::Active)
    }

    pub fn version(mut self, version: u32) -> Self {
        self.record.version = version;
        self
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.record.payload = payload;
        self
    }

    /// Stamp creation and update times with the current time
    pub fn timestamped(mut self) -> Self {
        let now = Utc::now();
        self.record.created_at = Some(now);
        self.record.updated_at = Some(now);
        self
    }

    pub fn build(self) -> ConfigurationRecord {
        self.record
    }
}

/// Creates a DRAFT screen record with the given scope
pub fn create_test_record(id: u64, subject_id: &str, scope: ConfigScope) -> ConfigurationRecord {
    RecordBuilder::new(id, subject_id).scope(scope).build()
}

/// Creates an ACTIVE screen record with the given scope
pub fn active_record(id: u64, subject_id: &str, scope: ConfigScope) -> ConfigurationRecord {
    RecordBuilder::new(id, subject_id).scope(scope).active().build()
}

/// Builds a flow from a chain of screen ids and optional extra routes
#[derive(Debug, Clone, Default)]
pub struct FlowBuilder {
    flow: FlowConfig,
}

impl FlowBuilder {
    pub fn new(start_screen: &str) -> Self {
        Self {
            flow: FlowConfig::new(start_screen),
        }
    }

    /// Add a screen with a default transition
    pub fn screen(mut self, screen_id: &str, default_next: &str) -> Self {
        self.flow
            .add_screen(ScreenFlowNode::new(screen_id).with_default_next(default_next));
        self
    }

    /// Add a screen with a default transition and one conditional route
    pub fn screen_with_condition(mut self, screen_id: &str, default_next: &str, when: &str, next: &str) -> Self {
        self.flow.add_screen(
            ScreenFlowNode::new(screen_id)
                .with_default_next(default_next)
                .with_condition(when, next),
        );
        self
    }

    /// Add a screen that calls one service before loading
    pub fn screen_with_service(mut self, screen_id: &str, default_next: &str, call: ServiceCall) -> Self {
        self.flow.add_screen(
            ScreenFlowNode::new(screen_id)
                .with_default_next(default_next)
                .with_service(ServiceBucket::PreLoad, call),
        );
        self
    }

    /// Add a pre-built node
    pub fn node(mut self, node: ScreenFlowNode) -> Self {
        self.flow.add_screen(node);
        self
    }

    pub fn build(self) -> FlowConfig {
        self.flow
    }
}

/// Creates a linear flow over `screen_ids` ending at the end-of-flow sentinel
pub fn create_test_flow(screen_ids: &[&str]) -> FlowConfig {
    let start = screen_ids.first().copied().unwrap_or_default();
    let mut builder = FlowBuilder::new(start);
    for (idx, screen_id) in screen_ids.iter().enumerate() {
        let next = screen_ids.get(idx + 1).copied().unwrap_or(FLOW_END);
        builder = builder.screen(screen_id, next);
    }
    builder.build()
}

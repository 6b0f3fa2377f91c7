use serde::{Deserialize, Serialize};

use super::{FlowCondition, ScreenServices, ServiceBucket, ServiceCall};

/// A screen node in a flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenFlowNode {
    /// Node identity, unique within the flow
    pub screen_id: String,

    /// Fallback transition: a screen id or the end-of-flow sentinel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_next: Option<String>,

    /// Conditional transitions, evaluated in order
    #[serde(default)]
    pub conditions: Vec<FlowCondition>,

    /// Service calls made by the screen
    #[serde(default)]
    pub services: ScreenServices,

    /// Whether the screen must be visited; see `FlowConfig::is_required`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Display/execution sequence number
    #[serde(default)]
    pub order: u32,
}

impl ScreenFlowNode {
    pub fn new(screen_id: impl Into<String>) -> Self {
        Self {
            screen_id: screen_id.into(),
            ..Default::default()
        }
    }

    pub fn with_default_next(mut self, next: impl Into<String>) -> Self {
        self.default_next = Some(next.into());
        self
    }

    pub fn with_condition(mut self, when: impl Into<serde_json::Value>, next: impl Into<String>) -> Self {
        self.conditions.push(FlowCondition::new(when, next));
        self
    }

    pub fn with_service(mut self, bucket: ServiceBucket, call: ServiceCall) -> Self {
        self.services.bucket_mut(bucket).push(call);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Non-blank default transition, if any
    pub fn default_target(&self) -> Option<&str> {
        self.default_next
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Every outgoing target: the default transition first, then conditions in order
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.default_target()
            .into_iter()
            .chain(self.conditions.iter().filter_map(FlowCondition::target))
    }
}

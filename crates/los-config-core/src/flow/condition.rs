use serde::{Deserialize, Serialize};

/// A conditional transition out of a screen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowCondition {
    /// Predicate description; opaque to validation
    #[serde(default)]
    pub when: serde_json::Value,

    /// What to do when the predicate holds
    #[serde(default)]
    pub then: ConditionAction,
}

/// Target of a conditional transition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionAction {
    /// Screen to route to, or the end-of-flow sentinel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_screen: Option<String>,
}

impl FlowCondition {
    /// Condition routing to `next_screen` when `when` holds
    pub fn new(when: impl Into<serde_json::Value>, next_screen: impl Into<String>) -> Self {
        Self {
            when: when.into(),
            then: ConditionAction {
                next_screen: Some(next_screen.into()),
            },
        }
    }

    /// The non-blank target, if any
    pub fn target(&self) -> Option<&str> {
        self.then
            .next_screen
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

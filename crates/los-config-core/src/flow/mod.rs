mod condition;
mod screen;
mod service;

pub use condition::{ConditionAction, FlowCondition};
pub use screen::ScreenFlowNode;
pub use service::{ScreenServices, ServiceBucket, ServiceCall, ServiceErrorPolicy};

use serde::{Deserialize, Serialize};

/// Reserved transition target that ends the flow normally
pub const FLOW_END: &str = "__FLOW_END__";

/// Returns true for the end-of-flow sentinel
pub fn is_flow_end(target: &str) -> bool {
    target == FLOW_END
}

/// A customer journey: a directed graph of screens entered at `start_screen`.
///
/// The order of `screens` is only the display/execution sequence; the graph
/// shape comes from each node's default and conditional transitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowConfig {
    /// Entry node
    #[serde(default)]
    pub start_screen: String,

    /// Screen nodes of the flow
    #[serde(default)]
    pub screens: Vec<ScreenFlowNode>,
}

impl FlowConfig {
    /// Create an empty flow entered at `start_screen`
    pub fn new(start_screen: impl Into<String>) -> Self {
        Self {
            start_screen: start_screen.into(),
            screens: Vec::new(),
        }
    }

    /// Append a screen at the end of the sequence.
    ///
    /// Assigns the next `order` when the node has none, and marks the node
    /// required only if it is the first screen and did not say otherwise.
    pub fn add_screen(&mut self, mut node: ScreenFlowNode) -> &mut Self {
        if node.order == 0 {
            node.order = self.screens.iter().map(|s| s.order).max().unwrap_or(0).saturating_add(1);
        }
        if node.required.is_none() {
            node.required = Some(self.screens.is_empty());
        }
        self.screens.push(node);
        self
    }

    /// First node with the given id
    pub fn screen(&self, screen_id: &str) -> Option<&ScreenFlowNode> {
        self.screens.iter().find(|s| s.screen_id == screen_id)
    }

    /// Whether the screen must be visited. Without an explicit flag only the
    /// first screen in sequence is required.
    pub fn is_required(&self, node: &ScreenFlowNode) -> bool {
        node.required.unwrap_or_else(|| {
            self.screens
                .iter()
                .min_by_key(|s| s.order)
                .map(|first| first.screen_id == node.screen_id)
                .unwrap_or(false)
        })
    }

    /// Sum of all nodes' conditional transitions
    pub fn conditional_route_count(&self) -> usize {
        self.screens.iter().map(|s| s.conditions.len()).sum()
    }

    /// Sum of all service calls across every bucket of every node
    pub fn service_call_count(&self) -> usize {
        self.screens.iter().map(|s| s.services.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_screen_assigns_order_and_required() {
        let mut flow = FlowConfig::new("personal-info");
        flow.add_screen(ScreenFlowNode::new("personal-info").with_default_next("income"))
            .add_screen(ScreenFlowNode::new("income").with_default_next(FLOW_END));

        assert_eq!(flow.screens[0].order, 1);
        assert_eq!(flow.screens[1].order, 2);
        assert_eq!(flow.screens[0].required, Some(true));
        assert_eq!(flow.screens[1].required, Some(false));
    }

    #[test]
    fn test_add_screen_order_saturates() {
        let mut flow = FlowConfig::new("a");
        let mut last = ScreenFlowNode::new("a").with_default_next("b");
        last.order = u32::MAX;
        flow.add_screen(last).add_screen(ScreenFlowNode::new("b").with_default_next(FLOW_END));

        assert_eq!(flow.screens[1].order, u32::MAX);
    }

    #[test]
    fn test_is_required_defaults_to_first_in_sequence() {
        let flow: FlowConfig = serde_json::from_str(
            r#"{
                "startScreen": "a",
                "screens": [
                    {"screenId": "b", "defaultNext": "__FLOW_END__", "order": 2},
                    {"screenId": "a", "defaultNext": "b", "order": 1},
                    {"screenId": "c", "defaultNext": "__FLOW_END__", "order": 3, "required": true}
                ]
            }"#,
        )
        .unwrap();

        assert!(flow.is_required(flow.screen("a").unwrap()));
        assert!(!flow.is_required(flow.screen("b").unwrap()));
        assert!(flow.is_required(flow.screen("c").unwrap()));
    }

    #[test]
    fn test_counts() {
        let mut flow = FlowConfig::new("a");
        flow.add_screen(
            ScreenFlowNode::new("a")
                .with_default_next("b")
                .with_condition("income > 50000", "c")
                .with_service(ServiceBucket::PreLoad, ServiceCall::new("/api/applicant"))
                .with_service(ServiceBucket::OnSubmit, ServiceCall::new("/api/save")),
        );
        flow.add_screen(ScreenFlowNode::new("b").with_condition("x", FLOW_END));

        assert_eq!(flow.conditional_route_count(), 2);
        assert_eq!(flow.service_call_count(), 2);
    }
}

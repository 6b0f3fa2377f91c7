use crate::flow::{is_flow_end, FlowConfig};
use crate::validation::{error_codes, FlowContext, ValidationIssue, Validator};

/// Validates screen references in a flow:
/// - The start screen
/// - Node identities
/// - Default transitions (defaultNext)
/// - Conditional transitions (conditions[].then.nextScreen)
pub struct ReferenceValidator;

impl ReferenceValidator {
    /// Create a new reference validator
    pub fn new() -> Self {
        ReferenceValidator
    }

    /// The start screen must be known and must be a node of this flow.
    fn validate_start_screen(&self, context: &FlowContext<'_>) -> Vec<ValidationIssue> {
        let mut errors = Vec::new();
        let start = context.flow.start_screen.trim();

        if start.is_empty() {
            errors.push(ValidationIssue::new(
                error_codes::MISSING_REQUIRED_FIELD,
                "Flow has no start screen",
                Some("startScreen".to_string()),
            ));
            return errors;
        }

        if !context.is_available(start) {
            errors.push(ValidationIssue::new(
                error_codes::INVALID_REFERENCE,
                format!("Start screen '{}' does not exist", start),
                Some("startScreen".to_string()),
            ));
        }

        if context.flow.screen(start).is_none() {
            errors.push(ValidationIssue::new(
                error_codes::START_NOT_IN_FLOW,
                format!("Start screen '{}' is not part of this flow's screens", start),
                Some("startScreen".to_string()),
            ));
        }

        errors
    }

    /// Each node's own screen id must be known.
    fn validate_node_references(&self, context: &FlowContext<'_>) -> Vec<ValidationIssue> {
        let mut errors = Vec::new();

        for (idx, node) in context.flow.screens.iter().enumerate() {
            if !context.is_available(&node.screen_id) {
                errors.push(ValidationIssue::new(
                    error_codes::INVALID_REFERENCE,
                    format!("Screen '{}' does not exist", node.screen_id),
                    Some(format!("screens[{}].screenId", idx)),
                ));
            }
        }

        errors
    }

    /// Every node needs a default transition, pointing at a known screen or the end of the flow.
    fn validate_default_transitions(&self, context: &FlowContext<'_>) -> Vec<ValidationIssue> {
        let mut errors = Vec::new();

        for (idx, node) in context.flow.screens.iter().enumerate() {
            match node.default_target() {
                None => errors.push(ValidationIssue::new(
                    error_codes::MISSING_REQUIRED_FIELD,
                    format!("Screen '{}' has no default next screen", node.screen_id),
                    Some(format!("screens[{}].defaultNext", idx)),
                )),
                Some(target) if !is_flow_end(target) && !context.is_available(target) => {
                    errors.push(ValidationIssue::new(
                        error_codes::INVALID_REFERENCE,
                        format!(
                            "Screen '{}' routes by default to non-existent screen '{}'",
                            node.screen_id, target
                        ),
                        Some(format!("screens[{}].defaultNext", idx)),
                    ))
                }
                Some(_) => {}
            }
        }

        errors
    }

    /// Conditional targets, when present, must be known screens or the end of the flow.
    fn validate_conditional_transitions(&self, context: &FlowContext<'_>) -> Vec<ValidationIssue> {
        let mut errors = Vec::new();

        for (idx, node) in context.flow.screens.iter().enumerate() {
            for (cond_idx, condition) in node.conditions.iter().enumerate() {
                let Some(target) = condition.target() else {
                    continue;
                };
                if is_flow_end(target) || context.is_available(target) {
                    continue;
                }
                errors.push(ValidationIssue::new(
                    error_codes::INVALID_REFERENCE,
                    format!(
                        "Condition #{} of screen '{}' routes to non-existent screen '{}'",
                        cond_idx + 1,
                        node.screen_id,
                        target
                    ),
                    Some(format!("screens[{}].conditions[{}].then.nextScreen", idx, cond_idx)),
                ));
            }
        }

        errors
    }
}

impl Default for ReferenceValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for ReferenceValidator {
    fn validate(&self, context: &FlowContext<'_>) -> Vec<ValidationIssue> {
        let flow: &FlowConfig = context.flow;
        let mut errors = Vec::with_capacity(flow.screens.len());

        errors.extend(self.validate_start_screen(context));
        errors.extend(self.validate_node_references(context));
        errors.extend(self.validate_default_transitions(context));
        errors.extend(self.validate_conditional_transitions(context));

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{ScreenFlowNode, FLOW_END};

    fn create_test_flow(start: &str, screens: Vec<ScreenFlowNode>) -> FlowConfig {
        let mut flow = FlowConfig::new(start);
        for screen in screens {
            flow.add_screen(screen);
        }
        flow
    }

    #[test]
    fn test_validate_start_screen() {
        let validator = ReferenceValidator::new();
        let available = ["A", "B", "C"];

        // Known and wired in - should be valid
        let flow = create_test_flow("A", vec![ScreenFlowNode::new("A").with_default_next(FLOW_END)]);
        let errors = validator.validate_start_screen(&FlowContext::new(&flow, &available));
        assert!(errors.is_empty(), "Should not find errors with a valid start screen");

        // Known screen that is not a node of the flow
        let flow = create_test_flow("C", vec![ScreenFlowNode::new("A").with_default_next(FLOW_END)]);
        let errors = validator.validate_start_screen(&FlowContext::new(&flow, &available));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, error_codes::START_NOT_IN_FLOW);

        // Unknown screen that is not a node either - both errors
        let flow = create_test_flow("X", vec![ScreenFlowNode::new("A").with_default_next(FLOW_END)]);
        let errors = validator.validate_start_screen(&FlowContext::new(&flow, &available));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].code, error_codes::INVALID_REFERENCE);
        assert_eq!(errors[1].code, error_codes::START_NOT_IN_FLOW);

        // Edge case: empty start screen
        let flow = create_test_flow("", vec![]);
        let errors = validator.validate_start_screen(&FlowContext::new(&flow, &available));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, error_codes::MISSING_REQUIRED_FIELD);
    }

    #[test]
    fn test_validate_node_references() {
        let validator = ReferenceValidator::new();
        let flow = create_test_flow("A", vec![
            ScreenFlowNode::new("A").with_default_next("B"),
            ScreenFlowNode::new("ghost").with_default_next(FLOW_END),
        ]);

        let errors = validator.validate_node_references(&FlowContext::new(&flow, &["A", "B"]));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("ghost"));
        assert_eq!(errors[0].path.as_deref(), Some("screens[1].screenId"));
    }

    #[test]
    fn test_validate_default_transitions() {
        let validator = ReferenceValidator::new();
        let available = ["A", "B"];

        let flow = create_test_flow("A", vec![
            ScreenFlowNode::new("A").with_default_next("B"),
            ScreenFlowNode::new("B").with_default_next(FLOW_END),
        ]);
        let errors = validator.validate_default_transitions(&FlowContext::new(&flow, &available));
        assert!(errors.is_empty(), "End-of-flow sentinel is exempt from existence checks");

        let flow = create_test_flow("A", vec![
            ScreenFlowNode::new("A").with_default_next("Z"),
            ScreenFlowNode::new("B"),
        ]);
        let errors = validator.validate_default_transitions(&FlowContext::new(&flow, &available));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].code, error_codes::INVALID_REFERENCE);
        assert!(errors[0].message.contains("'Z'"));
        assert_eq!(errors[1].code, error_codes::MISSING_REQUIRED_FIELD);
        assert!(errors[1].message.contains("'B'"));
    }

    #[test]
    fn test_validate_conditional_transitions() {
        let validator = ReferenceValidator::new();
        let mut flow = create_test_flow("A", vec![
            ScreenFlowNode::new("A")
                .with_default_next(FLOW_END)
                .with_condition("age < 21", "B")
                .with_condition("age > 65", "missing")
                .with_condition("declined", FLOW_END),
        ]);
        // A condition without a target is not an error
        flow.screens[0].conditions.push(Default::default());

        let errors = validator.validate_conditional_transitions(&FlowContext::new(&flow, &["A", "B"]));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Condition #2"));
        assert!(errors[0].message.contains("missing"));
        assert_eq!(errors[0].path.as_deref(), Some("screens[0].conditions[1].then.nextScreen"));
    }

    #[test]
    fn test_validate_empty_flow() {
        let validator = ReferenceValidator::new();
        let flow = create_test_flow("A", vec![]);
        let available: [&str; 0] = [];

        let errors = validator.validate(&FlowContext::new(&flow, &available));
        assert_eq!(errors.len(), 2, "Unknown start screen and start not in flow");
    }
}

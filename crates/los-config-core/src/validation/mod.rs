use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::error::Error;

use crate::flow::FlowConfig;

mod flow_validator;
mod reference;
mod services;

pub use flow_validator::FlowValidator;
pub use reference::ReferenceValidator;
pub use services::ServiceValidator;

/// How a finding affects activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks activation
    Error,
    /// Reported but never blocks
    Warning,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    /// Error code (should be a constant identifier)
    pub code: &'static str,

    /// Human-readable message
    pub message: String,

    /// Optional path to the location of the finding (e.g., "screens[2].defaultNext")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Error or warning
    pub severity: Severity,
}

impl ValidationIssue {
    /// Blocking finding
    pub fn new(code: &'static str, message: impl Into<String>, path: Option<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path,
            severity: Severity::Error,
        }
    }

    /// Non-blocking finding
    pub fn warning(code: &'static str, message: impl Into<String>, path: Option<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::new(code, message, path)
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl Error for ValidationIssue {}

/// Validation error codes
pub mod error_codes {
    /// Reference to a screen that does not exist
    pub const INVALID_REFERENCE: &str = "ERR_VALIDATION_INVALID_REFERENCE";

    /// Start screen exists but is not a node of the flow
    pub const START_NOT_IN_FLOW: &str = "ERR_VALIDATION_START_NOT_IN_FLOW";

    /// Duplicate ID found
    pub const DUPLICATE_ID: &str = "ERR_VALIDATION_DUPLICATE_ID";

    /// Circular dependency detected
    pub const CIRCULAR_DEPENDENCY: &str = "ERR_VALIDATION_CIRCULAR_DEPENDENCY";

    /// Missing required field
    pub const MISSING_REQUIRED_FIELD: &str = "ERR_VALIDATION_MISSING_REQUIRED_FIELD";

    /// Field not allowed for the scope type
    pub const FORBIDDEN_FIELD: &str = "ERR_VALIDATION_FORBIDDEN_FIELD";

    /// Unknown scope type
    pub const INVALID_SCOPE_TYPE: &str = "ERR_VALIDATION_INVALID_SCOPE_TYPE";

    /// Scope type not allowed for the configuration kind
    pub const SCOPE_NOT_ALLOWED: &str = "ERR_VALIDATION_SCOPE_NOT_ALLOWED";

    /// Scope changed after creation
    pub const SCOPE_IMMUTABLE: &str = "ERR_VALIDATION_SCOPE_IMMUTABLE";

    /// Screen cannot be reached from the start screen
    pub const UNREACHABLE_SCREEN: &str = "WARN_VALIDATION_UNREACHABLE_SCREEN";

    /// Service call without endpoint
    pub const MISSING_ENDPOINT: &str = "WARN_VALIDATION_MISSING_ENDPOINT";

    /// Service call without onError policy
    pub const MISSING_ERROR_POLICY: &str = "WARN_VALIDATION_MISSING_ERROR_POLICY";
}

/// Inputs shared by all flow validators
pub struct FlowContext<'a> {
    /// The flow under validation
    pub flow: &'a FlowConfig,

    /// Universe of known screen identifiers
    pub available: HashSet<&'a str>,
}

impl<'a> FlowContext<'a> {
    pub fn new<S: AsRef<str>>(flow: &'a FlowConfig, available_screen_ids: &'a [S]) -> Self {
        Self {
            flow,
            available: available_screen_ids.iter().map(|s| s.as_ref()).collect(),
        }
    }

    /// True if the screen id is known to the registry
    pub fn is_available(&self, screen_id: &str) -> bool {
        self.available.contains(screen_id)
    }
}

/// A trait for validators that check specific aspects of a flow
pub trait Validator {
    /// Validate the flow and return every finding (errors and warnings)
    fn validate(&self, context: &FlowContext<'_>) -> Vec<ValidationIssue>;
}

/// Counts reported alongside every flow validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSummary {
    pub screens: usize,
    pub conditional_routes: usize,
    pub service_calls: usize,
    pub warnings: usize,
    pub errors: usize,
}

/// Structured report of a flow validation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowValidationResult {
    /// True iff `errors` is empty
    pub is_valid: bool,

    /// Findings that block activation
    pub errors: Vec<ValidationIssue>,

    /// Findings that never affect validity
    pub warnings: Vec<ValidationIssue>,

    pub summary: FlowSummary,
}

impl FlowValidationResult {
    /// Error messages only, in report order
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    /// Warning messages only, in report order
    pub fn warning_messages(&self) -> Vec<&str> {
        self.warnings.iter().map(|w| w.message.as_str()).collect()
    }
}

/// Validate a flow against the set of known screen ids.
///
/// Pure: depends only on the two inputs and never mutates the flow.
pub fn validate_flow<S: AsRef<str>>(flow: &FlowConfig, available_screen_ids: &[S]) -> FlowValidationResult {
    let context = FlowContext::new(flow, available_screen_ids);

    // Get a list of all validators
    let validators: Vec<Box<dyn Validator>> = vec![
        Box::new(ReferenceValidator::new()),
        Box::new(FlowValidator::new()),
        Box::new(ServiceValidator::new()),
    ];

    let (errors, warnings): (Vec<_>, Vec<_>) = validators
        .iter()
        .flat_map(|validator| validator.validate(&context))
        .partition(ValidationIssue::is_error);

    let summary = FlowSummary {
        screens: flow.screens.len(),
        conditional_routes: flow.conditional_route_count(),
        service_calls: flow.service_call_count(),
        warnings: warnings.len(),
        errors: errors.len(),
    };

    tracing::debug!(
        start_screen = %flow.start_screen,
        screens = summary.screens,
        errors = summary.errors,
        warnings = summary.warnings,
        "Flow validated"
    );

    FlowValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{ScreenFlowNode, ServiceBucket, ServiceCall, FLOW_END};

    fn two_screen_flow() -> FlowConfig {
        let mut flow = FlowConfig::new("A");
        flow.add_screen(ScreenFlowNode::new("A").with_default_next("B"))
            .add_screen(ScreenFlowNode::new("B").with_default_next(FLOW_END));
        flow
    }

    #[test]
    fn test_valid_flow() {
        let result = validate_flow(&two_screen_flow(), &["A", "B"]);

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.summary.screens, 2);
        assert_eq!(result.summary.conditional_routes, 0);
        assert_eq!(result.summary.service_calls, 0);
    }

    #[test]
    fn test_warnings_do_not_affect_validity() {
        let mut flow = two_screen_flow();
        flow.screens[0] = flow.screens[0].clone().with_service(
            ServiceBucket::PreLoad,
            ServiceCall { endpoint: None, ..ServiceCall::new("") },
        );

        let result = validate_flow(&flow, &["A", "B"]);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.summary.warnings, 1);
        assert_eq!(result.summary.service_calls, 1);
    }

    #[test]
    fn test_summary_computed_for_invalid_flow() {
        let mut flow = two_screen_flow();
        flow.screens[1].default_next = Some("A".to_string());

        let result = validate_flow(&flow, &["A", "B"]);
        assert!(!result.is_valid);
        assert_eq!(result.summary.screens, 2);
        assert_eq!(result.summary.errors, result.errors.len());
    }

    #[test]
    fn test_validation_does_not_mutate_flow() {
        let flow = two_screen_flow();
        let before = flow.clone();
        let _ = validate_flow(&flow, &["A"]);
        assert_eq!(flow, before);
    }

    #[test]
    fn test_issue_display() {
        let issue = ValidationIssue::warning(error_codes::MISSING_ENDPOINT, "no endpoint", Some("screens[0]".to_string()));
        assert_eq!(issue.to_string(), "WARN_VALIDATION_MISSING_ENDPOINT: no endpoint (at screens[0])");
        assert!(!issue.is_error());
    }
}

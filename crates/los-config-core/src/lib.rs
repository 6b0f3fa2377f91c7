//! # LOS Configuration Core
//!
//! Decides which configuration object applies to a loan-origination request
//! and checks screen flows before they go live.
//!
//! ## Features
//!
//! * Scope rules for PRODUCT, PARTNER and BRANCH configuration
//! * BRANCH → PARTNER → PRODUCT resolution with an inheritance chain and search trace
//! * Activation conflict check with branch impact reporting
//! * Flow graph validation: references, duplicates, cycles, reachability, services
//! * Lifecycle service over a pluggable repository
//!
//! ## Example
//!
//! ```
//! use los_config_core::parse_and_validate_flow;
//!
//! let yaml = r#"
//! startScreen: personal-info
//! screens:
//!   - screenId: personal-info
//!     defaultNext: income
//!   - screenId: income
//!     defaultNext: __FLOW_END__
//!     conditions:
//!       - when: { field: income, op: gt, value: 100000 }
//!         then: { nextScreen: __FLOW_END__ }
//! "#;
//!
//! let (flow, result) = parse_and_validate_flow(yaml, &["personal-info", "income"]).unwrap();
//! assert_eq!(flow.screens.len(), 2);
//! assert!(result.is_valid);
//! assert_eq!(result.summary.conditional_routes, 1);
//! ```

mod error;
mod parser;

pub mod activation;
pub mod config;
pub mod flow;
pub mod logging;
pub mod record;
pub mod repository;
pub mod resolver;
pub mod scope;
pub mod service;
pub mod validation;

pub use activation::{check_activation, ActivationCheck, ActivationImpact};
pub use config::CoreConfig;
pub use error::{ConfigError, ResolutionError};
pub use flow::{
    is_flow_end, ConditionAction, FlowCondition, FlowConfig, ScreenFlowNode, ScreenServices, ServiceBucket,
    ServiceCall, ServiceErrorPolicy, FLOW_END,
};
pub use logging::init_logging;
pub use parser::{parse_flow_config, parse_records};
pub use record::{ConfigId, ConfigKind, ConfigStatus, ConfigurationRecord};
pub use repository::ConfigurationRepository;
pub use resolver::{RequestScope, ResolutionStep, ResolvedConfig, ScopeResolver};
pub use scope::{
    scope_identifier, validate_scope, validate_scope_change, validate_scope_for_kind, ConfigScope, ScopeType,
    ScopeValidation,
};
pub use service::{ActivationOutcome, ConfigurationService};
pub use validation::{validate_flow, FlowSummary, FlowValidationResult, Severity, ValidationIssue};

/// Parse a flow document and validate it against the known screen ids.
///
/// Syntax errors are returned as `ConfigError`; graph findings are returned
/// as data in the `FlowValidationResult`.
pub fn parse_and_validate_flow<S: AsRef<str>>(
    text: &str,
    available_screen_ids: &[S],
) -> Result<(FlowConfig, FlowValidationResult), ConfigError> {
    let flow = parse_flow_config(text)?;
    let result = validate_flow(&flow, available_screen_ids);
    Ok((flow, result))
}

/// Returns the version of the crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_validate_reports_findings_as_data() {
        let yaml = r#"
        startScreen: a
        screens:
          - screenId: a
            defaultNext: missing
        "#;

        let (_, result) = parse_and_validate_flow(yaml, &["a"]).unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].message.contains("missing"));
    }

    #[test]
    fn test_parse_and_validate_syntax_error() {
        let err = parse_and_validate_flow("startScreen: [", &["a"]).unwrap_err();
        assert_eq!(err.error_code(), "ERR_CONFIG_YAML_PARSE");
    }

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}

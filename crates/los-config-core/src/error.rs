use thiserror::Error;
use crate::validation::ValidationIssue;
use std::fmt;

/// Raised by the Scope Resolver when no usable configuration exists
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// No ACTIVE product-level record for the subject and product
    #[error("No active PRODUCT-level configuration for '{subject_id}' in product '{product_code}'")]
    NoProductDefault {
        /// Subject (screen or flow id) that was being resolved
        subject_id: String,
        /// Product code taken from the request context
        product_code: String,
    },
}

/// All errors raised by the configuration core and its collaborators
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Errors that occur during YAML parsing
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Errors that occur during JSON processing
    #[error("JSON processing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Scope resolution failed
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// A scope broke the per-type field rules
    #[error("{}", IssuesFormat("Invalid scope", .0))]
    InvalidScope(Vec<ValidationIssue>),

    /// A write tried to change the scope of an existing record
    #[error("Scope is immutable for configuration '{0}'")]
    ScopeImmutable(String),

    /// Storage-level uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Record lookup failed
    #[error("Configuration not found: {0}")]
    NotFound(String),

    /// Storage backend failure
    #[error("Store error: {0}")]
    StoreError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

// Helper struct to format a list of issues
struct IssuesFormat<'a>(&'a str, &'a [ValidationIssue]);

impl fmt::Display for IssuesFormat<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} issues):", self.0, self.1.len())?;
        for (i, issue) in self.1.iter().enumerate() {
            write!(f, "\n  {}. {}", i + 1, issue)?;
        }
        Ok(())
    }
}

impl ConfigError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::YamlError(_) => "ERR_CONFIG_YAML_PARSE",
            ConfigError::JsonError(_) => "ERR_CONFIG_JSON_PARSE",
            ConfigError::Resolution(_) => "ERR_CONFIG_RESOLUTION",
            ConfigError::InvalidScope(_) => "ERR_CONFIG_INVALID_SCOPE",
            ConfigError::ScopeImmutable(_) => "ERR_CONFIG_SCOPE_IMMUTABLE",
            ConfigError::Conflict(_) => "ERR_CONFIG_CONFLICT",
            ConfigError::NotFound(_) => "ERR_CONFIG_NOT_FOUND",
            ConfigError::StoreError(_) => "ERR_CONFIG_STORE",
            ConfigError::InternalError(_) => "ERR_CONFIG_INTERNAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::error_codes;

    #[test]
    fn test_invalid_scope_lists_every_issue() {
        let err = ConfigError::InvalidScope(vec![
            ValidationIssue::new(error_codes::MISSING_REQUIRED_FIELD, "partner code is required", None),
            ValidationIssue::new(error_codes::FORBIDDEN_FIELD, "branch code is not allowed", None),
        ]);

        let text = err.to_string();
        assert!(text.contains("2 issues"));
        assert!(text.contains("partner code is required"));
        assert!(text.contains("branch code is not allowed"));
        assert_eq!(err.error_code(), "ERR_CONFIG_INVALID_SCOPE");
    }

    #[test]
    fn test_resolution_error_converts() {
        let err: ConfigError = ResolutionError::NoProductDefault {
            subject_id: "applicant-info".to_string(),
            product_code: "PL".to_string(),
        }
        .into();

        assert_eq!(err.error_code(), "ERR_CONFIG_RESOLUTION");
        assert!(err.to_string().contains("applicant-info"));
        assert!(err.to_string().contains("PL"));
    }
}

//! Scope model and the rules every scope must satisfy.
//!
//! A scope pins a configuration record to a PRODUCT, to a PARTNER within a
//! product, or to a BRANCH of a partner. Which codes are populated is fully
//! determined by the scope type, and a record's scope never changes once the
//! record exists.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::ConfigKind;
use crate::validation::{error_codes, ValidationIssue};

/// Applicability level of a configuration record.
///
/// Unknown wire values are kept as `Unrecognized` so that scope validation can
/// report them instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScopeType {
    /// Product-wide default
    Product,
    /// Partner override within a product
    Partner,
    /// Branch override within a partner
    Branch,
    /// Any other value found on the wire
    Unrecognized(String),
}

impl ScopeType {
    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            ScopeType::Product => "PRODUCT",
            ScopeType::Partner => "PARTNER",
            ScopeType::Branch => "BRANCH",
            ScopeType::Unrecognized(other) => other,
        }
    }
}

impl From<String> for ScopeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PRODUCT" => ScopeType::Product,
            "PARTNER" => ScopeType::Partner,
            "BRANCH" => ScopeType::Branch,
            _ => ScopeType::Unrecognized(value),
        }
    }
}

impl From<ScopeType> for String {
    fn from(value: ScopeType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope of a configuration record, in its wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigScope {
    /// Scope level
    #[serde(rename = "type")]
    pub scope_type: ScopeType,

    /// Product code, required for every scope type
    #[serde(default)]
    pub product_code: String,

    /// Partner code, required for PARTNER and BRANCH
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_code: Option<String>,

    /// Branch code, required for BRANCH
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_code: Option<String>,
}

impl ConfigScope {
    /// Product-level scope
    pub fn product(product_code: impl Into<String>) -> Self {
        Self {
            scope_type: ScopeType::Product,
            product_code: product_code.into(),
            partner_code: None,
            branch_code: None,
        }
    }

    /// Partner-level scope
    pub fn partner(product_code: impl Into<String>, partner_code: impl Into<String>) -> Self {
        Self {
            scope_type: ScopeType::Partner,
            product_code: product_code.into(),
            partner_code: Some(partner_code.into()),
            branch_code: None,
        }
    }

    /// Branch-level scope
    pub fn branch(
        product_code: impl Into<String>,
        partner_code: impl Into<String>,
        branch_code: impl Into<String>,
    ) -> Self {
        Self {
            scope_type: ScopeType::Branch,
            product_code: product_code.into(),
            partner_code: Some(partner_code.into()),
            branch_code: Some(branch_code.into()),
        }
    }

    /// Partner code if populated (blank counts as absent)
    pub fn effective_partner(&self) -> Option<&str> {
        present(self.partner_code.as_deref())
    }

    /// Branch code if populated (blank counts as absent)
    pub fn effective_branch(&self) -> Option<&str> {
        present(self.branch_code.as_deref())
    }

    /// True when both scopes name the same type and the same codes
    pub fn same_tuple(&self, other: &ConfigScope) -> bool {
        self.scope_type == other.scope_type
            && self.product_code.trim() == other.product_code.trim()
            && self.effective_partner() == other.effective_partner()
            && self.effective_branch() == other.effective_branch()
    }
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&scope_identifier(self))
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Outcome of a scope check. Every violated rule is listed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeValidation {
    /// True iff `errors` is empty
    pub is_valid: bool,

    /// All violated rules
    pub errors: Vec<ValidationIssue>,
}

impl ScopeValidation {
    fn from_errors(errors: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Check the required and forbidden fields for the scope's type.
pub fn validate_scope(scope: &ConfigScope) -> ScopeValidation {
    let mut errors = Vec::new();

    let (needs_partner, needs_branch) = match &scope.scope_type {
        ScopeType::Product => (false, false),
        ScopeType::Partner => (true, false),
        ScopeType::Branch => (true, true),
        ScopeType::Unrecognized(other) => {
            return ScopeValidation::from_errors(vec![ValidationIssue::new(
                error_codes::INVALID_SCOPE_TYPE,
                format!("Invalid scope type: '{}'", other),
                Some("scope.type".to_string()),
            )]);
        }
    };

    if present(Some(&scope.product_code)).is_none() {
        errors.push(ValidationIssue::new(
            error_codes::MISSING_REQUIRED_FIELD,
            format!("product code is required for {} scope", scope.scope_type),
            Some("scope.productCode".to_string()),
        ));
    }

    match (needs_partner, scope.effective_partner()) {
        (true, None) => errors.push(ValidationIssue::new(
            error_codes::MISSING_REQUIRED_FIELD,
            format!("partner code is required for {} scope", scope.scope_type),
            Some("scope.partnerCode".to_string()),
        )),
        (false, Some(_)) => errors.push(ValidationIssue::new(
            error_codes::FORBIDDEN_FIELD,
            format!("partner code is not allowed for {} scope", scope.scope_type),
            Some("scope.partnerCode".to_string()),
        )),
        _ => {}
    }

    match (needs_branch, scope.effective_branch()) {
        (true, None) => errors.push(ValidationIssue::new(
            error_codes::MISSING_REQUIRED_FIELD,
            format!("branch code is required for {} scope", scope.scope_type),
            Some("scope.branchCode".to_string()),
        )),
        (false, Some(_)) => errors.push(ValidationIssue::new(
            error_codes::FORBIDDEN_FIELD,
            format!("branch code is not allowed for {} scope", scope.scope_type),
            Some("scope.branchCode".to_string()),
        )),
        _ => {}
    }

    ScopeValidation::from_errors(errors)
}

/// `validate_scope` plus the per-kind restriction: flows are never branch-scoped.
pub fn validate_scope_for_kind(kind: ConfigKind, scope: &ConfigScope) -> ScopeValidation {
    let mut validation = validate_scope(scope);

    if kind == ConfigKind::Flow && scope.scope_type == ScopeType::Branch {
        validation.errors.push(ValidationIssue::new(
            error_codes::SCOPE_NOT_ALLOWED,
            "BRANCH scope is not allowed for flow configurations; use PRODUCT or PARTNER",
            Some("scope.type".to_string()),
        ));
        validation.is_valid = false;
    }

    validation
}

/// Reject any change of type or codes between the stored and the new scope.
pub fn validate_scope_change(old_scope: &ConfigScope, new_scope: &ConfigScope) -> ScopeValidation {
    if !old_scope.same_tuple(new_scope) {
        ScopeValidation::from_errors(vec![ValidationIssue::new(
            error_codes::SCOPE_IMMUTABLE,
            format!(
                "scope is immutable: cannot change '{}' to '{}' after creation",
                old_scope, new_scope
            ),
            Some("scope".to_string()),
        )])
    } else {
        ScopeValidation::from_errors(Vec::new())
    }
}

/// Human-readable path of a scope, e.g. `PL > ACME > B01`. Display only.
pub fn scope_identifier(scope: &ConfigScope) -> String {
    let product = scope.product_code.as_str();
    match scope.scope_type {
        ScopeType::Product | ScopeType::Unrecognized(_) => product.to_string(),
        ScopeType::Partner => format!("{} > {}", product, scope.effective_partner().unwrap_or("")),
        ScopeType::Branch => format!(
            "{} > {} > {}",
            product,
            scope.effective_partner().unwrap_or(""),
            scope.effective_branch().unwrap_or("")
        ),
    }
}

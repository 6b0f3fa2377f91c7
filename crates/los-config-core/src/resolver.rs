//! Selects the configuration record that applies to a request context.
//!
//! Resolution walks from the most specific scope the request names down to the
//! product default: BRANCH, then PARTNER, then PRODUCT. Only ACTIVE records of
//! the requested product are considered. A product-level record is mandatory.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::error::ResolutionError;
use crate::record::ConfigurationRecord;
use crate::scope::ScopeType;

/// The caller's context: product is required, partner and branch optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestScope {
    pub product_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_code: Option<String>,
}

impl RequestScope {
    pub fn product(product_code: impl Into<String>) -> Self {
        Self {
            product_code: product_code.into(),
            ..Default::default()
        }
    }

    pub fn with_partner(mut self, partner_code: impl Into<String>) -> Self {
        self.partner_code = Some(partner_code.into());
        self
    }

    pub fn with_branch(mut self, branch_code: impl Into<String>) -> Self {
        self.branch_code = Some(branch_code.into());
        self
    }

    fn partner(&self) -> Option<&str> {
        self.partner_code.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    fn branch(&self) -> Option<&str> {
        self.branch_code.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }
}

/// One probe of the search: which level was tried and whether it matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionStep {
    pub level: ScopeType,
    pub found: bool,
}

impl fmt::Display for ResolutionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.found {
            write!(f, "{}", self.level)
        } else {
            write!(f, "{} (not found)", self.level)
        }
    }
}

/// Result of a successful resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig<P = serde_json::Value> {
    /// The record in force for the request
    pub record: ConfigurationRecord<P>,

    /// Level that satisfied the request
    pub resolved_from: ScopeType,

    /// Every level applicable to the request, most specific first, ending in PRODUCT.
    /// Independent of where resolution succeeded.
    pub inheritance_chain: Vec<ScopeType>,

    /// Levels actually probed, in order
    pub search_trace: Vec<ResolutionStep>,
}

impl<P> ResolvedConfig<P> {
    /// Search trace in display form, e.g. `["BRANCH (not found)", "PARTNER"]`
    pub fn search_trace_labels(&self) -> Vec<String> {
        self.search_trace.iter().map(ToString::to_string).collect()
    }
}

/// Scope resolver. The flow variant never looks at the BRANCH level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeResolver {
    allow_branch_level: bool,
}

impl Default for ScopeResolver {
    fn default() -> Self {
        Self::general()
    }
}

impl ScopeResolver {
    /// Resolver for screens, validations and field mappings
    pub fn general() -> Self {
        Self { allow_branch_level: true }
    }

    /// Resolver for flows, which are never branch-scoped
    pub fn flows() -> Self {
        Self { allow_branch_level: false }
    }

    pub fn with_branch_level(allow_branch_level: bool) -> Self {
        Self { allow_branch_level }
    }

    pub fn allows_branch_level(&self) -> bool {
        self.allow_branch_level
    }

    /// Levels applicable to the request, most specific first
    pub fn inheritance_chain(&self, request: &RequestScope) -> Vec<ScopeType> {
        let mut chain = Vec::with_capacity(3);
        if self.allow_branch_level && request.branch().is_some() {
            chain.push(ScopeType::Branch);
        }
        if request.partner().is_some() {
            chain.push(ScopeType::Partner);
        }
        chain.push(ScopeType::Product);
        chain
    }

    /// Resolve the record that applies to `subject_id` under `request`.
    ///
    /// `candidates` may hold records for any subject and scope; they are
    /// filtered here. The result depends only on the inputs.
    pub fn resolve<P: Clone>(
        &self,
        subject_id: &str,
        request: &RequestScope,
        candidates: &[ConfigurationRecord<P>],
    ) -> Result<ResolvedConfig<P>, ResolutionError> {
        let product_code = request.product_code.trim();
        let active: Vec<&ConfigurationRecord<P>> = candidates
            .iter()
            .filter(|c| c.subject_id == subject_id && c.scope.product_code.trim() == product_code)
            .filter(|c| c.is_active())
            .collect();

        // The product default is mandatory even when a more specific level matches
        let product_default = pick(subject_id, ScopeType::Product, active.iter().copied().filter(|c| {
            c.scope.scope_type == ScopeType::Product
        }));
        let Some(product_default) = product_default else {
            warn!(
                subject_id = %subject_id,
                product_code = %product_code,
                "No active PRODUCT-level configuration"
            );
            return Err(ResolutionError::NoProductDefault {
                subject_id: subject_id.to_string(),
                product_code: product_code.to_string(),
            });
        };

        let mut search_trace = Vec::with_capacity(3);
        let mut matched: Option<(&ConfigurationRecord<P>, ScopeType)> = None;

        if self.allow_branch_level {
            if let Some(branch) = request.branch() {
                let hit = pick(subject_id, ScopeType::Branch, active.iter().copied().filter(|c| {
                    c.scope.scope_type == ScopeType::Branch
                        && c.scope.effective_partner() == request.partner()
                        && c.scope.effective_branch() == Some(branch)
                }));
                search_trace.push(ResolutionStep { level: ScopeType::Branch, found: hit.is_some() });
                matched = hit.map(|r| (r, ScopeType::Branch));
            }
        }

        if matched.is_none() {
            if let Some(partner) = request.partner() {
                let hit = pick(subject_id, ScopeType::Partner, active.iter().copied().filter(|c| {
                    c.scope.scope_type == ScopeType::Partner && c.scope.effective_partner() == Some(partner)
                }));
                search_trace.push(ResolutionStep { level: ScopeType::Partner, found: hit.is_some() });
                matched = hit.map(|r| (r, ScopeType::Partner));
            }
        }

        let (record, resolved_from) = match matched {
            Some(hit) => hit,
            None => {
                search_trace.push(ResolutionStep { level: ScopeType::Product, found: true });
                (product_default, ScopeType::Product)
            }
        };

        debug!(
            subject_id = %subject_id,
            resolved_from = %resolved_from,
            scope = %record.scope,
            config_id = %record.id,
            "Configuration resolved"
        );

        Ok(ResolvedConfig {
            record: record.clone(),
            resolved_from,
            inheritance_chain: self.inheritance_chain(request),
            search_trace,
        })
    }
}

/// Pick one record among the matches at a level.
///
/// More than one match means the one-ACTIVE-per-scope invariant was broken
/// upstream. The highest version wins, then the first in input order.
fn pick<'a, P: 'a>(
    subject_id: &str,
    level: ScopeType,
    matches: impl Iterator<Item = &'a ConfigurationRecord<P>>,
) -> Option<&'a ConfigurationRecord<P>> {
    let mut best: Option<&ConfigurationRecord<P>> = None;
    let mut count = 0usize;

    for candidate in matches {
        count += 1;
        best = match best {
            Some(current) if current.version >= candidate.version => Some(current),
            _ => Some(candidate),
        };
    }

    if count > 1 {
        warn!(
            subject_id = %subject_id,
            level = %level,
            matches = count,
            "Multiple ACTIVE configurations at one scope level; using highest version"
        );
    }

    best
}

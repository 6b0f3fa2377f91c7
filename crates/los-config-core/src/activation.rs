//! Pre-activation check for configuration records.
//!
//! At most one ACTIVE record may exist per subject and scope tuple. The check
//! inspects a snapshot supplied by the caller and never mutates it; performing
//! the status transitions is left to the persistence collaborator.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::record::ConfigurationRecord;
use crate::scope::{validate_scope_for_kind, ScopeType};

/// Branch exposure of a PARTNER activation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationImpact {
    /// Known branches without an ACTIVE override; they fall back to the partner record
    pub affected_branches: usize,

    /// Known branches that keep their own ACTIVE override
    pub overridden_branches: usize,
}

/// Outcome of `check_activation`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationCheck {
    pub can_activate: bool,

    pub errors: Vec<String>,

    pub warnings: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<ActivationImpact>,
}

/// Check whether `candidate` may become ACTIVE given `existing` records.
///
/// `existing` should be the records of the candidate's subject; records of
/// other subjects or kinds are ignored, as is the candidate itself.
pub fn check_activation<P, Q>(
    candidate: &ConfigurationRecord<P>,
    existing: &[ConfigurationRecord<Q>],
) -> ActivationCheck {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut impact = None;

    let scope_check = validate_scope_for_kind(candidate.kind, &candidate.scope);
    errors.extend(scope_check.errors.iter().map(|e| e.message.clone()));

    if candidate.is_active() {
        errors.push(format!("Configuration '{}' is already ACTIVE", candidate.id));
    }

    let siblings: Vec<&ConfigurationRecord<Q>> = existing
        .iter()
        .filter(|r| r.id != candidate.id && r.kind == candidate.kind && r.subject_id == candidate.subject_id)
        .collect();

    let conflicts = siblings
        .iter()
        .filter(|r| r.is_active() && r.scope.same_tuple(&candidate.scope))
        .count();
    if conflicts > 0 {
        errors.push(format!(
            "{} active configuration(s) already exist for {}; deprecate them before activating",
            conflicts,
            candidate.label()
        ));
    }

    match candidate.scope.scope_type {
        ScopeType::Branch => warnings.push(format!(
            "Branch configuration will shadow PARTNER and PRODUCT configuration for branch '{}'",
            candidate.scope.effective_branch().unwrap_or_default()
        )),
        ScopeType::Partner => {
            let partner = candidate.scope.effective_partner();
            let branches_under_partner = siblings.iter().filter(|r| {
                r.scope.scope_type == ScopeType::Branch
                    && r.scope.product_code.trim() == candidate.scope.product_code.trim()
                    && r.scope.effective_partner() == partner
            });

            let mut known = BTreeSet::new();
            let mut overridden = BTreeSet::new();
            for record in branches_under_partner {
                if let Some(branch) = record.scope.effective_branch() {
                    known.insert(branch);
                    if record.is_active() {
                        overridden.insert(branch);
                    }
                }
            }

            let affected = known.len() - overridden.len();
            warnings.push(format!(
                "Partner configuration applies to all branches of '{}' without their own override ({} known branch(es) affected, {} keep an override)",
                partner.unwrap_or_default(),
                affected,
                overridden.len()
            ));
            impact = Some(ActivationImpact {
                affected_branches: affected,
                overridden_branches: overridden.len(),
            });
        }
        _ => {}
    }

    debug!(
        config_id = %candidate.id,
        scope = %candidate.scope,
        conflicts,
        errors = errors.len(),
        warnings = warnings.len(),
        "Activation checked"
    );

    ActivationCheck {
        can_activate: errors.is_empty(),
        errors,
        warnings,
        impact,
    }
}

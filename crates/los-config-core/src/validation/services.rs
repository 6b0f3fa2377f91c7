use crate::flow::{ScreenFlowNode, ServiceBucket};
use crate::validation::{error_codes, FlowContext, ValidationIssue, Validator};

/// Checks service declarations on every screen.
///
/// Services may be intentionally deferred, so every finding here is a warning.
pub struct ServiceValidator;

impl ServiceValidator {
    pub fn new() -> Self {
        ServiceValidator
    }

    fn validate_screen_services(&self, node: &ScreenFlowNode, screen_idx: usize) -> Vec<ValidationIssue> {
        let mut warnings = Vec::new();

        for bucket in ServiceBucket::ALL {
            for (service_idx, call) in node.services.bucket(bucket).iter().enumerate() {
                let path = format!("screens[{}].services.{}[{}]", screen_idx, bucket, service_idx);
                let label = match &call.name {
                    Some(name) => format!("'{}'", name),
                    None => format!("#{}", service_idx + 1),
                };

                if call.endpoint().is_none() {
                    warnings.push(ValidationIssue::warning(
                        error_codes::MISSING_ENDPOINT,
                        format!("Service {} in {} of screen '{}' has no endpoint", label, bucket, node.screen_id),
                        Some(format!("{}.endpoint", path)),
                    ));
                }

                if call.on_error.is_none() {
                    warnings.push(ValidationIssue::warning(
                        error_codes::MISSING_ERROR_POLICY,
                        format!("Service {} in {} of screen '{}' has no onError policy", label, bucket, node.screen_id),
                        Some(format!("{}.onError", path)),
                    ));
                }
            }
        }

        warnings
    }
}

impl Default for ServiceValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for ServiceValidator {
    fn validate(&self, context: &FlowContext<'_>) -> Vec<ValidationIssue> {
        context
            .flow
            .screens
            .iter()
            .enumerate()
            .flat_map(|(idx, node)| self.validate_screen_services(node, idx))
            .collect()
    }
}

//! Flow and record documents for tests.

use los_config_core::FlowConfig;

/// Screen ids known to the registry in the standard fixtures
pub fn standard_screen_registry() -> Vec<&'static str> {
    vec![
        "personal-info",
        "contact-details",
        "employment",
        "income",
        "guarantor",
        "documents",
        "review",
        "rejection",
    ]
}

/// Ids of every node of a flow, in sequence order
pub fn screen_ids_of(flow: &FlowConfig) -> Vec<String> {
    flow.screens.iter().map(|s| s.screen_id.clone()).collect()
}

/// Creates a valid personal-loan journey with branching and services.
///
/// # Returns
///
/// A YAML flow with 6 screens, 3 conditional routes and 4 service calls.
pub fn create_loan_flow_yaml() -> String {
    r#"
startScreen: personal-info
screens:
  - screenId: personal-info
    defaultNext: contact-details
    services:
      preLoad:
        - name: prefill
          endpoint: /api/applicant/prefill
          method: GET
          onError: CONTINUE
  - screenId: contact-details
    defaultNext: employment
  - screenId: employment
    defaultNext: income
    conditions:
      - when: { field: employmentType, op: eq, value: UNEMPLOYED }
        then: { nextScreen: rejection }
  - screenId: income
    defaultNext: documents
    conditions:
      - when: { field: monthlyIncome, op: lt, value: 25000 }
        then: { nextScreen: guarantor }
    services:
      onSubmit:
        - endpoint: /api/income/verify
          method: POST
          onError: BLOCK
      background:
        - endpoint: /api/bureau/pull
          onError: RETRY
  - screenId: documents
    defaultNext: review
    services:
      onSubmit:
        - endpoint: /api/documents/upload
          onError: BLOCK
  - screenId: review
    defaultNext: __FLOW_END__
    conditions:
      - when: "applicant.age < 21"
        then: { nextScreen: __FLOW_END__ }
"#
    .to_string()
}

/// Creates a flow whose routes loop `employment → income → employment`.
pub fn create_cyclic_flow_yaml() -> String {
    r#"
startScreen: personal-info
screens:
  - screenId: personal-info
    defaultNext: employment
  - screenId: employment
    defaultNext: income
  - screenId: income
    defaultNext: review
    conditions:
      - when: { field: incomeVerified, op: eq, value: false }
        then: { nextScreen: employment }
  - screenId: review
    defaultNext: __FLOW_END__
"#
    .to_string()
}

/// Creates a flow with a node that no route leads to.
pub fn create_flow_with_unreachable_yaml() -> String {
    r#"
startScreen: personal-info
screens:
  - screenId: personal-info
    defaultNext: review
  - screenId: guarantor
    defaultNext: review
  - screenId: review
    defaultNext: __FLOW_END__
"#
    .to_string()
}

/// Creates a flow routing to the given screen id from a condition.
///
/// # Arguments
///
/// * `target` - Target of the conditional route
pub fn create_flow_with_conditional_target_yaml(target: &str) -> String {
    format!(
        r#"
startScreen: personal-info
screens:
  - screenId: personal-info
    defaultNext: review
    conditions:
      - when: {{ field: hasCoApplicant, op: eq, value: true }}
        then: {{ nextScreen: {} }}
  - screenId: review
    defaultNext: __FLOW_END__
"#,
        target
    )
}

/// Creates records for one screen covering every scope level of product `PL`.
///
/// Product and partner `ACME` are ACTIVE; branch `B01` is ACTIVE, branch
/// `B02` is DRAFT.
pub fn create_scoped_records_yaml(screen_id: &str) -> String {
    format!(
        r#"
- id: 1
  kind: SCREEN
  screenId: {screen}
  scope: {{ type: PRODUCT, productCode: PL }}
  status: ACTIVE
  payload: {{ title: Applicant }}
- id: 2
  kind: SCREEN
  screenId: {screen}
  scope: {{ type: PARTNER, productCode: PL, partnerCode: ACME }}
  status: ACTIVE
  payload: {{ title: Applicant (ACME) }}
- id: 3
  kind: SCREEN
  screenId: {screen}
  scope: {{ type: BRANCH, productCode: PL, partnerCode: ACME, branchCode: B01 }}
  status: ACTIVE
  payload: {{ title: Applicant (ACME B01) }}
- id: 4
  kind: SCREEN
  screenId: {screen}
  scope: {{ type: BRANCH, productCode: PL, partnerCode: ACME, branchCode: B02 }}
  status: DRAFT
  payload: {{ title: Applicant (ACME B02) }}
"#,
        screen = screen_id
    )
}

use crate::error::ConfigError;
use crate::flow::FlowConfig;
use crate::record::ConfigurationRecord;

/// Parse a flow document into a `FlowConfig`.
///
/// Accepts YAML or JSON. Only the shape is checked here; graph rules are
/// applied by `validate_flow`.
pub fn parse_flow_config(text: &str) -> Result<FlowConfig, ConfigError> {
    let flow: FlowConfig = serde_yaml::from_str(text)?;
    Ok(flow)
}

/// Parse a list of configuration records (YAML or JSON sequence).
///
/// Scopes are not validated; an unknown scope type is kept so that
/// `validate_scope` can report it.
pub fn parse_records(text: &str) -> Result<Vec<ConfigurationRecord>, ConfigError> {
    let records: Vec<ConfigurationRecord> = serde_yaml::from_str(text)?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ConfigId, ConfigKind, ConfigStatus};
    use crate::scope::ScopeType;

    #[test]
    fn test_parse_minimal_flow() {
        let yaml = r#"
        startScreen: personal-info
        screens:
          - screenId: personal-info
            defaultNext: __FLOW_END__
        "#;

        let flow = parse_flow_config(yaml).unwrap();
        assert_eq!(flow.start_screen, "personal-info");
        assert_eq!(flow.screens.len(), 1);
        assert_eq!(flow.screens[0].default_target(), Some("__FLOW_END__"));
    }

    #[test]
    fn test_parse_flow_json() {
        let json = r#"{"startScreen":"a","screens":[{"screenId":"a","conditions":[{"when":{"field":"age","op":"lt","value":18},"then":{"nextScreen":"guardian"}}]}]}"#;

        let flow = parse_flow_config(json).unwrap();
        assert_eq!(flow.screens[0].conditions[0].target(), Some("guardian"));
        assert_eq!(flow.screens[0].conditions[0].when["field"], "age");
    }

    #[test]
    fn test_invalid_yaml_syntax() {
        let yaml = r#"
        startScreen: a
        screens: [
          - screenId: broken
        "#;

        match parse_flow_config(yaml) {
            Err(ConfigError::YamlError(_)) => {}
            other => panic!("Expected YamlError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_records() {
        let yaml = r#"
        - id: 1
          kind: SCREEN
          screenId: applicant-info
          scope: { type: PRODUCT, productCode: PL }
          status: ACTIVE
          payload: { title: Applicant }
        - id: branch-override
          kind: SCREEN
          screenId: applicant-info
          scope: { type: REGION, productCode: PL }
          status: DRAFT
          version: 2
          payload: null
        "#;

        let records = parse_records(yaml).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, ConfigId::Numeric(1));
        assert_eq!(records[0].kind, ConfigKind::Screen);
        assert_eq!(records[0].status, ConfigStatus::Active);
        assert_eq!(records[1].version, 2);
        assert_eq!(records[1].scope.scope_type, ScopeType::Unrecognized("REGION".to_string()));
    }
}

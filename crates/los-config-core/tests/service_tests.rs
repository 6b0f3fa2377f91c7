use los_config_core::{
    ActivationImpact, ConfigError, ConfigKind, ConfigScope, RequestScope, ScopeType,
};
use los_config_store_inmemory::InMemoryStoreProvider;
use los_config_test_utils::init_test_tracing;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_create_rejects_invalid_scope() {
    let service = InMemoryStoreProvider::new().create_service();

    let mut scope = ConfigScope::partner("PL", "ACME");
    scope.partner_code = None;
    let err = service
        .create(ConfigKind::Screen, "applicant-info", scope, json!({}))
        .await
        .unwrap_err();
    match err {
        ConfigError::InvalidScope(issues) => {
            assert_eq!(issues.len(), 1);
            assert!(issues[0].message.contains("partner code"));
        }
        other => panic!("Expected InvalidScope, got {:?}", other),
    }

    let err = service
        .create(ConfigKind::Flow, "journey", ConfigScope::branch("PL", "ACME", "B01"), json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "ERR_CONFIG_INVALID_SCOPE");
}

#[tokio::test]
async fn test_update_keeps_scope_immutable() -> Result<(), ConfigError> {
    let service = InMemoryStoreProvider::new().create_service();
    let record = service
        .create(ConfigKind::Screen, "income", ConfigScope::partner("PL", "ACME"), json!({"v": 1}))
        .await?;

    let updated = service.update(&record.id, &record.scope, json!({"v": 2})).await?;
    assert_eq!(updated.payload, json!({"v": 2}));
    assert_eq!(updated.scope, record.scope);

    let err = service
        .update(&record.id, &ConfigScope::partner("PL", "ZETA"), json!({"v": 3}))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "ERR_CONFIG_SCOPE_IMMUTABLE");

    let err = service
        .update(&"missing".into(), &record.scope, json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "ERR_CONFIG_NOT_FOUND");

    Ok(())
}

#[tokio::test]
async fn test_partner_activation_reports_branch_impact() -> Result<(), ConfigError> {
    init_test_tracing();
    let service = InMemoryStoreProvider::new().create_service();

    let product = service
        .create(ConfigKind::Screen, "documents", ConfigScope::product("PL"), json!({"level": "product"}))
        .await?;
    service.activate(&product.id).await?;

    let b01 = service
        .create(ConfigKind::Screen, "documents", ConfigScope::branch("PL", "ACME", "B01"), json!({"level": "b01"}))
        .await?;
    let b01_outcome = service.activate(&b01.id).await?;
    assert!(b01_outcome.activated);
    assert_eq!(b01_outcome.check.warnings.len(), 1);

    service
        .create(ConfigKind::Screen, "documents", ConfigScope::branch("PL", "ACME", "B02"), json!({"level": "b02"}))
        .await?;

    let partner = service
        .create(ConfigKind::Screen, "documents", ConfigScope::partner("PL", "ACME"), json!({"level": "partner"}))
        .await?;
    let outcome = service.activate(&partner.id).await?;
    assert!(outcome.activated);
    assert_eq!(
        outcome.check.impact,
        Some(ActivationImpact {
            affected_branches: 1,
            overridden_branches: 1,
        })
    );

    let request = RequestScope::product("PL").with_partner("ACME");
    let at_b01 = service.resolve_screen("documents", &request.clone().with_branch("B01")).await?;
    assert_eq!(at_b01.resolved_from, ScopeType::Branch);

    let at_b02 = service.resolve_screen("documents", &request.with_branch("B02")).await?;
    assert_eq!(at_b02.resolved_from, ScopeType::Partner);
    assert_eq!(at_b02.record.payload["level"], "partner");

    Ok(())
}

#[tokio::test]
async fn test_flow_resolution_ignores_branch() -> Result<(), ConfigError> {
    let service = InMemoryStoreProvider::new().create_service();

    let flow = service
        .create(ConfigKind::Flow, "journey", ConfigScope::product("PL"), json!({"startScreen": "a"}))
        .await?;
    service.activate(&flow.id).await?;

    let resolved = service
        .resolve_flow("journey", &RequestScope::product("PL").with_partner("ACME").with_branch("B01"))
        .await?;
    assert_eq!(resolved.resolved_from, ScopeType::Product);
    assert_eq!(resolved.inheritance_chain, vec![ScopeType::Partner, ScopeType::Product]);

    Ok(())
}

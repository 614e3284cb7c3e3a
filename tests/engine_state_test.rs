use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use vpc_provider::{
    FileStateStore, HttpVpcClient, Manifest, PlanAction, Provider, ProviderConfig, ProviderEngine,
};

const MANIFEST: &str = r#"
[vpc.main]
name = "net1"
region = "us-east-1"
cidr_block = "10.0.0.0/16"

[[vpc.main.routes]]
destination_cidr_block = "0.0.0.0/0"
next_hop = "igw-1"
"#;

fn engine_for(
    server: &MockServer,
    temp_dir: &TempDir,
) -> ProviderEngine<HttpVpcClient, FileStateStore> {
    let config = ProviderConfig {
        endpoint: Some(server.base_url()),
        ..Default::default()
    };
    let provider = Provider::from_config(&config).unwrap();
    ProviderEngine::new(provider, FileStateStore::new(temp_dir.path().join("state.json")))
}

#[tokio::test]
async fn test_apply_then_plan_is_no_op_and_destroy_clears_state() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/v1/auth/token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"access_token": "tok-1"}));
    });
    let create_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/organizations/org-1/vpcs")
            .json_body_partial(r#"{"routing": {"routes": [{"destination_cidr_block": "0.0.0.0/0", "next_hop": "igw-1"}]}}"#);
        then.status(201)
            .header("Content-Type", "application/json")
            .json_body(json!({"id": "vpc-123"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v1/organizations/org-1/vpcs/vpc-123");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "id": "vpc-123",
                "name": "net1",
                "region": "us-east-1",
                "network": {"cidr_block": "10.0.0.0/16"},
                "routing": {"routes": [{"destination_cidr_block": "0.0.0.0/0", "next_hop": "igw-1"}]}
            }));
    });
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE).path("/v1/organizations/org-1/vpcs/vpc-123");
        then.status(204);
    });

    let manifest = Manifest::from_toml_str(MANIFEST).unwrap();
    let engine = engine_for(&server, &temp_dir);
    let config = ProviderConfig {
        org_id: Some("org-1".to_string()),
        ..Default::default()
    };
    let session = engine.provider().configure(&config).await.unwrap();

    let planned = engine.plan(&manifest).await.unwrap();
    assert_eq!(planned[0].action, PlanAction::Create);

    engine.apply(&session, &manifest).await.unwrap();
    create_mock.assert_hits(1);

    let state_file = std::fs::read_to_string(temp_dir.path().join("state.json")).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&state_file).unwrap();
    assert_eq!(saved["version"], 1);
    assert_eq!(saved["resources"]["vpc_network.main"]["id"], "vpc-123");

    let replanned = engine.plan(&manifest).await.unwrap();
    assert_eq!(replanned[0].action, PlanAction::NoOp);

    // 再次套用不應重複建立
    engine.apply(&session, &manifest).await.unwrap();
    create_mock.assert_hits(1);

    let destroyed = engine.destroy(&session).await.unwrap();
    assert_eq!(destroyed.len(), 1);
    delete_mock.assert_hits(1);
    assert!(engine.load_state().await.unwrap().resources.is_empty());
}

#[tokio::test]
async fn test_unsupported_state_version_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("state.json"),
        r#"{"version": 99, "resources": {}}"#,
    )
    .unwrap();

    let server = MockServer::start();
    let engine = engine_for(&server, &temp_dir);
    let diags = engine.load_state().await.unwrap_err();

    assert_eq!(diags.first().unwrap().summary, "Unable to Read State");
}

#[tokio::test]
async fn test_failed_read_back_does_not_duplicate_create() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();

    let create_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/organizations/org-1/vpcs");
        then.status(201)
            .header("Content-Type", "application/json")
            .json_body(json!({"id": "vpc-123"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v1/organizations/org-1/vpcs/vpc-123");
        then.status(503).body("service unavailable");
    });
    server.mock(|when, then| {
        when.method(POST).path("/v1/auth/token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"access_token": "tok-1"}));
    });

    let manifest = Manifest::from_toml_str(MANIFEST).unwrap();
    let engine = engine_for(&server, &temp_dir);
    let config = ProviderConfig {
        org_id: Some("org-1".to_string()),
        ..Default::default()
    };
    let session = engine.provider().configure(&config).await.unwrap();

    assert!(engine.apply(&session, &manifest).await.is_err());
    let tracked = engine.load_state().await.unwrap();
    assert_eq!(
        tracked.resources["vpc_network.main"].id.as_deref(),
        Some("vpc-123")
    );

    engine.apply(&session, &manifest).await.unwrap();
    assert_eq!(create_mock.hits(), 1);
}

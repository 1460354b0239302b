//! Full migration runs against a mock Descope API.

use kc_migrate::{logging, GroupMapping};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{has_files, write_fixtures, TestEnv};

fn names(bodies: &[serde_json::Value], key: &str) -> Vec<String> {
    bodies
        .iter()
        .filter_map(|b| b[key].as_str().map(str::to_string))
        .collect()
}

/// Migrates an export into an empty project with groups as tenants.
#[tokio::test]
async fn test_full_migration_with_tenants() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.empty_destination().await;
    write_fixtures(&env)?;

    let report = env.migrator(GroupMapping::Tenants)?.run().await;

    // Roles from realm and client roles
    let roles = env.posted("/v1/mgmt/role/create").await;
    assert_eq!(names(&roles, "name"), vec!["admin", "user", "viewer"]);
    assert_eq!(report.roles.created, 3);

    // Top-level groups only, name doubles as ID
    let tenants = env.posted("/v1/mgmt/tenant/create").await;
    assert_eq!(
        tenants,
        vec![
            json!({"name": "eng", "id": "eng"}),
            json!({"name": "sales", "id": "sales"})
        ]
    );
    assert_eq!(report.groups.map(|g| g.created), Some(2));

    // One call with profile attributes first, then mapper attributes
    let attributes = env.posted("/v1/mgmt/user/customattribute/create").await;
    assert_eq!(
        attributes,
        vec![json!({"attributes": [
            {"name": "department", "displayName": "Department", "type": 1},
            {"name": "badges", "displayName": "badges", "type": 5}
        ]})]
    );

    // One batch per user file, in file order
    let batches = env.posted("/v1/mgmt/user/create/batch").await;
    assert_eq!(batches.len(), 2);
    for batch in &batches {
        assert_eq!(batch["invite"], json!(false));
        assert_eq!(batch["sendMail"], json!(false));
        assert_eq!(batch["sendSMS"], json!(false));
    }

    let jdoe = &batches[0]["users"][0];
    assert_eq!(jdoe["loginId"], "jdoe");
    assert_eq!(jdoe["email"], "jdoe@example.com");
    assert_eq!(jdoe["verifiedEmail"], true);
    assert_eq!(jdoe["additionalIdentifiers"], json!(["jdoe@example.com"]));
    assert_eq!(jdoe["roleNames"], json!(["user", "viewer"]));
    assert_eq!(jdoe["userTenants"], json!([{"tenantId": "eng"}]));
    assert_eq!(jdoe["displayName"], "Jane Doe");
    assert_eq!(jdoe["customAttributes"], json!({"department": "eng"}));
    assert_eq!(jdoe["ssoAppIds"], json!(["sso-app"]));
    assert_eq!(
        jdoe["hashedPassword"],
        json!({"pbkdf2": {
            "hash": "aGFzaA==",
            "salt": "c2FsdA==",
            "iterations": 27500,
            "type": "sha256"
        }})
    );

    let solo = &batches[1]["users"][0];
    assert_eq!(solo["loginId"], "solo@example.com");
    assert_eq!(solo["additionalIdentifiers"], json!([]));
    assert!(solo.get("hashedPassword").is_none());

    // Disabled user is created, then deactivated
    assert_eq!(batches[0]["users"][1]["loginId"], "old");
    let statuses = env.posted("/v1/mgmt/user/update/status").await;
    assert_eq!(
        statuses,
        vec![json!({"loginId": "old", "status": "disabled"})]
    );

    assert_eq!(report.users.processed, 3);
    assert_eq!(report.users.batches, 2);
    assert_eq!(report.users.deactivated, 1);
    assert!(!report.has_failures());

    Ok(())
}

/// Groups become roles and no tenant is touched.
#[tokio::test]
async fn test_groups_as_roles() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.empty_destination().await;
    write_fixtures(&env)?;

    let report = env.migrator(GroupMapping::Roles)?.run().await;

    let roles = env.posted("/v1/mgmt/role/create").await;
    assert_eq!(
        names(&roles, "name"),
        vec!["admin", "user", "viewer", "eng", "sales"]
    );
    assert!(env.posted("/v1/mgmt/tenant/create").await.is_empty());

    let batches = env.posted("/v1/mgmt/user/create/batch").await;
    let jdoe = &batches[0]["users"][0];
    assert_eq!(jdoe["roleNames"], json!(["user", "viewer", "eng"]));
    assert!(jdoe.get("userTenants").is_none());
    assert_eq!(report.groups.map(|g| g.created), Some(2));

    Ok(())
}

/// A second run against a populated project creates nothing new.
#[tokio::test]
async fn test_rerun_creates_nothing() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    write_fixtures(&env)?;

    env.listing(
        "/v1/mgmt/role/all",
        json!({"roles": [{"name": "admin"}, {"name": "user"}, {"name": "viewer"}]}),
    )
    .await;
    env.listing(
        "/v1/mgmt/tenant/all",
        json!({"tenants": [{"id": "eng"}, {"id": "sales"}]}),
    )
    .await;
    env.listing(
        "/v1/mgmt/user/customattributes",
        json!({"data": [{"name": "department"}, {"name": "badges"}]}),
    )
    .await;
    for endpoint in [
        "/v1/mgmt/role/create",
        "/v1/mgmt/tenant/create",
        "/v1/mgmt/user/customattribute/create",
    ] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&env.server)
            .await;
    }
    env.accept("/v1/mgmt/user/create/batch").await;
    env.accept("/v1/mgmt/user/update/status").await;

    let report = env.migrator(GroupMapping::Tenants)?.run().await;

    assert_eq!(report.roles.existing, 3);
    assert_eq!(report.groups.map(|g| g.existing), Some(2));
    assert_eq!(report.custom_attributes.existing, 2);
    assert_eq!(report.users.processed, 3);

    Ok(())
}

/// A rejected batch is logged and counted; deactivation still runs.
#[tokio::test]
async fn test_batch_failure_does_not_stop_migration() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    write_fixtures(&env)?;

    env.listing("/v1/mgmt/role/all", json!({"roles": []})).await;
    env.listing("/v1/mgmt/user/customattributes", json!({"data": []}))
        .await;
    env.accept("/v1/mgmt/role/create").await;
    Mock::given(method("POST"))
        .and(path("/v1/mgmt/user/customattribute/create"))
        .respond_with(ResponseTemplate::new(409).set_body_string("already exists"))
        .mount(&env.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/mgmt/user/create/batch"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&env.server)
        .await;
    env.accept("/v1/mgmt/user/update/status").await;

    let report = env.migrator(GroupMapping::None)?.run().await;

    assert!(report.groups.is_none());
    assert_eq!(report.custom_attributes.failed, 0);
    assert_eq!(report.users.failed_batches, 2);
    assert_eq!(report.users.failed_users, 3);
    assert_eq!(report.users.created(), 0);
    assert_eq!(report.users.deactivated, 1);
    assert!(report.has_failures());
    assert!(env.posted("/v1/mgmt/tenant/create").await.is_empty());

    Ok(())
}

/// Destination listing errors read as an empty destination.
#[tokio::test]
async fn test_listing_failure_reads_as_empty() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    write_fixtures(&env)?;

    Mock::given(method("GET"))
        .and(path("/v1/mgmt/role/all"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&env.server)
        .await;
    env.listing("/v1/mgmt/user/customattributes", json!({"data": []}))
        .await;
    env.accept("/v1/mgmt/role/create").await;
    env.accept("/v1/mgmt/user/customattribute/create").await;
    env.accept("/v1/mgmt/user/create/batch").await;
    env.accept("/v1/mgmt/user/update/status").await;

    let report = env.migrator(GroupMapping::None)?.run().await;

    assert_eq!(report.roles.created, 3);
    assert_eq!(report.roles.existing, 0);

    Ok(())
}

/// The run log file is created with the expected name.
#[test]
fn test_log_file_is_created() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let logs = dir.path().join("logs");

    let (path, _file) = logging::create_log_file(&logs)?;

    assert!(has_files(&logs));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    assert!(name.starts_with("user_migration_"));
    assert!(name.ends_with(".log"));

    Ok(())
}

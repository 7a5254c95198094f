//! Integration tests against a real Salesforce org.
//!
//! Run with:
//!   SALESFORCE_ENDPOINT=... SALESFORCE_CLIENT_ID=... SALESFORCE_CLIENT_SECRET=... \
//!   SALESFORCE_USERNAME=... SALESFORCE_PASSWORD=... \
//!   SALESFORCE_REST_API=/services/data/v62.0/sobjects \
//!   SALESFORCE_SERVICE_QUERY=/services/data/v62.0/query?q= \
//!   SALESFORCE_RECONNECT_ATTEMPTS=2 \
//!   cargo test --test integration -- --ignored --nocapture

use serde_json::json;
use sfconn::{ApiClient, ErrorKind, QueryParam, RestActionRequest, RestResult};

fn client() -> ApiClient {
    ApiClient::from_env().expect("SALESFORCE_* environment variables must be set")
}

#[tokio::test]
#[ignore = "requires SALESFORCE_* environment"]
async fn test_contact_lifecycle() {
    let client = client();
    let email = format!("sfconn-it-{}@example.com", std::process::id());

    let created = client
        .rest_action(
            RestActionRequest::post("Contact")
                .with_body(json!({"LastName": "SfconnIntTest", "Email": email})),
        )
        .await
        .expect("create failed");
    let id = created.body().and_then(|b| b["id"].as_str()).unwrap().to_string();

    let rows = client
        .query(
            "SELECT Id, Email FROM Contact WHERE Email = $1",
            Some(&[QueryParam::from(email.as_str())]),
        )
        .await
        .expect("query failed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Id"], id.as_str());

    let updated = client
        .rest_action(
            RestActionRequest::patch("Contact")
                .with_id(&id)
                .with_body(json!({"Title": "Integration"})),
        )
        .await
        .expect("update failed");
    assert_eq!(updated, RestResult::Success);

    let deleted = client
        .rest_action(RestActionRequest::delete("Contact").with_id(&id))
        .await
        .expect("delete failed");
    assert_eq!(deleted, RestResult::Success);
}

#[tokio::test]
#[ignore = "requires SALESFORCE_* environment"]
async fn test_relogin_after_invalidate() {
    let client = client();
    client
        .execute_query("SELECT Id FROM User LIMIT 1")
        .await
        .expect("first query failed");
    let first = client.session().current().await.unwrap();

    client.session().invalidate().await;
    client
        .execute_query("SELECT Id FROM User LIMIT 1")
        .await
        .expect("query after invalidate failed");
    let second = client.session().current().await.unwrap();
    assert_eq!(second.generation(), first.generation() + 1);
}

#[tokio::test]
#[ignore = "requires SALESFORCE_* environment"]
async fn test_validation_error_surfaces() {
    let err = client()
        .rest_action(RestActionRequest::post("Contact").with_body(json!({"FirstName": "NoLast"})))
        .await
        .unwrap_err();
    match err.kind {
        ErrorKind::Application(errors) => {
            assert_eq!(errors[0].error_code, "REQUIRED_FIELD_MISSING");
        }
        other => panic!("expected Application, got {other:?}"),
    }
}

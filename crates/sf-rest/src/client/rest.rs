use tracing::instrument;

use crate::error::Result;
use crate::request::{RestActionRequest, RestResult};

use super::ApiClient;

impl ApiClient {
    /// Run a resource-oriented REST call.
    ///
    /// Sends `{method} {instance_url}{rest_base_path}/{resource_type}[/{resource_id}]`
    /// with the JSON body when one is set. Returns the parsed body, or
    /// [`RestResult::Success`] when the response has none.
    #[instrument(
        skip(self, request),
        fields(method = %request.method, resource_type = %request.resource_type)
    )]
    pub async fn rest_action(&self, request: RestActionRequest) -> Result<RestResult> {
        let resource_path = request.path()?;

        let payload = self
            .send_with_reattempts(|session| {
                let url = self.url(session, &self.config.rest_base_path, &resource_path);
                let builder = self
                    .http
                    .request(request.method, url)
                    .bearer_auth(session.access_token());
                match request.body {
                    Some(ref body) => builder.json_value(body.clone()),
                    None => builder,
                }
            })
            .await?;

        Ok(RestResult::from_payload(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::error::ErrorKind;
    use crate::request::{RestActionRequest, RestResult};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    #[tokio::test]
    async fn test_create_contact_after_expiry() {
        let server = MockServer::start().await;
        mount_token(&server, 2).await;

        let created = ResponseTemplate::new(201).set_body_json(json!({
            "id": "003xx000004TmiQAAS",
            "success": true,
            "errors": []
        }));
        Mock::given(method("POST"))
            .and(path("/services/data/v62.0/sobjects/Contact"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"LastName": "Smith"})))
            .respond_with(ExpiringResponder::new(1, created))
            .expect(2)
            .mount(&server)
            .await;

        let client = client(&server, 1);
        let result = client
            .rest_action(RestActionRequest::post("Contact").with_body(json!({"LastName": "Smith"})))
            .await
            .unwrap();

        assert_eq!(result.body().unwrap()["id"], "003xx000004TmiQAAS");
        assert_eq!(client.session().current().await.unwrap().access_token(), "token-2");
    }

    #[tokio::test]
    async fn test_retry_uses_new_token() {
        let server = MockServer::start().await;
        mount_token(&server, 2).await;

        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/sobjects/Account/001A"))
            .and(header("Authorization", "Bearer token-1"))
            .respond_with(expired())
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/sobjects/Account/001A"))
            .and(header("Authorization", "Bearer token-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Id": "001A"})))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server, 1)
            .rest_action(RestActionRequest::get("Account").with_id("001A"))
            .await
            .unwrap();
        assert_eq!(result.body().unwrap()["Id"], "001A");
    }

    #[tokio::test]
    async fn test_validation_error_is_not_retried() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("POST"))
            .and(path("/services/data/v62.0/sobjects/Contact"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!([{
                "message": "Required fields are missing: [LastName]",
                "errorCode": "REQUIRED_FIELD_MISSING",
                "fields": ["LastName"]
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server, 3);
        let err = client
            .rest_action(RestActionRequest::post("Contact").with_body(json!({"FirstName": "Ann"})))
            .await
            .unwrap_err();

        match &err.kind {
            ErrorKind::Application(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].error_code, "REQUIRED_FIELD_MISSING");
                assert_eq!(errors[0].fields, Some(vec!["LastName".to_string()]));
                assert!(errors[0].error_description.is_none());
            }
            other => panic!("expected Application, got {other:?}"),
        }
        assert!(client.session().is_connected().await);
    }

    #[tokio::test]
    async fn test_empty_body_is_success_indicator() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("PATCH"))
            .and(path("/services/data/v62.0/sobjects/Contact/003A"))
            .and(body_json(json!({"Title": "CTO"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server, 1)
            .rest_action(
                RestActionRequest::patch("Contact")
                    .with_id("003A")
                    .with_body(json!({"Title": "CTO"})),
            )
            .await
            .unwrap();
        assert_eq!(result, RestResult::Success);
    }

    #[tokio::test]
    async fn test_no_body_sends_no_content_type() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("DELETE"))
            .and(path("/services/data/v62.0/sobjects/Contact/003A"))
            .and(|req: &Request| req.body.is_empty() && !req.headers.contains_key("content-type"))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server, 1)
            .rest_action(RestActionRequest::delete("Contact").with_id("003A"))
            .await
            .unwrap();
        assert_eq!(result, RestResult::Success);
    }

    #[tokio::test]
    async fn test_invalid_resource_type_fails_before_login() {
        let server = MockServer::start().await;
        mount_token(&server, 0).await;

        let err = client(&server, 1)
            .rest_action(RestActionRequest::get("Contact/../User"))
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config(_)));
    }

    #[tokio::test]
    async fn test_dot_segment_id_fails_before_login() {
        let server = MockServer::start().await;
        mount_token(&server, 0).await;

        let err = client(&server, 1)
            .rest_action(RestActionRequest::get("Account").with_id("../../query"))
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config(_)));
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/sobjects/Account/001A"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server, 1)
            .rest_action(RestActionRequest::get("Account").with_id("001A"))
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MalformedResponse(_)));
    }
}

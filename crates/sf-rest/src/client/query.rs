use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::params::{substitute, QueryParam};

use super::ApiClient;

impl ApiClient {
    /// Substitute `params` into `template` and run the resulting SOQL.
    ///
    /// See [`substitute`] for how placeholders are replaced.
    #[instrument(skip(self, template, params))]
    pub async fn query(&self, template: &str, params: Option<&[QueryParam]>) -> Result<Vec<Value>> {
        let soql = substitute(template, params);
        self.execute_query(&soql).await
    }

    /// Like [`ApiClient::query`], deserializing each record into `T`.
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        template: &str,
        params: Option<&[QueryParam]>,
    ) -> Result<Vec<T>> {
        self.query(template, params)
            .await?
            .into_iter()
            .map(|record| serde_json::from_value(record).map_err(Error::from))
            .collect()
    }

    /// Run a SOQL query and return its `records`.
    ///
    /// Only the first page is returned; `nextRecordsUrl` is not followed.
    #[instrument(skip(self, soql))]
    pub async fn execute_query(&self, soql: &str) -> Result<Vec<Value>> {
        let encoded = urlencoding::encode(soql);

        let payload = self
            .send_with_reattempts(|session| {
                let url = self.url(session, &self.config.query_base_path, &encoded);
                self.http.get(url).bearer_auth(session.access_token())
            })
            .await?;

        let records = match payload {
            Some(Value::Object(mut body)) => body.remove("records"),
            _ => None,
        };

        match records {
            Some(Value::Array(records)) => {
                debug!(count = records.len(), "Query returned records");
                Ok(records)
            }
            _ => Err(Error::new(ErrorKind::MalformedResponse(
                "query response has no records array".to_string(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::error::ErrorKind;
    use crate::params::QueryParam;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const QUERY_PATH: &str = "/services/data/v62.0/query";

    fn records(records: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "totalSize": records.as_array().map_or(0, Vec::len),
            "done": true,
            "records": records
        }))
    }

    #[tokio::test]
    async fn test_query_substitutes_and_encodes() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path(QUERY_PATH))
            .and(query_param(
                "q",
                "SELECT Id FROM Contact WHERE Email = 'a@b.com'",
            ))
            .and(header("Authorization", "Bearer token-1"))
            .respond_with(records(json!([
                {"attributes": {"type": "Contact"}, "Id": "003A"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let rows = client(&server, 1)
            .query(
                "SELECT Id FROM Contact WHERE Email = $1",
                Some(&[QueryParam::from("a@b.com")]),
            )
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Id"], "003A");
    }

    #[tokio::test]
    async fn test_query_escapes_quotes_on_the_wire() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path(QUERY_PATH))
            .and(query_param(
                "q",
                "SELECT Id FROM Account WHERE Name = 'O\\'Brien' AND NumberOfEmployees > 50",
            ))
            .respond_with(records(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let rows = client(&server, 1)
            .query(
                "SELECT Id FROM Account WHERE Name = $1 AND NumberOfEmployees > $2",
                Some(&[QueryParam::from("O'Brien"), QueryParam::from(50)]),
            )
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_execute_query_retries_on_expiry() {
        let server = MockServer::start().await;
        mount_token(&server, 3).await;

        Mock::given(method("GET"))
            .and(path(QUERY_PATH))
            .respond_with(ExpiringResponder::new(
                2,
                records(json!([{"Id": "001A"}, {"Id": "001B"}])),
            ))
            .expect(3)
            .mount(&server)
            .await;

        let rows = client(&server, 2)
            .execute_query("SELECT Id FROM Account")
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_execute_query_exhausts_reattempts() {
        let server = MockServer::start().await;
        mount_token(&server, 2).await;

        Mock::given(method("GET"))
            .and(path(QUERY_PATH))
            .respond_with(expired())
            .expect(2)
            .mount(&server)
            .await;

        let err = client(&server, 1)
            .execute_query("SELECT Id FROM Account")
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::SessionExpired { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn test_query_as_typed_records() {
        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "PascalCase")]
        struct Contact {
            id: String,
            last_name: String,
        }

        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path(QUERY_PATH))
            .respond_with(records(json!([
                {"Id": "003A", "LastName": "Smith"},
                {"Id": "003B", "LastName": "Jones"}
            ])))
            .mount(&server)
            .await;

        let contacts: Vec<Contact> = client(&server, 1)
            .query_as("SELECT Id, LastName FROM Contact", None)
            .await
            .unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[1].id, "003B");
        assert_eq!(contacts[0].last_name, "Smith");
    }

    #[tokio::test]
    async fn test_missing_records_is_malformed() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path(QUERY_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalSize": 0})))
            .mount(&server)
            .await;

        let err = client(&server, 1)
            .execute_query("SELECT Id FROM Account")
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_malformed_query_is_application_error() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path(QUERY_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!([{
                "message": "unexpected token: FORM",
                "errorCode": "MALFORMED_QUERY"
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server, 3)
            .execute_query("SELECT Id FORM Account")
            .await
            .unwrap_err();
        let errors = err.api_errors().unwrap();
        assert_eq!(errors[0].error_code, "MALFORMED_QUERY");
    }
}

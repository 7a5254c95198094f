//! Classification of a raw response before any retry decision is made.

use serde_json::Value;

use sfconn_client::{ApiError, RawResponse};

use crate::error::{Error, ErrorKind, Result};

/// What a Salesforce response means to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    /// 2xx with a JSON body, or with no body at all.
    Success(Option<Value>),
    /// The Salesforce error envelope, whatever the status code.
    ApiErrors(Vec<ApiError>),
    /// Non-2xx with a body that is not an error envelope.
    Unrecognized { status: u16, body: String },
}

impl ApiOutcome {
    /// Decode a response.
    ///
    /// A 2xx body that is not valid JSON fails with
    /// [`ErrorKind::MalformedResponse`].
    pub fn decode(response: &RawResponse) -> Result<Self> {
        if response.is_empty() {
            return Ok(if response.is_success() {
                ApiOutcome::Success(None)
            } else {
                ApiOutcome::Unrecognized {
                    status: response.status(),
                    body: String::new(),
                }
            });
        }

        let value: Value = match serde_json::from_str(response.body()) {
            Ok(value) => value,
            Err(e) if response.is_success() => {
                return Err(Error::with_source(
                    ErrorKind::MalformedResponse(format!(
                        "expected JSON body (status {})",
                        response.status()
                    )),
                    e,
                ));
            }
            Err(_) => {
                return Ok(ApiOutcome::Unrecognized {
                    status: response.status(),
                    body: response.body().to_string(),
                });
            }
        };

        if let Some(errors) = ApiError::envelope_from_value(&value) {
            return Ok(ApiOutcome::ApiErrors(errors));
        }

        if response.is_success() {
            Ok(ApiOutcome::Success(Some(value)))
        } else {
            Ok(ApiOutcome::Unrecognized {
                status: response.status(),
                body: response.body().to_string(),
            })
        }
    }

    /// Returns true if the first error in the envelope is an expired session.
    pub fn is_session_expired(&self) -> bool {
        match self {
            ApiOutcome::ApiErrors(errors) => errors.first().is_some_and(ApiError::is_session_expired),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: &str) -> RawResponse {
        RawResponse::new(status, Some("application/json".to_string()), body)
    }

    #[test]
    fn test_success_with_body() {
        let outcome = ApiOutcome::decode(&response(200, r#"{"totalSize":0,"records":[]}"#)).unwrap();
        assert_eq!(
            outcome,
            ApiOutcome::Success(Some(json!({"totalSize": 0, "records": []})))
        );
        assert!(!outcome.is_session_expired());
    }

    #[test]
    fn test_success_without_body() {
        let outcome = ApiOutcome::decode(&response(204, "")).unwrap();
        assert_eq!(outcome, ApiOutcome::Success(None));
    }

    #[test]
    fn test_expired_session_envelope() {
        let outcome = ApiOutcome::decode(&response(
            401,
            r#"[{"message":"Session expired or invalid","errorCode":"INVALID_SESSION_ID"}]"#,
        ))
        .unwrap();
        assert!(outcome.is_session_expired());
    }

    #[test]
    fn test_expired_session_with_null_message() {
        let outcome = ApiOutcome::decode(&response(
            401,
            r#"[{"message":null,"errorCode":"INVALID_SESSION_ID"}]"#,
        ))
        .unwrap();
        assert!(outcome.is_session_expired());
    }

    #[test]
    fn test_only_first_error_decides_expiry() {
        let outcome = ApiOutcome::decode(&response(
            400,
            r#"[{"errorCode":"INVALID_FIELD","message":"x"},{"errorCode":"INVALID_SESSION_ID","message":"y"}]"#,
        ))
        .unwrap();
        assert!(!outcome.is_session_expired());
        match outcome {
            ApiOutcome::ApiErrors(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected ApiErrors, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_on_success_status_is_still_an_error() {
        let outcome = ApiOutcome::decode(&response(
            200,
            r#"[{"errorCode":"REQUIRED_FIELD_MISSING","message":"Required fields are missing: [LastName]","fields":["LastName"]}]"#,
        ))
        .unwrap();
        assert!(matches!(outcome, ApiOutcome::ApiErrors(_)));
    }

    #[test]
    fn test_non_json_error_is_unrecognized() {
        let outcome = ApiOutcome::decode(&response(503, "<html>Service Unavailable</html>")).unwrap();
        assert_eq!(
            outcome,
            ApiOutcome::Unrecognized {
                status: 503,
                body: "<html>Service Unavailable</html>".to_string()
            }
        );
    }

    #[test]
    fn test_json_error_without_envelope_is_unrecognized() {
        let outcome = ApiOutcome::decode(&response(500, r#"{"oops":true}"#)).unwrap();
        assert!(matches!(outcome, ApiOutcome::Unrecognized { status: 500, .. }));
    }

    #[test]
    fn test_non_json_success_is_malformed() {
        let err = ApiOutcome::decode(&response(200, "not json")).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MalformedResponse(_)));
    }
}

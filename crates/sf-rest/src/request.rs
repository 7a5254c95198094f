//! REST action requests and results.

use serde::Serialize;
use serde_json::Value;

use sfconn_client::security::{soql, url as url_security};
use sfconn_client::RequestMethod;

use crate::error::{Error, ErrorKind, Result};

/// One resource-oriented REST call, replayed as-is on every attempt.
///
/// # Example
///
/// ```rust
/// use sfconn_rest::RestActionRequest;
/// use serde_json::json;
///
/// let request = RestActionRequest::post("Contact").with_body(json!({"LastName": "Smith"}));
/// assert_eq!(request.path().unwrap(), "/Contact");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RestActionRequest {
    /// HTTP method.
    pub method: RequestMethod,
    /// Resource type, usually an SObject name such as `Contact`.
    pub resource_type: String,
    /// Record ID, or `Field__c/value` for external-ID access.
    pub resource_id: Option<String>,
    /// JSON body, sent only when present.
    pub body: Option<Value>,
}

impl RestActionRequest {
    /// Create a request with no ID and no body.
    pub fn new(method: RequestMethod, resource_type: impl Into<String>) -> Self {
        Self {
            method,
            resource_type: resource_type.into(),
            resource_id: None,
            body: None,
        }
    }

    /// A GET request.
    pub fn get(resource_type: impl Into<String>) -> Self {
        Self::new(RequestMethod::Get, resource_type)
    }

    /// A POST request.
    pub fn post(resource_type: impl Into<String>) -> Self {
        Self::new(RequestMethod::Post, resource_type)
    }

    /// A PATCH request.
    pub fn patch(resource_type: impl Into<String>) -> Self {
        Self::new(RequestMethod::Patch, resource_type)
    }

    /// A DELETE request.
    pub fn delete(resource_type: impl Into<String>) -> Self {
        Self::new(RequestMethod::Delete, resource_type)
    }

    /// Target a single record, or a sub-resource such as
    /// `001xx/Contacts`. An empty ID is treated as no ID.
    pub fn with_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach any serializable value as the JSON body.
    pub fn with_json<T: Serialize>(self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| Error::with_source(ErrorKind::Serialization(e.to_string()), e))?;
        Ok(self.with_body(value))
    }

    /// The path below the REST base path: `/{resource_type}[/{resource_id}]`.
    ///
    /// The resource type must be a plain identifier. Each `/`-separated
    /// segment of the ID is percent-encoded; empty, `.` and `..` segments
    /// are rejected so the path stays below the base path.
    pub fn path(&self) -> Result<String> {
        if !soql::is_safe_sobject_name(&self.resource_type) {
            return Err(Error::new(ErrorKind::Config(format!(
                "invalid resource type: {:?}",
                self.resource_type
            ))));
        }

        let mut path = format!("/{}", self.resource_type);
        if let Some(id) = self.resource_id.as_deref().filter(|id| !id.is_empty()) {
            if id
                .split('/')
                .any(|segment| segment.is_empty() || segment == "." || segment == "..")
            {
                return Err(Error::new(ErrorKind::Config(format!(
                    "invalid resource id: {id:?}"
                ))));
            }
            path.push('/');
            path.push_str(&url_security::encode_path(id));
        }
        Ok(path)
    }
}

/// Result of a REST action.
#[derive(Debug, Clone, PartialEq)]
pub enum RestResult {
    /// The call succeeded with an empty body, e.g. `204 No Content`.
    Success,
    /// The parsed JSON body.
    Body(Value),
}

impl RestResult {
    pub(crate) fn from_payload(payload: Option<Value>) -> Self {
        payload.map_or(RestResult::Success, RestResult::Body)
    }

    /// The body, if one came back.
    pub fn body(&self) -> Option<&Value> {
        match self {
            RestResult::Success => None,
            RestResult::Body(value) => Some(value),
        }
    }

    /// Consume the result and return the body, if one came back.
    pub fn into_body(self) -> Option<Value> {
        match self {
            RestResult::Success => None,
            RestResult::Body(value) => Some(value),
        }
    }
}

impl std::fmt::Display for RestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestResult::Success => f.write_str("Success"),
            RestResult::Body(value) => write!(f, "{value}"),
        }
    }
}

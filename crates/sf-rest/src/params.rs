//! Positional parameter substitution for SOQL templates.
//!
//! SOQL has no bind variables over REST, so `$1`, `$2`, ... placeholders are
//! replaced textually with escaped literals before the query is sent.
//!
//! ```rust
//! use sfconn_rest::{substitute, QueryParam};
//!
//! let soql = substitute(
//!     "SELECT Id FROM Contact WHERE Email = $1",
//!     Some(&[QueryParam::from("a@b.com")]),
//! );
//! assert_eq!(soql, "SELECT Id FROM Contact WHERE Email = 'a@b.com'");
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex_lite::{Captures, Regex};

use sfconn_client::security::soql;

/// A `$` followed by a run of digits. The whole run is the placeholder
/// index, so `$1` never matches inside `$10`.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\$([0-9]+)").unwrap()
});

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// Renders as `null`.
    Null,
    /// Renders as `true` / `false`.
    Bool(bool),
    /// Renders unquoted.
    Int(i64),
    /// Renders unquoted. Non-finite values render as `null`.
    Float(f64),
    /// Renders as an escaped, single-quoted string literal.
    Text(String),
    /// Renders as a quoted `YYYY-MM-DD` string.
    Date(NaiveDate),
    /// Renders as the quoted UTC calendar date, `YYYY-MM-DD`.
    DateTime(DateTime<Utc>),
    /// Renders each element, comma separated. Intended for `IN ($1)`.
    List(Vec<QueryParam>),
}

impl QueryParam {
    /// Render this value as a SOQL literal.
    pub fn to_literal(&self) -> String {
        match self {
            QueryParam::Null => "null".to_string(),
            QueryParam::Bool(value) => value.to_string(),
            QueryParam::Int(value) => value.to_string(),
            QueryParam::Float(value) if value.is_finite() => value.to_string(),
            QueryParam::Float(_) => "null".to_string(),
            QueryParam::Text(value) => soql::quote_string(value),
            QueryParam::Date(date) => soql::quote_string(&date.format("%Y-%m-%d").to_string()),
            QueryParam::DateTime(instant) => {
                soql::quote_string(&instant.date_naive().format("%Y-%m-%d").to_string())
            }
            QueryParam::List(values) => values
                .iter()
                .map(QueryParam::to_literal)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<&str> for QueryParam {
    fn from(value: &str) -> Self {
        QueryParam::Text(value.to_string())
    }
}

impl From<String> for QueryParam {
    fn from(value: String) -> Self {
        QueryParam::Text(value)
    }
}

impl From<bool> for QueryParam {
    fn from(value: bool) -> Self {
        QueryParam::Bool(value)
    }
}

impl From<i32> for QueryParam {
    fn from(value: i32) -> Self {
        QueryParam::Int(i64::from(value))
    }
}

impl From<i64> for QueryParam {
    fn from(value: i64) -> Self {
        QueryParam::Int(value)
    }
}

impl From<u32> for QueryParam {
    fn from(value: u32) -> Self {
        QueryParam::Int(i64::from(value))
    }
}

impl From<f64> for QueryParam {
    fn from(value: f64) -> Self {
        QueryParam::Float(value)
    }
}

impl From<NaiveDate> for QueryParam {
    fn from(value: NaiveDate) -> Self {
        QueryParam::Date(value)
    }
}

impl From<DateTime<Utc>> for QueryParam {
    fn from(value: DateTime<Utc>) -> Self {
        QueryParam::DateTime(value)
    }
}

impl<T: Into<QueryParam>> From<Option<T>> for QueryParam {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryParam::Null, Into::into)
    }
}

impl<T: Into<QueryParam>> From<Vec<T>> for QueryParam {
    fn from(values: Vec<T>) -> Self {
        QueryParam::List(values.into_iter().map(Into::into).collect())
    }
}

/// Replace every `$i` placeholder with the escaped literal of `params[i - 1]`.
///
/// Placeholders with no matching parameter, or written with a leading zero,
/// are left as they are. Replacement happens in a single pass, so text
/// inserted for one parameter is never re-scanned for placeholders. With
/// `params` of `None` the template is returned unchanged.
pub fn substitute(template: &str, params: Option<&[QueryParam]>) -> String {
    let Some(params) = params else {
        return template.to_string();
    };

    let literals: Vec<String> = params.iter().map(QueryParam::to_literal).collect();

    let replaced: Cow<'_, str> = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
        let digits = &caps[1];
        let literal = if digits.starts_with('0') {
            None
        } else {
            digits
                .parse::<usize>()
                .ok()
                .and_then(|index| index.checked_sub(1))
                .and_then(|index| literals.get(index))
        };
        match literal {
            Some(literal) => literal.clone(),
            None => caps[0].to_string(),
        }
    });

    replaced.into_owned()
}

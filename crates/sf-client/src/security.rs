//! Escaping utilities for values embedded in SOQL text and URLs.
//!
//! ## SOQL Injection Prevention
//!
//! User-provided values that end up inside a SOQL string MUST go through
//! [`soql::quote_string`] (or the parameter substitution in `sfconn-rest`,
//! which uses it).
//!
//! ```rust
//! use sfconn_client::security::soql;
//!
//! let literal = soql::quote_string("O'Brien");
//! assert_eq!(literal, "'O\\'Brien'");
//! ```
//!
//! ## URL Parameter Encoding
//!
//! ```rust
//! use sfconn_client::security::url;
//!
//! let encoded_id = url::encode_param("001/test");
//! assert_eq!(encoded_id, "001%2Ftest");
//! ```

/// SOQL escaping utilities for injection prevention.
pub mod soql {
    /// Escape a string value for use inside a SOQL string literal.
    ///
    /// - Single quotes (`'`) are escaped to (`\'`)
    /// - Backslashes (`\`) are escaped to (`\\`)
    /// - Newlines, carriage returns and tabs become `\n`, `\r`, `\t`
    ///
    /// # Example
    ///
    /// ```rust
    /// use sfconn_client::security::soql;
    ///
    /// let safe = soql::escape_string("O'Brien & Co.");
    /// assert_eq!(safe, "O\\'Brien & Co.");
    /// ```
    ///
    /// Without escaping, an attacker could manipulate queries:
    /// ```text
    /// Input: "' OR Name LIKE '%"
    /// Unsafe: SELECT Id FROM Account WHERE Name = '' OR Name LIKE '%'
    /// Safe:   SELECT Id FROM Account WHERE Name = '\' OR Name LIKE \'%'
    /// ```
    #[must_use]
    pub fn escape_string(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 16);
        for ch in value.chars() {
            match ch {
                '\'' => escaped.push_str("\\'"),
                '\\' => escaped.push_str("\\\\"),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                '\t' => escaped.push_str("\\t"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }

    /// Escape a string and wrap it in single quotes, producing a complete
    /// SOQL string literal.
    #[must_use]
    pub fn quote_string(value: &str) -> String {
        format!("'{}'", escape_string(value))
    }

    /// Validate that a field or SObject name contains only safe characters.
    ///
    /// Names must start with a letter and contain only alphanumerics and
    /// underscores (which covers the `__c` / `__r` custom suffixes).
    ///
    /// ```rust
    /// use sfconn_client::security::soql;
    ///
    /// assert!(soql::is_safe_field_name("Custom_Field__c"));
    /// assert!(!soql::is_safe_field_name("Bad'; DROP TABLE--"));
    /// ```
    #[must_use]
    pub fn is_safe_field_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {}
            _ => return false,
        }
        chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    }

    /// Validate that a SObject name is safe.
    #[must_use]
    pub fn is_safe_sobject_name(name: &str) -> bool {
        is_safe_field_name(name)
    }
}

/// URL encoding utilities for parameter safety.
pub mod url {
    /// URL-encode a path segment or query value.
    ///
    /// An encoded value cannot add path separators or extra query
    /// parameters. `.` and `..` pass through unchanged, so callers building
    /// paths must reject them as whole segments.
    #[must_use]
    pub fn encode_param(value: &str) -> String {
        urlencoding::encode(value).into_owned()
    }

    /// Encode each `/`-separated segment of a sub-resource path, keeping
    /// the separators, e.g. `001xx/Contacts` or an external-ID field/value.
    /// Dot segments are not rewritten; see [`encode_param`].
    ///
    /// ```rust
    /// use sfconn_client::security::url;
    ///
    /// assert_eq!(url::encode_path("Email__c/a b@c.com"), "Email__c/a%20b%40c.com");
    /// ```
    #[must_use]
    pub fn encode_path(value: &str) -> String {
        value
            .split('/')
            .map(encode_param)
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod soql_tests {
        use super::soql::*;

        #[test]
        fn test_escape_string_basic() {
            assert_eq!(escape_string("hello"), "hello");
            assert_eq!(escape_string("O'Brien"), "O\\'Brien");
            assert_eq!(escape_string("test\\path"), "test\\\\path");
        }

        #[test]
        fn test_escape_string_injection_attempts() {
            assert_eq!(escape_string("' OR '1'='1"), "\\' OR \\'1\\'=\\'1");
            assert_eq!(
                escape_string("'; DELETE FROM Account--"),
                "\\'; DELETE FROM Account--"
            );
        }

        #[test]
        fn test_escape_string_special_chars() {
            assert_eq!(escape_string("line1\nline2"), "line1\\nline2");
            assert_eq!(escape_string("col1\tcol2"), "col1\\tcol2");
            assert_eq!(escape_string("text\r\n"), "text\\r\\n");
        }

        #[test]
        fn test_quote_string() {
            assert_eq!(quote_string("a@b.com"), "'a@b.com'");
            assert_eq!(quote_string(""), "''");
            assert_eq!(quote_string("' OR '1'='1"), "'\\' OR \\'1\\'=\\'1'");
        }

        #[test]
        fn test_is_safe_field_name() {
            assert!(is_safe_field_name("Id"));
            assert!(is_safe_field_name("Custom_Field__c"));
            assert!(is_safe_field_name("Account__r"));
            assert!(is_safe_field_name("X123"));

            assert!(!is_safe_field_name(""));
            assert!(!is_safe_field_name("123abc"));
            assert!(!is_safe_field_name("field-name"));
            assert!(!is_safe_field_name("field.name"));
            assert!(!is_safe_field_name("field'name"));
            assert!(!is_safe_sobject_name("Contact/../User"));
        }
    }

    mod url_tests {
        use super::url::*;

        #[test]
        fn test_encode_param() {
            assert_eq!(encode_param("simple"), "simple");
            assert_eq!(encode_param("has space"), "has%20space");
            assert_eq!(encode_param("../../etc/passwd"), "..%2F..%2Fetc%2Fpasswd");
        }

        #[test]
        fn test_encode_path_keeps_separators() {
            assert_eq!(encode_path("003A"), "003A");
            assert_eq!(encode_path("001A/Contacts"), "001A/Contacts");
            assert_eq!(encode_path("Ext_Id__c/x?y=1"), "Ext_Id__c/x%3Fy%3D1");
        }
    }
}

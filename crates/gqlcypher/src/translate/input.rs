//! Accessors for request argument values that report malformed input as an
//! invalid request.

use gqlcypher_core::{stmt::Value, Error, Result};

use indexmap::IndexMap;

pub(crate) fn expect_map<'v>(what: &str, value: &'v Value) -> Result<&'v IndexMap<String, Value>> {
    value.as_map().ok_or_else(|| {
        Error::invalid_request(format!(
            "`{what}` must be an object, got {}",
            value.type_name()
        ))
    })
}

pub(crate) fn expect_list<'v>(what: &str, value: &'v Value) -> Result<&'v [Value]> {
    value.as_list().ok_or_else(|| {
        Error::invalid_request(format!(
            "`{what}` must be a list, got {}",
            value.type_name()
        ))
    })
}

pub(crate) fn expect_int(what: &str, value: &Value) -> Result<i64> {
    value.as_i64().ok_or_else(|| {
        Error::invalid_request(format!(
            "`{what}` must be an integer, got {}",
            value.type_name()
        ))
    })
}

pub(crate) fn expect_str<'v>(what: &str, value: &'v Value) -> Result<&'v str> {
    value.as_str().ok_or_else(|| {
        Error::invalid_request(format!(
            "`{what}` must be a string, got {}",
            value.type_name()
        ))
    })
}

/// A list argument, or a single object standing in for a one-item list.
pub(crate) fn one_or_many(value: &Value) -> Vec<&Value> {
    value.iter_one_or_many().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn errors_name_the_argument() {
        let err = expect_map("where", &Value::from(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid request: `where` must be an object, got integer"
        );
    }

    #[test]
    fn single_object_counts_as_one_item() {
        let value = Value::from(json!({ "name": "a" }));
        assert_eq!(one_or_many(&value).len(), 1);
        assert!(one_or_many(&Value::Null).is_empty());
    }
}

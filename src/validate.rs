//! Type assertions with path-qualified error messages.
//!
//! These are the building blocks schema field handlers use to check the
//! shape of a value before converting it. Each assertion either returns
//! `Ok(())` or fails straight away; none of them mutate or batch.
//!
//! | Assertion | Message |
//! |-----------|---------|
//! | [`assert_type`] | `Invalid type for 'project.description': expected string, got integer` |
//! | [`assert_indexed_type`] | `Invalid type for 'project.keywords[0]': expected string, got integer` |
//! | [`assert_value_type`] | `Invalid value type for 'project.urls.foo': expected string, got integer` |

use crate::{Error, KeyPath, Result, Value, ValueType};

/// Checks that `value` has the `expected` type.
///
/// # Examples
///
/// ```rust
/// use typed_toml::{assert_type, KeyPath, Value, ValueType};
///
/// let path = KeyPath::from(["project", "description"]);
/// assert!(assert_type(&Value::from("spam"), ValueType::String, &path).is_ok());
///
/// let err = assert_type(&Value::from(12345), ValueType::String, &path).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Invalid type for 'project.description': expected string, got integer"
/// );
/// ```
pub fn assert_type(value: &Value, expected: ValueType, path: &KeyPath) -> Result<()> {
    let found = value.value_type();
    if found == expected {
        return Ok(());
    }
    Err(Error::InvalidType {
        path: path.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    })
}

/// Checks the element at position `idx` of the array found at `path`.
///
/// # Examples
///
/// ```rust
/// use typed_toml::{assert_indexed_type, KeyPath, Value, ValueType};
///
/// let path = KeyPath::from(["project", "keywords"]);
/// let err = assert_indexed_type(&Value::from(1), ValueType::String, &path, 0).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Invalid type for 'project.keywords[0]': expected string, got integer"
/// );
/// ```
pub fn assert_indexed_type(
    value: &Value,
    expected: ValueType,
    path: &KeyPath,
    idx: usize,
) -> Result<()> {
    let found = value.value_type();
    if found == expected {
        return Ok(());
    }
    Err(Error::InvalidType {
        path: path.indexed(idx),
        expected: expected.to_string(),
        found: found.to_string(),
    })
}

/// Checks a value reached through a key of a table, e.g. one entry of `[project.urls]`.
///
/// # Examples
///
/// ```rust
/// use typed_toml::{assert_value_type, KeyPath, Value, ValueType};
///
/// let path = KeyPath::from(["project", "urls", "foo"]);
/// let err = assert_value_type(&Value::from(1234), ValueType::String, &path).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Invalid value type for 'project.urls.foo': expected string, got integer"
/// );
/// ```
pub fn assert_value_type(value: &Value, expected: ValueType, path: &KeyPath) -> Result<()> {
    let found = value.value_type();
    if found == expected {
        return Ok(());
    }
    Err(Error::InvalidValueType {
        path: path.to_string(),
        expected: expected.to_string(),
        found: found.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SharedValue, Table};

    #[test]
    fn test_assert_type_accepts_matching_value() {
        let path = KeyPath::from(["project", "urls"]);
        let table = Value::Table(Table::new());
        assert!(assert_type(&table, ValueType::Table, &path).is_ok());
    }

    #[test]
    fn test_assert_type_reports_list() {
        let path = KeyPath::from(["project", "description"]);
        let value = Value::from(vec![1, 2, 3, 4, 5]);
        let err = assert_type(&value, ValueType::String, &path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid type for 'project.description': expected string, got array"
        );
    }

    #[test]
    fn test_assert_indexed_type_quotes_path() {
        let path = KeyPath::from(["tool", "my tool", "items"]);
        let err = assert_indexed_type(&Value::Boolean(true), ValueType::Integer, &path, 2)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Invalid type for 'tool."my tool".items[2]': expected integer, got boolean"#
        );
    }

    #[test]
    fn test_assert_value_type_is_type_error() {
        let path = KeyPath::from(["project", "entry-points", "console"]);
        let err = assert_value_type(&Value::from("x"), ValueType::Table, &path).unwrap_err();
        assert!(err.is_type_error());
        assert!(matches!(err, Error::InvalidValueType { .. }));
    }

    #[test]
    fn test_shared_handle_checked_by_target_type() {
        let path = KeyPath::from(["a"]);
        let shared = Value::Shared(SharedValue::new(Value::from("x")));
        assert!(assert_type(&shared, ValueType::String, &path).is_ok());
    }
}

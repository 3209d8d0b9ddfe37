//! Encoder strategies.
//!
//! The document writer in [`crate::ser`] decides the layout of a document:
//! which entries become `key = value` lines, which become `[table]` sections
//! and which become `[[array.of.tables]]` blocks. Everything that ends up on
//! the right-hand side of a `key = value` line is delegated to an
//! [`Encoder`], as are the keys themselves.
//!
//! - [`Encoder`]: the strategy trait; every method has a default
//! - [`TomlEncoder`]: the stock strategy, configured with builder methods
//!
//! ## Examples
//!
//! ```rust
//! use typed_toml::{dumps, loads, TomlDecoder, TomlEncoder};
//!
//! let doc = loads("a = [1, 2, 3]\n", &TomlDecoder::new()).unwrap();
//!
//! let encoder = TomlEncoder::new().with_separator(",\t").unwrap();
//! assert_eq!(dumps(&doc, &encoder).unwrap(), "a = [1,\t2,\t3]\n");
//! ```

use crate::{Error, Result, Value};

/// A rendering strategy for the writer.
///
/// The writer resolves shared handles and walks containers itself, so an
/// encoder only ever sees plain values: `render_scalar` is called with
/// strings, numbers, booleans and datetimes, while `render_array` and
/// `render_table` receive their elements already rendered.
///
/// # Examples
///
/// An encoder that writes every array on its own lines:
///
/// ```rust
/// use typed_toml::{dumps, toml, Encoder};
///
/// struct Tall;
///
/// impl Encoder for Tall {
///     fn render_array(&self, items: Vec<String>) -> String {
///         if items.is_empty() {
///             return "[]".to_string();
///         }
///         let mut out = String::from("[\n");
///         for item in items {
///             out.push_str("    ");
///             out.push_str(&item);
///             out.push_str(",\n");
///         }
///         out.push(']');
///         out
///     }
/// }
///
/// let doc = toml!({ "a": [1, 2] });
/// let text = dumps(doc.as_table().unwrap(), &Tall).unwrap();
/// assert_eq!(text, "a = [\n    1,\n    2,\n]\n");
/// ```
pub trait Encoder {
    /// Whether tables marked inline stay on one line instead of becoming sections.
    fn preserves_inline(&self) -> bool {
        false
    }

    /// Text placed between array elements.
    fn array_separator(&self) -> &str {
        ", "
    }

    /// Renders a key, bare when possible.
    fn render_key(&self, key: &str) -> String {
        toml_edit::Key::new(key).display_repr().into_owned()
    }

    /// Renders a string, number, boolean or datetime.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnsupportedType`] for containers.
    fn render_scalar(&self, value: &Value) -> Result<String> {
        let scalar = match value {
            Value::String(s) => toml_edit::Value::from(s.as_str()),
            Value::Integer(i) => toml_edit::Value::from(*i),
            Value::Float(f) => toml_edit::Value::from(*f),
            Value::Boolean(b) => toml_edit::Value::from(*b),
            Value::Datetime(dt) => toml_edit::Value::from(*dt),
            other => {
                return Err(Error::unsupported_type(&format!(
                    "{} is not a scalar",
                    other.value_type()
                )))
            }
        };
        Ok(scalar.to_string())
    }

    /// Joins rendered elements into an array literal.
    fn render_array(&self, items: Vec<String>) -> String {
        format!("[{}]", items.join(self.array_separator()))
    }

    /// Joins rendered `(key, value)` pairs into an inline table.
    fn render_table(&self, entries: Vec<(String, String)>) -> String {
        if entries.is_empty() {
            return "{}".to_string();
        }
        let body: Vec<String> = entries
            .into_iter()
            .map(|(key, value)| format!("{} = {}", key, value))
            .collect();
        format!("{{ {} }}", body.join(", "))
    }
}

/// The stock encoder.
///
/// # Examples
///
/// ```rust
/// use typed_toml::{Encoder, TomlEncoder};
///
/// let encoder = TomlEncoder::new();
/// assert!(!encoder.preserves_inline());
/// assert_eq!(encoder.array_separator(), ", ");
///
/// let encoder = TomlEncoder::new().preserve_inline(true);
/// assert!(encoder.preserves_inline());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TomlEncoder {
    preserve_inline: bool,
    separator: String,
}

impl Default for TomlEncoder {
    fn default() -> Self {
        TomlEncoder {
            preserve_inline: false,
            separator: ", ".to_string(),
        }
    }
}

impl TomlEncoder {
    /// Default rendering: every table becomes a section, arrays use `", "`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps tables marked inline (see [`crate::Table::is_inline`]) on one line.
    #[must_use]
    pub fn preserve_inline(mut self, preserve: bool) -> Self {
        self.preserve_inline = preserve;
        self
    }

    /// Sets the array separator.
    ///
    /// The separator must be a single comma surrounded by whitespace. Input
    /// made only of whitespace gets a comma in front of it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSeparator`] for anything else.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_toml::{Encoder, TomlEncoder};
    ///
    /// let encoder = TomlEncoder::new().with_separator("\n    ").unwrap();
    /// assert_eq!(encoder.array_separator(), ",\n    ");
    ///
    /// assert!(TomlEncoder::new().with_separator(";").is_err());
    /// ```
    pub fn with_separator(mut self, separator: &str) -> Result<Self> {
        self.separator = normalize_separator(separator)?;
        Ok(self)
    }
}

impl Encoder for TomlEncoder {
    fn preserves_inline(&self) -> bool {
        self.preserve_inline
    }

    fn array_separator(&self) -> &str {
        &self.separator
    }
}

fn normalize_separator(separator: &str) -> Result<String> {
    if separator.trim().is_empty() {
        return Ok(format!(",{}", separator));
    }

    let commas = separator.chars().filter(|c| *c == ',').count();
    let rest_is_blank = separator
        .chars()
        .all(|c| c == ',' || c.is_whitespace());
    if commas == 1 && rest_is_blank {
        Ok(separator.to_string())
    } else {
        Err(Error::InvalidSeparator(separator.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_whitespace_gets_comma() {
        let encoder = TomlEncoder::new().with_separator("\t").unwrap();
        assert_eq!(encoder.array_separator(), ",\t");

        let encoder = TomlEncoder::new().with_separator("").unwrap();
        assert_eq!(encoder.array_separator(), ",");
    }

    #[test]
    fn test_separator_with_comma_kept() {
        let encoder = TomlEncoder::new().with_separator(",\t").unwrap();
        assert_eq!(encoder.array_separator(), ",\t");

        let encoder = TomlEncoder::new().with_separator(" , ").unwrap();
        assert_eq!(encoder.array_separator(), " , ");
    }

    #[test]
    fn test_separator_rejected() {
        for bad in ["|", ";", ",,", ", x"] {
            let err = TomlEncoder::new().with_separator(bad).unwrap_err();
            assert_eq!(err, Error::InvalidSeparator(bad.to_string()));
        }
    }

    #[test]
    fn test_render_scalar() {
        let encoder = TomlEncoder::new();
        assert_eq!(encoder.render_scalar(&Value::from("☃🚀📦")).unwrap(), "\"☃🚀📦\"");
        assert_eq!(encoder.render_scalar(&Value::from(-7)).unwrap(), "-7");
        assert_eq!(encoder.render_scalar(&Value::from(true)).unwrap(), "true");
        assert!(encoder.render_scalar(&Value::Array(vec![])).is_err());
    }

    #[test]
    fn test_render_scalar_escapes_strings() {
        let encoder = TomlEncoder::new();
        let render = |s: &str| encoder.render_scalar(&Value::from(s)).unwrap();
        assert_eq!(render("tab\t"), r#""tab\t""#);
        assert_eq!(render("formfeed\u{0c}"), r#""formfeed\f""#);
        assert_eq!(render("backspace\u{08}"), r#""backspace\b""#);
        assert_eq!(render("del\u{7f}"), r#""del\u007F""#);
        assert_eq!(render("double \"\""), r#"'double ""'"#);
    }

    #[test]
    fn test_render_scalar_floats() {
        let encoder = TomlEncoder::new();
        let render = |f: f64| encoder.render_scalar(&Value::Float(f)).unwrap();
        assert_eq!(render(1.0), "1.0");
        assert_eq!(render(-0.5), "-0.5");
        assert_eq!(render(-0.0), "-0.0");
        assert_eq!(render(f64::NEG_INFINITY), "-inf");
        assert_eq!(render(f64::NAN), "nan");
    }

    #[test]
    fn test_render_key() {
        let encoder = TomlEncoder::new();
        assert_eq!(encoder.render_key("gui-scripts"), "gui-scripts");
        assert_eq!(encoder.render_key("dotted.key"), r#""dotted.key""#);
        assert_eq!(encoder.render_key("my tool"), r#""my tool""#);
    }

    #[test]
    fn test_render_table() {
        let encoder = TomlEncoder::new();
        assert_eq!(encoder.render_table(vec![]), "{}");
        assert_eq!(
            encoder.render_table(vec![
                ("file".to_string(), "\"README.rst\"".to_string()),
                ("content-type".to_string(), "\"text/x-rst\"".to_string()),
            ]),
            r#"{ file = "README.rst", content-type = "text/x-rst" }"#
        );
    }
}

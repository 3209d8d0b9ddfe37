//! # typed_toml
//!
//! Load, validate and re-serialize TOML configuration files.
//!
//! The crate is a front end for configuration documents such as
//! `pyproject.toml`. It decodes TOML text into a dynamic [`Value`] tree,
//! pulls typed and validated fields out of that tree with a [`Schema`], and
//! writes trees back out through a pluggable [`Encoder`].
//!
//! ## Key Features
//!
//! - **Path-qualified diagnostics**: type errors name the exact location,
//!   e.g. `Invalid type for 'project.keywords[0]': expected string, got integer`
//! - **Schema-driven extraction**: declare keys once, attach one conversion
//!   handler per key, parse any number of tables
//! - **Pluggable encoders**: inline-table preservation, custom array
//!   separators, or a strategy of your own
//! - **Serde Compatible**: decode into your own structs and maps, encode any
//!   `Serialize` type whose root is a table
//!
//! ## Quick Start
//!
//! ```rust
//! use typed_toml::{loads, Schema, TomlDecoder};
//!
//! let doc = loads(
//!     "[project]\nname = \"spam\"\nkeywords = [1, 2, 3]\n",
//!     &TomlDecoder::new(),
//! )
//! .unwrap();
//!
//! let schema = Schema::new(["project"])
//!     .field("name", |f| f.str().map(|name| vec![name]))
//!     .field("keywords", |f| f.string_set());
//!
//! let project = doc["project"].as_table().unwrap();
//! let err = schema.parse(project).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Invalid type for 'project.keywords[0]': expected string, got integer"
//! );
//! ```
//!
//! ### Round Trips
//!
//! ```rust
//! use typed_toml::{dumps, loads, TomlDecoder, TomlEncoder};
//!
//! let source = "[project]\nreadme = {file = 'README.rst', content-type = 'text/x-rst'}\n";
//! let doc = loads(source, &TomlDecoder::new()).unwrap();
//!
//! let text = dumps(&doc, &TomlEncoder::new().preserve_inline(true)).unwrap();
//! assert_eq!(
//!     text,
//!     "[project]\nreadme = { file = \"README.rst\", content-type = \"text/x-rst\" }\n"
//! );
//! assert_eq!(loads(&text, &TomlDecoder::new()).unwrap(), doc);
//! ```
//!
//! ### Serde
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use typed_toml::{from_str, to_string, TomlEncoder};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Tool {
//!     line_length: u16,
//!     paths: Vec<String>,
//! }
//!
//! let tool = Tool { line_length: 115, paths: vec!["src".into()] };
//! let text = to_string(&tool, &TomlEncoder::new()).unwrap();
//! assert_eq!(text, "line_length = 115\npaths = [\"src\"]\n");
//! assert_eq!(from_str::<Tool>(&text).unwrap(), tool);
//! ```
//!
//! ## Errors
//!
//! Every operation reports failures through [`Error`]. Nothing is caught
//! inside the crate; schemas stop at the first failing field.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`pyproject.rs`** - Parsing and validating a `[project]` table
//! - **`custom_encoder.rs`** - Writing documents with a custom strategy
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod encoder;
pub mod error;
pub mod macros;
pub mod map;
pub mod path;
pub mod project;
pub mod schema;
pub mod ser;
pub mod validate;
pub mod value;

pub use de::{from_value, TomlDecoder};
pub use encoder::{Encoder, TomlEncoder};
pub use error::{Error, Result};
pub use map::Table;
pub use path::{render_path, KeyPath, PathStep};
pub use schema::{Field, Schema, UnknownKeys};
pub use ser::{to_table, to_value, ValueSerializer};
pub use toml_edit::Datetime;
pub use validate::{assert_indexed_type, assert_type, assert_value_type};
pub use value::{SharedValue, Value, ValueType};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Parses TOML text into a table.
///
/// # Examples
///
/// ```rust
/// use typed_toml::{loads, TomlDecoder, Value};
///
/// let doc = loads("[a]\nb = 1\nc = 2\n", &TomlDecoder::new()).unwrap();
/// assert_eq!(doc["a"]["b"], Value::from(1));
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] with line and column information if `text` is
/// not valid TOML.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn loads(text: &str, decoder: &TomlDecoder) -> Result<Table> {
    debug!(
        bytes = text.len(),
        mark_inline = decoder.marks_inline(),
        "decoding TOML text"
    );
    decoder.decode(text)
}

/// Reads and parses a TOML file.
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if the file does not exist, [`Error::Io`]
/// for other read failures and [`Error::Syntax`] for malformed content.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn load<P: AsRef<Path>>(path: P, decoder: &TomlDecoder) -> Result<Table> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading TOML file");

    let text = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound {
            path: path.display().to_string(),
        },
        _ => Error::io(&format!("{}: {}", path.display(), err)),
    })?;
    loads(&text, decoder)
}

/// Deserialize an instance of type `T` from TOML text.
///
/// `T` can be any map type (`BTreeMap`, `HashMap`, `IndexMap`, ...) or a
/// struct deriving `Deserialize`.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use typed_toml::from_str;
///
/// let doc: BTreeMap<String, BTreeMap<String, i64>> = from_str("[a]\nb = 1\nc = 2\n").unwrap();
/// assert_eq!(doc["a"]["b"], 1);
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid TOML or does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(text: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let table = loads(text, &TomlDecoder::pure())?;
    from_value(Value::Table(table))
}

/// Deserialize an instance of type `T` from an I/O stream of TOML.
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid TOML, or the
/// data does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&text)
}

/// Renders a table as TOML text.
///
/// # Examples
///
/// ```rust
/// use typed_toml::{dumps, toml, TomlEncoder};
///
/// let doc = toml!({ "a": { "b": 1, "c": 2 } });
/// let text = dumps(doc.as_table().unwrap(), &TomlEncoder::new()).unwrap();
/// assert_eq!(text, "[a]\nb = 1\nc = 2\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::CyclicStructure`] if the table contains itself through
/// shared handles.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn dumps<E>(table: &Table, encoder: &E) -> Result<String>
where
    E: Encoder + ?Sized,
{
    debug!(entries = table.len(), "encoding TOML document");
    ser::to_document_string(table, encoder)
}

/// Writes a table to a file as TOML.
///
/// The file gets the rendered text with trailing whitespace removed from
/// every line and exactly one newline at the end. The rendered text itself
/// is returned unchanged.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn dump<P, E>(table: &Table, path: P, encoder: &E) -> Result<String>
where
    P: AsRef<Path>,
    E: Encoder + ?Sized,
{
    let path = path.as_ref();
    let text = dumps(table, encoder)?;

    debug!(path = %path.display(), bytes = text.len(), "writing TOML file");
    fs::write(path, clean_text(&text))
        .map_err(|err| Error::io(&format!("{}: {}", path.display(), err)))?;
    Ok(text)
}

/// Serialize any `T: Serialize` whose root is a table as TOML text.
///
/// # Errors
///
/// Returns an error if `T` does not serialize to a table or holds a value
/// TOML cannot represent.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T, E>(value: &T, encoder: &E) -> Result<String>
where
    T: ?Sized + Serialize,
    E: Encoder + ?Sized,
{
    dumps(&to_table(value)?, encoder)
}

/// Serialize any `T: Serialize` as TOML into a writer.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T, E>(mut writer: W, value: &T, encoder: &E) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
    E: Encoder + ?Sized,
{
    let text = to_string(value, encoder)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

fn clean_text(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len() + 1);
    for line in text.lines() {
        cleaned.push_str(line.trim_end());
        cleaned.push('\n');
    }
    let kept = cleaned.trim_end_matches('\n').len();
    cleaned.truncate(kept);
    cleaned.push('\n');
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct BuildSystem {
        requires: Vec<String>,
        #[serde(rename = "build-backend")]
        build_backend: String,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct PyProject {
        #[serde(rename = "build-system")]
        build_system: BuildSystem,
    }

    #[test]
    fn test_serialize_deserialize_struct() {
        let pyproject = PyProject {
            build_system: BuildSystem {
                requires: vec!["whey".to_string()],
                build_backend: "whey".to_string(),
            },
        };

        let text = to_string(&pyproject, &TomlEncoder::new()).unwrap();
        assert_eq!(
            text,
            "[build-system]\nrequires = [\"whey\"]\nbuild-backend = \"whey\"\n"
        );
        let back: PyProject = from_str(&text).unwrap();
        assert_eq!(back, pyproject);
    }

    #[test]
    fn test_from_str_into_map() {
        let doc: BTreeMap<String, BTreeMap<String, i64>> =
            from_str("\n[a]\r\nb = 1\r\nc = 2\n").unwrap();
        assert_eq!(doc["a"]["c"], 2);
    }

    #[test]
    fn test_to_string_rejects_non_table_root() {
        let err = to_string(&vec![1, 2, 3], &TomlEncoder::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }

    #[test]
    fn test_from_reader() {
        let doc: BTreeMap<String, String> = from_reader("key = \"☃🚀📦\"".as_bytes()).unwrap();
        assert_eq!(doc["key"], "☃🚀📦");
    }

    #[test]
    fn test_to_writer() {
        let mut doc = BTreeMap::new();
        doc.insert("key", "string");
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &doc, &TomlEncoder::new()).unwrap();
        assert_eq!(buffer, b"key = \"string\"\n");
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("a = 1  \n\n[b]\t\nc = 2\n\n\n"), "a = 1\n\n[b]\nc = 2\n");
        assert_eq!(clean_text("a = 1"), "a = 1\n");
        assert_eq!(clean_text(""), "\n");
    }
}

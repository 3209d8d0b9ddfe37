//! Schema-driven extraction of typed fields from a table.
//!
//! A [`Schema`] declares the keys it recognizes and registers one handler per
//! key. [`Schema::parse`] walks the declared keys in declaration order and,
//! for every key present in the input table, hands a [`Field`] to the
//! matching handler. Handlers validate with the assertions from
//! [`crate::validate`] and convert the raw value into whatever the schema's
//! output type `T` is.
//!
//! Parsing rules:
//!
//! - declared keys that are absent from the table are skipped, nothing is
//!   filled in and nothing is raised;
//! - the first handler error aborts the parse and is returned unchanged;
//! - keys present in the table but not declared are ignored unless the schema
//!   was built with [`UnknownKeys::Reject`];
//! - the result maps each parsed key (as written, hyphens included) to its
//!   converted value, in declaration order.
//!
//! ## Examples
//!
//! ```rust
//! use typed_toml::{loads, Schema, TomlDecoder};
//!
//! #[derive(Debug, PartialEq)]
//! enum Meta {
//!     Text(String),
//!     List(Vec<String>),
//! }
//!
//! let schema = Schema::new(["project"])
//!     .field("description", |field| field.str().map(Meta::Text))
//!     .field("keywords", |field| field.string_set().map(Meta::List));
//!
//! let doc = loads(
//!     "[project]\nname = \"spam\"\nkeywords = [\"egg\", \"bacon\", \"egg\"]\n",
//!     &TomlDecoder::new(),
//! )
//! .unwrap();
//! let project = doc.get("project").and_then(|v| v.as_table()).unwrap();
//!
//! let parsed = schema.parse(project).unwrap();
//! assert_eq!(parsed["keywords"], Meta::List(vec!["bacon".into(), "egg".into()]));
//! assert!(!parsed.contains_key("description"));
//! ```

use crate::validate::{assert_indexed_type, assert_type, assert_value_type};
use crate::{Error, KeyPath, Result, Table, Value, ValueType};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;

/// Conversion routine registered for one declared key.
pub type Handler<T> = Box<dyn Fn(&Field<'_>) -> Result<T> + Send + Sync>;

/// What [`Schema::parse`] does with keys the schema does not declare.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Leave them alone.
    #[default]
    Ignore,
    /// Fail with [`Error::BadConfig`] once every declared key parsed.
    Reject,
}

/// The context a handler receives: the whole table plus the key being parsed.
///
/// Handlers get the full table so they can look at sibling keys, and the
/// field's fully qualified [`KeyPath`] so errors name the right location.
#[derive(Debug)]
pub struct Field<'a> {
    table: &'a Table,
    key: &'a str,
    value: &'a Value,
    path: KeyPath,
}

impl<'a> Field<'a> {
    /// The table the field was found in.
    #[must_use]
    pub fn table(&self) -> &'a Table {
        self.table
    }

    #[must_use]
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// The raw value stored under the key.
    #[must_use]
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Path of the field, e.g. `project.keywords`.
    #[must_use]
    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    /// Extracts a string.
    pub fn str(&self) -> Result<String> {
        assert_type(self.value, ValueType::String, &self.path)?;
        string_of(self.value, &self.path)
    }

    pub fn integer(&self) -> Result<i64> {
        assert_type(self.value, ValueType::Integer, &self.path)?;
        self.value
            .detach()
            .as_integer()
            .ok_or_else(|| mismatch(self.value, ValueType::Integer, &self.path))
    }

    pub fn boolean(&self) -> Result<bool> {
        assert_type(self.value, ValueType::Boolean, &self.path)?;
        self.value
            .detach()
            .as_bool()
            .ok_or_else(|| mismatch(self.value, ValueType::Boolean, &self.path))
    }

    /// Extracts an array of strings, keeping order and duplicates.
    pub fn string_list(&self) -> Result<Vec<String>> {
        let items = self.array()?;
        let mut parsed = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            assert_indexed_type(item, ValueType::String, &self.path, idx)?;
            parsed.push(string_of(item, &self.path)?);
        }
        Ok(parsed)
    }

    /// Extracts an array of strings as a sorted, duplicate-free list.
    ///
    /// ```rust
    /// use typed_toml::{toml, Schema};
    ///
    /// let schema = Schema::new(["project"]).field("keywords", |f| f.string_set());
    /// let table = toml!({ "keywords": ["egg", "bacon", "egg"] });
    /// let parsed = schema.parse(table.as_table().unwrap()).unwrap();
    /// assert_eq!(parsed["keywords"], vec!["bacon", "egg"]);
    /// ```
    pub fn string_set(&self) -> Result<Vec<String>> {
        let items = self.array()?;
        let mut parsed = BTreeSet::new();
        for (idx, item) in items.iter().enumerate() {
            assert_indexed_type(item, ValueType::String, &self.path, idx)?;
            parsed.insert(string_of(item, &self.path)?);
        }
        Ok(parsed.into_iter().collect())
    }

    /// Extracts a table whose values are all strings, e.g. `[project.urls]`.
    pub fn string_table(&self) -> Result<IndexMap<String, String>> {
        let table = self.sub_table()?;
        string_entries(&table, &self.path)
    }

    /// Extracts a table of string tables, e.g. `[project.entry-points]`.
    pub fn nested_string_tables(&self) -> Result<IndexMap<String, IndexMap<String, String>>> {
        let table = self.sub_table()?;
        let mut parsed = IndexMap::with_capacity(table.len());
        for (group, sub_table) in &table {
            let group_path = self.path.join(group);
            assert_value_type(sub_table, ValueType::Table, &group_path)?;
            let sub_table = sub_table.detach();
            let entries = match sub_table.as_table() {
                Some(entries) => string_entries(entries, &group_path)?,
                None => return Err(mismatch(&sub_table, ValueType::Table, &group_path)),
            };
            parsed.insert(group.clone(), entries);
        }
        Ok(parsed)
    }

    fn array(&self) -> Result<Vec<Value>> {
        assert_type(self.value, ValueType::Array, &self.path)?;
        match self.value.detach().into_owned() {
            Value::Array(items) => Ok(items),
            other => Err(mismatch(&other, ValueType::Array, &self.path)),
        }
    }

    fn sub_table(&self) -> Result<Table> {
        assert_type(self.value, ValueType::Table, &self.path)?;
        match self.value.detach().into_owned() {
            Value::Table(table) => Ok(table),
            other => Err(mismatch(&other, ValueType::Table, &self.path)),
        }
    }
}

fn string_entries(table: &Table, path: &KeyPath) -> Result<IndexMap<String, String>> {
    let mut parsed = IndexMap::with_capacity(table.len());
    for (name, value) in table {
        let value_path = path.join(name);
        assert_value_type(value, ValueType::String, &value_path)?;
        parsed.insert(name.clone(), string_of(value, &value_path)?);
    }
    Ok(parsed)
}

fn string_of(value: &Value, path: &KeyPath) -> Result<String> {
    match value.detach().as_str() {
        Some(s) => Ok(s.to_string()),
        None => Err(mismatch(value, ValueType::String, path)),
    }
}

fn mismatch(value: &Value, expected: ValueType, path: &KeyPath) -> Error {
    Error::InvalidType {
        path: path.to_string(),
        expected: expected.to_string(),
        found: value.value_type().to_string(),
    }
}

/// A declared set of keys, each bound to a conversion handler.
///
/// Schemas are immutable once built and can be reused for any number of
/// parses, including from several threads.
pub struct Schema<T> {
    root: KeyPath,
    fields: IndexMap<String, Handler<T>>,
    unknown_keys: UnknownKeys,
}

impl<T> Schema<T> {
    /// Starts a schema for the table found at `root`, e.g. `["project"]`.
    #[must_use]
    pub fn new<P: Into<KeyPath>>(root: P) -> Self {
        Schema {
            root: root.into(),
            fields: IndexMap::new(),
            unknown_keys: UnknownKeys::default(),
        }
    }

    /// Declares `key` and registers its handler.
    ///
    /// Declaring a key twice replaces the handler but keeps the key's
    /// original position in the parse order.
    #[must_use]
    pub fn field<K, F>(mut self, key: K, handler: F) -> Self
    where
        K: Into<String>,
        F: Fn(&Field<'_>) -> Result<T> + Send + Sync + 'static,
    {
        self.fields.insert(key.into(), Box::new(handler));
        self
    }

    /// Sets the policy for undeclared keys.
    #[must_use]
    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }

    /// Path of the table this schema parses.
    #[must_use]
    pub fn root(&self) -> &KeyPath {
        &self.root
    }

    /// The declared keys, in parse order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn declares(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Keys present in `table` that the schema does not declare, in table order.
    ///
    /// ```rust
    /// use typed_toml::{toml, Schema};
    ///
    /// let schema: Schema<String> = Schema::new(["project"]).field("name", |f| f.str());
    /// let table = toml!({ "name": "spam", "version": "2020.0.0" });
    /// assert_eq!(schema.undeclared_keys(table.as_table().unwrap()), vec!["version"]);
    /// ```
    #[must_use]
    pub fn undeclared_keys<'t>(&self, table: &'t Table) -> Vec<&'t str> {
        table
            .keys()
            .map(String::as_str)
            .filter(|key| !self.declares(key))
            .collect()
    }

    /// Declared keys missing from `table`, in declaration order.
    #[must_use]
    pub fn missing_keys(&self, table: &Table) -> Vec<&str> {
        self.keys().filter(|key| !table.contains_key(key)).collect()
    }

    /// Parses every declared key present in `table`.
    ///
    /// # Errors
    ///
    /// Returns the first handler error, in declaration order. With
    /// [`UnknownKeys::Reject`], returns [`Error::BadConfig`] naming the
    /// undeclared keys once all declared keys have parsed.
    pub fn parse(&self, table: &Table) -> Result<IndexMap<String, T>> {
        let mut parsed = IndexMap::with_capacity(self.fields.len());

        for (key, handler) in &self.fields {
            let Some(value) = table.get(key) else {
                continue;
            };
            let field = Field {
                table,
                key,
                value,
                path: self.root.join(key),
            };
            parsed.insert(key.clone(), handler(&field)?);
        }

        if self.unknown_keys == UnknownKeys::Reject {
            self.reject_undeclared(table)?;
        }

        Ok(parsed)
    }

    fn reject_undeclared(&self, table: &Table) -> Result<()> {
        let unknown = self.undeclared_keys(table);
        if unknown.is_empty() {
            return Ok(());
        }

        let rendered: Vec<String> = unknown
            .iter()
            .map(|key| format!("'{}'", self.root.join(*key)))
            .collect();
        let noun = if rendered.len() == 1 { "key" } else { "keys" };
        Err(Error::bad_config(format!(
            "Unknown {} {}",
            noun,
            rendered.join(", ")
        )))
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("root", &self.root.to_string())
            .field("keys", &self.fields.keys().collect::<Vec<_>>())
            .field("unknown_keys", &self.unknown_keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{toml, SharedValue};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn table_of(value: Value) -> Table {
        match value {
            Value::Table(table) => table,
            _ => panic!("Expected table"),
        }
    }

    #[test]
    fn test_absent_keys_are_skipped() {
        let schema = Schema::new(["project"]).field("description", |f| f.str());
        let parsed = schema.parse(&table_of(toml!({ "name": "spam" }))).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_result_follows_declaration_order() {
        let schema = Schema::new(["project"])
            .field("name", |f| f.str())
            .field("description", |f| f.str());
        let table = table_of(toml!({ "description": "Lovely Spam!", "name": "spam" }));

        let parsed = schema.parse(&table).unwrap();
        let keys: Vec<_> = parsed.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "description"]);
    }

    #[test]
    fn test_first_error_in_declaration_order_wins() {
        let schema = Schema::new(["project"])
            .field("keywords", |f| f.string_set())
            .field("classifiers", |f| f.string_set());
        let table = table_of(toml!({ "classifiers": [1], "keywords": [2] }));

        let err = schema.parse(&table).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid type for 'project.keywords[0]': expected string, got integer"
        );
    }

    #[test]
    fn test_handler_not_called_after_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let schema = Schema::new(["project"])
            .field("name", |f| f.str())
            .field("description", move |f| {
                counter.fetch_add(1, Ordering::SeqCst);
                f.str()
            });
        let table = table_of(toml!({ "name": 1, "description": "x" }));

        assert!(schema.parse(&table).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handler_sees_whole_table() {
        let schema = Schema::new(["project"]).field("version", |f| {
            if f.table().contains_key("dynamic") {
                return Err(Error::bad_config("'version' is both static and dynamic"));
            }
            f.str()
        });
        let table = table_of(toml!({ "version": "1.0", "dynamic": ["version"] }));

        let err = schema.parse(&table).unwrap_err();
        assert!(matches!(err, Error::BadConfig { .. }));
    }

    #[test]
    fn test_hyphenated_keys_are_preserved() {
        let schema = Schema::new(["project"]).field("gui-scripts", |f| f.string_table());
        let table = table_of(toml!({ "gui-scripts": { "spam-gui": "spam:main_gui" } }));

        let parsed = schema.parse(&table).unwrap();
        assert_eq!(parsed["gui-scripts"]["spam-gui"], "spam:main_gui");
    }

    #[test]
    fn test_string_table_reports_value_path() {
        let schema = Schema::new(["project"]).field("urls", |f| f.string_table());
        let table = table_of(toml!({ "urls": { "foo": 1234 } }));

        let err = schema.parse(&table).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value type for 'project.urls.foo': expected string, got integer"
        );
    }

    #[test]
    fn test_nested_string_tables_reports_group_path() {
        let schema = Schema::new(["project"]).field("entry-points", |f| f.nested_string_tables());
        let table = table_of(toml!({ "entry-points": { "console": "oops" } }));

        let err = schema.parse(&table).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value type for 'project.entry-points.console': expected table, got string"
        );
    }

    #[test]
    fn test_string_list_keeps_order_and_duplicates() {
        let schema = Schema::new(["tool"]).field("order", |f| f.string_list());
        let table = table_of(toml!({ "order": ["b", "a", "b"] }));

        let parsed = schema.parse(&table).unwrap();
        assert_eq!(parsed["order"], vec!["b", "a", "b"]);
    }

    #[test]
    fn test_string_set_rejects_non_array() {
        let schema = Schema::new(["project"]).field("keywords", |f| f.string_set());
        let table = table_of(toml!({ "keywords": "egg" }));

        let err = schema.parse(&table).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid type for 'project.keywords': expected array, got string"
        );
    }

    #[test]
    fn test_shared_values_are_extracted() {
        let keywords = SharedValue::new(Value::from(vec!["egg", "bacon"]));
        let mut table = Table::new();
        table.insert("keywords", Value::Shared(keywords));

        let schema = Schema::new(["project"]).field("keywords", |f| f.string_set());
        let parsed = schema.parse(&table).unwrap();
        assert_eq!(parsed["keywords"], vec!["bacon", "egg"]);
    }

    #[test]
    fn test_unknown_keys_ignored_by_default() {
        let schema = Schema::new(["project"]).field("name", |f| f.str());
        let table = table_of(toml!({ "name": "spam", "version": "2020.0.0" }));
        assert!(schema.parse(&table).is_ok());
    }

    #[test]
    fn test_unknown_keys_rejected_when_strict() {
        let schema = Schema::new(["project"])
            .field("name", |f| f.str())
            .unknown_keys(UnknownKeys::Reject);
        let table = table_of(toml!({ "name": "spam", "version": "1", "my key": true }));

        let err = schema.parse(&table).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Unknown keys 'project.version', 'project."my key"'"#
        );
    }

    #[test]
    fn test_field_errors_precede_unknown_key_errors() {
        let schema = Schema::new(["project"])
            .field("name", |f| f.str())
            .unknown_keys(UnknownKeys::Reject);
        let table = table_of(toml!({ "name": 1, "version": "1" }));

        let err = schema.parse(&table).unwrap_err();
        assert!(err.is_type_error());
    }

    #[test]
    fn test_missing_keys() {
        let schema = Schema::new(["project"])
            .field("name", |f| f.str())
            .field("description", |f| f.str());
        let table = table_of(toml!({ "name": "spam" }));
        assert_eq!(schema.missing_keys(&table), vec!["description"]);
    }

    #[test]
    fn test_parse_is_repeatable() {
        let schema = Schema::new(["project"]).field("keywords", |f| f.string_set());
        let table = table_of(toml!({ "keywords": ["b", "a"] }));
        assert_eq!(schema.parse(&table).unwrap(), schema.parse(&table).unwrap());
    }
}

//! TOML deserialization.
//!
//! [`TomlDecoder`] turns TOML text into a [`Table`]. The grammar itself is
//! handled by `toml_edit`; this module maps its document model onto
//! [`Value`] and reports syntax errors with 1-based line and column numbers.
//!
//! The module also provides a serde `Deserializer` over [`Value`], so a
//! decoded document can be turned into any `DeserializeOwned` type, whether a
//! map type of the caller's choosing or a user struct.
//!
//! ## Examples
//!
//! ```rust
//! use typed_toml::{loads, TomlDecoder};
//!
//! let text = "[project]\nreadme = {file = \"README.rst\"}\n";
//!
//! let doc = loads(text, &TomlDecoder::new()).unwrap();
//! let readme = doc["project"]["readme"].as_table().unwrap();
//! assert!(readme.is_inline());
//!
//! let doc = loads(text, &TomlDecoder::pure()).unwrap();
//! let readme = doc["project"]["readme"].as_table().unwrap();
//! assert!(!readme.is_inline());
//! ```

use crate::{Error, Result, Table, Value};
use serde::de::{self, DeserializeOwned, IntoDeserializer};
use serde::forward_to_deserialize_any;
use toml_edit::DocumentMut;

/// Decoding strategy.
///
/// The two strategies produce equal trees; they differ only in whether
/// tables written as `{ ... }` literals carry the inline marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TomlDecoder {
    mark_inline: bool,
}

impl Default for TomlDecoder {
    fn default() -> Self {
        TomlDecoder { mark_inline: true }
    }
}

impl TomlDecoder {
    /// A decoder that marks inline tables, for round trips through
    /// [`crate::TomlEncoder::preserve_inline`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A decoder that produces plain tables only.
    #[must_use]
    pub fn pure() -> Self {
        TomlDecoder { mark_inline: false }
    }

    #[must_use]
    pub fn marks_inline(&self) -> bool {
        self.mark_inline
    }

    /// Decodes a whole document.
    ///
    /// # Errors
    ///
    /// [`Error::Syntax`] when `text` is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_toml::{Error, TomlDecoder};
    ///
    /// let err = TomlDecoder::new().decode("[a]\nb = 1\nc = \n").unwrap_err();
    /// assert!(matches!(err, Error::Syntax { line: 3, .. }));
    /// ```
    pub fn decode(&self, text: &str) -> Result<Table> {
        let document = text
            .parse::<DocumentMut>()
            .map_err(|err| syntax_error(text, &err))?;
        Ok(self.table(document.as_table()))
    }

    fn table(&self, table: &toml_edit::Table) -> Table {
        let mut decoded = Table::with_capacity(table.len());
        for (key, item) in table.iter() {
            if let Some(value) = self.item(item) {
                decoded.insert(key, value);
            }
        }
        decoded
    }

    fn item(&self, item: &toml_edit::Item) -> Option<Value> {
        match item {
            toml_edit::Item::None => None,
            toml_edit::Item::Value(value) => Some(self.value(value)),
            toml_edit::Item::Table(table) => Some(Value::Table(self.table(table))),
            toml_edit::Item::ArrayOfTables(tables) => Some(Value::Array(
                tables
                    .iter()
                    .map(|table| Value::Table(self.table(table)))
                    .collect(),
            )),
        }
    }

    fn value(&self, value: &toml_edit::Value) -> Value {
        match value {
            toml_edit::Value::String(s) => Value::String(s.value().clone()),
            toml_edit::Value::Integer(i) => Value::Integer(*i.value()),
            toml_edit::Value::Float(f) => Value::Float(*f.value()),
            toml_edit::Value::Boolean(b) => Value::Boolean(*b.value()),
            toml_edit::Value::Datetime(dt) => Value::Datetime(*dt.value()),
            toml_edit::Value::Array(array) => {
                Value::Array(array.iter().map(|element| self.value(element)).collect())
            }
            toml_edit::Value::InlineTable(table) => {
                let mut decoded = Table::with_capacity(table.len()).inline(self.mark_inline);
                for (key, value) in table.iter() {
                    decoded.insert(key, self.value(value));
                }
                Value::Table(decoded)
            }
        }
    }
}

fn syntax_error(text: &str, err: &toml_edit::TomlError) -> Error {
    let offset = err.span().map_or(0, |span| span.start);
    let (line, col) = line_col(text, offset);
    let msg = err.message().trim();
    Error::syntax(line, col, msg)
}

/// 1-based line and column (in characters) of a byte offset.
fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let before = text.get(..offset.min(text.len())).unwrap_or(text);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

/// Deserializes an instance of `T` from a [`Value`].
///
/// # Errors
///
/// Fails when the value does not fit `T`, or when it contains a cycle of
/// shared handles.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use typed_toml::{from_value, toml};
///
/// let value = toml!({ "a": { "b": 1, "c": 2 } });
/// let doc: BTreeMap<String, BTreeMap<String, i64>> = from_value(value).unwrap();
/// assert_eq!(doc["a"]["c"], 2);
/// ```
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    let value = crate::ser::resolve_shared(&value)?.into_owned();
    T::deserialize(ValueDeserializer::new(value))
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(table: Table) -> Self {
        MapDeserializer {
            iter: table.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(Value::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Err(Error::custom(format!(
            "expected a unit variant, found {}",
            self.value.value_type()
        )))
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("Expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Table(table) => visitor.visit_map(MapDeserializer::new(table)),
            _ => Err(Error::custom("Expected struct variant")),
        }
    }
}

struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Boolean(b) => visitor.visit_bool(b),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Datetime(dt) => visitor.visit_string(dt.to_string()),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Table(table) => visitor.visit_map(MapDeserializer::new(table)),
            Value::Shared(shared) => {
                let node = shared.borrow().clone();
                ValueDeserializer::new(node).deserialize_any(visitor)
            }
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Table(table) if table.len() == 1 => {
                let mut entries = table.into_iter();
                match entries.next() {
                    Some((variant, value)) => {
                        visitor.visit_enum(EnumDeserializer { variant, value })
                    }
                    None => Err(Error::custom("Expected enum variant")),
                }
            }
            Value::Table(_) => Err(Error::custom("Expected enum variant")),
            other => Err(Error::custom(format!(
                "expected enum, found {}",
                other.value_type()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

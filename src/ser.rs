//! TOML serialization.
//!
//! Writing a document happens in two passes:
//!
//! 1. **Resolution**: shared handles are replaced by the nodes they point at.
//!    A handle met again while its own node is still being resolved is a
//!    cycle and fails with [`Error::CyclicStructure`]. Trees without handles
//!    are not copied.
//! 2. **Layout**: for every table, plain entries are written as
//!    `key = value` lines, then sub-tables as `[dotted.header]` sections and
//!    arrays of tables as `[[dotted.header]]` blocks. Right-hand sides and
//!    keys are rendered by the [`Encoder`].
//!
//! A section header is left out for a non-empty table holding nothing but
//! further sections, since their own headers already create it.
//!
//! This module also hosts [`ValueSerializer`], the serde adapter that turns
//! any `Serialize` type into a [`Value`]. It normalizes fixed-width integers
//! and floats to `i64`/`f64`, writes filesystem paths as strings and drops
//! `None` fields of structs and maps.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use typed_toml::{to_string, TomlEncoder};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Section { key: Vec<&'static str> }
//!
//! #[derive(Serialize)]
//! struct Doc { section: Section }
//!
//! let doc = Doc { section: Section { key: vec!["list"] } };
//! let text = to_string(&doc, &TomlEncoder::new()).unwrap();
//! assert_eq!(text, "[section]\nkey = [\"list\"]\n");
//! ```

use crate::{Encoder, Error, KeyPath, Result, Table, TomlEncoder, Value};
use serde::ser::{self, Serialize};
use std::borrow::Cow;

/// Renders a whole document.
pub fn to_document_string<E>(table: &Table, encoder: &E) -> Result<String>
where
    E: Encoder + ?Sized,
{
    let resolved = Resolver::default().table(table, &KeyPath::root())?;
    let mut writer = DocumentWriter {
        encoder,
        out: String::new(),
    };
    writer.write_body(&resolved, &[])?;
    Ok(writer.out)
}

/// Renders a single value with the stock encoder, as it would appear after `key = `.
pub(crate) fn to_inline_string(value: &Value) -> Result<String> {
    let resolved = resolve_shared(value)?;
    render_inline(&TomlEncoder::new(), &resolved)
}

/// Replaces shared handles by the nodes they point at, failing on cycles.
pub(crate) fn resolve_shared(value: &Value) -> Result<Cow<'_, Value>> {
    Resolver::default().value(value, &KeyPath::root())
}

#[derive(Default)]
struct Resolver {
    ancestors: Vec<usize>,
}

impl Resolver {
    fn value<'v>(&mut self, value: &'v Value, path: &KeyPath) -> Result<Cow<'v, Value>> {
        match value {
            Value::Shared(shared) => {
                let id = shared.id();
                if self.ancestors.contains(&id) {
                    return Err(Error::cyclic(&path.to_string()));
                }

                self.ancestors.push(id);
                let node = shared.borrow();
                let resolved = self.value(&node, path).map(Cow::into_owned);
                drop(node);
                self.ancestors.pop();

                Ok(Cow::Owned(resolved?))
            }
            Value::Array(items) => {
                let mut owned: Option<Vec<Value>> = None;
                for (idx, item) in items.iter().enumerate() {
                    let resolved = self.value(item, &path.join(idx))?;
                    if let Some(copy) = owned.as_mut() {
                        copy.push(resolved.into_owned());
                    } else if let Cow::Owned(item) = resolved {
                        let mut copy = items[..idx].to_vec();
                        copy.push(item);
                        owned = Some(copy);
                    }
                }
                Ok(owned.map_or(Cow::Borrowed(value), |items| {
                    Cow::Owned(Value::Array(items))
                }))
            }
            Value::Table(table) => match self.table(table, path)? {
                Cow::Borrowed(_) => Ok(Cow::Borrowed(value)),
                Cow::Owned(table) => Ok(Cow::Owned(Value::Table(table))),
            },
            _ => Ok(Cow::Borrowed(value)),
        }
    }

    fn table<'t>(&mut self, table: &'t Table, path: &KeyPath) -> Result<Cow<'t, Table>> {
        let mut owned: Option<Table> = None;
        for (idx, (key, value)) in table.iter().enumerate() {
            let resolved = self.value(value, &path.join(key))?;
            if let Some(copy) = owned.as_mut() {
                copy.insert(key.clone(), resolved.into_owned());
            } else if let Cow::Owned(value) = resolved {
                let mut copy = Table::with_capacity(table.len()).inline(table.is_inline());
                copy.extend(
                    table
                        .iter()
                        .take(idx)
                        .map(|(k, v)| (k.clone(), v.clone())),
                );
                copy.insert(key.clone(), value);
                owned = Some(copy);
            }
        }
        Ok(owned.map_or(Cow::Borrowed(table), Cow::Owned))
    }
}

struct DocumentWriter<'e, E: ?Sized> {
    encoder: &'e E,
    out: String,
}

impl<'e, E: Encoder + ?Sized> DocumentWriter<'e, E> {
    fn is_section(&self, value: &Value) -> bool {
        match value {
            Value::Table(table) => self.is_section_table(table),
            Value::Array(items) => self.is_array_of_tables(items),
            _ => false,
        }
    }

    fn is_section_table(&self, table: &Table) -> bool {
        !(self.encoder.preserves_inline() && table.is_inline())
    }

    fn is_array_of_tables(&self, items: &[Value]) -> bool {
        !items.is_empty()
            && items
                .iter()
                .all(|item| matches!(item, Value::Table(table) if self.is_section_table(table)))
    }

    fn write_body(&mut self, table: &Table, header: &[String]) -> Result<()> {
        for (key, value) in table {
            if self.is_section(value) {
                continue;
            }
            let line = format!(
                "{} = {}\n",
                self.encoder.render_key(key),
                render_inline(self.encoder, value)?
            );
            self.out.push_str(&line);
        }

        for (key, value) in table {
            if !self.is_section(value) {
                continue;
            }
            let mut child = header.to_vec();
            child.push(self.encoder.render_key(key));

            match value {
                Value::Table(sub) => {
                    let implicit = !sub.is_empty() && sub.values().all(|v| self.is_section(v));
                    if !implicit {
                        self.write_header(&format!("[{}]", child.join(".")));
                    }
                    self.write_body(sub, &child)?;
                }
                Value::Array(items) => {
                    for item in items {
                        if let Value::Table(sub) = item {
                            self.write_header(&format!("[[{}]]", child.join(".")));
                            self.write_body(sub, &child)?;
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn write_header(&mut self, header: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.push_str(header);
        self.out.push('\n');
    }
}

fn render_inline<E>(encoder: &E, value: &Value) -> Result<String>
where
    E: Encoder + ?Sized,
{
    match value {
        Value::Array(items) => {
            let rendered = items
                .iter()
                .map(|item| render_inline(encoder, item))
                .collect::<Result<Vec<_>>>()?;
            Ok(encoder.render_array(rendered))
        }
        Value::Table(table) => {
            let entries = table
                .iter()
                .map(|(key, value)| Ok((encoder.render_key(key), render_inline(encoder, value)?)))
                .collect::<Result<Vec<_>>>()?;
            Ok(encoder.render_table(entries))
        }
        scalar => encoder.render_scalar(scalar),
    }
}

/// Converts any `Serialize` type into a [`Value`].
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Converts a `Serialize` type that maps to a table, i.e. a whole document.
pub fn to_table<T>(value: &T) -> Result<Table>
where
    T: ?Sized + Serialize,
{
    match to_value(value)? {
        Value::Table(table) => Ok(table),
        other => Err(Error::unsupported_type(&format!(
            "a document must be a table, got {}",
            other.value_type()
        ))),
    }
}

/// Serde serializer producing [`Value`]s.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeMap {
    map: Table,
    current_key: Option<String>,
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Boolean(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        i64::try_from(v).map(Value::Integer).map_err(|_| {
            Error::unsupported_type(&format!("integer {} is out of range for TOML", v))
        })
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(v.iter().copied().collect())
    }

    fn serialize_none(self) -> Result<Value> {
        Err(Error::UnsupportedNone)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Err(Error::unsupported_type("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value> {
        Err(Error::unsupported_type(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut table = Table::with_capacity(1);
        table.insert(variant, to_value(value)?);
        Ok(Value::Table(table))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple(self, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeVec> {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Err(Error::unsupported_type("struct variants"))
    }
}

impl SerializeVec {
    fn new() -> Self {
        SerializeVec { vec: Vec::new() }
    }
}

impl SerializeMap {
    fn new() -> Self {
        SerializeMap {
            map: Table::new(),
            current_key: None,
        }
    }

    // A `None` entry is left out rather than failing the whole table.
    fn insert_entry<T>(&mut self, key: String, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(value) {
            Ok(value) => {
                self.map.insert(key, value);
                Ok(())
            }
            Err(Error::UnsupportedNone) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            other => Err(Error::unsupported_type(&format!(
                "table keys must be strings, got {}",
                other.value_type()
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.insert_entry(key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Table(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert_entry(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Table(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert_entry(key.to_string(), value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Table(self.map))
    }
}

//! Dynamic value representation for TOML documents.
//!
//! This module provides the [`Value`] enum which represents any node of a
//! decoded TOML document. The decoder produces it, the schema layer inspects
//! it, and the encoder consumes it.
//!
//! ## Core Types
//!
//! - [`Value`]: string, integer, float, boolean, datetime, array or table
//! - [`ValueType`]: the stable type label used in diagnostics
//! - [`SharedValue`]: a handle for aliasing one node at several places of a
//!   programmatically built tree
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use typed_toml::{toml, Value};
//!
//! let boolean = Value::from(true);
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! let table = toml!({
//!     "name": "spam",
//!     "keywords": ["egg", "bacon"]
//! });
//! assert!(table.is_table());
//! ```
//!
//! ### Type Checking
//!
//! ```rust
//! use typed_toml::{Value, ValueType};
//!
//! let value = Value::from(42);
//! assert!(value.is_integer());
//! assert_eq!(value.value_type(), ValueType::Integer);
//! assert_eq!(value.value_type().to_string(), "integer");
//! ```

use crate::{Error, Result, Table};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::ops::Index;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use toml_edit::Datetime;

/// A dynamically-typed representation of any TOML value.
///
/// # Examples
///
/// ```rust
/// use typed_toml::{Table, Value};
///
/// let text = Value::String("hello".to_string());
/// let list = Value::from(vec![1, 2, 3]);
/// let table = Value::Table(Table::new());
///
/// assert!(text.is_str());
/// assert!(list.is_array());
/// assert!(table.is_table());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Datetime(Datetime),
    Array(Vec<Value>),
    Table(Table),
    /// A node aliased from elsewhere in the tree. Never produced by decoding.
    Shared(SharedValue),
}

/// The kind of a [`Value`], rendered with a stable label in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Integer,
    Float,
    Boolean,
    Datetime,
    Array,
    Table,
}

impl ValueType {
    /// The canonical label of this type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_toml::ValueType;
    ///
    /// assert_eq!(ValueType::String.as_str(), "string");
    /// assert_eq!(ValueType::Table.as_str(), "table");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Boolean => "boolean",
            ValueType::Datetime => "datetime",
            ValueType::Array => "array",
            ValueType::Table => "table",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference-counted handle to a [`Value`].
///
/// Cloning the handle aliases the node rather than copying it, so a table
/// can be placed at several positions of a tree, including inside itself.
/// The encoder rejects such cycles with [`Error::CyclicStructure`].
///
/// Handles are single-threaded: a tree containing one is `!Send`.
///
/// # Examples
///
/// ```rust
/// use typed_toml::{SharedValue, Table, Value};
///
/// let shared = SharedValue::new(Value::Table(Table::new()));
/// let alias = shared.clone();
///
/// if let Value::Table(table) = &mut *shared.borrow_mut() {
///     table.insert("c", Value::from(4));
/// }
/// assert_eq!(alias.borrow().as_table().map(|t| t.len()), Some(1));
/// ```
#[derive(Clone)]
pub struct SharedValue(Rc<RefCell<Value>>);

impl SharedValue {
    pub fn new(value: Value) -> Self {
        SharedValue(Rc::new(RefCell::new(value)))
    }

    /// Immutably borrows the aliased value.
    pub fn borrow(&self) -> Ref<'_, Value> {
        self.0.borrow()
    }

    /// Mutably borrows the aliased value.
    pub fn borrow_mut(&self) -> RefMut<'_, Value> {
        self.0.borrow_mut()
    }

    /// Returns `true` if both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &SharedValue) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Identity of the aliased node, stable while any handle is alive.
    #[must_use]
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

thread_local! {
    static COMPARING: RefCell<Vec<(usize, usize)>> = const { RefCell::new(Vec::new()) };
}

// Two cyclic graphs compare equal when they unfold to the same tree. A pair
// already under comparison further up the stack is taken as equal.
impl PartialEq for SharedValue {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let pair = (self.id(), other.id());
        if COMPARING.with(|pending| pending.borrow().contains(&pair)) {
            return true;
        }

        COMPARING.with(|pending| pending.borrow_mut().push(pair));
        let equal = *self.0.borrow() == *other.0.borrow();
        COMPARING.with(|pending| pending.borrow_mut().pop());
        equal
    }
}

// Printing the aliased node could recurse forever on a cycle.
impl fmt::Debug for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedValue")
            .field("id", &format_args!("{:#x}", self.id()))
            .finish()
    }
}

impl Value {
    /// The type of this value. A shared handle reports the type of the node it points at.
    ///
    /// A chain of handles that loops back on itself holds no node at all and
    /// reports [`ValueType::Table`].
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::String(_) => ValueType::String,
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Datetime(_) => ValueType::Datetime,
            Value::Array(_) => ValueType::Array,
            Value::Table(_) => ValueType::Table,
            Value::Shared(shared) => {
                let mut seen = vec![shared.id()];
                let mut handle = shared.clone();
                loop {
                    let next = match &*handle.borrow() {
                        Value::Shared(next) => next.clone(),
                        node => return node.value_type(),
                    };
                    if seen.contains(&next.id()) {
                        return ValueType::Table;
                    }
                    seen.push(next.id());
                    handle = next;
                }
            }
        }
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is an integer.
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// Returns `true` if the value is a float.
    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    /// Returns `true` if the value is a datetime.
    #[inline]
    #[must_use]
    pub const fn is_datetime(&self) -> bool {
        matches!(self, Value::Datetime(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the value is a table.
    #[inline]
    #[must_use]
    pub const fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    /// Returns `true` if the value is a shared handle.
    #[inline]
    #[must_use]
    pub const fn is_shared(&self) -> bool {
        matches!(self, Value::Shared(_))
    }

    /// Returns `true` for strings, numbers, booleans and datetimes.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self.value_type(), ValueType::Array | ValueType::Table)
    }

    /// If the value is a string, returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_toml::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// If the value is a float or an integer, returns it as `f64`.
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> Option<&Datetime> {
        match self {
            Value::Datetime(dt) => Some(dt),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    #[inline]
    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Looks up a key when the value is a table.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_table().and_then(|table| table.get(key))
    }

    /// Resolves shared handles into an owned snapshot; other values are borrowed.
    ///
    /// The snapshot is shallow: handles nested deeper in the node stay handles.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_toml::{SharedValue, Value};
    ///
    /// let shared = Value::Shared(SharedValue::new(Value::from("egg")));
    /// assert_eq!(shared.detach().as_str(), Some("egg"));
    /// ```
    #[must_use]
    pub fn detach(&self) -> Cow<'_, Value> {
        match self {
            Value::Shared(shared) => {
                let mut seen = vec![shared.id()];
                let mut owned = shared.borrow().clone();
                while let Value::Shared(next) = &owned {
                    if seen.contains(&next.id()) {
                        return Cow::Borrowed(self);
                    }
                    seen.push(next.id());
                    let inner = next.borrow().clone();
                    owned = inner;
                }
                Cow::Owned(owned)
            }
            _ => Cow::Borrowed(self),
        }
    }

    /// Wraps an offset datetime from `chrono`.
    ///
    /// # Errors
    ///
    /// Fails for years outside the `0000..=9999` range TOML can express.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::{FixedOffset, TimeZone};
    /// use typed_toml::Value;
    ///
    /// let offset = FixedOffset::west_opt(8 * 3600).unwrap();
    /// let dob = offset.with_ymd_and_hms(1979, 5, 24, 7, 32, 0).unwrap();
    /// let value = Value::offset_datetime(&dob).unwrap();
    /// assert_eq!(value.to_string(), "1979-05-24T07:32:00-08:00");
    /// ```
    pub fn offset_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Result<Value> {
        use chrono::Offset as _;

        let offset_minutes = dt.offset().fix().local_minus_utc() / 60;
        let naive = dt.naive_local();
        Ok(Value::Datetime(Datetime {
            date: Some(toml_date(naive.date())?),
            time: Some(toml_time(naive.time())),
            offset: Some(if offset_minutes == 0 {
                toml_edit::Offset::Z
            } else {
                toml_edit::Offset::Custom {
                    minutes: offset_minutes as i16,
                }
            }),
        }))
    }

    /// Wraps a local (offset-less) datetime from `chrono`.
    ///
    /// # Errors
    ///
    /// Fails for years outside the `0000..=9999` range TOML can express.
    pub fn local_datetime(dt: NaiveDateTime) -> Result<Value> {
        Ok(Value::Datetime(Datetime {
            date: Some(toml_date(dt.date())?),
            time: Some(toml_time(dt.time())),
            offset: None,
        }))
    }

    /// Wraps a local date from `chrono`.
    ///
    /// # Errors
    ///
    /// Fails for years outside the `0000..=9999` range TOML can express.
    pub fn local_date(date: NaiveDate) -> Result<Value> {
        Ok(Value::Datetime(Datetime {
            date: Some(toml_date(date)?),
            time: None,
            offset: None,
        }))
    }

    /// Wraps a local time of day from `chrono`.
    #[must_use]
    pub fn local_time(time: NaiveTime) -> Value {
        Value::Datetime(Datetime {
            date: None,
            time: Some(toml_time(time)),
            offset: None,
        })
    }

    /// Converts an offset datetime into `chrono`.
    ///
    /// Returns `None` for non-datetimes and for local datetimes, dates and
    /// times, which do not denote an instant.
    #[must_use]
    pub fn as_offset_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let dt = self.as_datetime()?;
        let (date, time, offset) = (dt.date?, dt.time?, dt.offset?);

        let date = NaiveDate::from_ymd_opt(
            i32::from(date.year),
            u32::from(date.month),
            u32::from(date.day),
        )?;
        let time = NaiveTime::from_hms_nano_opt(
            u32::from(time.hour),
            u32::from(time.minute),
            u32::from(time.second),
            time.nanosecond,
        )?;
        let seconds = match offset {
            toml_edit::Offset::Z => 0,
            toml_edit::Offset::Custom { minutes } => i32::from(minutes) * 60,
        };
        let offset = FixedOffset::east_opt(seconds)?;
        NaiveDateTime::new(date, time)
            .and_local_timezone(offset)
            .single()
    }
}

fn toml_date(date: NaiveDate) -> Result<toml_edit::Date> {
    use chrono::Datelike;

    let year = u16::try_from(date.year())
        .ok()
        .filter(|year| *year <= 9999)
        .ok_or_else(|| Error::unsupported_type("datetime year outside 0000..=9999"))?;
    Ok(toml_edit::Date {
        year,
        month: date.month() as u8,
        day: date.day() as u8,
    })
}

fn toml_time(time: NaiveTime) -> toml_edit::Time {
    use chrono::Timelike;

    toml_edit::Time {
        hour: time.hour() as u8,
        minute: time.minute() as u8,
        second: time.second() as u8,
        nanosecond: time.nanosecond(),
    }
}

/// # Panics
///
/// Panics if the value is not a table or the key is not present.
impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self {
            Value::Table(table) => &table[key],
            other => panic!("cannot index {} with {:?}", other.value_type(), key),
        }
    }
}

/// Renders the value the way it appears on the right-hand side of `key = value`.
///
/// A cyclic value renders as the cycle error in angle brackets.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::ser::to_inline_string(self) {
            Ok(rendered) => f.write_str(&rendered),
            Err(err) => write!(f, "<{}>", err),
        }
    }
}

/// Shared handles are resolved before anything reaches the serializer, so a
/// cyclic value fails with a custom error naming the cycle.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let resolved = crate::ser::resolve_shared(self).map_err(serde::ser::Error::custom)?;
        PlainValue(&resolved).serialize(serializer)
    }
}

// A value with every shared handle already resolved.
struct PlainValue<'a>(&'a Value);

impl Serialize for PlainValue<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Value::String(s) => serializer.serialize_str(s),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Datetime(dt) => serializer.serialize_str(&dt.to_string()),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(&PlainValue(element))?;
                }
                seq.end()
            }
            Value::Table(table) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(table.len()))?;
                for (k, v) in table {
                    map.serialize_entry(k, &PlainValue(v))?;
                }
                map.end()
            }
            Value::Shared(_) => Err(serde::ser::Error::custom("unresolved shared value")),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid TOML value")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E> {
                Ok(Value::Boolean(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E> {
                Ok(Value::Integer(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                i64::try_from(value)
                    .map(Value::Integer)
                    .map_err(|_| E::custom(format!("integer {} is out of range for TOML", value)))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Err(E::custom("TOML has no null value"))
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut table = Table::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    table.insert(key, value);
                }
                Ok(Value::Table(table))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// TryFrom implementations for extracting values from Value
impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value.detach().as_ref() {
            Value::Integer(i) => Ok(*i),
            other => Err(crate::Error::custom(format!(
                "expected integer, found {}",
                other.value_type()
            ))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value.detach().as_float().ok_or_else(|| {
            crate::Error::custom(format!("expected float, found {}", value.value_type()))
        })
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value.detach().as_bool().ok_or_else(|| {
            crate::Error::custom(format!("expected boolean, found {}", value.value_type()))
        })
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value.detach().into_owned() {
            Value::String(s) => Ok(s),
            other => Err(crate::Error::custom(format!(
                "expected string, found {}",
                other.value_type()
            ))),
        }
    }
}

// From implementations for creating Value from primitives
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

/// Filesystem paths are stored as their string form.
impl From<&Path> for Value {
    fn from(value: &Path) -> Self {
        Value::String(value.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for Value {
    fn from(value: PathBuf) -> Self {
        Value::from(value.as_path())
    }
}

impl From<Datetime> for Value {
    fn from(value: Datetime) -> Self {
        Value::Datetime(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl From<Table> for Value {
    fn from(value: Table) -> Self {
        Value::Table(value)
    }
}

impl From<SharedValue> for Value {
    fn from(value: SharedValue) -> Self {
        Value::Shared(value)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::convert::TryFrom;

    #[test]
    fn test_tryfrom_i64() {
        let result: i64 = TryFrom::try_from(Value::Integer(42)).unwrap();
        assert_eq!(result, 42);

        assert!(i64::try_from(Value::Float(42.0)).is_err());
        assert!(i64::try_from(Value::from("test")).is_err());
    }

    #[test]
    fn test_tryfrom_f64() {
        let result: f64 = TryFrom::try_from(Value::Float(3.5)).unwrap();
        assert_eq!(result, 3.5);

        let result: f64 = TryFrom::try_from(Value::Integer(42)).unwrap();
        assert_eq!(result, 42.0);
    }

    #[test]
    fn test_tryfrom_through_shared_handle() {
        let shared = Value::Shared(SharedValue::new(Value::from("egg")));
        assert_eq!(String::try_from(shared).unwrap(), "egg");
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Boolean(true));
        assert_eq!(Value::from(42i32), Value::Integer(42));
        assert_eq!(Value::from(42u16), Value::Integer(42));
        assert_eq!(Value::from(3.5f64), Value::Float(3.5));
        assert_eq!(Value::from("test"), Value::String("test".to_string()));
    }

    #[test]
    fn test_from_path() {
        let value = Value::from(PathBuf::from("/home/edgy"));
        assert_eq!(value, Value::String("/home/edgy".to_string()));
    }

    #[test]
    fn test_from_collections() {
        let value = Value::from(vec!["a", "b"]);
        assert_eq!(
            value,
            Value::Array(vec![Value::from("a"), Value::from("b")])
        );

        let collected: Value = (1..=3).collect();
        assert_eq!(collected.as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_shared_value_type_sees_through() {
        let shared = Value::Shared(SharedValue::new(Value::Table(Table::new())));
        assert_eq!(shared.value_type(), ValueType::Table);
        assert!(!shared.is_table());
        assert!(shared.detach().is_table());
    }

    #[test]
    fn test_offset_datetime_round_trip() {
        let now = Utc::now();
        let value = Value::offset_datetime(&now).unwrap();
        let back = value.as_offset_datetime().unwrap();
        assert_eq!(back, now);
    }

    #[test]
    fn test_local_date_has_no_instant() {
        let date = NaiveDate::from_ymd_opt(1979, 5, 27).unwrap();
        let value = Value::local_date(date).unwrap();
        assert_eq!(value.to_string(), "1979-05-27");
        assert!(value.as_offset_datetime().is_none());
    }

    #[test]
    fn test_display_renders_inline_toml() {
        let value = Value::from(vec!["list", "double \"\""]);
        assert_eq!(value.to_string(), r#"["list", "double \"\""]"#);
    }
}

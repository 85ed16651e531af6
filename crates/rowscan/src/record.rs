//! # Record descriptions
//!
//! Destination structs describe their layout through [`Record`], normally
//! implemented with `#[derive(Record)]`. Field types implement [`FromValue`].

#![allow(clippy::cast_possible_truncation)]

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::value::{Kind, Value};

/// Describes one declared field of a record.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Declared field name.
    pub name: &'static str,

    /// Whether the field is visible outside its declaring module (`pub`).
    pub exported: bool,

    /// Structural tags as `(tag, value)` pairs, in declaration order.
    pub tags: &'static [(&'static str, &'static str)],

    /// What the field holds.
    pub ty: FieldType,
}

impl FieldDef {
    /// Value of the named tag, if present.
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&'static str> {
        self.tags.iter().find(|(tag, _)| *tag == name).map(|(_, value)| *value)
    }
}

/// The content of a record field.
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    /// A scalar field receiving values of the given kind.
    Value(Kind),

    /// An embedded record whose fields are promoted into the parent.
    Embedded(fn() -> Vec<FieldDef>),
}

/// A struct-like destination.
///
/// # Example
///
/// ```rust
/// use rowscan::Record;
///
/// #[derive(Debug, Default, Record)]
/// pub struct User {
///     #[tags(db = "id")]
///     pub id: i64,
///     #[tags(json = "name,omitempty")]
///     pub name: String,
/// }
/// ```
pub trait Record: Default + 'static {
    /// Fields in declaration order, private ones included.
    fn fields() -> Vec<FieldDef>;

    /// Assign `value` to the field at `path` (indices into [`Record::fields`]
    /// through embedded records).
    ///
    /// Returns `false`, leaving the record untouched, when the path does not
    /// address a field or the field cannot hold the value.
    fn assign(&mut self, path: &[usize], value: Value) -> bool;
}

/// Assign `value` to `slot` when the slot's type accepts it.
pub fn assign<F: FromValue>(slot: &mut F, value: Value) -> bool {
    F::from_value(value).is_some_and(|v| {
        *slot = v;
        true
    })
}

/// Types that can receive a scanned value.
pub trait FromValue: Sized {
    /// The holder kind used when scanning into this type.
    const KIND: Kind;

    /// Whether the type accepts values of every kind. Map destinations with a
    /// dynamic value type keep every column.
    const DYNAMIC: bool = false;

    /// Convert a non-null value, or `None` if the type cannot hold it.
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    const DYNAMIC: bool = true;
    const KIND: Kind = Kind::Any;

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for serde_json::Value {
    const DYNAMIC: bool = true;
    const KIND: Kind = Kind::Json;

    fn from_value(value: Value) -> Option<Self> {
        Some(value.into_json())
    }
}

impl FromValue for bool {
    const KIND: Kind = Kind::Bool;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! from_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                const KIND: Kind = Kind::Int;

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Int(v) => Self::try_from(v).ok(),
                        Value::UInt(v) => Self::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

macro_rules! from_uint {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                const KIND: Kind = Kind::UInt;

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::UInt(v) => Self::try_from(v).ok(),
                        Value::Int(v) => Self::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64);
from_uint!(u8, u16, u32, u64);

impl FromValue for f64 {
    const KIND: Kind = Kind::Float;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    const KIND: Kind = Kind::Float;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(v as Self),
            _ => None,
        }
    }
}

impl FromValue for String {
    const KIND: Kind = Kind::Text;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl FromValue for Vec<u8> {
    const KIND: Kind = Kind::Bytes;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }
}

impl FromValue for NaiveDate {
    const KIND: Kind = Kind::Date;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Date(v) => Some(v),
            _ => None,
        }
    }
}

impl FromValue for NaiveTime {
    const KIND: Kind = Kind::Time;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Time(v) => Some(v),
            _ => None,
        }
    }
}

impl FromValue for DateTime<Utc> {
    const KIND: Kind = Kind::Timestamp;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Timestamp(v) => Some(v),
            _ => None,
        }
    }
}

impl FromValue for NaiveDateTime {
    const KIND: Kind = Kind::Timestamp;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Timestamp(v) => Some(v.naive_utc()),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const DYNAMIC: bool = T::DYNAMIC;
    const KIND: Kind = T::KIND;

    fn from_value(value: Value) -> Option<Self> {
        T::from_value(value).map(Some)
    }
}

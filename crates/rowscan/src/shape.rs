//! # Destination shapes
//!
//! Every destination type describes itself once through [`Scan::shape`]. The
//! plan builder dispatches on the returned [`Shape`].

use std::any;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::column::Column;
use crate::error::Result;
use crate::plan::{ScanPlan, select_plan};
use crate::record::{FieldDef, FromValue, Record};
use crate::value::{Kind, Value};

/// A type rows can be materialized into.
///
/// Implemented for derived records, `Box<T>`, string-keyed maps,
/// `serde_json::Value`, and (as unsupported shapes) scalars and vectors.
pub trait Scan: Sized + 'static {
    /// Describe the type's shape.
    fn shape() -> Shape<Self>;
}

/// The closed set of destination shapes.
pub enum Shape<T> {
    /// A struct-like record.
    Record(RecordShape<T>),

    /// An owning pointer. Plans the pointee and wraps the result.
    Pointer(fn(&[Column]) -> Result<ScanPlan<T>>),

    /// A string-keyed map with a declared value kind.
    Map(MapShape<T>),

    /// A fully dynamic value, materialized as a map of column to value.
    Dynamic(MapShape<T>),

    /// A scalar value. Not a supported destination.
    Scalar(Kind),

    /// A container. Not a supported element type.
    Sequence,
}

impl<T> Shape<T> {
    /// Short label naming the shape, used in error messages.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Record(_) => "record".to_string(),
            Self::Pointer(_) => "pointer".to_string(),
            Self::Map(_) => "map".to_string(),
            Self::Dynamic(_) => "dynamic".to_string(),
            Self::Scalar(kind) => kind.to_string(),
            Self::Sequence => "sequence".to_string(),
        }
    }
}

/// Construction hooks for a record destination.
pub struct RecordShape<T> {
    /// The record's declared fields.
    pub fields: fn() -> Vec<FieldDef>,

    /// Create a zero-valued record.
    pub new: fn() -> T,

    /// Assign a value to the field at a path.
    pub assign: fn(&mut T, &[usize], Value) -> bool,
}

impl<T: Record> RecordShape<T> {
    /// Hooks for record type `T`.
    #[must_use]
    pub fn of() -> Self {
        Self {
            fields: T::fields,
            new: T::default,
            assign: T::assign,
        }
    }
}

/// Construction hooks for a map destination.
pub struct MapShape<T> {
    /// Declared kind of the map's values.
    pub value_kind: Kind,

    /// Whether values of every kind are accepted.
    pub dynamic: bool,

    /// Build the map from the row's accepted entries, in column order.
    pub build: fn(Vec<(String, Value)>) -> T,
}

impl<T> MapShape<T> {
    /// Whether a value of `kind` may be stored.
    #[must_use]
    pub fn accepts(&self, kind: Kind) -> bool {
        self.dynamic || kind == self.value_kind
    }
}

fn collect<M, V>(entries: Vec<(String, Value)>) -> M
where
    M: FromIterator<(String, V)>,
    V: FromValue,
{
    entries.into_iter().filter_map(|(name, value)| Some((name, V::from_value(value)?))).collect()
}

impl<T: Scan> Scan for Box<T> {
    fn shape() -> Shape<Self> {
        Shape::Pointer(|columns| Ok(select_plan::<T>(columns)?.map(Self::new)))
    }
}

impl<V, S> Scan for HashMap<String, V, S>
where
    V: FromValue + 'static,
    S: BuildHasher + Default + 'static,
{
    fn shape() -> Shape<Self> {
        Shape::Map(MapShape {
            value_kind: V::KIND,
            dynamic: V::DYNAMIC,
            build: collect::<Self, V>,
        })
    }
}

impl<V: FromValue + 'static> Scan for BTreeMap<String, V> {
    fn shape() -> Shape<Self> {
        Shape::Map(MapShape {
            value_kind: V::KIND,
            dynamic: V::DYNAMIC,
            build: collect::<Self, V>,
        })
    }
}

impl Scan for serde_json::Value {
    fn shape() -> Shape<Self> {
        Shape::Dynamic(MapShape {
            value_kind: Kind::Any,
            dynamic: true,
            build: |entries| {
                Self::Object(
                    entries.into_iter().map(|(name, value)| (name, value.into_json())).collect(),
                )
            },
        })
    }
}

impl<T: 'static> Scan for Vec<T> {
    fn shape() -> Shape<Self> {
        Shape::Sequence
    }
}

macro_rules! scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scan for $ty {
                fn shape() -> Shape<Self> {
                    Shape::Scalar(<Self as FromValue>::KIND)
                }
            }
        )*
    };
}

scalar!(
    bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, String, NaiveDate, NaiveTime,
    DateTime<Utc>, NaiveDateTime, Value,
);

/// Name of the destination type, for diagnostics.
pub(crate) fn type_name<T>() -> &'static str {
    any::type_name::<T>()
}

//! # Scan plans
//!
//! A [`ScanPlan`] pairs one intermediate holder kind per column with a
//! materializer that turns one scanned row into one destination value. Plans
//! are built once per query by [`select_plan`].

use std::fmt;

use crate::column::Column;
use crate::error::{Error, Result};
use crate::holder::Holder;
use crate::resolve::{FieldPath, NameTable, field_kind};
use crate::shape::{MapShape, RecordShape, Scan, Shape, type_name};
use crate::value::Kind;

type Materializer<T> = Box<dyn Fn(Vec<Holder>) -> T>;

/// Per-query plan for materializing rows into `T`.
pub struct ScanPlan<T> {
    kinds: Vec<Kind>,
    materialize: Materializer<T>,
}

impl<T: 'static> ScanPlan<T> {
    /// Create a plan from holder kinds and a materializer.
    pub fn new(kinds: Vec<Kind>, materialize: impl Fn(Vec<Holder>) -> T + 'static) -> Self {
        Self {
            kinds,
            materialize: Box::new(materialize),
        }
    }

    /// Holder kind for each column.
    #[must_use]
    pub fn kinds(&self) -> &[Kind] {
        &self.kinds
    }

    /// Fresh, empty holders for one row.
    #[must_use]
    pub fn holders(&self) -> Vec<Holder> {
        self.kinds.iter().map(|kind| Holder::new(*kind)).collect()
    }

    /// Build one destination value from a scanned row.
    pub fn materialize(&self, row: Vec<Holder>) -> T {
        (self.materialize)(row)
    }

    /// Wrap the materializer, keeping the holder kinds.
    #[must_use]
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> ScanPlan<U> {
        let inner = self.materialize;
        ScanPlan {
            kinds: self.kinds,
            materialize: Box::new(move |row| f(inner(row))),
        }
    }
}

impl<T> fmt::Debug for ScanPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanPlan").field("kinds", &self.kinds).finish_non_exhaustive()
    }
}

/// Build the scan plan for destination type `T` and the given columns.
///
/// # Errors
///
/// Returns [`Error::UnsupportedDestinationKind`] when `T` is not a record,
/// pointer, map, or dynamic value.
pub fn select_plan<T: Scan>(columns: &[Column]) -> Result<ScanPlan<T>> {
    match T::shape() {
        Shape::Record(shape) => Ok(record_plan::<T>(shape, columns)),
        Shape::Pointer(plan) => plan(columns),
        Shape::Map(shape) | Shape::Dynamic(shape) => Ok(map_plan(shape, columns)),
        shape @ (Shape::Scalar(_) | Shape::Sequence) => Err(Error::UnsupportedDestinationKind {
            kind: shape.label(),
            type_name: type_name::<T>(),
        }),
    }
}

fn record_plan<T: 'static>(shape: RecordShape<T>, columns: &[Column]) -> ScanPlan<T> {
    let fields = (shape.fields)();
    let table = NameTable::from_fields(&fields);

    let mut kinds = Vec::with_capacity(columns.len());
    let mut targets: Vec<Option<FieldPath>> = Vec::with_capacity(columns.len());

    for column in columns {
        let path = table.lookup(column.identity());
        let kind = path.and_then(|path| field_kind(&fields, path));
        kinds.push(kind.unwrap_or(column.scan_type));
        targets.push(path.map(<[usize]>::to_vec));
    }

    tracing::debug!(
        destination = type_name::<T>(),
        columns = columns.len(),
        matched = targets.iter().flatten().count(),
        "built record scan plan"
    );

    let RecordShape { new, assign, .. } = shape;
    let names: Vec<String> = columns.iter().map(|column| column.name.clone()).collect();

    ScanPlan::new(kinds, move |row| {
        let mut dest = new();
        for ((holder, target), name) in row.into_iter().zip(&targets).zip(&names) {
            let Some(path) = target else {
                tracing::trace!(column = %name, "no matching field, skipping");
                continue;
            };
            let Some(value) = holder.take() else {
                continue;
            };
            if !assign(&mut dest, path, value) {
                tracing::trace!(column = %name, "field rejected value, skipping");
            }
        }
        dest
    })
}

fn map_plan<T: 'static>(shape: MapShape<T>, columns: &[Column]) -> ScanPlan<T> {
    // bit strings are read as the map's value kind, like a record field would
    let kinds = columns
        .iter()
        .map(|column| {
            if column.is_bit() && !shape.dynamic { shape.value_kind } else { column.scan_type }
        })
        .collect();
    let names: Vec<String> = columns.iter().map(|column| column.name.clone()).collect();

    tracing::debug!(
        destination = type_name::<T>(),
        columns = columns.len(),
        value_kind = %shape.value_kind,
        "built map scan plan"
    );

    ScanPlan::new(kinds, move |row| {
        let entries = row
            .into_iter()
            .zip(&names)
            .filter_map(|(holder, name)| {
                let value = holder.take()?;
                let kind = value.kind()?;
                if !shape.accepts(kind) {
                    tracing::trace!(column = %name, %kind, "value kind mismatch, skipping");
                    return None;
                }
                Some((name.clone(), value))
            })
            .collect();
        (shape.build)(entries)
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::record::{FieldDef, FieldType, Record, assign};
    use crate::value::Value;

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i64,
        label: String,
    }

    impl Record for Point {
        fn fields() -> Vec<FieldDef> {
            vec![
                FieldDef {
                    name: "x",
                    exported: true,
                    tags: &[],
                    ty: FieldType::Value(Kind::Int),
                },
                FieldDef {
                    name: "label",
                    exported: true,
                    tags: &[("db", "title")],
                    ty: FieldType::Value(Kind::Text),
                },
            ]
        }

        fn assign(&mut self, path: &[usize], value: Value) -> bool {
            match path {
                [0] => assign(&mut self.x, value),
                [1] => assign(&mut self.label, value),
                _ => false,
            }
        }
    }

    impl Scan for Point {
        fn shape() -> Shape<Self> {
            Shape::Record(RecordShape::of())
        }
    }

    fn columns(names: &[&str]) -> Vec<Column> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Column::new(i, *name).with_scan_type(Kind::Text))
            .collect()
    }

    fn row(plan: &ScanPlan<impl Sized + 'static>, values: Vec<Value>) -> Vec<Holder> {
        let mut holders = plan.holders();
        for (holder, value) in holders.iter_mut().zip(values) {
            holder.put(value).unwrap();
        }
        holders
    }

    #[test]
    fn record_kinds_follow_fields() {
        let plan = select_plan::<Point>(&columns(&["x", "points.title", "extra"])).unwrap();
        assert_eq!(plan.kinds(), &[Kind::Int, Kind::Text, Kind::Text]);
    }

    #[test]
    fn record_materializes() {
        let plan = select_plan::<Point>(&columns(&["X", "title", "extra"])).unwrap();
        let point = plan.materialize(row(&plan, vec!["3".into(), "a".into(), "b".into()]));
        assert_eq!(
            point,
            Point {
                x: 3,
                label: "a".to_string()
            }
        );
    }

    #[test]
    fn record_skips_nulls() {
        let plan = select_plan::<Point>(&columns(&["x", "label"])).unwrap();
        let point = plan.materialize(row(&plan, vec![Value::Null, Value::Null]));
        assert_eq!(point, Point::default());
    }

    #[test]
    fn pointer_wraps() {
        let cols = columns(&["x", "label"]);
        let direct = select_plan::<Point>(&cols).unwrap();
        let boxed = select_plan::<Box<Point>>(&cols).unwrap();
        assert_eq!(direct.kinds(), boxed.kinds());

        let values = || vec![Value::Int(1), Value::from("p")];
        let unboxed = *boxed.materialize(row(&boxed, values()));
        assert_eq!(unboxed, direct.materialize(row(&direct, values())));
    }

    #[test]
    fn map_uses_natural_kinds() {
        let cols = vec![
            Column::new(0, "a").with_scan_type(Kind::Int),
            Column::new(1, "b").with_scan_type(Kind::Text),
        ];
        let plan = select_plan::<HashMap<String, i64>>(&cols).unwrap();
        assert_eq!(plan.kinds(), &[Kind::Int, Kind::Text]);

        let map = plan.materialize(row(&plan, vec![Value::Int(1), Value::from("x")]));
        assert_eq!(map, HashMap::from([("a".to_string(), 1)]));
    }

    #[test]
    fn unsupported_kinds() {
        let err = select_plan::<i64>(&columns(&["a"])).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDestinationKind { ref kind, .. } if kind == "int"));

        let err = select_plan::<Vec<Point>>(&columns(&["a"])).unwrap_err();
        assert!(
            matches!(err, Error::UnsupportedDestinationKind { ref kind, .. } if kind == "sequence")
        );
    }
}

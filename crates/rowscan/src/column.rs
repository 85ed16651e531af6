//! Result-set column descriptors.

use crate::value::Kind;

/// Metadata for one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Zero-based position in the result set.
    pub ordinal: usize,

    /// Name as reported by the driver, e.g. `id`, `users.id`, or `COUNT(*)`.
    pub name: String,

    /// Declared SQL type, when the driver knows it.
    pub decl_type: Option<String>,

    /// The kind the driver naturally scans this column into.
    pub scan_type: Kind,
}

impl Column {
    /// Create a column with no declared type and an untyped scan type.
    #[must_use]
    pub fn new(ordinal: usize, name: impl Into<String>) -> Self {
        Self {
            ordinal,
            name: name.into(),
            decl_type: None,
            scan_type: Kind::Any,
        }
    }

    /// Set the declared SQL type.
    #[must_use]
    pub fn with_decl_type(mut self, decl_type: impl Into<String>) -> Self {
        self.decl_type = Some(decl_type.into());
        self
    }

    /// Set the natural scan type.
    #[must_use]
    pub const fn with_scan_type(mut self, scan_type: Kind) -> Self {
        self.scan_type = scan_type;
        self
    }

    /// Whether the column is declared as a bit string (`BIT` or `BIT(n)`).
    #[must_use]
    pub fn is_bit(&self) -> bool {
        self.decl_type.as_deref().is_some_and(|decl| identity(decl).eq_ignore_ascii_case("BIT"))
    }

    /// The name used for field lookup. See [`identity`].
    #[must_use]
    pub fn identity(&self) -> &str {
        identity(&self.name)
    }
}

/// Strip a column name down to its lookup identity.
///
/// Anything from the first `(` on is dropped (`COUNT(x)` becomes `COUNT`),
/// then a leading `table.` qualifier is removed.
#[must_use]
pub fn identity(name: &str) -> &str {
    let name = name.split_once('(').map_or(name, |(head, _)| head);
    name.split_once('.').map_or(name, |(_, column)| column)
}

//! Record types and their declared field templates.

use std::fmt;

use crate::value::{Value, ValueError};

/// Primary-key column name shared by every mapped table.
pub const ID_COLUMN: &str = "id";

/// One persisted field: column name plus accessor and mutator.
///
/// The accessor reads the field out of a record as a [`Value`]; the mutator
/// writes a cell back into it, failing on a type mismatch.
pub struct FieldDescriptor<T> {
    pub name: &'static str,
    pub get: fn(&T) -> Value,
    pub set: fn(&mut T, Value) -> Result<(), ValueError>,
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

/// A record type persistable by [`crate::RecordMapper`].
///
/// The field template returned by [`fields`](TableRecord::fields) is the
/// single source of truth for what gets persisted: its names must exactly
/// equal the table's column set (case-sensitive), `id` included, and its
/// order fixes column order in every generated statement.
///
/// # Example
///
/// ```
/// use rowmap::{FieldDescriptor, TableRecord, Value};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Company {
///     id: i64,
///     hold: i64,
///     name: String,
/// }
///
/// impl TableRecord for Company {
///     fn table_name() -> &'static str {
///         "companies"
///     }
///
///     fn scope_column() -> &'static str {
///         "hold"
///     }
///
///     fn id(&self) -> i64 {
///         self.id
///     }
///
///     fn fields() -> &'static [FieldDescriptor<Self>] {
///         const FIELDS: &[FieldDescriptor<Company>] = &[
///             FieldDescriptor {
///                 name: "id",
///                 get: |c| Value::Integer(c.id),
///                 set: |c, v| {
///                     c.id = v.try_into()?;
///                     Ok(())
///                 },
///             },
///             FieldDescriptor {
///                 name: "hold",
///                 get: |c| Value::Integer(c.hold),
///                 set: |c, v| {
///                     c.hold = v.try_into()?;
///                     Ok(())
///                 },
///             },
///             FieldDescriptor {
///                 name: "name",
///                 get: |c| Value::Text(c.name.clone()),
///                 set: |c, v| {
///                     c.name = v.try_into()?;
///                     Ok(())
///                 },
///             },
///         ];
///         FIELDS
///     }
/// }
/// ```
pub trait TableRecord: Default + Clone + Send + Sync {
    /// Table this record type maps onto.
    fn table_name() -> &'static str;

    /// Secondary filter column for scoped lookups: the tenant/holding
    /// partition column checked alongside `id` in
    /// [`crate::RecordMapper::get_by_id`].
    fn scope_column() -> &'static str;

    /// Primary key value.
    fn id(&self) -> i64;

    /// Ordered field template, `id` included.
    fn fields() -> &'static [FieldDescriptor<Self>];
}

//! Generic single-table persistence mapping over SQLite.
//!
//! # Intention
//!
//! - Derive a table's column set from a record type's declared field
//!   descriptors and build every SQL statement from that one template.
//! - Round-trip rows to typed records without per-field query code.
//! - Keep the database driver behind a single "execute parameterized SQL,
//!   return rows" capability.
//!
//! # Architectural Boundaries
//!
//! - Single-table, single-primary-key (`id`) operations only: no
//!   relations, joins, migrations, or query DSL.
//! - No connection management policy; [`SqliteExecutor`] wraps one
//!   connection, anything smarter belongs to the caller.
//! - No domain validation beyond field presence.

pub mod error;
pub mod executor;
pub mod mapper;
pub mod record;
pub mod row;
pub mod sqlite;
pub mod value;

pub use error::{MapperError, MapperResult};
pub use executor::{SqlExecutor, SqlQuery};
pub use mapper::RecordMapper;
pub use record::{FieldDescriptor, TableRecord, ID_COLUMN};
pub use row::{Row, Rows};
pub use sqlite::SqliteExecutor;
pub use value::{Value, ValueError};

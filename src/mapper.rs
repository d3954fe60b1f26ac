//! The generic single-table mapper.

use std::sync::Arc;

use tracing::debug;

use crate::error::{MapperError, MapperResult};
use crate::executor::{SqlExecutor, SqlQuery};
use crate::record::{FieldDescriptor, TableRecord, ID_COLUMN};
use crate::row::Row;
use crate::value::Value;

/// Maps one record type onto its table.
///
/// Every statement is built from the record type's field template, captured
/// once at construction; execution is delegated to the shared
/// [`SqlExecutor`]. The mapper itself holds no record state between calls,
/// so concurrent operations on different records are safe. Two saves racing
/// on the same id are not coordinated and may interleave as a lost update.
pub struct RecordMapper<T: TableRecord + 'static, E: SqlExecutor> {
    executor: Arc<E>,
    table: &'static str,
    fields: &'static [FieldDescriptor<T>],
}

impl<T: TableRecord + 'static, E: SqlExecutor> Clone for RecordMapper<T, E> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            table: self.table,
            fields: self.fields,
        }
    }
}

impl<T: TableRecord + 'static, E: SqlExecutor> RecordMapper<T, E> {
    pub fn new(executor: Arc<E>) -> Self {
        Self {
            executor,
            table: T::table_name(),
            fields: T::fields(),
        }
    }

    /// Insert or update depending on whether a row with the record's id
    /// already exists.
    ///
    /// The existence probe and the write are two independent statements,
    /// not one transaction.
    pub async fn save(&self, record: &T) -> MapperResult<()> {
        let probe = SqlQuery::new(format!("SELECT * FROM {} WHERE id = ?", self.table))
            .bind(record.id());
        let rows = self.executor.execute(probe).await?;
        if rows.is_empty() {
            debug!(table = self.table, id = record.id(), "save: id absent, inserting");
            self.insert(record).await
        } else {
            debug!(table = self.table, id = record.id(), "save: id present, updating");
            self.update(record).await
        }
    }

    /// Insert the record, `id` included.
    pub async fn insert(&self, record: &T) -> MapperResult<()> {
        self.executor.execute(self.insert_query(record)).await?;
        Ok(())
    }

    /// Update every non-id field of the record's row.
    pub async fn update(&self, record: &T) -> MapperResult<()> {
        self.executor.execute(self.update_query(record)).await?;
        Ok(())
    }

    /// Delete the row with `id`. Deleting an absent id is a no-op, not an
    /// error.
    pub async fn delete(&self, id: i64) -> MapperResult<()> {
        let query = SqlQuery::new(format!("DELETE FROM {} WHERE id = ?", self.table)).bind(id);
        self.executor.execute(query).await?;
        Ok(())
    }

    /// Delete every record's row as one all-or-nothing batch.
    pub async fn delete_many(&self, records: &[T]) -> MapperResult<()> {
        let statement = format!("DELETE FROM {} WHERE id = ?", self.table);
        let queries = records
            .iter()
            .map(|record| SqlQuery::new(statement.clone()).bind(record.id()))
            .collect();
        self.executor.execute_all(queries).await
    }

    /// Look up one row by id within a scope partition.
    ///
    /// `scope` is matched against the record type's
    /// [`scope_column`](TableRecord::scope_column) (a tenant/holding id);
    /// only a row satisfying both filters is returned. Returns `None` when
    /// nothing matches.
    pub async fn get_by_id(&self, id: i64, scope: impl Into<Value>) -> MapperResult<Option<T>> {
        let query = SqlQuery::new(format!(
            "SELECT * FROM {} WHERE id = ? AND {} = ?",
            self.table,
            T::scope_column(),
        ))
        .bind(id)
        .bind(scope);
        let rows = self.executor.execute(query).await?;
        match rows.item(0) {
            Some(row) => Ok(Some(self.record_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Fetch every row of the table, in result-set order. No ORDER BY is
    /// issued; the ordering is store-defined.
    pub async fn get_all(&self) -> MapperResult<Vec<T>> {
        let query = SqlQuery::new(format!("SELECT * FROM {}", self.table));
        let rows = self.executor.execute(query).await?;
        rows.iter().map(|row| self.record_from_row(row)).collect()
    }

    /// Columns, placeholders and parameters are collected in one pass over
    /// the template, so all three share the same order. A mismatch here
    /// would write values into the wrong columns without failing.
    fn insert_query(&self, record: &T) -> SqlQuery {
        let mut columns = Vec::with_capacity(self.fields.len());
        let mut placeholders = Vec::with_capacity(self.fields.len());
        let mut params = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            columns.push(field.name);
            placeholders.push("?");
            params.push((field.get)(record));
        }
        let statement = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", "),
        );
        SqlQuery { statement, params }
    }

    /// Every non-id field becomes a `field = ?` assignment in template
    /// order; the id is bound last for the WHERE clause and never appears
    /// in the SET list.
    fn update_query(&self, record: &T) -> SqlQuery {
        let mut assignments = Vec::with_capacity(self.fields.len());
        let mut params = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            if field.name == ID_COLUMN {
                continue;
            }
            assignments.push(format!("{} = ?", field.name));
            params.push((field.get)(record));
        }
        params.push(Value::Integer(record.id()));
        let statement = format!(
            "UPDATE {} SET {} WHERE id = ?",
            self.table,
            assignments.join(", "),
        );
        SqlQuery { statement, params }
    }

    /// Walk the template and copy every same-named column into a fresh
    /// record.
    fn record_from_row(&self, row: &Row) -> MapperResult<T> {
        let mut record = T::default();
        for field in self.fields {
            let value = row
                .get(field.name)
                .ok_or_else(|| MapperError::MissingColumn {
                    table: self.table.to_string(),
                    column: field.name,
                })?;
            (field.set)(&mut record, value.clone()).map_err(|err| MapperError::TypeMismatch {
                table: self.table.to_string(),
                column: field.name,
                expected: err.expected,
                found: err.found,
            })?;
        }
        Ok(record)
    }
}

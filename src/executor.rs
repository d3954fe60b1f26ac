//! The executor capability the mapper consumes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MapperResult;
use crate::row::Rows;
use crate::value::Value;

/// SQL statement text with its ordered positional parameters.
///
/// Placeholders are `?`-style: the n-th parameter binds the n-th
/// placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlQuery {
    pub statement: String,
    pub params: Vec<Value>,
}

impl SqlQuery {
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = params;
        self
    }

    /// Append one positional parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }
}

/// Runs parameterized SQL and returns row results.
///
/// This is the mapper's only view of the database: one statement in, rows
/// out. Timeouts, cancellation and connection management are the
/// implementor's concern.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Execute one statement. Statements that produce no result set (DML)
    /// return an empty row collection.
    async fn execute(&self, query: SqlQuery) -> MapperResult<Rows>;

    /// Execute every statement inside a single transaction. Any failure
    /// rolls the whole batch back.
    async fn execute_all(&self, queries: Vec<SqlQuery>) -> MapperResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_appends_in_call_order() {
        let query = SqlQuery::new("SELECT * FROM t WHERE a = ? AND b = ?")
            .bind(1i64)
            .bind("x");
        assert_eq!(
            query.params,
            vec![Value::Integer(1), Value::Text("x".to_string())]
        );
    }
}

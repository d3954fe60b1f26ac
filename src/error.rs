use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapperError {
    /// Any failure reported by the SQL executor, passed through unchanged:
    /// connection problems, malformed SQL, constraint violations.
    #[error("executor failure: {0}")]
    Executor(#[from] anyhow::Error),

    /// A result row did not contain a column the field template names.
    #[error("column `{column}` missing from result row of table `{table}`")]
    MissingColumn {
        table: String,
        column: &'static str,
    },

    /// A cell could not be converted into the record field's type.
    #[error("column `{column}` of table `{table}`: expected {expected}, found {found}")]
    TypeMismatch {
        table: String,
        column: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

impl From<rusqlite::Error> for MapperError {
    fn from(err: rusqlite::Error) -> Self {
        MapperError::Executor(err.into())
    }
}

pub type MapperResult<T> = Result<T, MapperError>;

use std::fmt;
use std::io;

/// Failures raised by parsing, table access and shape validation.
#[derive(Debug)]
pub enum Error {
    /// The source text could not be read.
    Io(io::Error),
    /// `value_at` was asked for a column the table does not have.
    KeyNotFound { column: String },
    /// `value_at` was asked for a row past the end of the table, or for a
    /// cell missing from a short source row. `len` is the table's row count.
    IndexOutOfRange {
        column: String,
        row: usize,
        len: usize,
    },
    /// A data row whose cell count differs from the header count.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::KeyNotFound { column } => write!(f, "Unknown column: `{}`", column),
            Error::IndexOutOfRange { column, row, len } => write!(
                f,
                "No value at row {} of column `{}` (table has {} rows)",
                row, column, len
            ),
            Error::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} has {} cells, expected {} (one per header)",
                row, found, expected
            ),
            Error::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

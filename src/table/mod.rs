pub mod column_store;
pub mod row_store;
pub mod summary;

pub use column_store::{ColumnStoreBuilder, ColumnStoreTable};
pub use row_store::{RowStoreBuilder, RowStoreTable};
pub use summary::{preview, summarize, ColumnSummary};

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::warn;

use crate::error::Result;
use crate::parse::{CellValue, ParsedTable};

/// Read-only view over a built table. Consumers only ever hold a
/// `dyn Table`; which layout sits behind it is the builder's business.
pub trait Table: Send + Sync {
    /// Header names, in source order.
    fn columns(&self) -> &[String];

    fn row_count(&self) -> usize;

    /// Fails with `KeyNotFound` for an unknown column and with
    /// `IndexOutOfRange` for a row the column does not reach.
    fn value_at(&self, column: &str, row: usize) -> Result<&CellValue>;
}

/// Builds a [`Table`] out of raw cells. The parsed input is only borrowed
/// for the duration of the build.
pub trait TableBuilder {
    fn name(&self) -> &'static str;

    fn build(&self, parsed: &ParsedTable) -> Box<dyn Table>;
}

/// Storage layout selector, as spelled in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    RowStore,
    ColumnStore,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::RowStore, Strategy::ColumnStore];

    pub fn builder(self) -> Box<dyn TableBuilder> {
        match self {
            Strategy::RowStore => Box::new(RowStoreBuilder),
            Strategy::ColumnStore => Box::new(ColumnStoreBuilder),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::RowStore => "row-store",
            Strategy::ColumnStore => "column-store",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| format!("unknown strategy `{}`", s))
    }
}

/// Cells past the header count are dropped by every builder; say so once.
fn warn_on_extra_cells(parsed: &ParsedTable, builder: &str) {
    let width = parsed.headers.len();
    if let Some(row) = parsed.rows.iter().position(|r| r.len() > width) {
        warn!(
            builder,
            first_row = row,
            headers = width,
            "some rows have more cells than headers; extra cells are ignored"
        );
    }
}

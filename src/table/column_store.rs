use std::collections::HashMap;
use tracing::debug;

use super::{warn_on_extra_cells, Table, TableBuilder};
use crate::error::{Error, Result};
use crate::parse::{infer, CellValue, ParsedTable};

/// All values of one column, in row order. `None` marks a cell that its
/// source row never had.
#[derive(Debug, Clone, Default)]
pub struct ColumnVector {
    values: Vec<Option<CellValue>>,
}

impl ColumnVector {
    pub fn get(&self, row: usize) -> Option<&CellValue> {
        self.values.get(row).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&CellValue>> {
        self.values.iter().map(Option::as_ref)
    }
}

/// Columnar layout: one vector per column plus a name → position map.
#[derive(Debug, Clone)]
pub struct ColumnStoreTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<ColumnVector>,
    row_count: usize,
}

impl ColumnStoreTable {
    /// Resolve a name once; pair with [`Self::value_at_index`] in loops.
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.index
            .get(column)
            .copied()
            .ok_or_else(|| Error::KeyNotFound {
                column: column.to_string(),
            })
    }

    pub fn column(&self, column: &str) -> Result<&ColumnVector> {
        let idx = self.column_index(column)?;
        Ok(&self.vectors[idx])
    }

    pub fn value_at_index(&self, column: usize, row: usize) -> Result<&CellValue> {
        self.vectors
            .get(column)
            .and_then(|vector| vector.get(row))
            .ok_or_else(|| Error::IndexOutOfRange {
                column: self
                    .columns
                    .get(column)
                    .cloned()
                    .unwrap_or_else(|| format!("#{}", column)),
                row,
                len: self.row_count,
            })
    }
}

impl Table for ColumnStoreTable {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn row_count(&self) -> usize {
        self.row_count
    }

    fn value_at(&self, column: &str, row: usize) -> Result<&CellValue> {
        let idx = self.column_index(column)?;
        self.vectors[idx]
            .get(row)
            .ok_or_else(|| Error::IndexOutOfRange {
                column: column.to_string(),
                row,
                len: self.row_count,
            })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ColumnStoreBuilder;

impl ColumnStoreBuilder {
    /// Build without erasing the concrete type.
    #[tracing::instrument(level = "debug", skip_all, fields(columns = parsed.headers.len(), rows = parsed.rows.len()))]
    pub fn build_table(&self, parsed: &ParsedTable) -> ColumnStoreTable {
        warn_on_extra_cells(parsed, self.name());

        let vectors: Vec<ColumnVector> = (0..parsed.headers.len())
            .map(|col| ColumnVector {
                values: parsed
                    .rows
                    .iter()
                    .map(|cells_in_row| cells_in_row.get(col).map(|raw| infer(raw)))
                    .collect(),
            })
            .collect();

        // later duplicates overwrite earlier ones, as in the row store
        let index: HashMap<String, usize> = parsed
            .headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        debug!(columns = vectors.len(), rows = parsed.rows.len(), "column store built");

        ColumnStoreTable {
            columns: parsed.headers.clone(),
            index,
            vectors,
            row_count: parsed.rows.len(),
        }
    }
}

impl TableBuilder for ColumnStoreBuilder {
    fn name(&self) -> &'static str {
        "column-store"
    }

    fn build(&self, parsed: &ParsedTable) -> Box<dyn Table> {
        Box::new(self.build_table(parsed))
    }
}

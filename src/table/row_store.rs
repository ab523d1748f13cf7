use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use tracing::debug;

use super::{warn_on_extra_cells, Table, TableBuilder};
use crate::error::{Error, Result};
use crate::parse::{infer, CellValue, ParsedTable};

/// One source row: column name → value. Every record shares the same
/// `Arc<str>` handles for its keys.
#[derive(Debug, Clone, Default)]
pub struct RowRecord {
    cells: HashMap<Arc<str>, CellValue>,
}

impl RowRecord {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Per-row associative layout.
#[derive(Debug, Clone)]
pub struct RowStoreTable {
    columns: Vec<String>,
    names: HashSet<Arc<str>>,
    rows: Vec<RowRecord>,
}

impl RowStoreTable {
    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }
}

impl Table for RowStoreTable {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn value_at(&self, column: &str, row: usize) -> Result<&CellValue> {
        if !self.names.contains(column) {
            return Err(Error::KeyNotFound {
                column: column.to_string(),
            });
        }
        self.rows
            .get(row)
            .and_then(|record| record.get(column))
            .ok_or_else(|| Error::IndexOutOfRange {
                column: column.to_string(),
                row,
                len: self.rows.len(),
            })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RowStoreBuilder;

impl RowStoreBuilder {
    /// Build without erasing the concrete type.
    #[tracing::instrument(level = "debug", skip_all, fields(columns = parsed.headers.len(), rows = parsed.rows.len()))]
    pub fn build_table(&self, parsed: &ParsedTable) -> RowStoreTable {
        warn_on_extra_cells(parsed, self.name());

        let handles: Vec<Arc<str>> = parsed.headers.iter().map(|h| Arc::from(h.as_str())).collect();

        let mut rows = Vec::with_capacity(parsed.rows.len());
        for cells_in_row in &parsed.rows {
            let mut cells = HashMap::with_capacity(handles.len());
            // a repeated header resolves to its last position, even when
            // this row is too short to reach it
            for (i, name) in handles.iter().enumerate() {
                match cells_in_row.get(i) {
                    Some(raw) => {
                        cells.insert(Arc::clone(name), infer(raw));
                    }
                    None => {
                        cells.remove(name);
                    }
                }
            }
            rows.push(RowRecord { cells });
        }

        let names: HashSet<Arc<str>> = handles.into_iter().collect();
        debug!(rows = rows.len(), distinct_columns = names.len(), "row store built");

        RowStoreTable {
            columns: parsed.headers.clone(),
            names,
            rows,
        }
    }
}

impl TableBuilder for RowStoreBuilder {
    fn name(&self) -> &'static str {
        "row-store"
    }

    fn build(&self, parsed: &ParsedTable) -> Box<dyn Table> {
        Box::new(self.build_table(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_text;

    #[test]
    fn records_share_column_handles() {
        let table = RowStoreBuilder.build_table(&parse_text("a,b\n1,2\n3,4\n"));
        let key_of = |record: &RowRecord| -> Arc<str> {
            record
                .cells
                .keys()
                .find(|k| k.as_ref() == "a")
                .cloned()
                .unwrap()
        };
        let first = key_of(&table.rows()[0]);
        let second = key_of(&table.rows()[1]);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn short_row_record_holds_only_present_cells() {
        let table = RowStoreBuilder.build_table(&parse_text("a,b,c\n1\n"));
        let record = &table.rows()[0];
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("a"), Some(&CellValue::Integer(1)));
        assert_eq!(record.get("b"), None);
    }

    #[test]
    fn extra_cells_are_not_stored() {
        let table = RowStoreBuilder.build_table(&parse_text("a\n1,2,3\n"));
        assert_eq!(table.rows()[0].len(), 1);
    }
}

use serde::Serialize;

use super::Table;
use crate::error::Result;
use crate::parse::ValueKind;

/// Per-column tally of inferred value kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub nulls: usize,
    pub booleans: usize,
    pub decimals: usize,
    pub integers: usize,
    pub texts: usize,
}

impl ColumnSummary {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nulls: 0,
            booleans: 0,
            decimals: 0,
            integers: 0,
            texts: 0,
        }
    }

    fn count(&mut self, kind: ValueKind) {
        match kind {
            ValueKind::Null => self.nulls += 1,
            ValueKind::Boolean => self.booleans += 1,
            ValueKind::Decimal => self.decimals += 1,
            ValueKind::Integer => self.integers += 1,
            ValueKind::Text => self.texts += 1,
        }
    }

    /// Most frequent non-null kind; ties go to the wider kind
    /// (text > decimal > integer > boolean). `None` for all-null columns.
    pub fn dominant_kind(&self) -> Option<ValueKind> {
        [
            (ValueKind::Boolean, self.booleans),
            (ValueKind::Integer, self.integers),
            (ValueKind::Decimal, self.decimals),
            (ValueKind::Text, self.texts),
        ]
        .into_iter()
        .filter(|(_, n)| *n > 0)
        // max_by_key keeps the last maximum, hence the ascending width order
        .max_by_key(|(_, n)| *n)
        .map(|(kind, _)| kind)
    }
}

/// Tally every cell of every column, reading through the table trait only.
pub fn summarize(table: &dyn Table) -> Result<Vec<ColumnSummary>> {
    table
        .columns()
        .iter()
        .map(|name| -> Result<ColumnSummary> {
            let mut summary = ColumnSummary::new(name);
            for row in 0..table.row_count() {
                summary.count(table.value_at(name, row)?.kind());
            }
            Ok(summary)
        })
        .collect()
}

/// Fixed-width text grid of the header plus the first `limit` rows.
pub fn preview(table: &dyn Table, limit: usize) -> Result<String> {
    let columns = table.columns();
    let shown = table.row_count().min(limit);

    let mut grid: Vec<Vec<String>> = Vec::with_capacity(shown + 1);
    grid.push(columns.to_vec());
    for row in 0..shown {
        let mut line = Vec::with_capacity(columns.len());
        for name in columns {
            line.push(table.value_at(name, row)?.to_string());
        }
        grid.push(line);
    }

    let mut widths = vec![0usize; columns.len()];
    for line in &grid {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for (n, line) in grid.iter().enumerate() {
        let cells: Vec<String> = line
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        out.push_str(cells.join(" | ").trim_end());
        out.push('\n');
        if n == 0 {
            let rule: Vec<String> = (0..line.len()).map(|i| "-".repeat(widths[i])).collect();
            out.push_str(&rule.join("-+-"));
            out.push('\n');
        }
    }
    if table.row_count() > shown {
        out.push_str(&format!("... {} more rows\n", table.row_count() - shown));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_text;
    use crate::table::Strategy;

    #[test]
    fn counts_kinds_per_column() -> Result<()> {
        let parsed = parse_text("a,b\n1,x\n2.5,\n3,TRUE\n");
        for strategy in Strategy::ALL {
            let table = strategy.builder().build(&parsed);
            let summary = summarize(table.as_ref())?;
            assert_eq!(summary.len(), 2);

            assert_eq!(summary[0].integers, 2);
            assert_eq!(summary[0].decimals, 1);
            assert_eq!(summary[0].dominant_kind(), Some(ValueKind::Integer));

            assert_eq!(summary[1].nulls, 1);
            assert_eq!(summary[1].texts, 1);
            assert_eq!(summary[1].booleans, 1);
            assert_eq!(summary[1].dominant_kind(), Some(ValueKind::Text));
        }
        Ok(())
    }

    #[test]
    fn all_null_column_has_no_dominant_kind() -> Result<()> {
        let table = Strategy::RowStore.builder().build(&parse_text("a\n\n\n"));
        let summary = summarize(table.as_ref())?;
        assert_eq!(summary[0].nulls, 2);
        assert_eq!(summary[0].dominant_kind(), None);
        Ok(())
    }

    #[test]
    fn summarize_surfaces_short_rows() {
        let table = Strategy::ColumnStore.builder().build(&parse_text("a,b\n1\n"));
        assert!(summarize(table.as_ref()).is_err());
    }

    #[test]
    fn preview_renders_aligned_grid() -> Result<()> {
        let parsed = parse_text("id,name\n1,apple\n22,\n333,kiwi\n");
        let table = Strategy::ColumnStore.builder().build(&parsed);
        let text = preview(table.as_ref(), 2)?;
        let expected = "id | name\n---+------\n1  | apple\n22 |\n... 1 more rows\n";
        assert_eq!(text, expected);
        Ok(())
    }
}

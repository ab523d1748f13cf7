pub mod infer;

pub use infer::{infer, CellValue, ValueKind};

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::debug;

use crate::error::{Error, Result};

const DELIMITER: char = ',';

/// Header line plus every data line, split into raw string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    /// Column names, from the first line.
    pub headers: Vec<String>,
    /// Each following line, as a Vec of Strings (one per field). Cell counts
    /// are not checked against `headers`.
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Eager shape check: fails on the first row whose cell count differs
    /// from the header count. Builders never call this themselves.
    pub fn validate_shape(&self) -> Result<()> {
        let expected = self.headers.len();
        match self
            .rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != expected)
        {
            Some((row, cells)) => Err(Error::RaggedRow {
                row,
                expected,
                found: cells.len(),
            }),
            None => Ok(()),
        }
    }
}

fn split_line(line: &str) -> Vec<String> {
    line.split(DELIMITER).map(str::to_string).collect()
}

/// Line terminators are `\n`, `\r\n` and a lone `\r`. A final terminator
/// does not start an extra line.
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Split in-memory text. The first line is the header line; an empty input
/// yields no headers and no rows.
pub fn parse_text(text: &str) -> ParsedTable {
    let mut lines = split_lines(text).into_iter();
    let headers = lines.next().map(split_line).unwrap_or_default();
    let rows: Vec<Vec<String>> = lines.map(split_line).collect();
    ParsedTable { headers, rows }
}

/// Same as [`parse_text`], pulling text from any reader. Input that is not
/// valid UTF-8 fails with [`Error::Io`].
pub fn parse_reader<R: Read>(mut reader: R) -> Result<ParsedTable> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(parse_text(&text))
}

/// Source of parsed tables, keyed by file path.
pub trait CsvReader {
    fn read(&self, path: &Path) -> Result<ParsedTable>;
}

/// Reads a delimited file from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileCsvReader;

impl CsvReader for FileCsvReader {
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
    fn read(&self, path: &Path) -> Result<ParsedTable> {
        let file = File::open(path)?;
        let parsed = parse_reader(BufReader::new(file))?;
        debug!(
            columns = parsed.headers.len(),
            rows = parsed.rows.len(),
            "parsed csv"
        );
        Ok(parsed)
    }
}

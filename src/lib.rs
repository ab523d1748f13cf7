//! Delimited text → typed cells → queryable tables, with two interchangeable
//! storage layouts and a harness that measures what each one costs.

pub mod bench;
pub mod config;
pub mod error;
pub mod parse;
pub mod table;

pub use bench::{measure, BenchmarkResult, CountingAlloc, GaugeKind, MemoryGauge};
pub use error::{Error, Result};
pub use parse::{infer, parse_reader, parse_text, CellValue, CsvReader, FileCsvReader, ParsedTable};
pub use table::{ColumnStoreBuilder, RowStoreBuilder, Strategy, Table, TableBuilder};

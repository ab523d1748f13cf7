pub mod memory;

pub use memory::{AllocatorGauge, CountingAlloc, GaugeKind, MemoryGauge, ProcessGauge};

use serde::Serialize;
use std::{
    hint::black_box,
    time::{Duration, Instant},
};
use tracing::info;

use crate::error::Result;
use crate::parse::ParsedTable;
use crate::table::{Table, TableBuilder};

/// Outcome of one harness run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkResult {
    /// Memory held after the build minus memory held before it. Not clamped:
    /// negative values are reported as-is.
    pub memory_delta_bytes: i64,
    pub build_duration: Duration,
    pub full_scan_duration: Duration,
}

/// One row of a suite report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub strategy: String,
    pub run: usize,
    pub memory_delta_bytes: i64,
    pub build_ms: f64,
    pub full_scan_ms: f64,
}

impl RunReport {
    fn new(strategy: &str, run: usize, result: &BenchmarkResult) -> Self {
        Self {
            strategy: strategy.to_string(),
            run,
            memory_delta_bytes: result.memory_delta_bytes,
            build_ms: result.build_duration.as_secs_f64() * 1_000.0,
            full_scan_ms: result.full_scan_duration.as_secs_f64() * 1_000.0,
        }
    }
}

/// Read every cell of every column, column by column.
pub fn full_scan(table: &dyn Table) -> Result<()> {
    for column in table.columns() {
        for row in 0..table.row_count() {
            black_box(table.value_at(column, row)?);
        }
    }
    Ok(())
}

/// Build a table with `builder`, then scan it, recording memory and time.
/// Gauge settling happens outside both timed sections.
#[tracing::instrument(level = "debug", skip_all, fields(builder = builder.name(), gauge = gauge.name()))]
pub fn measure<B, G>(builder: &B, parsed: &ParsedTable, gauge: &mut G) -> Result<BenchmarkResult>
where
    B: TableBuilder + ?Sized,
    G: MemoryGauge + ?Sized,
{
    // 1) baseline
    gauge.settle();
    let baseline = gauge.current_bytes()?;

    // 2) timed build
    let start = Instant::now();
    let table = builder.build(parsed);
    let build_duration = start.elapsed();

    // 3) post-build reading, table still alive
    gauge.settle();
    let memory_delta_bytes = gauge.current_bytes()? - baseline;

    // 4) timed full scan
    let start = Instant::now();
    full_scan(table.as_ref())?;
    let full_scan_duration = start.elapsed();

    drop(table);

    Ok(BenchmarkResult {
        memory_delta_bytes,
        build_duration,
        full_scan_duration,
    })
}

/// Run every builder `repeat` times against the same parsed input.
pub fn run_suite(
    builders: &[Box<dyn TableBuilder>],
    parsed: &ParsedTable,
    gauge: &mut dyn MemoryGauge,
    repeat: usize,
) -> Result<Vec<RunReport>> {
    let mut reports = Vec::with_capacity(builders.len() * repeat);
    for builder in builders {
        for run in 0..repeat {
            let result = measure(builder.as_ref(), parsed, &mut *gauge)?;
            info!(
                strategy = builder.name(),
                run,
                memory_delta_bytes = result.memory_delta_bytes,
                build = ?result.build_duration,
                scan = ?result.full_scan_duration,
                "benchmark run complete"
            );
            reports.push(RunReport::new(builder.name(), run, &result));
        }
    }
    Ok(reports)
}

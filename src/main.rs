use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csvtable::{
    bench::{run_suite, CountingAlloc, GaugeKind, RunReport},
    config::BenchConfig,
    table::{preview, summarize, ColumnSummary, Strategy, TableBuilder},
    CsvReader, FileCsvReader,
};
use serde::Serialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

#[derive(Serialize)]
struct Report<'a> {
    generated_at: DateTime<Utc>,
    input: &'a Path,
    columns: usize,
    rows: usize,
    gauge: GaugeKind,
    summary: &'a [ColumnSummary],
    runs: &'a [RunReport],
}

fn print_usage_and_exit(program: &str) -> ! {
    eprintln!("Usage: {} <input-csv>", program);
    eprintln!("       (or set `input` in {})", csvtable::config::DEFAULT_CONFIG_FILE);
    std::process::exit(1);
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) config + args ────────────────────────────────────────────
    let mut config = BenchConfig::load()?;
    let mut args = env::args();
    let prog = args.next().unwrap_or_else(|| "csvtable".into());
    if let Some(arg) = args.next() {
        config.input = Some(PathBuf::from(arg));
    }
    let input = match config.input.clone() {
        Some(path) => path,
        None => print_usage_and_exit(&prog),
    };

    // ─── 3) parse ────────────────────────────────────────────────────
    let parsed = FileCsvReader
        .read(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    info!(
        path = %input.display(),
        columns = parsed.headers.len(),
        rows = parsed.rows.len(),
        "parsed input"
    );
    if config.strict_shape {
        parsed
            .validate_shape()
            .with_context(|| format!("shape check of {}", input.display()))?;
    }

    // ─── 4) summary + preview, through the table trait only ──────────
    let table = Strategy::ColumnStore.builder().build(&parsed);
    let summary = summarize(table.as_ref()).context("summarizing columns")?;
    print_summary(&summary);
    if config.preview_rows > 0 {
        println!();
        print!("{}", preview(table.as_ref(), config.preview_rows)?);
    }
    drop(table);

    // ─── 5) benchmark each strategy ─────────────────────────────────
    let mut gauge = config.gauge.open()?;
    let builders: Vec<Box<dyn TableBuilder>> =
        config.strategies.iter().map(|s| s.builder()).collect();
    let runs = run_suite(&builders, &parsed, gauge.as_mut(), config.repeat)
        .context("benchmark failed")?;

    println!();
    print_runs(&runs);

    // ─── 6) optional JSON report ────────────────────────────────────
    if let Some(path) = &config.report_path {
        let report = Report {
            generated_at: Utc::now(),
            input: &input,
            columns: parsed.headers.len(),
            rows: parsed.rows.len(),
            gauge: config.gauge,
            summary: &summary,
            runs: &runs,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "wrote report");
    }

    info!("all done");
    Ok(())
}

fn print_summary(summary: &[ColumnSummary]) {
    println!(
        "{:<20} | {:<8} | {:>6} | {:>8} | {:>8} | {:>8} | {:>6}",
        "Column", "Type", "Nulls", "Booleans", "Integers", "Decimals", "Texts"
    );
    println!("{:-<84}", "");
    for s in summary {
        let kind = s
            .dominant_kind()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "null".into());
        println!(
            "{:<20} | {:<8} | {:>6} | {:>8} | {:>8} | {:>8} | {:>6}",
            s.name, kind, s.nulls, s.booleans, s.integers, s.decimals, s.texts
        );
    }
}

fn print_runs(runs: &[RunReport]) {
    println!(
        "{:<14} | {:<4} | {:>16} | {:>12} | {:>12}",
        "Strategy", "Run", "MemoryDeltaBytes", "BuildMs", "ScanMs"
    );
    println!("{:-<70}", "");
    for r in runs {
        println!(
            "{:<14} | {:<4} | {:>16} | {:>12.3} | {:>12.3}",
            r.strategy, r.run, r.memory_delta_bytes, r.build_ms, r.full_scan_ms
        );
    }
}

use anyhow::{Context, Result};
use std::{
    env,
    fs::{self, File},
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn print_usage_and_exit(program: &str) -> ! {
    eprintln!("Usage: {} <out-csv> <rows> <cols>", program);
    std::process::exit(1);
}

/// Deterministic cell for (row, col). Columns rotate through the inferred
/// kinds so every layout sees a realistic mix, with the odd blank cell.
fn cell(row: usize, col: usize) -> String {
    if (row * 7 + col * 3) % 23 == 0 {
        return String::new();
    }
    match col % 5 {
        0 => row.to_string(),
        1 => format!("{}.{:02}", (row * 31 + col) % 10_000, (row + col) % 100),
        2 => (if (row + col) % 2 == 0 { "TRUE" } else { "FALSE" }).to_string(),
        3 => format!("item-{}", (row * 13 + col) % 997),
        _ => format!("{}", (row as i64 * 17 - 5_000) % 100_000),
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args();
    let prog = args.next().unwrap_or_else(|| "gen_csv".into());
    let (out, rows, cols) = match (args.next(), args.next(), args.next()) {
        (Some(o), Some(r), Some(c)) => (
            PathBuf::from(o),
            r.parse::<usize>().context("rows must be a number")?,
            c.parse::<usize>().context("cols must be a number")?,
        ),
        _ => print_usage_and_exit(&prog),
    };

    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = File::create(&out).with_context(|| format!("creating {}", out.display()))?;
    let mut writer = BufWriter::new(file);

    let headers: Vec<String> = (0..cols).map(|c| format!("col_{}", c)).collect();
    writeln!(writer, "{}", headers.join(","))?;
    for row in 0..rows {
        let line: Vec<String> = (0..cols).map(|col| cell(row, col)).collect();
        writeln!(writer, "{}", line.join(","))?;
    }
    writer.flush()?;

    info!(path = %out.display(), rows, cols, "sample csv generated");
    Ok(())
}

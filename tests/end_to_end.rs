use anyhow::Result;
use csvtable::{
    bench::{run_suite, AllocatorGauge},
    table::{summarize, Table, TableBuilder},
    CellValue, ColumnStoreBuilder, CsvReader, Error, FileCsvReader, RowStoreBuilder, Strategy,
};
use std::io::Write;
use tempfile::NamedTempFile;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,csvtable=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn write_csv(content: &str) -> Result<NamedTempFile> {
    let mut tmp = NamedTempFile::new()?;
    tmp.write_all(content.as_bytes())?;
    Ok(tmp)
}

fn build_both(builders: &[&dyn TableBuilder], path: &std::path::Path) -> Result<Vec<Box<dyn Table>>> {
    let parsed = FileCsvReader.read(path)?;
    Ok(builders.iter().map(|b| b.build(&parsed)).collect())
}

#[test]
fn file_to_tables_mixed_types() -> Result<()> {
    init_test_logging();
    let tmp = write_csv("a,b\n1,TRUE\n2.5,FALSE\n")?;

    for table in build_both(&[&RowStoreBuilder, &ColumnStoreBuilder], tmp.path())? {
        assert_eq!(table.columns(), ["a".to_string(), "b".to_string()]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value_at("a", 0)?, &CellValue::Integer(1));
        assert_eq!(table.value_at("a", 1)?, &csvtable::infer("2.5"));
        assert_eq!(table.value_at("b", 0)?, &CellValue::Boolean(true));
        assert_eq!(table.value_at("b", 1)?, &CellValue::Boolean(false));
    }
    Ok(())
}

#[test]
fn file_with_blank_line_and_windows_endings() -> Result<()> {
    init_test_logging();
    let tmp = write_csv("x\r\n\r\n5\r\n")?;

    for table in build_both(&[&RowStoreBuilder, &ColumnStoreBuilder], tmp.path())? {
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value_at("x", 0)?, &CellValue::Null);
        assert_eq!(table.value_at("x", 1)?, &CellValue::Integer(5));
        assert!(matches!(
            table.value_at("x", 2),
            Err(Error::IndexOutOfRange { .. })
        ));
    }
    Ok(())
}

#[test]
fn realistic_file_round_trip_and_benchmark() -> Result<()> {
    init_test_logging();
    let mut content = String::from("order_id,amount,paid,customer,note\n");
    for i in 0..300 {
        let note = if i % 10 == 0 { "" } else { "ok" };
        let paid = if i % 3 == 0 { "TRUE" } else { "FALSE" };
        content.push_str(&format!("{},{}.{:02},{},cust{},{}\n", i, i * 3, i % 100, paid, i % 17, note));
    }
    let tmp = write_csv(&content)?;
    let parsed = FileCsvReader.read(tmp.path())?;
    parsed.validate_shape()?;

    let rows = Strategy::RowStore.builder().build(&parsed);
    let cols = Strategy::ColumnStore.builder().build(&parsed);
    for column in &parsed.headers {
        for i in 0..parsed.row_count() {
            assert_eq!(rows.value_at(column, i)?, cols.value_at(column, i)?);
        }
    }

    let summary = summarize(cols.as_ref())?;
    assert_eq!(summary[0].integers, 300);
    assert_eq!(summary[1].decimals, 300);
    assert_eq!(summary[2].booleans, 300);
    assert_eq!(summary[3].texts, 300);
    assert_eq!(summary[4].nulls, 30);

    let builders: Vec<Box<dyn TableBuilder>> = Strategy::ALL.into_iter().map(Strategy::builder).collect();
    let reports = run_suite(&builders, &parsed, &mut AllocatorGauge, 2)?;
    assert_eq!(reports.len(), 4);
    assert!(reports.iter().all(|r| r.build_ms >= 0.0 && r.full_scan_ms >= 0.0));
    Ok(())
}

#[test]
fn unreadable_source_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FileCsvReader.read(&dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.to_string().starts_with("IO error"));
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::bench::GaugeKind;
use crate::table::Strategy;

pub const CONFIG_ENV: &str = "CSVTABLE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "csvtable.yaml";

/// Run settings for the `csvtable` binary. Every field has a default, so an
/// empty (or absent) file is a valid config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// CSV file to load. The first CLI argument takes precedence.
    pub input: Option<PathBuf>,
    /// Layouts to benchmark, in order.
    pub strategies: Vec<Strategy>,
    pub gauge: GaugeKind,
    /// Benchmark runs per strategy.
    pub repeat: usize,
    /// Reject ragged rows up front instead of failing at first access.
    pub strict_shape: bool,
    /// Rows shown in the preview grid; 0 disables it.
    pub preview_rows: usize,
    /// Where to write the JSON report, if anywhere.
    pub report_path: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            input: None,
            strategies: Strategy::ALL.to_vec(),
            gauge: GaugeKind::default(),
            repeat: 1,
            strict_shape: false,
            preview_rows: 5,
            report_path: None,
        }
    }
}

impl BenchConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        // serde_yaml maps an empty document to unit, not to an empty map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text).context("parsing config yaml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// `$CSVTABLE_CONFIG` if set, else `./csvtable.yaml` if present, else
    /// defaults.
    pub fn load() -> Result<Self> {
        match env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                info!(path = %path.display(), "loading config from {}", CONFIG_ENV);
                Self::from_file(&path)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    info!(path = %path.display(), "loading config");
                    Self::from_file(path)
                } else {
                    debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.strategies.is_empty() {
            return Err(crate::Error::Config("`strategies` must not be empty".into()).into());
        }
        if self.repeat == 0 {
            return Err(crate::Error::Config("`repeat` must be at least 1".into()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_document_gives_defaults() -> Result<()> {
        assert_eq!(BenchConfig::from_yaml("")?, BenchConfig::default());
        assert_eq!(BenchConfig::from_yaml("{}")?, BenchConfig::default());
        Ok(())
    }

    #[test]
    fn parses_every_field() -> Result<()> {
        let config = BenchConfig::from_yaml(
            r#"
input: data/sample.csv
strategies: [column-store]
gauge: process
repeat: 3
strict_shape: true
preview_rows: 0
report_path: out/report.json
"#,
        )?;
        assert_eq!(config.input, Some(PathBuf::from("data/sample.csv")));
        assert_eq!(config.strategies, vec![Strategy::ColumnStore]);
        assert_eq!(config.gauge, GaugeKind::Process);
        assert_eq!(config.repeat, 3);
        assert!(config.strict_shape);
        assert_eq!(config.preview_rows, 0);
        assert_eq!(config.report_path, Some(PathBuf::from("out/report.json")));
        Ok(())
    }

    #[test]
    fn rejects_bad_values() {
        assert!(BenchConfig::from_yaml("strategies: [hash-store]").is_err());
        assert!(BenchConfig::from_yaml("strategies: []").is_err());
        assert!(BenchConfig::from_yaml("repeat: 0").is_err());
        assert!(BenchConfig::from_yaml("colour: blue").is_err());
    }

    #[test]
    fn reads_from_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "repeat: 2")?;
        let config = BenchConfig::from_file(tmp.path())?;
        assert_eq!(config.repeat, 2);
        assert_eq!(config.strategies, Strategy::ALL.to_vec());
        Ok(())
    }
}

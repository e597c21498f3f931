//! Command line and config file handling

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use gm_core::ExplorerSettings;
use gm_data::{DataConfig, SourceKind};

/// Interactive explorer for game market data
#[derive(Debug, Parser)]
#[command(name = "game-explorer", version, about)]
pub struct Args {
    /// JSON config file with `data` and `explorer` sections
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding chunk_{i}.json files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:5000
    #[arg(long)]
    pub backend: Option<String>,

    /// Number of chunks to load
    #[arg(long)]
    pub chunks: Option<usize>,

    /// Where to load records from: auto, json or backend
    #[arg(long)]
    pub source: Option<SourceKind>,
}

/// Everything the app needs at start-up
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub explorer: ExplorerSettings,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// File settings first, then command line overrides
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_args(args);
        config.data.validate().context("Invalid data configuration")?;
        Ok(config)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(dir) = &args.data_dir {
            self.data.data_dir = dir.clone();
        }
        if let Some(url) = &args.backend {
            self.data.backend_url = url.clone();
        }
        if let Some(chunks) = args.chunks {
            self.data.chunk_count = chunks;
        }
        if let Some(source) = args.source {
            self.data.source = source;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explorer.json");
        std::fs::write(
            &path,
            r#"{"data": {"data_dir": "chunks", "chunk_count": 4}, "explorer": {"search_debounce_ms": 100}}"#,
        )
        .unwrap();

        let args = Args::parse_from([
            "game-explorer",
            "--config",
            path.to_str().unwrap(),
            "--chunks",
            "2",
            "--source",
            "json",
        ]);
        let config = AppConfig::resolve(&args).unwrap();

        assert_eq!(config.data.data_dir, PathBuf::from("chunks"));
        assert_eq!(config.data.chunk_count, 2);
        assert_eq!(config.data.source, SourceKind::Json);
        assert_eq!(config.explorer.search_debounce_ms, 100);
        assert_eq!(config.explorer.max_tag_bars, None);
    }

    #[test]
    fn test_defaults_without_config() {
        let args = Args::parse_from(["game-explorer", "--backend", "http://example.test:8080"]);
        let config = AppConfig::resolve(&args).unwrap();
        assert_eq!(config.data.backend_url, "http://example.test:8080");
        assert_eq!(config.data.source, SourceKind::Auto);
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        assert!(Args::try_parse_from(["game-explorer", "--source", "csv"]).is_err());
    }
}

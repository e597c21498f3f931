//! Data source configuration

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::DataError;

/// Which collaborator serves the records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Probe the backend and fall back to the JSON store
    #[default]
    Auto,
    Json,
    Backend,
}

impl FromStr for SourceKind {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SourceKind::Auto),
            "json" => Ok(SourceKind::Json),
            "backend" | "database" => Ok(SourceKind::Backend),
            other => Err(DataError::Config(format!("unknown source kind '{}'", other))),
        }
    }
}

/// Where and how to load the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub source: SourceKind,

    /// Directory holding `chunk_{i}.json`
    pub data_dir: PathBuf,

    pub first_chunk: usize,
    pub chunk_count: usize,

    /// Upper bound on partitions actually fetched
    pub max_chunks: Option<usize>,

    pub backend_url: String,
    pub request_timeout_ms: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Auto,
            data_dir: PathBuf::from("data"),
            first_chunk: 1,
            chunk_count: 10,
            max_chunks: None,
            backend_url: "http://localhost:5000".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl DataConfig {
    /// Read a JSON config file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        let config: DataConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.chunk_count == 0 {
            return Err(DataError::Config("chunk_count must be at least 1".to_string()));
        }
        if self.max_chunks == Some(0) {
            return Err(DataError::Config("max_chunks must be at least 1".to_string()));
        }
        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            return Err(DataError::Config(format!("backend url '{}' is not http(s)", self.backend_url)));
        }
        Ok(())
    }

    /// Partition indices to fetch, in order
    pub fn chunk_indices(&self) -> Vec<usize> {
        let count = self.max_chunks.map_or(self.chunk_count, |max| max.min(self.chunk_count));
        (self.first_chunk..self.first_chunk + count).collect()
    }

    pub fn chunk_path(&self, index: usize) -> PathBuf {
        self.data_dir.join(format!("chunk_{}.json", index))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Backend base URL without a trailing slash
    pub fn backend_base(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_chunk_indices_respect_max() {
        let mut config = DataConfig { first_chunk: 1, chunk_count: 5, ..DataConfig::default() };
        assert_eq!(config.chunk_indices(), vec![1, 2, 3, 4, 5]);

        config.max_chunks = Some(2);
        assert_eq!(config.chunk_indices(), vec![1, 2]);
        assert_eq!(config.chunk_path(2), PathBuf::from("data").join("chunk_2.json"));
    }

    #[test]
    fn test_from_file_with_partial_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"source": "json", "data_dir": "/srv/games", "chunk_count": 3}}"#).unwrap();

        let config = DataConfig::from_file(file.path()).unwrap();
        assert_eq!(config.source, SourceKind::Json);
        assert_eq!(config.data_dir, PathBuf::from("/srv/games"));
        assert_eq!(config.chunk_indices(), vec![1, 2, 3]);
        assert_eq!(config.backend_base(), "http://localhost:5000");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = DataConfig { chunk_count: 0, ..DataConfig::default() };
        assert!(matches!(config.validate(), Err(DataError::Config(_))));

        let config = DataConfig { backend_url: "localhost:5000".to_string(), ..DataConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!("Backend".parse::<SourceKind>().unwrap(), SourceKind::Backend);
        assert_eq!("json".parse::<SourceKind>().unwrap(), SourceKind::Json);
        assert!("csv".parse::<SourceKind>().is_err());
    }
}

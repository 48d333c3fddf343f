//! Startup configuration: JSON config file plus command-line overrides.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::chart::units::UnitSystem;
use crate::data::loader::DataSource;
use crate::error::ConfigError;
use crate::state::theme::Theme;

pub const DEFAULT_DATA_SOURCE: &str =
    "https://fiskalloy.com/wp-admin/admin-ajax.php?action=fskdm_alloy_graph_data";
pub const DEFAULT_BRAND_URL: &str = "https://fiskalloy.com/";

#[derive(Parser, Debug, Default)]
#[command(name = "alloychart")]
#[command(about = "3D explorer for alloy tensile strength and conductivity", long_about = None)]
pub struct Cli {
    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Dataset URL or local JSON file (overrides the config)
    #[arg(short, long)]
    pub source: Option<String>,
    /// Start in metric units
    #[arg(long)]
    pub metric: bool,
}

/// Settings read from the config file. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub data_source: String,
    /// Opened when a data label is clicked.
    pub brand_url: String,
    pub unit_system: UnitSystem,
    pub labels_visible: bool,
    pub allow_zoom: bool,
    pub theme: Theme,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            brand_url: DEFAULT_BRAND_URL.to_string(),
            unit_system: UnitSystem::English,
            labels_visible: true,
            allow_zoom: false,
            theme: Theme::Light,
        }
    }
}

impl ChartConfig {
    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.data_source)
    }
}

pub fn load_config(path: &Path) -> Result<ChartConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Merge defaults, the optional config file and the command line, in that
/// order of increasing priority. A config file that cannot be read is
/// logged and skipped.
pub fn resolve(cli: &Cli) -> ChartConfig {
    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{e}; using defaults");
                ChartConfig::default()
            }
        },
        None => ChartConfig::default(),
    };

    if let Some(source) = &cli.source {
        config.data_source = source.clone();
    }
    if cli.metric {
        config.unit_system = UnitSystem::Metric;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("alloychart-{}-{name}.json", std::process::id()));
        std::fs::write(&path, body).expect("write temp config");
        path
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let path = temp_config("partial", r#"{"unit_system": "Metric", "allow_zoom": true}"#);
        let config = load_config(&path).expect("load");
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.unit_system, UnitSystem::Metric);
        assert!(config.allow_zoom);
        assert_eq!(config.data_source, DEFAULT_DATA_SOURCE);
        assert_eq!(config.brand_url, DEFAULT_BRAND_URL);
        assert!(config.labels_visible);
    }

    #[test]
    fn command_line_beats_config_file() {
        let path = temp_config(
            "override",
            r#"{"data_source": "https://example.com/a.json", "theme": "Dark"}"#,
        );
        let cli = Cli {
            config: Some(path.clone()),
            source: Some("local.json".into()),
            metric: true,
        };
        let config = resolve(&cli);
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.data_source(), DataSource::File(PathBuf::from("local.json")));
        assert_eq!(config.unit_system, UnitSystem::Metric);
        assert_eq!(config.theme, Theme::Dark);
    }

    #[test]
    fn unreadable_config_falls_back_to_defaults() {
        let cli = Cli {
            config: Some(PathBuf::from("/no/such/alloychart.json")),
            ..Default::default()
        };
        assert_eq!(resolve(&cli), ChartConfig::default());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let path = temp_config("bad", "{ not json");
        let result = load_config(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Json { .. })));
    }

    #[test]
    fn cli_flags_parse() {
        let cli = Cli::parse_from(["alloychart", "--source", "data.json", "--metric"]);
        assert_eq!(cli.source.as_deref(), Some("data.json"));
        assert!(cli.metric);
        assert!(cli.config.is_none());
    }
}

use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::data::dataset::{prepare_dataset, DataPoint};
use crate::error::{DatasetError, Result};

/// Where the dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` strings are URLs; anything else is a path.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        let lower = trimmed.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch and decode the dataset, then prepare it for the chart.
///
/// Blocking; the app calls this from a worker thread.
pub fn load_dataset(source: &DataSource) -> Result<Vec<DataPoint>> {
    let text = match source {
        DataSource::Url(url) => fetch_url(url)?,
        DataSource::File(path) => read_file(path)?,
    };
    let raw = parse_dataset(&text)?;
    let raw_count = raw.len();
    let prepared = prepare_dataset(raw);
    tracing::info!(
        "Loaded {raw_count} records from {source} ({} chart entries)",
        prepared.len()
    );
    Ok(prepared)
}

fn fetch_url(url: &str) -> Result<String> {
    let response = ureq::get(url).call().map_err(|e| DatasetError::Http {
        url: url.to_string(),
        source: Box::new(e),
    })?;
    response.into_string().map_err(|e| DatasetError::Io {
        origin: url.to_string(),
        source: e,
    })
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
        origin: path.display().to_string(),
        source: e,
    })
}

/// Decode the top-level JSON array into raw records.
pub fn parse_dataset(text: &str) -> Result<Vec<DataPoint>> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(_) => Err(DatasetError::NotAnArray("an object")),
        Value::String(_) => Err(DatasetError::NotAnArray("a string")),
        Value::Number(_) => Err(DatasetError::NotAnArray("a number")),
        Value::Bool(_) => Err(DatasetError::NotAnArray("a boolean")),
        Value::Null => Err(DatasetError::NotAnArray("null")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_kind_is_detected_from_scheme() {
        assert_eq!(
            DataSource::parse(" https://example.com/data.json "),
            DataSource::Url("https://example.com/data.json".to_string())
        );
        assert_eq!(
            DataSource::parse("HTTP://example.com"),
            DataSource::Url("HTTP://example.com".to_string())
        );
        assert_eq!(
            DataSource::parse("data/alloys.json"),
            DataSource::File(PathBuf::from("data/alloys.json"))
        );
    }

    #[test]
    fn parses_array_of_records() {
        let text = r#"[{"product_name": "A"}, {"product_name": "B", "formability": 2}]"#;
        let points = parse_dataset(text).expect("parse");
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].formability, 2);
    }

    #[test]
    fn rejects_non_array_and_bad_json() {
        assert!(matches!(
            parse_dataset(r#"{"data": []}"#),
            Err(DatasetError::NotAnArray("an object"))
        ));
        assert!(matches!(parse_dataset("not json"), Err(DatasetError::Json(_))));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let source = DataSource::File(PathBuf::from("/definitely/not/here/alloys.json"));
        assert!(matches!(load_dataset(&source), Err(DatasetError::Io { .. })));
    }

    #[test]
    fn loads_and_prepares_local_file() {
        let path = std::env::temp_dir().join(format!("alloychart-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r##"[{"type": ["Alloy Wire", "Fine Wire"], "color": ["#010101", "#020202"]}]"##,
        )
        .expect("write temp dataset");
        let points = load_dataset(&DataSource::File(path.clone())).expect("load");
        let _ = std::fs::remove_file(&path);
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].color, vec!["#020202"]);
    }
}

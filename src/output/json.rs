//! JSON trace output writer.
//!
//! Writes TraceDocument structs to JSON files with proper formatting.

use super::schema::TraceDocument;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a trace document to a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_trace(document: &TraceDocument, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing trace to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, document).map_err(OutputError::SerializationFailed)?;

    info!(
        "Trace written successfully ({} bytes, {} intervals)",
        calculate_file_size(output_path),
        document.intervals.len()
    );

    Ok(())
}

/// Serialize a trace document to a pretty-printed string
pub fn trace_to_string(document: &TraceDocument) -> Result<String, OutputError> {
    serde_json::to_string_pretty(document).map_err(OutputError::SerializationFailed)
}

/// Read a trace document back from a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_trace(input_path: impl AsRef<Path>) -> Result<TraceDocument, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading trace from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;

    let document: TraceDocument =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Trace loaded: version {}, root {}",
        document.version, document.root
    );

    Ok(document)
}

fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{IntervalAttributes, IntervalKind};
    use crate::output::schema::TraceInterval;
    use chrono::{TimeZone, Utc};
    use tempfile::NamedTempFile;

    fn create_test_document() -> TraceDocument {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        TraceDocument {
            version: "1.0.0".to_string(),
            source: "callgrind.out.build".to_string(),
            creator: Some("remake".to_string()),
            command: None,
            root: "build".to_string(),
            total_cost_ns: 9_000_000_000,
            function_count: 2,
            generated_at: "2024-01-01T00:00:00Z".to_string(),
            intervals: vec![TraceInterval {
                label: "build".to_string(),
                start,
                end: start + chrono::Duration::microseconds(100),
                duration_ns: 100_000,
                depth: 0,
                parent: None,
                kind: IntervalKind::Call,
                attributes: IntervalAttributes {
                    module: None,
                    invocation_count: 0,
                    creator: Some("remake".to_string()),
                    command: None,
                },
            }],
        }
    }

    #[test]
    fn test_write_and_read_trace() {
        let document = create_test_document();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_trace(&document, path).unwrap();
        let loaded = read_trace(path).unwrap();

        assert_eq!(loaded.version, document.version);
        assert_eq!(loaded.root, document.root);
        assert_eq!(loaded.intervals, document.intervals);
    }

    #[test]
    fn test_trace_to_string_skips_empty_fields() {
        let json = trace_to_string(&create_test_document()).unwrap();
        assert!(json.contains("\"kind\": \"call\""));
        assert!(!json.contains("\"command\""));
        assert!(!json.contains("\"parent\""));
    }

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/trace.json");

        write_trace(&create_test_document(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }
}

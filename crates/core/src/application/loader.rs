// Workload descriptor loading
//
// Format: one `<id> <duration_units>` record per line, whitespace separated.
// Blank lines and the `PID ...` header line are skipped. Any malformed record
// fails the whole load.

use crate::domain::{WorkloadDescriptor, WorkloadId};
use std::collections::HashSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// First token of the header line
pub const HEADER_TOKEN: &str = "PID";

/// Descriptor loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },

    #[error("Line {line}: invalid {field} {value:?} (expected a non-negative integer)")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Line {line}: unexpected trailing field {value:?}")]
    UnexpectedField { line: usize, value: String },

    #[error("Line {line}: duplicate workload id {id}")]
    DuplicateId { line: usize, id: WorkloadId },
}

/// Parse descriptors from in-memory text
pub fn parse_descriptors(input: &str) -> Result<Vec<WorkloadDescriptor>, LoadError> {
    read_descriptors(input.as_bytes(), Path::new("<memory>"))
}

/// Load descriptors from a file
pub fn load_descriptors(path: impl AsRef<Path>) -> Result<Vec<WorkloadDescriptor>, LoadError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let descriptors = read_descriptors(std::io::BufReader::new(file), path)?;
    info!(path = %path.display(), count = descriptors.len(), "Loaded workload descriptors");
    Ok(descriptors)
}

/// Read descriptors from any buffered reader; `origin` only labels IO errors
pub fn read_descriptors<R: BufRead>(
    reader: R,
    origin: &Path,
) -> Result<Vec<WorkloadDescriptor>, LoadError> {
    let mut descriptors = Vec::new();
    let mut seen = HashSet::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| LoadError::Io {
            path: origin.to_path_buf(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(HEADER_TOKEN) {
            debug!(line = line_no, "Skipping blank or header line");
            continue;
        }

        let descriptor = parse_record(trimmed, line_no)?;
        if !seen.insert(descriptor.id) {
            return Err(LoadError::DuplicateId {
                line: line_no,
                id: descriptor.id,
            });
        }
        descriptors.push(descriptor);
    }

    Ok(descriptors)
}

fn parse_record(record: &str, line: usize) -> Result<WorkloadDescriptor, LoadError> {
    let mut fields = record.split_whitespace();
    let id = parse_field(fields.next(), "id", line)?;
    let duration_units = parse_field(fields.next(), "duration", line)?;
    if let Some(extra) = fields.next() {
        return Err(LoadError::UnexpectedField {
            line,
            value: extra.to_string(),
        });
    }
    Ok(WorkloadDescriptor::new(id, duration_units))
}

fn parse_field(raw: Option<&str>, field: &'static str, line: usize) -> Result<u64, LoadError> {
    let raw = raw.ok_or(LoadError::MissingField { line, field })?;
    raw.parse().map_err(|_| LoadError::InvalidNumber {
        line,
        field,
        value: raw.to_string(),
    })
}

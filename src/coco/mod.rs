//! COCO-style output documents and their JSON IO.
//!
//! # Atomic Output
//!
//! A conversion either succeeds completely or leaves the output path
//! untouched: documents are serialized into a temporary file next to the
//! target and renamed over it only once serialization has finished.

mod ids;
mod model;
mod scalar;

pub use ids::{AnnotationId, CategoryId, ImageId, LabelValue};
pub use model::{
    AnnotationRecord, Categories, CategoryRecord, CocoDocument, ConversionOutput, FrameDocument,
    FrameImageRecord, ImageRecord, SequenceDocuments, TrackedBoxRecord, DOCUMENT_TYPE,
};
pub use scalar::Scalar;

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::ConvertError;

/// Writes `value` as JSON to `path`, replacing the file only on success.
///
/// # Errors
/// Returns an error if the temporary file cannot be created, serialization
/// fails, or the rename onto `path` fails. In every error case `path` is
/// left as it was.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), ConvertError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer(&mut writer, value).map_err(|source| ConvertError::OutputWrite {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush()?;
    }

    tmp.persist(path).map_err(|err| ConvertError::Io(err.error))?;
    Ok(())
}

/// Serializes a value to a compact JSON string.
///
/// Useful for testing without file I/O.
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Parses converter output from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<ConversionOutput, serde_json::Error> {
    serde_json::from_str(json)
}

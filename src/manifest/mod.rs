//! Labeling-job manifest reading.
//!
//! An output manifest is JSON Lines: one JSON object per labeled item. Only a
//! few keys are shared by every job type (`source-ref`); everything else lives
//! under keys derived from the job name:
//!
//! - `<job>`: bounding-box results (`image_size`, `annotations`)
//! - `<job>-metadata`: bounding-box metadata (`class-map`)
//! - `<job>-ref`: location of a label image or a sequence-label document
//! - `<job>-ref-metadata`: segmentation metadata (`internal-color-map`)
//!
//! Records are kept as raw JSON maps and decoded into the typed views in
//! [`records`] on demand, so each handler only validates what it reads.

pub mod records;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ConvertError;

pub use records::{
    BoxAnnotation, BoxJobMetadata, BoxJobResult, FrameLabel, ImageSize, SegmentationMetadata,
    SequenceLabels, TrackedObject,
};

/// Key holding the location of the original (unlabeled) image.
pub const SOURCE_REF: &str = "source-ref";

/// Key of the bounding-box result for `job_name`.
pub fn result_key(job_name: &str) -> String {
    job_name.to_string()
}

/// Key of the bounding-box metadata for `job_name`.
pub fn metadata_key(job_name: &str) -> String {
    format!("{job_name}-metadata")
}

/// Key of the label-file reference for `job_name`.
pub fn ref_key(job_name: &str) -> String {
    format!("{job_name}-ref")
}

/// Key of the label-file metadata for `job_name`.
pub fn ref_metadata_key(job_name: &str) -> String {
    format!("{job_name}-ref-metadata")
}

/// One manifest line.
#[derive(Clone, Debug, PartialEq)]
pub struct ManifestRecord {
    /// 1-based line number in the manifest.
    line: usize,
    fields: Map<String, Value>,
}

impl ManifestRecord {
    pub fn new(line: usize, fields: Map<String, Value>) -> Self {
        Self { line, fields }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Raw value under `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Decodes the value under `key`.
    ///
    /// # Errors
    /// [`ConvertError::MissingField`] if the key is absent,
    /// [`ConvertError::InvalidField`] if it does not have the expected shape.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConvertError> {
        let value = self.get(key).ok_or_else(|| ConvertError::MissingField {
            line: self.line,
            field: key.to_string(),
        })?;

        T::deserialize(value).map_err(|source| ConvertError::InvalidField {
            line: self.line,
            field: key.to_string(),
            source,
        })
    }

    /// The `source-ref` of the record.
    pub fn source_ref(&self) -> Result<String, ConvertError> {
        self.field(SOURCE_REF)
    }
}

/// Parses JSON Lines manifest content. Blank lines are skipped.
///
/// # Errors
/// [`ConvertError::ManifestParse`] with the 1-based line number when a line
/// is not a JSON object.
pub fn read_manifest(bytes: &[u8]) -> Result<Vec<ManifestRecord>, ConvertError> {
    let mut records = Vec::new();

    for (idx, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        let line = idx + 1;
        if raw.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let fields: Map<String, Value> = serde_json::from_slice(raw)
            .map_err(|source| ConvertError::ManifestParse { line, source })?;
        records.push(ManifestRecord::new(line, fields));
    }

    Ok(records)
}

/// Parses a sequence-label document (`{"tracking-annotations": [...]}`).
///
/// `location` is only used in error messages.
pub fn read_sequence_labels(bytes: &[u8], location: &str) -> Result<SequenceLabels, ConvertError> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let labels = SequenceLabels::deserialize(&mut de)
        .and_then(|labels| de.end().map(|()| labels))
        .map_err(|source| ConvertError::SequenceParse {
            location: location.to_string(),
            source,
        })?;
    Ok(labels)
}

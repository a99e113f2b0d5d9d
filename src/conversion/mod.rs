//! Job-level conversion.
//!
//! [`convert_job`] is the full pipeline: describe the job, check that it has
//! finished, pick the handler from its task keywords and convert its output
//! manifest. [`convert_manifest`] skips the job lookup when the task and the
//! manifest location are already known.

pub mod report;

pub use report::{
    ConversionCounts, ConversionIssue, ConversionIssueCode, ConversionReport, ConversionSeverity,
};

use std::path::Path;

use tracing::info;

use crate::coco::write_json_atomic;
use crate::config::ConvertConfig;
use crate::error::ConvertError;
use crate::handlers::{Conversion, TaskType};
use crate::source::{JobSource, ObjectSource};

/// Converts the output manifest of a finished labeling job.
///
/// # Errors
/// - [`ConvertError::JobNotCompleted`] if the job status is not `Completed`.
/// - [`ConvertError::UnsupportedTask`] if the task keywords select no handler.
/// - [`ConvertError::MissingManifestLocation`] if the job has no output.
///
/// All three are checked before the manifest is read. Any handler error is
/// returned as is.
pub fn convert_job(
    job_name: &str,
    jobs: &dyn JobSource,
    objects: &dyn ObjectSource,
    config: &ConvertConfig,
) -> Result<Conversion, ConvertError> {
    let job = jobs.describe_job(job_name)?;

    if !job.is_completed() {
        return Err(ConvertError::JobNotCompleted {
            state: job.labeling_job_status.clone(),
        });
    }

    let task = TaskType::from_keywords(job.task_keywords())?;
    let manifest_location =
        job.manifest_location()
            .ok_or_else(|| ConvertError::MissingManifestLocation {
                job_name: job_name.to_string(),
            })?;

    info!(job = job_name, %task, manifest = manifest_location, "selected handler");
    task.convert(manifest_location, job_name, objects, config)
}

/// Converts a manifest with an explicitly chosen handler.
pub fn convert_manifest(
    task: TaskType,
    manifest_location: &str,
    job_name: &str,
    objects: &dyn ObjectSource,
    config: &ConvertConfig,
) -> Result<Conversion, ConvertError> {
    info!(job = job_name, %task, manifest = manifest_location, "converting manifest");
    task.convert(manifest_location, job_name, objects, config)
}

/// Writes the conversion output to `path` atomically.
pub fn write_output(path: &Path, conversion: &Conversion) -> Result<(), ConvertError> {
    write_json_atomic(path, &conversion.output)?;
    info!(path = %path.display(), "wrote output");
    Ok(())
}

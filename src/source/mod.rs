//! Where job descriptions and bytes come from.
//!
//! The converter never talks to a labeling service or object store directly.
//! It asks a [`JobSource`] for the job description and an [`ObjectSource`]
//! for manifest, label-image and sequence-label bytes. The local adapters in
//! [`local`] serve both from the filesystem, mirroring `s3://bucket/key`
//! locations under a storage root; [`memory`] serves objects already held in
//! memory.

pub mod job;
pub mod local;
pub mod memory;

pub use job::{HumanTaskConfig, JobDescription, LabelingJobOutput, COMPLETED};
pub use local::{LocalJobSource, LocalObjectSource};
pub use memory::MemoryObjectSource;

use crate::error::ConvertError;

/// Scheme prefix of object-store locations.
pub const S3_SCHEME: &str = "s3://";

/// Provides labeling-job descriptions by name.
pub trait JobSource {
    fn describe_job(&self, job_name: &str) -> Result<JobDescription, ConvertError>;
}

/// Provides the bytes stored at a location.
pub trait ObjectSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, ConvertError>;
}

/// Splits `s3://bucket/key` into `(bucket, key)`.
///
/// # Errors
/// [`ConvertError::InvalidStorageUri`] if the scheme is not `s3://` or the
/// bucket or key is empty.
pub fn split_s3_uri(uri: &str) -> Result<(&str, &str), ConvertError> {
    let invalid = || ConvertError::InvalidStorageUri {
        uri: uri.to_string(),
    };

    let rest = uri.strip_prefix(S3_SCHEME).ok_or_else(invalid)?;
    let (bucket, key) = rest.split_once('/').ok_or_else(invalid)?;
    if bucket.is_empty() || key.is_empty() {
        return Err(invalid());
    }
    Ok((bucket, key))
}

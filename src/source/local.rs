//! Filesystem-backed sources.

use std::fs;
use std::path::{Path, PathBuf};

use super::{split_s3_uri, JobDescription, JobSource, ObjectSource, S3_SCHEME};
use crate::error::ConvertError;

/// Reads job descriptions from `<jobs_dir>/<job_name>.json`.
#[derive(Clone, Debug)]
pub struct LocalJobSource {
    jobs_dir: PathBuf,
}

impl LocalJobSource {
    pub fn new(jobs_dir: impl Into<PathBuf>) -> Self {
        Self {
            jobs_dir: jobs_dir.into(),
        }
    }

    pub fn path_for(&self, job_name: &str) -> PathBuf {
        self.jobs_dir.join(format!("{job_name}.json"))
    }
}

impl JobSource for LocalJobSource {
    fn describe_job(&self, job_name: &str) -> Result<JobDescription, ConvertError> {
        let path = self.path_for(job_name);
        let bytes = fs::read(&path).map_err(|source| ConvertError::Fetch {
            location: path.display().to_string(),
            source,
        })?;

        serde_json::from_slice(&bytes)
            .map_err(|source| ConvertError::JobDescriptionParse { path, source })
    }
}

/// Serves object-store locations from a local mirror.
///
/// `s3://bucket/key` resolves to `<storage_root>/bucket/key`; any other
/// location is taken as a filesystem path.
#[derive(Clone, Debug)]
pub struct LocalObjectSource {
    storage_root: PathBuf,
}

impl LocalObjectSource {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
        }
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    /// Filesystem path for `location`.
    pub fn resolve(&self, location: &str) -> Result<PathBuf, ConvertError> {
        if location.starts_with(S3_SCHEME) {
            let (bucket, key) = split_s3_uri(location)?;
            let mut path = self.storage_root.join(bucket);
            path.extend(key.split('/').filter(|part| !part.is_empty()));
            Ok(path)
        } else {
            Ok(PathBuf::from(location))
        }
    }
}

impl ObjectSource for LocalObjectSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, ConvertError> {
        let path = self.resolve(location)?;
        tracing::trace!(location, path = %path.display(), "fetching object");
        fs::read(&path).map_err(|source| ConvertError::Fetch {
            location: location.to_string(),
            source,
        })
    }
}

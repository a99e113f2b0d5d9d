//! Manifest handlers, one per labeling task.
//!
//! Each handler walks a manifest in file order and assembles the output
//! document(s). They differ in where geometry comes from:
//!
//! | Task | Geometry | Image ids | Annotation ids |
//! |------|----------|-----------|----------------|
//! | [`BoundingBoxConverter`] | box fields | record order | per box, manifest-wide |
//! | [`SegmentationConverter`] | traced label-image masks | record order | per mask, manifest-wide |
//! | [`VideoTrackingConverter`] | sequence-label boxes | frame number | object id from the labels |

pub mod bbox;
pub mod segmentation;
pub mod video;

pub use bbox::BoundingBoxConverter;
pub use segmentation::SegmentationConverter;
pub use video::VideoTrackingConverter;

use std::fmt;

use crate::coco::ConversionOutput;
use crate::config::ConvertConfig;
use crate::conversion::ConversionReport;
use crate::error::ConvertError;
use crate::manifest::{read_manifest, ManifestRecord};
use crate::source::ObjectSource;

/// Task keyword marking image jobs.
pub const KEYWORD_IMAGES: &str = "Images";
/// Task keyword marking video jobs.
pub const KEYWORD_VIDEO: &str = "Video";
pub const KEYWORD_BOUNDING_BOXES: &str = "bounding boxes";
pub const KEYWORD_SEGMENTATION: &str = "image segmentation";
pub const KEYWORD_TRACKING: &str = "tracking";

/// The output of one handler run.
#[derive(Clone, Debug)]
pub struct Conversion {
    pub output: ConversionOutput,
    pub report: ConversionReport,
}

/// Converts a labeling-job output manifest.
pub trait Converter {
    /// Reads the manifest at `manifest_location` through `objects` and
    /// converts every record. `job_name` selects the per-job manifest keys.
    ///
    /// # Errors
    /// The first failing record aborts the whole conversion.
    fn convert_job(
        &self,
        manifest_location: &str,
        job_name: &str,
        objects: &dyn ObjectSource,
    ) -> Result<Conversion, ConvertError>;
}

/// The labeling tasks the converter supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskType {
    BoundingBox,
    Segmentation,
    VideoTracking,
}

impl TaskType {
    /// Selects the task from a job's task keywords.
    ///
    /// Bounding boxes win over segmentation when a job lists both.
    ///
    /// # Errors
    /// [`ConvertError::UnsupportedTask`] if the keywords name neither an image
    /// nor a video job, or no supported task.
    pub fn from_keywords<S: AsRef<str>>(keywords: &[S]) -> Result<Self, ConvertError> {
        let has = |wanted: &str| keywords.iter().any(|k| k.as_ref() == wanted);
        let unsupported = || ConvertError::UnsupportedTask {
            keywords: keywords.iter().map(|k| k.as_ref().to_string()).collect(),
        };

        if !has(KEYWORD_IMAGES) && !has(KEYWORD_VIDEO) {
            return Err(unsupported());
        }

        if has(KEYWORD_BOUNDING_BOXES) {
            Ok(TaskType::BoundingBox)
        } else if has(KEYWORD_SEGMENTATION) {
            Ok(TaskType::Segmentation)
        } else if has(KEYWORD_VIDEO) && has(KEYWORD_TRACKING) {
            Ok(TaskType::VideoTracking)
        } else {
            Err(unsupported())
        }
    }

    /// Short name used in reports and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            TaskType::BoundingBox => "bbox",
            TaskType::Segmentation => "segmentation",
            TaskType::VideoTracking => "video-tracking",
        }
    }

    /// Runs the handler for this task.
    pub fn convert(
        self,
        manifest_location: &str,
        job_name: &str,
        objects: &dyn ObjectSource,
        config: &ConvertConfig,
    ) -> Result<Conversion, ConvertError> {
        match self {
            TaskType::BoundingBox => {
                BoundingBoxConverter.convert_job(manifest_location, job_name, objects)
            }
            TaskType::Segmentation => SegmentationConverter::new(*config).convert_job(
                manifest_location,
                job_name,
                objects,
            ),
            TaskType::VideoTracking => {
                VideoTrackingConverter.convert_job(manifest_location, job_name, objects)
            }
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fetches and parses a manifest.
fn load_manifest(
    objects: &dyn ObjectSource,
    manifest_location: &str,
) -> Result<Vec<ManifestRecord>, ConvertError> {
    let bytes = objects.fetch(manifest_location)?;
    read_manifest(&bytes)
}

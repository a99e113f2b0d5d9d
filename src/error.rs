use std::path::PathBuf;
use thiserror::Error;

use crate::coco::{CategoryId, ImageId};
use crate::color::Rgb;

/// The main error type for gt2coco operations.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to fetch {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage URI '{uri}' (expected s3://bucket/key)")]
    InvalidStorageUri { uri: String },

    #[error("Failed to decode image {location}: {source}")]
    ImageDecode {
        location: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to parse manifest line {line}: {source}")]
    ManifestParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Manifest line {line} is missing field '{field}'")]
    MissingField { line: usize, field: String },

    #[error("Manifest line {line} has an invalid '{field}' field: {source}")]
    InvalidField {
        line: usize,
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse sequence labels from {location}: {source}")]
    SequenceParse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse job description from {path}: {source}")]
    JobDescriptionParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write output to {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize conversion report: {0}")]
    ReportSerialize(#[source] serde_json::Error),

    #[error("Background color {color} does not appear in any label legend")]
    MissingBackground { color: Rgb },

    #[error("Invalid hex color '{value}'")]
    InvalidColor { value: String },

    #[error("Unsupported labeling task {keywords:?} (supported: bounding boxes, image segmentation, video tracking)")]
    UnsupportedTask { keywords: Vec<String> },

    #[error("Job is not in `Completed` state. Currently: {state}")]
    JobNotCompleted { state: String },

    #[error("Job '{job_name}' has no output manifest location")]
    MissingManifestLocation { job_name: String },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Failures while turning a mask into polygons.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("mask for category {category_id} in image {image_id} produced no contours")]
    EmptyContours {
        image_id: ImageId,
        category_id: CategoryId,
    },
}

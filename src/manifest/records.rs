//! Typed views over manifest and sequence-label JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::ColorLegend;
use crate::coco::{LabelValue, Scalar};

/// Bounding-box job result stored under `<job>`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxJobResult {
    /// One entry per image; only the first is used.
    pub image_size: Vec<ImageSize>,
    #[serde(default)]
    pub annotations: Vec<BoxAnnotation>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

/// One box of a bounding-box job, in pixels, as written by the labeling tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxAnnotation {
    pub class_id: u64,
    pub left: Scalar,
    pub top: Scalar,
    pub width: Scalar,
    pub height: Scalar,
}

/// Bounding-box job metadata stored under `<job>-metadata`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxJobMetadata {
    /// Class id (as a string) → class name.
    #[serde(rename = "class-map", default)]
    pub class_map: IndexMap<String, String>,
}

/// Segmentation job metadata stored under `<job>-ref-metadata`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentationMetadata {
    #[serde(rename = "internal-color-map")]
    pub internal_color_map: ColorLegend,
}

/// A video sequence-label document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceLabels {
    #[serde(rename = "tracking-annotations")]
    pub frames: Vec<FrameLabel>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameLabel {
    #[serde(rename = "frame-no")]
    pub frame_no: u64,
    /// Frame image file name.
    pub frame: String,
    #[serde(default)]
    pub annotations: Vec<TrackedObject>,
}

/// One tracked box in one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    #[serde(rename = "class-id")]
    pub class_id: LabelValue,
    #[serde(rename = "object-id")]
    pub object_id: LabelValue,
    /// `<label>:<instance>`, e.g. `car:3`.
    #[serde(rename = "object-name")]
    pub object_name: String,
    pub left: Scalar,
    pub top: Scalar,
    pub width: Scalar,
    pub height: Scalar,
}

impl TrackedObject {
    /// The object name up to its first `:`.
    pub fn label(&self) -> &str {
        self.object_name
            .split_once(':')
            .map_or(self.object_name.as_str(), |(label, _)| label)
    }
}

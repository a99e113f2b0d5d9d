//! Output document model.
//!
//! These types mirror the JSON written by the converter: one
//! `{"type": "instances", "images", "categories", "annotations"}` document
//! for image jobs, and a `"sequence-<n>"` → per-frame documents map for video
//! tracking jobs. Field order follows the emitted JSON.

use std::ops::Mul;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ids::{AnnotationId, CategoryId, ImageId, LabelValue};
use super::scalar::Scalar;
use crate::color::Rgb;

/// Value of the top-level `type` field.
pub const DOCUMENT_TYPE: &str = "instances";

/// A COCO-style annotation document.
///
/// Annotation and image types are generic so video frames can carry ids and
/// box extents copied from the label file instead of generated ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CocoDocument<A = AnnotationRecord, I = ImageRecord> {
    #[serde(rename = "type")]
    pub kind: String,

    pub images: Vec<I>,

    pub categories: Categories,

    pub annotations: Vec<A>,
}

impl<A, I> CocoDocument<A, I> {
    /// Creates an `instances` document.
    pub fn new(images: Vec<I>, categories: Categories, annotations: Vec<A>) -> Self {
        Self {
            kind: DOCUMENT_TYPE.to_string(),
            images,
            categories,
            annotations,
        }
    }
}

/// One image (or video frame) entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub file_name: String,
    pub height: u32,
    pub width: u32,
    pub id: ImageId,
}

impl ImageRecord {
    pub fn new(id: impl Into<ImageId>, file_name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            file_name: file_name.into(),
            height,
            width,
            id: id.into(),
        }
    }
}

/// A video frame entry; `width` and `height` are the extents of the box the
/// entry was made for, as written in the label file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameImageRecord {
    pub file_name: String,
    pub height: Scalar,
    pub width: Scalar,
    pub id: ImageId,
}

/// An annotation produced by the converter, with generated ids.
///
/// Bounding-box annotations have no segmentation; the field is omitted from
/// the JSON when empty. Traced polygons are measured in `f64`; the written
/// form uses [`Scalar`] so boxes copied from a manifest keep their integers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord<N = Scalar> {
    /// One flattened `[x0, y0, x1, y1, ...]` ring per traced boundary.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segmentation: Vec<Vec<f64>>,

    pub iscrowd: u8,

    pub image_id: ImageId,

    pub category_id: CategoryId,

    pub id: AnnotationId,

    /// `[x, y, width, height]` with `(x, y)` the top-left corner.
    pub bbox: [N; 4],

    pub area: N,
}

impl<N: Copy + Mul<Output = N>> AnnotationRecord<N> {
    /// Creates a box-only annotation whose area is the box area.
    pub fn from_box(
        id: AnnotationId,
        image_id: ImageId,
        category_id: CategoryId,
        bbox: [N; 4],
    ) -> Self {
        Self {
            segmentation: Vec::new(),
            iscrowd: 0,
            image_id,
            category_id,
            id,
            bbox,
            area: bbox[2] * bbox[3],
        }
    }
}

impl From<AnnotationRecord<f64>> for AnnotationRecord<Scalar> {
    fn from(record: AnnotationRecord<f64>) -> Self {
        Self {
            segmentation: record.segmentation,
            iscrowd: record.iscrowd,
            image_id: record.image_id,
            category_id: record.category_id,
            id: record.id,
            bbox: record.bbox.map(Scalar::Float),
            area: Scalar::Float(record.area),
        }
    }
}

/// A video-tracking box whose ids come straight from the sequence label file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedBoxRecord {
    pub iscrowd: u8,
    pub image_id: ImageId,
    pub category_id: LabelValue,
    pub id: LabelValue,
    pub bbox: [Scalar; 4],
    pub area: Scalar,
}

/// The `categories` field, whose shape depends on the job type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Categories {
    /// A list of category records (segmentation and video tracking jobs).
    Records(Vec<CategoryRecord>),
    /// Class id → class name, merged from bounding-box job class maps.
    ClassMap(IndexMap<String, String>),
}

impl Categories {
    /// Number of entries, whatever the shape.
    pub fn len(&self) -> usize {
        match self {
            Categories::Records(records) => records.len(),
            Categories::ClassMap(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single category entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supercategory: Option<String>,

    pub id: LabelValue,

    pub name: String,

    /// Label color, for categories derived from a segmentation legend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

/// A per-frame document of a tracked video sequence.
pub type FrameDocument = CocoDocument<TrackedBoxRecord, FrameImageRecord>;

/// Sequence key (`sequence-1`, `sequence-2`, ...) → per-frame documents.
pub type SequenceDocuments = IndexMap<String, Vec<FrameDocument>>;

/// Whatever a conversion produces, ready to be serialized as one JSON value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversionOutput {
    Instances(CocoDocument),
    Sequences(SequenceDocuments),
}

impl From<u64> for ImageId {
    fn from(id: u64) -> Self {
        ImageId::new(id)
    }
}

impl From<u64> for CategoryId {
    fn from(id: u64) -> Self {
        CategoryId::new(id)
    }
}

impl From<u64> for AnnotationId {
    fn from(id: u64) -> Self {
        AnnotationId::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_annotation_area_is_width_times_height() {
        let ann = AnnotationRecord::from_box(
            AnnotationId(0),
            ImageId(0),
            CategoryId(1),
            [10.0, 20.0, 30.0, 4.0],
        );
        assert_eq!(ann.area, 120.0);
        assert!(ann.segmentation.is_empty());
    }

    #[test]
    fn document_serializes_type_first_and_omits_empty_segmentation() {
        let doc = CocoDocument::new(
            vec![ImageRecord::new(0u64, "a.jpg", 640, 480)],
            Categories::ClassMap(IndexMap::from([("0".to_string(), "cat".to_string())])),
            vec![AnnotationRecord::from_box(
                AnnotationId(0),
                ImageId(0),
                CategoryId(0),
                [1.0, 2.0, 3.0, 4.0],
            )],
        );

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.starts_with(r#"{"type":"instances","images":"#));
        assert!(!json.contains("segmentation"));
        assert!(json.contains(r#""categories":{"0":"cat"}"#));
    }

    #[test]
    fn manifest_integers_stay_integers_and_traced_values_stay_floats() {
        let boxed = AnnotationRecord::from_box(
            AnnotationId(0),
            ImageId(0),
            CategoryId(0),
            [Scalar::Int(1), Scalar::Int(5), Scalar::Int(10), Scalar::Int(20)],
        );
        let json = serde_json::to_string(&boxed).unwrap();
        assert!(json.ends_with(r#""bbox":[1,5,10,20],"area":200}"#), "{json}");

        let traced: AnnotationRecord = AnnotationRecord::from_box(
            AnnotationId(1),
            ImageId(0),
            CategoryId(0),
            [0.0, 0.0, 2.0, 2.0],
        )
        .into();
        let json = serde_json::to_string(&traced).unwrap();
        assert!(json.ends_with(r#""bbox":[0.0,0.0,2.0,2.0],"area":4.0}"#), "{json}");
    }

    #[test]
    fn frame_images_keep_fractional_box_extents() {
        let image = FrameImageRecord {
            file_name: "f.jpg".into(),
            height: Scalar::Float(20.6),
            width: Scalar::Float(10.4),
            id: ImageId(0),
        };
        assert_eq!(
            serde_json::to_string(&image).unwrap(),
            r#"{"file_name":"f.jpg","height":20.6,"width":10.4,"id":0}"#
        );
    }

    #[test]
    fn categories_shape_is_detected_on_parse() {
        let map: Categories = serde_json::from_str(r#"{"1": "dog"}"#).unwrap();
        assert!(matches!(map, Categories::ClassMap(_)));

        let records: Categories =
            serde_json::from_str(r##"[{"id": 0, "name": "cat", "color": "#2ca02c"}]"##).unwrap();
        match records {
            Categories::Records(records) => {
                assert_eq!(records[0].color, Some(Rgb::new(44, 160, 44)));
                assert_eq!(records[0].id, LabelValue::Number(0));
            }
            other => panic!("expected records, got {other:?}"),
        }
    }

    #[test]
    fn sequences_parse_as_sequence_output() {
        let json = r#"{"sequence-1": [{"type": "instances", "images": [], "categories": [], "annotations": []}]}"#;
        let output: ConversionOutput = serde_json::from_str(json).unwrap();
        match output {
            ConversionOutput::Sequences(seqs) => assert_eq!(seqs["sequence-1"].len(), 1),
            other => panic!("expected sequences, got {other:?}"),
        }
    }
}

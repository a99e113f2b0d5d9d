//! Video object-tracking jobs.
//!
//! Every manifest record points at one sequence-label document. Each sequence
//! becomes a `sequence-<n>` entry (n counts records from 1) holding one
//! document per frame. Within a frame, image ids are the frame number and
//! annotation and category ids are copied from the labels (`object-id`,
//! `class-id`), so they are only unique within what the labeling tool made
//! unique.
//!
//! The category list grows with every box of the sequence and is not
//! deduplicated; each frame document carries the list as it stood after that
//! frame.

use std::collections::HashSet;

use tracing::{debug, info};

use super::{load_manifest, Conversion, Converter, TaskType};
use crate::coco::{
    Categories, CategoryRecord, ConversionOutput, FrameDocument, FrameImageRecord, ImageId,
    SequenceDocuments, TrackedBoxRecord,
};
use crate::conversion::{ConversionIssue, ConversionIssueCode, ConversionReport};
use crate::error::ConvertError;
use crate::manifest::{read_sequence_labels, ref_key, FrameLabel, TrackedObject};
use crate::source::ObjectSource;

/// Converts video object-tracking job manifests.
#[derive(Clone, Copy, Debug, Default)]
pub struct VideoTrackingConverter;

impl Converter for VideoTrackingConverter {
    fn convert_job(
        &self,
        manifest_location: &str,
        job_name: &str,
        objects: &dyn ObjectSource,
    ) -> Result<Conversion, ConvertError> {
        let records = load_manifest(objects, manifest_location)?;
        info!(job = job_name, records = records.len(), "converting video-tracking manifest");

        let ref_key = ref_key(job_name);
        let mut report = ConversionReport::new(TaskType::VideoTracking.name());
        let mut sequences = SequenceDocuments::new();

        for (index, record) in records.iter().enumerate() {
            let sequence_key = format!("sequence-{}", index + 1);
            let location: String = record.field(&ref_key)?;
            let labels = read_sequence_labels(&objects.fetch(&location)?, &location)?;
            info!(sequence = %sequence_key, frames = labels.frames.len(), "converting sequence");

            let mut categories: Vec<CategoryRecord> = Vec::new();
            let mut frames = Vec::with_capacity(labels.frames.len());

            for frame in &labels.frames {
                if frame.annotations.is_empty() {
                    report.add(ConversionIssue::info(
                        ConversionIssueCode::EmptyFrame,
                        format!("{sequence_key} frame {} has no boxes", frame.frame_no),
                    ));
                }

                let document = convert_frame(frame, &mut categories);
                report.counts.images += document.images.len();
                report.counts.annotations += document.annotations.len();
                frames.push(document);
            }

            let distinct: HashSet<_> = categories.iter().map(|c| &c.id).collect();
            if distinct.len() < categories.len() {
                report.add(ConversionIssue::info(
                    ConversionIssueCode::DuplicateTrackCategories,
                    format!(
                        "{sequence_key}: {} category entries for {} distinct object ids",
                        categories.len(),
                        distinct.len()
                    ),
                ));
            }

            report.counts.categories += categories.len();
            report.counts.frames += frames.len();
            sequences.insert(sequence_key, frames);
        }

        report.counts.records = records.len();
        report.counts.sequences = sequences.len();

        Ok(Conversion {
            output: ConversionOutput::Sequences(sequences),
            report,
        })
    }
}

/// Builds one frame document, appending the frame's boxes to the sequence
/// category list.
fn convert_frame(frame: &FrameLabel, categories: &mut Vec<CategoryRecord>) -> FrameDocument {
    let image_id = ImageId::new(frame.frame_no);
    let mut images = Vec::with_capacity(frame.annotations.len());
    let mut annotations = Vec::with_capacity(frame.annotations.len());

    for object in &frame.annotations {
        images.push(FrameImageRecord {
            file_name: frame.frame.clone(),
            height: object.height,
            width: object.width,
            id: image_id,
        });
        annotations.push(tracked_box(object, image_id));
        categories.push(CategoryRecord {
            supercategory: Some(object.label().to_string()),
            id: object.object_id.clone(),
            name: object.object_name.clone(),
            color: None,
        });
    }

    debug!(frame = frame.frame_no, boxes = annotations.len(), "frame");
    FrameDocument::new(images, Categories::Records(categories.clone()), annotations)
}

fn tracked_box(object: &TrackedObject, image_id: ImageId) -> TrackedBoxRecord {
    TrackedBoxRecord {
        iscrowd: 0,
        image_id,
        category_id: object.class_id.clone(),
        id: object.object_id.clone(),
        bbox: [object.left, object.top, object.width, object.height],
        area: object.width * object.height,
    }
}

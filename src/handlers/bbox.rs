//! Bounding-box jobs: boxes map straight to annotations.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::{load_manifest, Conversion, Converter, TaskType};
use crate::coco::{
    AnnotationId, AnnotationRecord, Categories, CategoryId, CocoDocument, ConversionOutput,
    ImageId, ImageRecord,
};
use crate::conversion::{ConversionIssue, ConversionIssueCode, ConversionReport};
use crate::error::ConvertError;
use crate::manifest::{metadata_key, result_key, BoxJobMetadata, BoxJobResult};
use crate::source::ObjectSource;

/// Converts bounding-box job manifests.
///
/// Categories are the union of every record's `class-map`, keyed by class id.
/// A later record's name for an id replaces an earlier one.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundingBoxConverter;

impl Converter for BoundingBoxConverter {
    fn convert_job(
        &self,
        manifest_location: &str,
        job_name: &str,
        objects: &dyn ObjectSource,
    ) -> Result<Conversion, ConvertError> {
        let records = load_manifest(objects, manifest_location)?;
        info!(job = job_name, records = records.len(), "converting bounding-box manifest");

        let result_key = result_key(job_name);
        let metadata_key = metadata_key(job_name);
        let mut report = ConversionReport::new(TaskType::BoundingBox.name());

        let mut images = Vec::with_capacity(records.len());
        let mut annotations: Vec<AnnotationRecord> = Vec::new();
        let mut class_map: IndexMap<String, String> = IndexMap::new();
        let mut image_id = ImageId::new(0);
        let mut annotation_id = AnnotationId::new(0);

        for record in &records {
            let result: BoxJobResult = record.field(&result_key)?;
            let size = result
                .image_size
                .first()
                .ok_or_else(|| ConvertError::MissingField {
                    line: record.line(),
                    field: format!("{result_key}.image_size"),
                })?;

            images.push(ImageRecord::new(
                image_id,
                record.source_ref()?,
                size.width,
                size.height,
            ));
            debug!(
                line = record.line(),
                image_id = image_id.as_u64(),
                boxes = result.annotations.len(),
                "record"
            );

            if !result.annotations.is_empty() {
                let metadata: BoxJobMetadata = record.field(&metadata_key)?;
                for bbox in &result.annotations {
                    annotations.push(AnnotationRecord::from_box(
                        annotation_id,
                        image_id,
                        CategoryId::new(bbox.class_id),
                        [bbox.left, bbox.top, bbox.width, bbox.height],
                    ));
                    annotation_id = annotation_id.next();
                    merge_class_map(&mut class_map, &metadata.class_map, &mut report);
                }
            }

            image_id = image_id.next();
        }

        report.counts.records = records.len();
        report.counts.images = images.len();
        report.counts.categories = class_map.len();
        report.counts.annotations = annotations.len();

        let document = CocoDocument::new(images, Categories::ClassMap(class_map), annotations);
        Ok(Conversion {
            output: ConversionOutput::Instances(document),
            report,
        })
    }
}

/// Merges `incoming` into `class_map`; last write wins, first insertion
/// keeps its position.
fn merge_class_map(
    class_map: &mut IndexMap<String, String>,
    incoming: &IndexMap<String, String>,
    report: &mut ConversionReport,
) {
    for (class_id, name) in incoming {
        if let Some(previous) = class_map.insert(class_id.clone(), name.clone()) {
            if previous != *name {
                warn!(class_id = %class_id, %previous, %name, "class name overwritten");
                report.add(ConversionIssue::warning(
                    ConversionIssueCode::ClassMapOverwrite,
                    format!("class {class_id}: '{previous}' replaced by '{name}'"),
                ));
            }
        }
    }
}

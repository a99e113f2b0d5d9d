//! Semantic-segmentation jobs: label images are traced into polygons.
//!
//! The manifest is read twice. The first pass collects every record's color
//! legend into one catalog so that category ids are known before any image
//! is decoded; the second pass fetches, decodes and annotates each label
//! image in manifest order.

use tracing::{debug, info, warn};

use super::{load_manifest, Conversion, Converter, TaskType};
use crate::annotate::annotate_image;
use crate::catalog::{CategoryColorMap, ColorLegend};
use crate::coco::{
    AnnotationId, AnnotationRecord, Categories, CocoDocument, ConversionOutput, ImageId, ImageRecord,
};
use crate::config::ConvertConfig;
use crate::conversion::{ConversionIssue, ConversionIssueCode, ConversionReport};
use crate::error::ConvertError;
use crate::manifest::{ref_key, ref_metadata_key, ManifestRecord, SegmentationMetadata};
use crate::raster::{decode_rgb, record_dimensions};
use crate::source::ObjectSource;

/// Converts semantic-segmentation job manifests.
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentationConverter {
    config: ConvertConfig,
}

impl SegmentationConverter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    /// Builds the color catalog from the legends of every record.
    pub fn build_catalog(
        &self,
        records: &[ManifestRecord],
        job_name: &str,
    ) -> Result<CategoryColorMap, ConvertError> {
        let key = ref_metadata_key(job_name);
        let legends = records
            .iter()
            .map(|record| {
                record
                    .field::<SegmentationMetadata>(&key)
                    .map(|meta| meta.internal_color_map)
            })
            .collect::<Result<Vec<ColorLegend>, _>>()?;

        CategoryColorMap::build(&legends, self.config.background)
    }
}

impl Converter for SegmentationConverter {
    fn convert_job(
        &self,
        manifest_location: &str,
        job_name: &str,
        objects: &dyn ObjectSource,
    ) -> Result<Conversion, ConvertError> {
        let records = load_manifest(objects, manifest_location)?;
        info!(job = job_name, records = records.len(), "converting segmentation manifest");

        let catalog = self.build_catalog(&records, job_name)?;
        info!(
            categories = catalog.len(),
            background = %catalog.background(),
            "built color catalog"
        );

        let ref_key = ref_key(job_name);
        let mut report = ConversionReport::new(TaskType::Segmentation.name());
        let mut images = Vec::with_capacity(records.len());
        let mut annotations: Vec<AnnotationRecord> = Vec::new();
        let mut image_id = ImageId::new(0);
        let mut annotation_id = AnnotationId::new(0);

        for record in &records {
            let location: String = record.field(&ref_key)?;
            let bytes = objects.fetch(&location)?;
            let raster = decode_rgb(&bytes, &location)?;

            let annotated = annotate_image(&raster, image_id, &catalog, annotation_id)?;
            annotation_id = annotated.next_annotation_id;
            debug!(
                line = record.line(),
                image_id = image_id.as_u64(),
                annotations = annotated.annotations.len(),
                "annotated label image"
            );

            if annotated.unmatched_pixels > 0 {
                report.add(ConversionIssue::info(
                    ConversionIssueCode::UnmatchedPixels,
                    format!(
                        "image {image_id}: {} pixel(s) match no legend color",
                        annotated.unmatched_pixels
                    ),
                ));
            }
            if annotated.degenerate_rings > 0 {
                warn!(
                    image_id = image_id.as_u64(),
                    rings = annotated.degenerate_rings,
                    "zero-area polygon rings"
                );
                report.add(ConversionIssue::warning(
                    ConversionIssueCode::DegeneratePolygon,
                    format!(
                        "image {image_id}: {} polygon ring(s) have zero area after simplification",
                        annotated.degenerate_rings
                    ),
                ));
            }

            let (width, height) = record_dimensions(&raster);
            images.push(ImageRecord::new(image_id, record.source_ref()?, width, height));
            annotations.extend(annotated.annotations.into_iter().map(AnnotationRecord::from));
            image_id = image_id.next();
        }

        let categories = catalog.category_records();
        report.counts.records = records.len();
        report.counts.images = images.len();
        report.counts.categories = categories.len();
        report.counts.annotations = annotations.len();

        let document = CocoDocument::new(images, Categories::Records(categories), annotations);
        Ok(Conversion {
            output: ConversionOutput::Instances(document),
            report,
        })
    }
}

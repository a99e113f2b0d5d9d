//! Annotating one decoded label image.

use image::RgbImage;

use crate::catalog::CategoryColorMap;
use crate::coco::{AnnotationId, AnnotationRecord, ImageId};
use crate::error::GeometryError;
use crate::mask::extract_masks;
use crate::trace::trace_mask;

/// Annotations of one image plus what the caller needs to carry on.
#[derive(Clone, Debug)]
pub struct AnnotatedImage {
    /// One annotation per category present, in category-id order.
    pub annotations: Vec<AnnotationRecord<f64>>,
    pub next_annotation_id: AnnotationId,
    /// Non-background pixels that matched no catalog color.
    pub unmatched_pixels: u64,
    /// Zero-area rings across all annotations of the image.
    pub degenerate_rings: usize,
}

/// Extracts one mask per category present in `image` and traces each into an
/// annotation, numbering them from `next_annotation_id`.
///
/// An image with no catalog colors yields no annotations and leaves the
/// counter untouched.
pub fn annotate_image(
    image: &RgbImage,
    image_id: ImageId,
    catalog: &CategoryColorMap,
    next_annotation_id: AnnotationId,
) -> Result<AnnotatedImage, GeometryError> {
    let extracted = extract_masks(image, catalog);

    let mut annotations = Vec::with_capacity(extracted.masks.len());
    let mut next_id = next_annotation_id;
    let mut degenerate_rings = 0;

    for category in &extracted.masks {
        tracing::debug!(
            image_id = image_id.as_u64(),
            category_id = category.category_id.as_u64(),
            color = %category.color,
            pixels = category.mask.count(),
            "tracing mask"
        );
        let traced = trace_mask(&category.mask, image_id, category.category_id, next_id)?;
        next_id = traced.next_annotation_id;
        degenerate_rings += traced.degenerate_rings;
        annotations.push(traced.annotation);
    }

    Ok(AnnotatedImage {
        annotations,
        next_annotation_id: next_id,
        unmatched_pixels: extracted.unmatched_pixels,
        degenerate_rings,
    })
}

//! Mask → polygon annotation.
//!
//! A mask is traced into closed rings ([`contour`]), each ring is moved from
//! padded `(row, col)` space into image `(x, y)` space and simplified, and all
//! rings of the mask are aggregated into a single annotation. One mask is one
//! instance, so a mask consumes exactly one annotation id however many rings
//! it produces (occluded objects trace to several disjoint rings).
//!
//! # Aggregation
//!
//! Rings with a negative signed area are holes. A hole is attached to the
//! first outer ring that contains its first vertex and is subtracted from the
//! area; the bounding box spans every ring. Simplification does not preserve
//! topology, so rings may self-intersect or collapse to zero area; such rings
//! are kept as they are.

pub mod contour;

use geo::{Area, BoundingRect, Contains, Simplify};
use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};

use crate::coco::{AnnotationId, AnnotationRecord, CategoryId, ImageId};
use crate::error::GeometryError;
use crate::mask::InstanceMask;

pub use contour::{find_contours, Contour};

/// Douglas-Peucker tolerance, in pixels.
pub const SIMPLIFY_TOLERANCE: f64 = 1.0;

/// The annotation traced from one mask.
#[derive(Clone, Debug)]
pub struct TracedMask {
    pub annotation: AnnotationRecord<f64>,
    /// The id the next traced mask should use.
    pub next_annotation_id: AnnotationId,
    /// Rings whose simplified area is zero.
    pub degenerate_rings: usize,
}

/// Traces `mask` into one annotation with id `annotation_id`.
///
/// # Errors
/// Returns [`GeometryError::EmptyContours`] when the mask yields no ring, in
/// which case no bounding box or area exists. Callers only pass non-empty
/// masks, which always trace to at least one ring.
pub fn trace_mask(
    mask: &InstanceMask,
    image_id: ImageId,
    category_id: CategoryId,
    annotation_id: AnnotationId,
) -> Result<TracedMask, GeometryError> {
    let rings: Vec<LineString<f64>> = find_contours(mask)
        .iter()
        .map(|contour| simplify_ring(to_image_coords(contour)))
        .collect();

    annotate_rings(rings, image_id, category_id, annotation_id)
}

/// Aggregates simplified image-space rings into one annotation.
fn annotate_rings(
    rings: Vec<LineString<f64>>,
    image_id: ImageId,
    category_id: CategoryId,
    annotation_id: AnnotationId,
) -> Result<TracedMask, GeometryError> {
    let empty = || GeometryError::EmptyContours {
        image_id,
        category_id,
    };

    let bounds = MultiLineString::new(rings.clone())
        .bounding_rect()
        .ok_or_else(empty)?;

    let segmentation = rings.iter().map(flatten).collect();
    let (area, degenerate_rings) = aggregate_area(rings);

    let annotation = AnnotationRecord {
        segmentation,
        iscrowd: 0,
        image_id,
        category_id,
        id: annotation_id,
        bbox: [bounds.min().x, bounds.min().y, bounds.width(), bounds.height()],
        area,
    };

    Ok(TracedMask {
        annotation,
        next_annotation_id: annotation_id.next(),
        degenerate_rings,
    })
}

/// Swaps `(row, col)` to `(x, y)` and removes the one-pixel padding.
fn to_image_coords(contour: &Contour) -> LineString<f64> {
    contour
        .iter()
        .map(|&[row, col]| Coord {
            x: col - 1.0,
            y: row - 1.0,
        })
        .collect()
}

fn simplify_ring(ring: LineString<f64>) -> LineString<f64> {
    let (exterior, _) = Polygon::new(ring, vec![])
        .simplify(&SIMPLIFY_TOLERANCE)
        .into_inner();
    exterior
}

fn flatten(ring: &LineString<f64>) -> Vec<f64> {
    ring.coords().flat_map(|c| [c.x, c.y]).collect()
}

/// Total area with holes subtracted, and the number of zero-area rings.
fn aggregate_area(rings: Vec<LineString<f64>>) -> (f64, usize) {
    let mut outers: Vec<Polygon<f64>> = Vec::new();
    let mut holes: Vec<LineString<f64>> = Vec::new();
    let mut degenerate = 0;

    for ring in rings {
        let polygon = Polygon::new(ring, vec![]);
        let signed = polygon.signed_area();
        if signed == 0.0 {
            degenerate += 1;
        }
        if signed < 0.0 {
            holes.push(polygon.into_inner().0);
        } else {
            outers.push(polygon);
        }
    }

    for hole in holes {
        let Some(&start) = hole.0.first() else {
            continue;
        };
        if let Some(outer) = outers.iter_mut().find(|outer| outer.contains(&start)) {
            outer.interiors_push(hole);
        }
    }

    (MultiPolygon::new(outers).unsigned_area(), degenerate)
}

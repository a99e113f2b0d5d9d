//! Per-category instance masks.
//!
//! A label image holds at most one instance per category: every pixel of a
//! catalog color belongs to that color's mask. Masks are stored with one
//! pixel of `false` padding on every side so that shapes touching the image
//! border still trace to closed contours.

use image::RgbImage;

use crate::catalog::CategoryColorMap;
use crate::coco::CategoryId;
use crate::color::Rgb;

/// A padded boolean mask for one category in one image.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceMask {
    width: u32,
    height: u32,
    /// Row-major, `(height + 2) x (width + 2)`.
    cells: Vec<bool>,
    count: u64,
}

impl InstanceMask {
    /// Creates an empty mask for an unpadded `width x height` image.
    pub fn new(width: u32, height: u32) -> Self {
        let padded = (width as usize + 2) * (height as usize + 2);
        Self {
            width,
            height,
            cells: vec![false; padded],
            count: 0,
        }
    }

    /// Builds a mask from unpadded rows of booleans.
    ///
    /// Returns `None` if the rows are not all the same length.
    pub fn from_rows(rows: &[Vec<bool>]) -> Option<Self> {
        let width = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        let mut mask = Self::new(width as u32, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value {
                    mask.set(x as u32, y as u32);
                }
            }
        }
        Some(mask)
    }

    /// Marks image pixel `(x, y)` as part of the instance.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32) {
        let idx = self.padded_index(y as usize + 1, x as usize + 1);
        if !self.cells[idx] {
            self.cells[idx] = true;
            self.count += 1;
        }
    }

    /// Unpadded image width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Unpadded image height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of true pixels.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Rows of the padded grid.
    pub fn padded_rows(&self) -> usize {
        self.height as usize + 2
    }

    /// Columns of the padded grid.
    pub fn padded_cols(&self) -> usize {
        self.width as usize + 2
    }

    /// Value at padded `(row, col)`; out-of-range reads are `false`.
    #[inline]
    pub fn padded(&self, row: usize, col: usize) -> bool {
        if row >= self.padded_rows() || col >= self.padded_cols() {
            return false;
        }
        self.cells[self.padded_index(row, col)]
    }

    #[inline]
    fn padded_index(&self, row: usize, col: usize) -> usize {
        row * self.padded_cols() + col
    }
}

/// The mask of one catalog category present in an image.
#[derive(Clone, Debug)]
pub struct CategoryMask {
    pub category_id: CategoryId,
    pub color: Rgb,
    pub mask: InstanceMask,
}

/// Result of splitting one label image by catalog color.
#[derive(Clone, Debug, Default)]
pub struct ExtractedMasks {
    /// Non-empty masks in category-id order.
    pub masks: Vec<CategoryMask>,
    /// Pixels that are neither background nor a catalog color.
    pub unmatched_pixels: u64,
}

/// Isolates one mask per catalog color present in `image`.
///
/// Pixels must match a catalog color exactly on all three channels; anything
/// else (anti-aliased edges, compression noise) belongs to no mask.
pub fn extract_masks(image: &RgbImage, catalog: &CategoryColorMap) -> ExtractedMasks {
    let (width, height) = image.dimensions();
    let mut slots: Vec<Option<InstanceMask>> = vec![None; catalog.len()];
    let mut unmatched_pixels = 0u64;

    for (x, y, pixel) in image.enumerate_pixels() {
        let color = Rgb::from(*pixel);
        match catalog.category_of(color) {
            Some(id) => slots[id.as_u64() as usize]
                .get_or_insert_with(|| InstanceMask::new(width, height))
                .set(x, y),
            None if color == catalog.background() => {}
            None => unmatched_pixels += 1,
        }
    }

    let masks = catalog
        .entries()
        .iter()
        .zip(slots)
        .filter_map(|(entry, slot)| {
            slot.map(|mask| CategoryMask {
                category_id: entry.id,
                color: entry.color,
                mask,
            })
        })
        .collect();

    ExtractedMasks {
        masks,
        unmatched_pixels,
    }
}

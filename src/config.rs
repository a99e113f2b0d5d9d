//! Conversion settings passed explicitly to the handlers.

use crate::color::Rgb;

/// Settings shared by every conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Color of unlabeled pixels in segmentation label images. It must appear
    /// in the label legend and never becomes a category.
    pub background: Rgb,
}

impl ConvertConfig {
    pub fn with_background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            background: Rgb::WHITE,
        }
    }
}

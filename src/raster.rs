//! Decoding label images into flat RGB rasters.
//!
//! Label images are usually RGBA PNGs. Pixels are alpha-composited onto a
//! white background before mask extraction so that transparent regions read
//! as background rather than as black.

use image::{Rgb, RgbImage};

use crate::error::ConvertError;

/// Decodes an encoded image and flattens it to 8-bit RGB over white.
///
/// # Errors
/// Returns [`ConvertError::ImageDecode`] if the bytes are not a supported
/// image format; `location` is only used in the error message.
pub fn decode_rgb(bytes: &[u8], location: &str) -> Result<RgbImage, ConvertError> {
    let decoded = image::load_from_memory(bytes).map_err(|source| ConvertError::ImageDecode {
        location: location.to_string(),
        source,
    })?;

    if !decoded.color().has_alpha() {
        return Ok(decoded.to_rgb8());
    }

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    }))
}

/// `c·α + 255·(1-α)` in 8-bit fixed point, rounded to nearest.
#[inline]
fn over_white(channel: u8, alpha: u8) -> u8 {
    let c = channel as u32;
    let a = alpha as u32;
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Dimensions reported in image records: `(width, height)`.
///
/// The first raster axis (row count) is reported as `width` and the second
/// (column count) as `height`, matching the records emitted by existing
/// Ground Truth conversions.
pub fn record_dimensions(raster: &RgbImage) -> (u32, u32) {
    let rows = raster.height();
    let cols = raster.width();
    (rows, cols)
}

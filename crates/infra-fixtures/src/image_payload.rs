// JPEG payloads

use image::codecs::jpeg::JpegEncoder;
use image::{ImageError, Rgb, RgbImage};

/// Edge length of generated images, in pixels
pub const IMAGE_SIZE: u32 = 100;

const JPEG_QUALITY: u8 = 75;

/// Encode a square image filled with a single colour
///
/// # Errors
/// ImageError if the encoder fails
pub fn solid_jpeg(colour: [u8; 3], size: u32) -> Result<Vec<u8>, ImageError> {
    let image = RgbImage::from_pixel(size, size, Rgb(colour));

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).encode_image(&image)?;
    Ok(buf)
}

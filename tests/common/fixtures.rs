use image::{ImageBuffer, Rgb, RgbImage};
use tempfile::NamedTempFile;

use emberlens::Detection;

/// Creates a width x height mid-gray image in memory.
pub fn gray_image(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_pixel(width, height, Rgb([128u8, 128, 128]))
}

/// Creates a deterministic textured image (diagonal gradient pattern).
pub fn textured_image(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        let v = ((x * 7 + y * 13) % 256) as u8;
        Rgb([v, v.wrapping_mul(3), 255 - v])
    })
}

/// Creates a 100x100 all-gray test image on disk and returns the temp file.
/// The file will be automatically cleaned up when dropped.
pub fn create_test_image() -> NamedTempFile {
    let img = gray_image(100, 100);
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// Shorthand for a detection with a fixed box.
pub fn det(label: &str, score: f32) -> Detection {
    Detection::new(label, score, [10.0, 10.0, 50.0, 50.0])
}

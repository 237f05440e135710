use anyhow::Result;
use image::RgbImage;

use crate::detector::{Detector, overlay};
use crate::models::Detection;

/// Canned-detection backend.
///
/// Returns a fixed detection list regardless of input, which is the
/// substitution point that lets the pipeline run and be tested without
/// model weights. Thresholds are accepted and ignored; the overlay goes
/// through the same rendering path as the real backend.
pub struct StubDetector {
    detections: Vec<Detection>,
}

impl StubDetector {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    /// A stub that never detects anything
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Detector for StubDetector {
    fn detect(
        &self,
        image: &RgbImage,
        _confidence: f32,
        _iou: f32,
    ) -> Result<(Vec<Detection>, RgbImage)> {
        let overlay = overlay::render(image, &self.detections);
        Ok((self.detections.clone(), overlay))
    }
}

pub mod overlay;
pub mod stub;
#[cfg(feature = "backend-tract")]
pub mod tract;

use anyhow::Result;
use image::RgbImage;

use crate::models::Detection;

/// Object-detection backend.
///
/// Implementations must be deterministic for fixed weights and thresholds,
/// must return an empty detection list (not an error) when nothing clears
/// the confidence threshold, and must render an overlay with the same
/// dimensions as the input.
pub trait Detector {
    /// Run detection and return the detections in emission order plus an
    /// annotated copy of the input.
    fn detect(
        &self,
        image: &RgbImage,
        confidence: f32,
        iou: f32,
    ) -> Result<(Vec<Detection>, RgbImage)>;
}

/// Intersection over union of two detection boxes
pub fn iou(a: &Detection, b: &Detection) -> f32 {
    let ix0 = a.box_xyxy[0].max(b.box_xyxy[0]);
    let iy0 = a.box_xyxy[1].max(b.box_xyxy[1]);
    let ix1 = a.box_xyxy[2].min(b.box_xyxy[2]);
    let iy1 = a.box_xyxy[3].min(b.box_xyxy[3]);

    let inter = (ix1 - ix0).max(0.0) * (iy1 - iy0).max(0.0);
    let union = a.area() + b.area() - inter;
    if union <= 0.0 { 0.0 } else { inter / union }
}

/// Greedy class-agnostic non-maximum suppression.
///
/// `candidates` must be sorted by descending score; a candidate is dropped
/// when it overlaps an already-kept box above `iou_threshold`.
pub fn non_max_suppression(candidates: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    let mut kept: Vec<Detection> = Vec::with_capacity(candidates.len());
    for det in candidates {
        if kept.iter().all(|k| iou(k, &det) <= iou_threshold) {
            kept.push(det);
        }
    }
    kept
}

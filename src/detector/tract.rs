use std::path::Path;

use anyhow::{Context, Result, anyhow};
use image::{Rgb, RgbImage, imageops};
use tract_onnx::prelude::*;

use crate::detector::{Detector, non_max_suppression, overlay};
use crate::models::Detection;

/// Model input edge length; YOLO-family exports are square.
const INPUT_SIZE: u32 = 640;
/// Letterbox padding value used by ultralytics exports.
const PAD_VALUE: u8 = 114;

type Model = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// YOLO-family ONNX detector running on tract.
///
/// Wraps a pre-trained model: letterboxes the input to 640x640, runs the
/// graph, decodes the `[1, 4 + classes, candidates]` output (cx/cy/w/h plus
/// per-class scores), filters by confidence and suppresses duplicates at
/// the IoU threshold. The model handle lives for the process lifetime and
/// is dropped with the detector.
pub struct TractDetector {
    model: Model,
    labels: Vec<String>,
}

impl TractDetector {
    /// Load ONNX weights and prepare the runnable model.
    ///
    /// `labels` maps class indices to names; YOLO graphs do not carry
    /// usable class names through ONNX, so the caller supplies them.
    pub fn new<P: AsRef<Path>>(weights: P, labels: Vec<String>) -> Result<Self> {
        let path = weights.as_ref();
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .with_context(|| format!("failed to read ONNX model {}", path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize),
                ),
            )
            .context("failed to set model input shape")?
            .into_optimized()
            .context("failed to optimize model")?
            .into_runnable()
            .context("failed to build runnable model")?;
        Ok(Self { model, labels })
    }

    fn label(&self, class: usize) -> String {
        self.labels
            .get(class)
            .cloned()
            .unwrap_or_else(|| format!("class_{class}"))
    }
}

impl Detector for TractDetector {
    fn detect(
        &self,
        image: &RgbImage,
        confidence: f32,
        iou: f32,
    ) -> Result<(Vec<Detection>, RgbImage)> {
        let (canvas, lb) = letterbox(image);
        let outputs = self
            .model
            .run(tvec!(to_tensor(&canvas).into()))
            .context("ONNX inference failed")?;
        let output = outputs
            .first()
            .ok_or_else(|| anyhow!("model produced no outputs"))?;
        let view = output
            .to_array_view::<f32>()
            .context("model output was not f32")?;

        let shape = view.shape();
        if shape.len() != 3 || shape[0] != 1 || shape[1] <= 4 {
            return Err(anyhow!("unexpected model output shape {shape:?}"));
        }
        let classes = shape[1] - 4;
        let candidates_len = shape[2];

        let img_w = image.width() as f32;
        let img_h = image.height() as f32;

        let mut candidates = Vec::new();
        for i in 0..candidates_len {
            let mut best_class = 0usize;
            let mut best_score = f32::NEG_INFINITY;
            for c in 0..classes {
                let s = view[[0, 4 + c, i]];
                if s > best_score {
                    best_score = s;
                    best_class = c;
                }
            }
            if !best_score.is_finite() || best_score < confidence {
                continue;
            }

            let cx = view[[0, 0, i]];
            let cy = view[[0, 1, i]];
            let w = view[[0, 2, i]];
            let h = view[[0, 3, i]];
            if !(cx.is_finite() && cy.is_finite() && w > 0.0 && h > 0.0) {
                continue;
            }

            // undo the letterbox transform back to input pixel coordinates
            let x0 = ((cx - w / 2.0 - lb.pad_x) / lb.scale).clamp(0.0, img_w - 1.0);
            let y0 = ((cy - h / 2.0 - lb.pad_y) / lb.scale).clamp(0.0, img_h - 1.0);
            let x1 = ((cx + w / 2.0 - lb.pad_x) / lb.scale).clamp(0.0, img_w - 1.0);
            let y1 = ((cy + h / 2.0 - lb.pad_y) / lb.scale).clamp(0.0, img_h - 1.0);
            if x1 - x0 < 1.0 || y1 - y0 < 1.0 {
                continue;
            }

            candidates.push(Detection::new(
                self.label(best_class),
                best_score,
                [x0, y0, x1, y1],
            ));
        }

        candidates.sort_unstable_by(|a, b| b.score.total_cmp(&a.score));
        let detections = non_max_suppression(candidates, iou);
        let overlay = overlay::render(image, &detections);
        Ok((detections, overlay))
    }
}

struct Letterbox {
    scale: f32,
    pad_x: f32,
    pad_y: f32,
}

/// Resize preserving aspect ratio and center on a padded square canvas.
fn letterbox(image: &RgbImage) -> (RgbImage, Letterbox) {
    let (w, h) = image.dimensions();
    let scale = (INPUT_SIZE as f32 / w as f32).min(INPUT_SIZE as f32 / h as f32);
    let new_w = ((w as f32 * scale).round() as u32).clamp(1, INPUT_SIZE);
    let new_h = ((h as f32 * scale).round() as u32).clamp(1, INPUT_SIZE);

    let resized = imageops::resize(image, new_w, new_h, imageops::FilterType::Triangle);
    let mut canvas = RgbImage::from_pixel(INPUT_SIZE, INPUT_SIZE, Rgb([PAD_VALUE; 3]));
    let pad_x = (INPUT_SIZE - new_w) / 2;
    let pad_y = (INPUT_SIZE - new_h) / 2;
    imageops::replace(&mut canvas, &resized, pad_x as i64, pad_y as i64);

    (
        canvas,
        Letterbox {
            scale,
            pad_x: pad_x as f32,
            pad_y: pad_y as f32,
        },
    )
}

/// NCHW f32 tensor normalized to 0..1
fn to_tensor(image: &RgbImage) -> Tensor {
    let input = tract_ndarray::Array4::from_shape_fn(
        (1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize),
        |(_, c, y, x)| image.get_pixel(x as u32, y as u32)[c] as f32 / 255.0,
    );
    input.into_tensor()
}

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::{ImageReader, RgbImage};

use crate::detector::Detector;
use crate::enhancement::enhance;
use crate::error::{ImageVariant, PipelineError};
use crate::models::{Detection, SummaryMetrics};
use crate::summary::summarize;

/// Explicit driver configuration; nothing in the pipeline reads ambient
/// state. The thresholds apply identically to both the raw and the enhanced
/// detection pass so the comparison stays apples-to-apples.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub image_path: PathBuf,
    pub results_dir: PathBuf,
    /// Minimum score for a detection to be retained
    pub confidence: f32,
    /// Overlap threshold for duplicate-box suppression
    pub iou: f32,
    pub verbose: bool,
}

impl PipelineConfig {
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: image_path.into(),
            results_dir: PathBuf::from("results"),
            confidence: 0.25,
            iou: 0.5,
            verbose: false,
        }
    }

    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    pub fn with_thresholds(mut self, confidence: f32, iou: f32) -> Self {
        self.confidence = confidence;
        self.iou = iou;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Detections and derived metrics for one image variant
#[derive(Debug, Clone)]
pub struct VariantReport {
    pub detections: Vec<Detection>,
    pub metrics: SummaryMetrics,
}

/// Everything one run produces besides the files on disk
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub raw: VariantReport,
    pub enhanced: VariantReport,
}

/// Run the full comparison pipeline for one input image.
///
/// Loads and decodes the input, enhances it, runs detection on both
/// variants, then writes the four artifacts (two overlays, two detection
/// JSON files) into the results directory, creating it if absent. Any
/// failure aborts the run; both detection passes finish before the first
/// artifact is written, so a failed variant never leaves partial JSON
/// behind.
pub fn run(
    config: &PipelineConfig,
    detector: &dyn Detector,
) -> Result<PipelineReport, PipelineError> {
    let raw = load_image(&config.image_path)?;
    if config.verbose {
        println!("Image loaded: {}x{}", raw.width(), raw.height());
        println!("Applying DSP enhancement...");
    }
    let enhanced = enhance(&raw);

    if config.verbose {
        println!("Running detection on raw image...");
    }
    let (raw_dets, raw_overlay) = detector
        .detect(&raw, config.confidence, config.iou)
        .map_err(|e| PipelineError::Detection {
            variant: ImageVariant::Raw,
            message: format!("{e:#}"),
        })?;

    if config.verbose {
        println!("Running detection on enhanced image...");
    }
    let (enh_dets, enh_overlay) = detector
        .detect(&enhanced, config.confidence, config.iou)
        .map_err(|e| PipelineError::Detection {
            variant: ImageVariant::Enhanced,
            message: format!("{e:#}"),
        })?;

    fs::create_dir_all(&config.results_dir).map_err(|e| PipelineError::OutputWrite {
        path: config.results_dir.clone(),
        message: e.to_string(),
    })?;

    save_overlay(&config.results_dir.join("raw_overlay.png"), &raw_overlay)?;
    save_overlay(&config.results_dir.join("enh_overlay.png"), &enh_overlay)?;
    save_detections(&config.results_dir.join("raw_detections.json"), &raw_dets)?;
    save_detections(&config.results_dir.join("enh_detections.json"), &enh_dets)?;

    if config.verbose {
        println!("Artifacts written to {}", config.results_dir.display());
    }

    Ok(PipelineReport {
        raw: VariantReport {
            metrics: summarize(&raw_dets),
            detections: raw_dets,
        },
        enhanced: VariantReport {
            metrics: summarize(&enh_dets),
            detections: enh_dets,
        },
    })
}

fn load_image(path: &Path) -> Result<RgbImage, PipelineError> {
    let reader = ImageReader::open(path).map_err(|e| PipelineError::InputLoad {
        path: path.to_path_buf(),
        source: image::ImageError::IoError(e),
    })?;
    let img = reader.decode().map_err(|e| PipelineError::InputLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(img.to_rgb8())
}

fn save_overlay(path: &Path, img: &RgbImage) -> Result<(), PipelineError> {
    img.save(path).map_err(|e| PipelineError::OutputWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

// serde_json pretty printing uses 2-space indentation, matching the
// documented artifact format
fn save_detections(path: &Path, detections: &[Detection]) -> Result<(), PipelineError> {
    let file = File::create(path).map_err(|e| PipelineError::OutputWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), detections).map_err(|e| {
        PipelineError::OutputWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })
}

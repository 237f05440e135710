use clap::Parser;
use std::path::PathBuf;

use emberlens::Detector;
use emberlens::pipeline::{self, PipelineConfig};

#[derive(Parser)]
#[command(name = "emberlens")]
#[command(about = "Compare smoke/fire detection on raw vs DSP-enhanced images")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Path to ONNX detector weights
    #[arg(short, long, value_name = "FILE")]
    weights: PathBuf,

    /// Directory for overlays and detection JSON (created if absent)
    #[arg(short, long, value_name = "DIR", default_value = "results")]
    out_dir: PathBuf,

    /// Minimum confidence for a detection to be kept
    #[arg(long, default_value_t = 0.25)]
    confidence: f32,

    /// IoU threshold for duplicate-box suppression
    #[arg(long, default_value_t = 0.5)]
    iou: f32,

    /// Comma-separated class labels in model output order
    #[arg(long, value_delimiter = ',', default_value = "smoke,fire")]
    labels: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let detector = build_detector(&args)?;

    let config = PipelineConfig::new(&args.image_path)
        .with_results_dir(&args.out_dir)
        .with_thresholds(args.confidence, args.iou)
        .with_verbose(args.verbose);

    let report = pipeline::run(&config, detector.as_ref())?;

    println!("RAW : {}", report.raw.metrics);
    println!("ENH : {}", report.enhanced.metrics);

    Ok(())
}

#[cfg(feature = "backend-tract")]
fn build_detector(args: &Cli) -> anyhow::Result<Box<dyn Detector>> {
    use emberlens::{PipelineError, TractDetector};

    if args.verbose {
        println!("Loading model: {:?}", args.weights);
    }
    let detector = TractDetector::new(&args.weights, args.labels.clone()).map_err(|e| {
        PipelineError::ModelLoad {
            path: args.weights.clone(),
            message: format!("{e:#}"),
        }
    })?;
    Ok(Box::new(detector))
}

#[cfg(not(feature = "backend-tract"))]
fn build_detector(_args: &Cli) -> anyhow::Result<Box<dyn Detector>> {
    anyhow::bail!("built without an inference backend; enable the `backend-tract` feature")
}

use std::fs;

use emberlens::pipeline::{self, PipelineConfig, PipelineReport};
use emberlens::{Detection, Detector, PipelineError, StubDetector};

mod common;
use common::{create_test_image, det};

const ARTIFACTS: [&str; 4] = [
    "raw_overlay.png",
    "enh_overlay.png",
    "raw_detections.json",
    "enh_detections.json",
];

fn run_with(detections: Vec<Detection>) -> (PipelineReport, tempfile::TempDir) {
    let img = create_test_image();
    let out = tempfile::TempDir::new().expect("Failed to create temp directory");
    let config = PipelineConfig::new(img.path()).with_results_dir(out.path());
    let report = pipeline::run(&config, &StubDetector::new(detections)).expect("pipeline run");
    (report, out)
}

#[test]
fn writes_all_four_artifacts() {
    let (_report, out) = run_with(vec![det("fire", 0.8)]);
    for name in ARTIFACTS {
        assert!(out.path().join(name).exists(), "missing {name}");
    }
    // overlays keep the input dimensions
    for name in ["raw_overlay.png", "enh_overlay.png"] {
        let overlay = image::open(out.path().join(name)).expect("decode overlay");
        assert_eq!((overlay.width(), overlay.height()), (100, 100));
    }
}

#[test]
fn single_fire_detection_round_trips_through_json() {
    let (report, out) = run_with(vec![Detection::new("fire", 0.8, [10.0, 10.0, 50.0, 50.0])]);

    for name in ["raw_detections.json", "enh_detections.json"] {
        let text = fs::read_to_string(out.path().join(name)).expect("read json");
        let parsed: Vec<Detection> = serde_json::from_str(&text).expect("parse json");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].label, "fire");
        // stable field names in the serialized form
        assert!(text.contains("\"label\""));
        assert!(text.contains("\"score\""));
        assert!(text.contains("\"box_xyxy\""));
    }

    for m in [report.raw.metrics, report.enhanced.metrics] {
        assert_eq!(m.n, 1);
        assert!((m.mean_conf - 0.8).abs() < 1e-6);
        assert_eq!(m.smoke_n, 0);
        assert_eq!(m.smoke_mean_conf, 0.0);
    }
}

#[test]
fn empty_detections_yield_empty_json_and_zero_metrics() {
    let (report, out) = run_with(vec![]);

    for name in ["raw_detections.json", "enh_detections.json"] {
        let text = fs::read_to_string(out.path().join(name)).expect("read json");
        let parsed: Vec<Detection> = serde_json::from_str(&text).expect("parse json");
        assert!(parsed.is_empty());
    }
    assert_eq!(report.raw.metrics, emberlens::SummaryMetrics::zero());
    assert_eq!(report.enhanced.metrics, emberlens::SummaryMetrics::zero());
}

#[test]
fn smoke_and_fire_mix_summarizes_both_variants() {
    let (report, _out) = run_with(vec![det("Smoke", 0.6), det("fire", 0.4)]);
    for m in [report.raw.metrics, report.enhanced.metrics] {
        assert_eq!(m.n, 2);
        assert!((m.mean_conf - 0.5).abs() < 1e-6);
        assert_eq!(m.smoke_n, 1);
        assert!((m.smoke_mean_conf - 0.6).abs() < 1e-6);
    }
}

#[test]
fn missing_input_image_is_fatal_before_detection() {
    let out = tempfile::TempDir::new().expect("Failed to create temp directory");
    let config = PipelineConfig::new("/nonexistent/input.png").with_results_dir(out.path());
    let err = pipeline::run(&config, &StubDetector::empty()).unwrap_err();
    assert!(matches!(err, PipelineError::InputLoad { .. }));
    // nothing was written
    assert_eq!(fs::read_dir(out.path()).expect("read dir").count(), 0);
}

struct FailingDetector;

impl Detector for FailingDetector {
    fn detect(
        &self,
        _image: &image::RgbImage,
        _confidence: f32,
        _iou: f32,
    ) -> anyhow::Result<(Vec<Detection>, image::RgbImage)> {
        anyhow::bail!("inference exploded")
    }
}

#[test]
fn detector_failure_aborts_without_partial_artifacts() {
    let img = create_test_image();
    let out = tempfile::TempDir::new().expect("Failed to create temp directory");
    let config = PipelineConfig::new(img.path()).with_results_dir(out.path());
    let err = pipeline::run(&config, &FailingDetector).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Detection {
            variant: emberlens::ImageVariant::Raw,
            ..
        }
    ));
    assert_eq!(fs::read_dir(out.path()).expect("read dir").count(), 0);
}

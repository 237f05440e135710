use emberlens::detector::{iou, non_max_suppression, overlay};
use emberlens::{Detection, Detector, StubDetector};

mod common;
use common::gray_image;

#[test]
fn iou_of_identical_boxes_is_one() {
    let a = Detection::new("fire", 0.9, [10.0, 10.0, 50.0, 50.0]);
    let b = Detection::new("fire", 0.8, [10.0, 10.0, 50.0, 50.0]);
    assert!((iou(&a, &b) - 1.0).abs() < 1e-6);
}

#[test]
fn iou_of_disjoint_boxes_is_zero() {
    let a = Detection::new("fire", 0.9, [0.0, 0.0, 10.0, 10.0]);
    let b = Detection::new("fire", 0.8, [20.0, 20.0, 30.0, 30.0]);
    assert_eq!(iou(&a, &b), 0.0);
}

#[test]
fn nms_drops_overlapping_lower_scores() {
    // sorted by descending score, as the backends guarantee
    let candidates = vec![
        Detection::new("fire", 0.9, [10.0, 10.0, 50.0, 50.0]),
        Detection::new("fire", 0.8, [12.0, 12.0, 52.0, 52.0]),
        Detection::new("smoke", 0.7, [70.0, 70.0, 90.0, 90.0]),
    ];
    let kept = non_max_suppression(candidates, 0.5);
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0].score, 0.9);
    assert_eq!(kept[1].label, "smoke");
}

#[test]
fn nms_keeps_everything_when_nothing_overlaps() {
    let candidates = vec![
        Detection::new("fire", 0.9, [0.0, 0.0, 10.0, 10.0]),
        Detection::new("fire", 0.8, [20.0, 0.0, 30.0, 10.0]),
    ];
    assert_eq!(non_max_suppression(candidates, 0.5).len(), 2);
}

#[test]
fn overlay_preserves_dimensions_and_marks_boxes() {
    let img = gray_image(100, 100);
    let dets = vec![Detection::new("fire", 0.8, [10.0, 10.0, 50.0, 50.0])];
    let out = overlay::render(&img, &dets);
    assert_eq!((out.width(), out.height()), (100, 100));
    // box corner was recolored, untouched background was not
    assert_ne!(out.get_pixel(10, 10), img.get_pixel(10, 10));
    assert_eq!(out.get_pixel(99, 99), img.get_pixel(99, 99));
}

#[test]
fn overlay_ignores_boxes_outside_the_image() {
    let img = gray_image(20, 20);
    let dets = vec![Detection::new("fire", 0.8, [500.0, 500.0, 600.0, 600.0])];
    let out = overlay::render(&img, &dets);
    assert_eq!(out.as_raw(), img.as_raw());
}

#[test]
fn stub_detector_echoes_its_canned_list() {
    let img = gray_image(64, 64);
    let canned = vec![Detection::new("smoke", 0.6, [5.0, 5.0, 25.0, 25.0])];
    let stub = StubDetector::new(canned.clone());
    let (dets, overlay) = stub.detect(&img, 0.25, 0.5).unwrap();
    assert_eq!(dets, canned);
    assert_eq!((overlay.width(), overlay.height()), (64, 64));
}

#[test]
fn empty_stub_returns_empty_set_not_error() {
    let img = gray_image(16, 16);
    let (dets, overlay) = StubDetector::empty().detect(&img, 0.25, 0.5).unwrap();
    assert!(dets.is_empty());
    assert_eq!(overlay.as_raw(), img.as_raw());
}

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::models::Detection;

const SMOKE_COLOR: Rgb<u8> = Rgb([70, 130, 180]);
const FIRE_COLOR: Rgb<u8> = Rgb([220, 20, 60]);
const OTHER_COLOR: Rgb<u8> = Rgb([50, 205, 50]);
const BOX_THICKNESS: i32 = 2;

/// Draw every detection onto a copy of the image.
///
/// Shared by all detector backends so stubbed and real runs produce
/// comparable overlay artifacts. Box colors are keyed by class; labels and
/// scores live in the JSON output, not the overlay.
pub fn render(image: &RgbImage, detections: &[Detection]) -> RgbImage {
    let mut out = image.clone();
    for det in detections {
        draw_box(&mut out, det);
    }
    out
}

fn class_color(label: &str) -> Rgb<u8> {
    if label.eq_ignore_ascii_case("smoke") {
        SMOKE_COLOR
    } else if label.eq_ignore_ascii_case("fire") {
        FIRE_COLOR
    } else {
        OTHER_COLOR
    }
}

fn draw_box(image: &mut RgbImage, det: &Detection) {
    let w = image.width() as f32;
    let h = image.height() as f32;

    let x0 = det.box_xyxy[0].clamp(0.0, w - 1.0).floor() as i32;
    let y0 = det.box_xyxy[1].clamp(0.0, h - 1.0).floor() as i32;
    let x1 = det.box_xyxy[2].clamp(0.0, w - 1.0).ceil() as i32;
    let y1 = det.box_xyxy[3].clamp(0.0, h - 1.0).ceil() as i32;
    if x1 <= x0 || y1 <= y0 {
        return;
    }

    let color = class_color(&det.label);
    // nested rectangles give a thicker, more visible border
    for inset in 0..BOX_THICKNESS {
        let width = x1 - x0 - 2 * inset;
        let height = y1 - y0 - 2 * inset;
        if width < 1 || height < 1 {
            break;
        }
        let rect = Rect::at(x0 + inset, y0 + inset).of_size(width as u32, height as u32);
        draw_hollow_rect_mut(image, rect, color);
    }
}

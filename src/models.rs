use serde::{Deserialize, Serialize};
use std::fmt;

/// One predicted object instance: class label, confidence score and
/// pixel-space bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub score: f32,
    /// [x_min, y_min, x_max, y_max] in pixel coordinates
    pub box_xyxy: [f32; 4],
}

impl Detection {
    /// Build a detection, normalizing the box so min <= max on both axes
    pub fn new(label: impl Into<String>, score: f32, box_xyxy: [f32; 4]) -> Self {
        let [x0, y0, x1, y1] = box_xyxy;
        Self {
            label: label.into(),
            score,
            box_xyxy: [x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)],
        }
    }

    pub fn width(&self) -> f32 {
        self.box_xyxy[2] - self.box_xyxy[0]
    }

    pub fn height(&self) -> f32 {
        self.box_xyxy[3] - self.box_xyxy[1]
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// True when the label matches "smoke", compared case-insensitively
    pub fn is_smoke(&self) -> bool {
        self.label.eq_ignore_ascii_case("smoke")
    }
}

/// Aggregate statistics over one detection set.
///
/// `smoke_mean_conf` is 0.0 both when no smoke was detected and when smoke
/// was detected with zero confidence; consumers that need to tell those
/// apart should check `smoke_n` first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub n: usize,
    pub mean_conf: f32,
    pub smoke_n: usize,
    pub smoke_mean_conf: f32,
}

impl SummaryMetrics {
    pub fn zero() -> Self {
        Self {
            n: 0,
            mean_conf: 0.0,
            smoke_n: 0,
            smoke_mean_conf: 0.0,
        }
    }
}

impl fmt::Display for SummaryMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} mean_conf={:.3} smoke_n={} smoke_mean_conf={:.3}",
            self.n, self.mean_conf, self.smoke_n, self.smoke_mean_conf
        )
    }
}

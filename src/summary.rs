use crate::models::{Detection, SummaryMetrics};

/// Reduce a detection set to aggregate comparison metrics.
///
/// An empty input yields the all-zero record, and so does the smoke subset
/// when nothing is labeled "smoke" (case-insensitive). Neither case is an
/// error. Scores are accumulated in f64 so the means are exact for any
/// realistic detection count.
pub fn summarize(detections: &[Detection]) -> SummaryMetrics {
    if detections.is_empty() {
        return SummaryMetrics::zero();
    }

    let n = detections.len();
    let total: f64 = detections.iter().map(|d| d.score as f64).sum();

    let smoke_scores: Vec<f64> = detections
        .iter()
        .filter(|d| d.is_smoke())
        .map(|d| d.score as f64)
        .collect();

    let smoke_n = smoke_scores.len();
    let smoke_mean_conf = if smoke_n > 0 {
        (smoke_scores.iter().sum::<f64>() / smoke_n as f64) as f32
    } else {
        0.0
    };

    SummaryMetrics {
        n,
        mean_conf: (total / n as f64) as f32,
        smoke_n,
        smoke_mean_conf,
    }
}

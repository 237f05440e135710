pub mod detector;
pub mod enhancement;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod summary;

pub use detector::{Detector, stub::StubDetector};
pub use enhancement::enhance;
pub use error::{ImageVariant, PipelineError};
pub use models::{Detection, SummaryMetrics};
pub use pipeline::{PipelineConfig, PipelineReport, VariantReport, run};
pub use summary::summarize;

#[cfg(feature = "backend-tract")]
pub use detector::tract::TractDetector;

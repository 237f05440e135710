use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which image variant a detection pass operated on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVariant {
    Raw,
    Enhanced,
}

impl fmt::Display for ImageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageVariant::Raw => write!(f, "raw"),
            ImageVariant::Enhanced => write!(f, "enhanced"),
        }
    }
}

/// Fatal pipeline failures.
///
/// Every variant names the stage that failed, so the abort message
/// identifies where the run stopped. Empty detection sets are not errors
/// and never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("could not load input image {path:?}: {source}")]
    InputLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not load model weights {path:?}: {message}")]
    ModelLoad { path: PathBuf, message: String },

    #[error("detection failed on {variant} image: {message}")]
    Detection {
        variant: ImageVariant,
        message: String,
    },

    #[error("could not write {path:?}: {message}")]
    OutputWrite { path: PathBuf, message: String },
}

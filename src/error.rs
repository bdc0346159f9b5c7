//! Error types for building networks and loading training data.
//!
//! Only contract violations that can be detected before training starts are
//! reported here. A mismatched vector reaching a forward or backward pass is
//! a programming error and panics instead.

use std::fmt;
use std::io;

/// Everything that can go wrong while setting up a training run.
#[derive(Debug)]
pub enum Error {
    /// A network needs at least one layer.
    NoLayers,
    /// A layer was configured with zero units.
    EmptyLayer { layer: usize },
    /// Adjacent layers do not agree on their shared width.
    LayerMismatch {
        layer: usize,
        expected: usize,
        actual: usize,
    },
    /// A sample's input or target width does not match the network.
    DimensionMismatch {
        sample: usize,
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A training run needs at least one epoch.
    NoEpochs,
    /// Learning rates must be finite and positive.
    InvalidLearningRate(f32),
    /// There was nothing to train on.
    NoSamples,
    /// A row of delimited input could not be parsed.
    Parse {
        line: usize,
        message: String,
    },
    /// A class label does not fit the configured number of classes.
    LabelOutOfRange {
        line: usize,
        label: usize,
        classes: usize,
    },
    Io(io::Error),
    Csv(csv::Error),
    Config(serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoLayers => write!(f, "network has no layers"),
            Error::EmptyLayer { layer } => write!(f, "layer {} has zero width", layer),
            Error::LayerMismatch {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "layer {} expects {} inputs but the previous layer has {} outputs",
                layer, expected, actual
            ),
            Error::DimensionMismatch {
                sample,
                what,
                expected,
                actual,
            } => write!(
                f,
                "sample {} has {} of length {}, expected {}",
                sample, what, actual, expected
            ),
            Error::InvalidLearningRate(rate) => write!(f, "invalid learning rate {}", rate),
            Error::NoSamples => write!(f, "no training samples"),
            Error::NoEpochs => write!(f, "epochs must be at least 1"),
            Error::Parse { line, message } => write!(f, "line {}: {}", line, message),
            Error::LabelOutOfRange {
                line,
                label,
                classes,
            } => write!(
                f,
                "line {}: label {} out of range for {} classes",
                line, label, classes
            ),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Csv(e) => write!(f, "CSV error: {}", e),
            Error::Config(e) => write!(f, "invalid configuration: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Csv(e) => Some(e),
            Error::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Csv(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e)
    }
}

//! Manifest loading and validation errors.

use thiserror::Error;

/// A single problem found while validating a manifest.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ManifestViolation {
    #[error("Presentation name is empty")]
    EmptyPresentation,

    #[error("Slide '{slide}' is used by the step tree but missing from slideDict")]
    UnknownSlide { slide: String },

    #[error("Root step does not name a slide")]
    RootWithoutSlide,

    #[error("Recording {recording} has no steps")]
    EmptyRecording { recording: usize },

    #[error("Recording {recording} references unknown step {path:?}")]
    UnknownStep { recording: usize, path: Vec<usize> },

    #[error("Recording {recording} has an invalid time at entry {entry}: {value}")]
    InvalidTime {
        recording: usize,
        entry: usize,
        value: f64,
    },

    #[error("Recording {recording} goes back in time at entry {entry}")]
    OutOfOrder { recording: usize, entry: usize },
}

/// Errors that make a presentation impossible to start.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Could not load {location}: {reason}")]
    Unreachable { location: String, reason: String },

    #[error("Could not parse {location}: {reason}")]
    Malformed { location: String, reason: String },

    #[error("The manifest is invalid: {}", render(.0))]
    Invalid(Vec<ManifestViolation>),
}

fn render(violations: &[ManifestViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

//! Session construction errors.

use crate::manifest::ManifestError;
use thiserror::Error;

/// Errors that can occur when building a session.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Manifest not specified. Call .manifest(manifest) before .build()")]
    MissingManifest,

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

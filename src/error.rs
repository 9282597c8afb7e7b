//! Construction-time errors
//!
//! The simulation itself never fails: bad input is ignored and numbers are
//! clamped. Errors only surface while wiring the runner up.

use thiserror::Error;

use crate::scene::TextureKey;

/// Failures while building the presentation adapter
#[derive(Debug, Error)]
pub enum SceneError {
    /// The sprite factory has no texture for a key the runner draws
    #[error("missing texture for {0:?}")]
    MissingTexture(TextureKey),
    /// The sprite factory refused to create a handle
    #[error("failed to create sprite for {key:?}: {reason}")]
    CreateFailed { key: TextureKey, reason: String },
}

/// Failures while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

//! Error type for setup paths.
//!
//! Playback itself never fails hard: missing frames and empty groups are
//! absorbed where they occur. Only opening animations, reading the library
//! file and reading the configuration return [`AnimError`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing animations for playback.
#[derive(Debug, Error)]
pub enum AnimError {
    /// No animation with this name is registered in the library.
    #[error("unknown animation `{0}`")]
    UnknownAnimation(String),

    /// A file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The animation library file is not valid JSON for [`AnimationLibrary`].
    ///
    /// [`AnimationLibrary`]: crate::resources::animationlibrary::AnimationLibrary
    #[error("invalid animation library: {0}")]
    Json(#[from] serde_json::Error),

    /// The INI configuration could not be loaded or saved.
    #[error("config error: {0}")]
    Config(String),
}

//! Error types.
//!
//! Nothing in the draw path returns these. Configuration errors surface when an
//! animator is built, and load errors are recorded per frame by the store.

use thiserror::Error;

/// Rejected animator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A sequence must contain at least one frame
    #[error("frame count must be at least 1")]
    ZeroFrameCount,

    /// Mobile breakpoint must be a positive, finite width
    #[error("invalid mobile breakpoint: {0}")]
    InvalidBreakpoint(f64),

    /// Mobile zoom must be a positive, finite multiplier
    #[error("invalid mobile zoom: {0}")]
    InvalidZoom(f64),

    /// Max stretch must be finite and at least 1.0
    #[error("invalid max stretch: {0} (must be >= 1.0)")]
    InvalidStretch(f64),

    /// The stretch ramp needs at least one frame to ramp over
    #[error("stretch ramp length must be at least 1 frame")]
    InvalidRampLength,

    /// TOML document could not be parsed
    #[cfg(feature = "toml")]
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

/// Failure to load a single frame.
///
/// The store treats every variant the same way: the frame is permanently
/// unavailable and draws for it are skipped.
#[derive(Debug, Error)]
pub enum FrameLoadError {
    #[error("frame not found: {path}")]
    NotFound { path: String },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error reported by the browser (onerror, rejected promise)
    #[error("browser error loading {path}: {message}")]
    Js { path: String, message: String },
}

impl FrameLoadError {
    pub fn decode(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            ConfigError::ZeroFrameCount.to_string(),
            "frame count must be at least 1"
        );
        assert!(ConfigError::InvalidStretch(0.5).to_string().contains("0.5"));

        let err = FrameLoadError::NotFound {
            path: "/frames/frame (3).jpg".into(),
        };
        assert!(err.to_string().contains("frame (3).jpg"));

        let err = FrameLoadError::decode("a.png", "truncated");
        assert_eq!(err.to_string(), "failed to decode a.png: truncated");
    }

    #[test]
    fn io_error_converts() {
        let err: FrameLoadError = std::io::Error::other("boom").into();
        assert!(err.to_string().contains("boom"));
    }
}

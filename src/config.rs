//! Animator configuration.
//!
//! Every field has a default matching the hero sequence the animator was tuned
//! for, so a TOML document only needs to name what differs.

use crate::error::ConfigError;

/// Where the frames of a sequence live and how their files are named.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SequenceConfig {
    /// Number of frames in the sequence
    pub frame_count: usize,
    /// Folder prefix joined verbatim in front of each filename (e.g. "/frames/")
    pub folder: String,
    /// Filename prefix before the frame number (e.g. "ezgif-frame-")
    pub prefix: String,
    /// Everything after the frame number (e.g. ".jpg")
    pub extension: String,
    /// Pad frame numbers to three digits ("007")
    pub zero_pad: bool,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            frame_count: 278,
            folder: "/frames/".to_string(),
            prefix: "ezgif-frame-".to_string(),
            extension: ".jpg".to_string(),
            zero_pad: true,
        }
    }
}

/// Narrow-viewport fit tuning.
///
/// The zoom and stretch constants were tuned by eye for one asset set; treat
/// them as knobs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResponsiveConfig {
    /// Viewport widths strictly below this are "mobile" (logical pixels)
    pub mobile_breakpoint: f64,
    /// Fit ratio multiplier applied on mobile
    pub mobile_zoom: f64,
    /// Last frame index drawn without vertical stretch
    pub stretch_start: usize,
    /// Frames over which the stretch ramps up to `max_stretch`
    pub stretch_ramp: usize,
    /// Height multiplier reached at the end of the ramp
    pub max_stretch: f64,
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
            mobile_zoom: 1.75,
            stretch_start: 30,
            stretch_ramp: 60,
            max_stretch: 1.05,
        }
    }
}

impl ResponsiveConfig {
    /// Check if a viewport width falls under the mobile breakpoint.
    #[inline]
    pub fn is_mobile(&self, viewport_width: f64) -> bool {
        viewport_width < self.mobile_breakpoint
    }
}

/// Complete configuration for one [`ScrollAnimator`](crate::ScrollAnimator).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimatorConfig {
    pub sequence: SequenceConfig,
    pub responsive: ResponsiveConfig,
    /// Count failed frame loads toward loading completion.
    ///
    /// When false, a single missing frame keeps the sequence loading forever.
    pub failed_frames_complete_loading: bool,
    /// Period of the frame-0 redraw while the page gate is closed
    pub poll_interval_ms: u32,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            sequence: SequenceConfig::default(),
            responsive: ResponsiveConfig::default(),
            failed_frames_complete_loading: true,
            poll_interval_ms: 100,
        }
    }
}

impl AnimatorConfig {
    /// Config for a sequence with default responsive tuning.
    pub fn with_sequence(sequence: SequenceConfig) -> Self {
        Self {
            sequence,
            ..Default::default()
        }
    }

    /// Parse and validate a TOML document.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sequence.frame_count == 0 {
            return Err(ConfigError::ZeroFrameCount);
        }

        let r = &self.responsive;
        if !r.mobile_breakpoint.is_finite() || r.mobile_breakpoint <= 0.0 {
            return Err(ConfigError::InvalidBreakpoint(r.mobile_breakpoint));
        }
        if !r.mobile_zoom.is_finite() || r.mobile_zoom <= 0.0 {
            return Err(ConfigError::InvalidZoom(r.mobile_zoom));
        }
        if !r.max_stretch.is_finite() || r.max_stretch < 1.0 {
            return Err(ConfigError::InvalidStretch(r.max_stretch));
        }
        if r.stretch_ramp == 0 {
            return Err(ConfigError::InvalidRampLength);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AnimatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.responsive.mobile_breakpoint, 768.0);
        assert_eq!(config.responsive.mobile_zoom, 1.75);
        assert_eq!(config.responsive.stretch_start, 30);
        assert_eq!(config.responsive.stretch_ramp, 60);
        assert_eq!(config.responsive.max_stretch, 1.05);
        assert_eq!(config.poll_interval_ms, 100);
        assert!(config.failed_frames_complete_loading);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = AnimatorConfig::default();
        config.sequence.frame_count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroFrameCount)));

        let mut config = AnimatorConfig::default();
        config.responsive.max_stretch = 0.9;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidStretch(_))));

        let mut config = AnimatorConfig::default();
        config.responsive.stretch_ramp = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRampLength)));

        let mut config = AnimatorConfig::default();
        config.responsive.mobile_zoom = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidZoom(_))));

        let mut config = AnimatorConfig::default();
        config.responsive.mobile_breakpoint = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBreakpoint(_))
        ));
    }

    #[test]
    fn mobile_breakpoint_is_exclusive() {
        let r = ResponsiveConfig::default();
        assert!(r.is_mobile(767.0));
        assert!(!r.is_mobile(768.0));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn partial_toml() {
        let config = AnimatorConfig::from_toml_str(
            r#"
            poll_interval_ms = 50

            [sequence]
            frame_count = 80
            prefix = "frame ("
            extension = ").jpg"
            zero_pad = false

            [responsive]
            max_stretch = 1.1
            "#,
        )
        .unwrap();

        assert_eq!(config.sequence.frame_count, 80);
        assert_eq!(config.sequence.folder, "/frames/");
        assert!(!config.sequence.zero_pad);
        assert_eq!(config.responsive.max_stretch, 1.1);
        assert_eq!(config.responsive.stretch_start, 30);
        assert_eq!(config.poll_interval_ms, 50);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn toml_validation_runs() {
        let err = AnimatorConfig::from_toml_str("[sequence]\nframe_count = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroFrameCount));
    }
}

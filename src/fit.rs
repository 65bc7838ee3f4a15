//! Fit calculations for placing a frame inside a viewport.

use crate::config::ResponsiveConfig;

/// Image scaling policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FitMode {
    /// Fill the whole area, cropping overflow
    #[default]
    Cover,
    /// Fit entirely inside the area, possibly leaving gaps
    Contain,
}

impl FitMode {
    /// Responsive policy: `Contain` below the breakpoint, `Cover` otherwise.
    #[inline]
    pub fn for_viewport_width(viewport_width: f64, breakpoint: f64) -> Self {
        if viewport_width < breakpoint {
            FitMode::Contain
        } else {
            FitMode::Cover
        }
    }
}

/// Scale ratio mapping natural image size onto the logical area.
///
/// Returns 0.0 when either natural dimension is zero.
pub fn fit_ratio(mode: FitMode, logical: (f64, f64), natural: (f64, f64)) -> f64 {
    if natural.0 <= 0.0 || natural.1 <= 0.0 {
        return 0.0;
    }
    let rw = logical.0 / natural.0;
    let rh = logical.1 / natural.1;
    match mode {
        FitMode::Cover => rw.max(rh),
        FitMode::Contain => rw.min(rh),
    }
}

/// Vertical stretch multiplier for a frame index on narrow viewports.
///
/// Exactly 1.0 up to and including `stretch_start`, then linear up to
/// `max_stretch` at `stretch_start + stretch_ramp`, flat afterwards.
///
/// ```rust
/// use scrubframe_core::{fit::height_stretch, ResponsiveConfig};
///
/// let config = ResponsiveConfig::default(); // start 30, ramp 60, max 1.05
/// assert_eq!(height_stretch(30.0, &config), 1.0);
/// assert!((height_stretch(60.0, &config) - 1.025).abs() < 1e-9);
/// assert!((height_stretch(90.0, &config) - 1.05).abs() < 1e-9);
/// ```
pub fn height_stretch(frame_index: f64, config: &ResponsiveConfig) -> f64 {
    let start = config.stretch_start as f64;
    if frame_index <= start {
        return 1.0;
    }
    let ramp = config.stretch_ramp.max(1) as f64;
    let t = ((frame_index - start) / ramp).min(1.0);
    1.0 + t * (config.max_stretch - 1.0)
}

/// Per-draw fit parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitParameters {
    /// Uniform scale applied to both axes (mobile zoom included)
    pub ratio: f64,
    /// Additional scale applied to height only
    pub height_stretch: f64,
}

impl FitParameters {
    /// Compute fit parameters for one draw.
    ///
    /// ## Arguments
    ///
    /// * `mode` - Cover or contain
    /// * `logical` - Canvas size in logical (CSS) pixels
    /// * `natural` - Natural frame size in image pixels
    /// * `viewport_width` - Window width, used for the mobile check
    /// * `frame_index` - Frame being drawn, drives the stretch ramp
    /// * `config` - Responsive tuning
    pub fn compute(
        mode: FitMode,
        logical: (f64, f64),
        natural: (f64, f64),
        viewport_width: f64,
        frame_index: f64,
        config: &ResponsiveConfig,
    ) -> Self {
        let mut ratio = fit_ratio(mode, logical, natural);
        let mut stretch = 1.0;
        if config.is_mobile(viewport_width) {
            ratio *= config.mobile_zoom;
            stretch = height_stretch(frame_index, config);
        }
        Self {
            ratio,
            height_stretch: stretch,
        }
    }
}

/// Destination rectangle in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DrawRect {
    /// Center a scaled image inside the logical area.
    pub fn centered(logical: (f64, f64), natural: (f64, f64), params: FitParameters) -> Self {
        let width = natural.0 * params.ratio;
        let height = natural.1 * params.ratio * params.height_stretch;
        Self {
            x: (logical.0 - width) / 2.0,
            y: (logical.1 - height) / 2.0,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_mode_breakpoint() {
        assert_eq!(FitMode::for_viewport_width(375.0, 768.0), FitMode::Contain);
        assert_eq!(FitMode::for_viewport_width(767.9, 768.0), FitMode::Contain);
        assert_eq!(FitMode::for_viewport_width(768.0, 768.0), FitMode::Cover);
        assert_eq!(FitMode::for_viewport_width(1920.0, 768.0), FitMode::Cover);
    }

    #[test]
    fn test_fit_ratio() {
        // 1920x1080 frame into 1000x1000
        let cover = fit_ratio(FitMode::Cover, (1000.0, 1000.0), (1920.0, 1080.0));
        let contain = fit_ratio(FitMode::Contain, (1000.0, 1000.0), (1920.0, 1080.0));
        assert!((cover - 1000.0 / 1080.0).abs() < 1e-12);
        assert!((contain - 1000.0 / 1920.0).abs() < 1e-12);
        assert_eq!(fit_ratio(FitMode::Cover, (100.0, 100.0), (0.0, 10.0)), 0.0);
    }

    #[test]
    fn test_cover_never_below_contain() {
        let sizes = [1.0, 3.0, 17.5, 320.0, 768.0, 1080.0, 4096.0];
        for &lw in &sizes {
            for &lh in &sizes {
                for &nw in &sizes {
                    for &nh in &sizes {
                        let cover = fit_ratio(FitMode::Cover, (lw, lh), (nw, nh));
                        let contain = fit_ratio(FitMode::Contain, (lw, lh), (nw, nh));
                        assert!(cover >= contain, "{lw}x{lh} <- {nw}x{nh}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_height_stretch_ramp() {
        let config = ResponsiveConfig::default();
        assert_eq!(height_stretch(0.0, &config), 1.0);
        assert_eq!(height_stretch(30.0, &config), 1.0);
        assert!((height_stretch(60.0, &config) - 1.025).abs() < 1e-12);
        assert!((height_stretch(90.0, &config) - 1.05).abs() < 1e-12);
        assert!((height_stretch(250.0, &config) - 1.05).abs() < 1e-12);

        let mut prev = 1.0;
        for i in 31..=90 {
            let s = height_stretch(i as f64, &config);
            assert!(s > prev);
            prev = s;
        }
    }

    #[test]
    fn test_desktop_has_no_distortion() {
        let config = ResponsiveConfig::default();
        let params = FitParameters::compute(
            FitMode::Cover,
            (1600.0, 900.0),
            (1920.0, 1080.0),
            1600.0,
            200.0,
            &config,
        );
        assert!((params.ratio - 1600.0 / 1920.0).abs() < 1e-12);
        assert_eq!(params.height_stretch, 1.0);
    }

    #[test]
    fn test_mobile_zoom_and_stretch() {
        let config = ResponsiveConfig::default();
        let params = FitParameters::compute(
            FitMode::Contain,
            (390.0, 760.0),
            (1920.0, 1080.0),
            390.0,
            60.0,
            &config,
        );
        let base = 390.0 / 1920.0;
        assert!((params.ratio - base * 1.75).abs() < 1e-12);
        assert!((params.height_stretch - 1.025).abs() < 1e-12);
    }

    #[test]
    fn test_centered_rect() {
        let params = FitParameters {
            ratio: 0.5,
            height_stretch: 1.0,
        };
        let rect = DrawRect::centered((800.0, 600.0), (1920.0, 1080.0), params);
        assert_eq!(rect.width, 960.0);
        assert_eq!(rect.height, 540.0);
        assert_eq!(rect.x, -80.0);
        assert_eq!(rect.y, 30.0);

        let stretched = DrawRect::centered(
            (800.0, 600.0),
            (1920.0, 1080.0),
            FitParameters {
                ratio: 0.5,
                height_stretch: 1.1,
            },
        );
        assert_eq!(stretched.width, 960.0);
        assert!((stretched.height - 594.0).abs() < 1e-9);
        assert!((stretched.y - 3.0).abs() < 1e-9);
    }
}

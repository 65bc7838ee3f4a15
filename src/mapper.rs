//! Scroll progress to frame index mapping.

/// Position of a scroll region relative to the viewport.
///
/// The animation spans from the region's top reaching the viewport top to the
/// region's bottom reaching the viewport bottom.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RegionGeometry {
    /// Region top relative to the viewport top (negative once scrolled past)
    pub top: f64,
    /// Full region height
    pub height: f64,
    /// Visible viewport height
    pub viewport_height: f64,
}

impl RegionGeometry {
    pub fn new(top: f64, height: f64, viewport_height: f64) -> Self {
        Self {
            top,
            height,
            viewport_height,
        }
    }

    /// Distance the page scrolls while the region is pinned.
    #[inline]
    pub fn scroll_span(&self) -> f64 {
        self.height - self.viewport_height
    }

    /// Normalized progress through the region, clamped to `[0, 1]`.
    ///
    /// A region no taller than the viewport never scrolls and reports 0.
    pub fn progress(&self) -> f64 {
        let span = self.scroll_span();
        if !span.is_finite() || span <= 0.0 {
            return 0.0;
        }
        let p = -self.top / span;
        if p.is_nan() {
            0.0
        } else {
            p.clamp(0.0, 1.0)
        }
    }
}

/// Anything that can report normalized scroll progress.
pub trait ScrollProgressSource {
    /// Progress in `[0, 1]`.
    fn progress(&self) -> f64;
}

impl ScrollProgressSource for RegionGeometry {
    fn progress(&self) -> f64 {
        RegionGeometry::progress(self)
    }
}

impl<F: Fn() -> f64> ScrollProgressSource for F {
    fn progress(&self) -> f64 {
        self()
    }
}

/// Map progress to a frame index: `floor(progress * (count - 1))`.
///
/// The result is clamped into `[0, count - 1]`, so progress slightly outside
/// `[0, 1]` saturates instead of overflowing.
///
/// ```rust
/// use scrubframe_core::frame_index_for_progress;
///
/// assert_eq!(frame_index_for_progress(0.0, 80), 0);
/// assert_eq!(frame_index_for_progress(0.5, 80), 39);
/// assert_eq!(frame_index_for_progress(1.0, 80), 79);
/// ```
pub fn frame_index_for_progress(progress: f64, frame_count: usize) -> usize {
    if frame_count == 0 {
        return 0;
    }
    let last = frame_count - 1;
    let position = (progress * last as f64).floor();
    if position.is_nan() || position <= 0.0 {
        0
    } else {
        (position as usize).min(last)
    }
}

/// Maps scroll progress from an injected source onto a frame sequence.
#[derive(Clone, Debug)]
pub struct ScrollFrameMapper<S> {
    source: S,
    frame_count: usize,
}

impl<S: ScrollProgressSource> ScrollFrameMapper<S> {
    pub fn new(source: S, frame_count: usize) -> Self {
        Self {
            source,
            frame_count,
        }
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Current progress reported by the source.
    #[inline]
    pub fn progress(&self) -> f64 {
        self.source.progress()
    }

    /// Frame index for the current progress.
    #[inline]
    pub fn frame_index(&self) -> usize {
        frame_index_for_progress(self.progress(), self.frame_count)
    }

    /// Fractional position `progress * (count - 1)` without flooring.
    pub fn position(&self) -> f64 {
        self.progress() * self.frame_count.saturating_sub(1) as f64
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Swap in updated geometry (e.g. after a scroll event).
    pub fn set_source(&mut self, source: S) {
        self.source = source;
    }
}

/// DOM-backed scroll regions.
#[cfg(feature = "web")]
pub mod web {
    use super::*;
    use web_sys::Element;

    /// A page element whose bounding box defines the scroll region.
    #[derive(Clone, Debug)]
    pub struct ElementRegion {
        element: Element,
    }

    impl ElementRegion {
        pub fn new(element: Element) -> Self {
            Self { element }
        }

        /// Read the element's current position against the window.
        pub fn geometry(&self) -> RegionGeometry {
            let rect = self.element.get_bounding_client_rect();
            let viewport_height = web_sys::window()
                .and_then(|window| window.inner_height().ok())
                .and_then(|height| height.as_f64())
                .unwrap_or(0.0);
            RegionGeometry::new(rect.top(), rect.height(), viewport_height)
        }
    }

    impl ScrollProgressSource for ElementRegion {
        fn progress(&self) -> f64 {
            self.geometry().progress()
        }
    }
}

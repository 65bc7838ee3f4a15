//! Rendering frames onto a DPR-aware drawing surface.

use tracing::{debug, trace};

use crate::config::ResponsiveConfig;
use crate::data::FrameImage;
use crate::fit::{DrawRect, FitMode, FitParameters};

/// Window state read at draw time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Window width in logical pixels, used for the mobile breakpoint
    pub width: f64,
    /// Physical pixels per logical pixel
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            device_pixel_ratio,
        }
    }

    /// Device pixel ratio, falling back to 1.0 when unset or invalid.
    #[inline]
    pub fn dpr(&self) -> f64 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 1.0)
    }
}

/// Backing buffer size for a logical size at a device pixel ratio.
#[inline]
pub fn backing_size_for(logical: (f64, f64), dpr: f64) -> (u32, u32) {
    let w = (logical.0 * dpr).round().max(0.0) as u32;
    let h = (logical.1 * dpr).round().max(0.0) as u32;
    (w, h)
}

/// A 2D drawing target with a logical size and a device-pixel backing buffer.
///
/// Mirrors the subset of the canvas 2D API the renderer needs. Implementations
/// must leave the last drawn pixels in place until the next `clear`.
pub trait DrawSurface<H> {
    /// Displayed size in logical pixels
    fn logical_size(&self) -> (f64, f64);

    /// Current backing buffer size in device pixels
    fn backing_size(&self) -> (u32, u32);

    /// Reallocate the backing buffer and scale drawing by `dpr`.
    fn resize_backing(&mut self, width: u32, height: u32, dpr: f64);

    /// Turn on image smoothing at the highest quality available.
    fn enable_smoothing(&mut self);

    /// Clear a logical-pixel rectangle from the origin.
    fn clear(&mut self, width: f64, height: f64);

    /// Draw `image` scaled into `rect` (logical pixels).
    fn draw_image(&mut self, image: &H, rect: DrawRect);
}

/// Why a draw request produced no pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Frame still loading, failed, or has no decoded size
    FrameNotReady,
    /// Surface has no visible area
    EmptySurface,
    /// Animator is not in a phase that draws for this event
    Inactive,
    /// Animator has been torn down
    TornDown,
}

/// Result of a draw request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOutcome {
    Drawn { frame_index: usize, rect: DrawRect },
    Skipped(SkipReason),
}

impl DrawOutcome {
    #[inline]
    pub fn is_drawn(&self) -> bool {
        matches!(self, DrawOutcome::Drawn { .. })
    }

    /// Index of the drawn frame, if anything was drawn.
    #[inline]
    pub fn frame_index(&self) -> Option<usize> {
        match self {
            DrawOutcome::Drawn { frame_index, .. } => Some(*frame_index),
            DrawOutcome::Skipped(_) => None,
        }
    }
}

/// Draws single frames with cover/contain fitting and mobile distortion.
#[derive(Clone, Debug, Default)]
pub struct CanvasRenderer {
    pub responsive: ResponsiveConfig,
}

impl CanvasRenderer {
    pub fn new(responsive: ResponsiveConfig) -> Self {
        Self { responsive }
    }

    /// Responsive fit mode for a viewport.
    #[inline]
    pub fn fit_mode_for(&self, viewport: Viewport) -> FitMode {
        FitMode::for_viewport_width(viewport.width, self.responsive.mobile_breakpoint)
    }

    /// Resize the backing buffer only when the device-pixel size changed.
    ///
    /// Returns `true` when the buffer was reallocated.
    pub fn sync_backing<H, S: DrawSurface<H>>(&self, surface: &mut S, dpr: f64) -> bool {
        let target = backing_size_for(surface.logical_size(), dpr);
        if surface.backing_size() == target {
            return false;
        }
        debug!(width = target.0, height = target.1, dpr, "resizing canvas backing buffer");
        surface.resize_backing(target.0, target.1, dpr);
        true
    }

    /// Draw one frame.
    ///
    /// The backing buffer is synced first, then the draw is skipped silently
    /// if `frame` is absent or not drawable. On a skip the previous pixels
    /// stay on the surface.
    pub fn draw<H, S>(&self, surface: &mut S, frame: Option<&H>, frame_index: usize, mode: FitMode, viewport: Viewport) -> DrawOutcome
    where
        H: FrameImage,
        S: DrawSurface<H>,
    {
        self.sync_backing::<H, S>(surface, viewport.dpr());

        let logical = surface.logical_size();
        if logical.0 <= 0.0 || logical.1 <= 0.0 {
            trace!(frame_index, "skipping draw on empty surface");
            return DrawOutcome::Skipped(SkipReason::EmptySurface);
        }

        let Some(image) = frame.filter(|image| image.is_drawable()) else {
            trace!(frame_index, "skipping draw, frame not ready");
            return DrawOutcome::Skipped(SkipReason::FrameNotReady);
        };

        let natural = (image.natural_width() as f64, image.natural_height() as f64);
        let params = FitParameters::compute(
            mode,
            logical,
            natural,
            viewport.width,
            frame_index as f64,
            &self.responsive,
        );
        let rect = DrawRect::centered(logical, natural, params);

        surface.enable_smoothing();
        surface.clear(logical.0, logical.1);
        surface.draw_image(image, rect);

        trace!(frame_index, ?mode, "drew frame");
        DrawOutcome::Drawn { frame_index, rect }
    }
}

/// Web-specific rendering implementation.
#[cfg(feature = "web")]
pub mod web {
    use super::*;
    use tracing::warn;
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

    impl FrameImage for HtmlImageElement {
        fn natural_width(&self) -> u32 {
            HtmlImageElement::natural_width(self)
        }

        fn natural_height(&self) -> u32 {
            HtmlImageElement::natural_height(self)
        }

        fn is_complete(&self) -> bool {
            self.complete()
        }
    }

    /// Read the window width and device pixel ratio.
    pub fn window_viewport() -> Option<Viewport> {
        let window = web_sys::window()?;
        let width = window.inner_width().ok()?.as_f64()?;
        Some(Viewport::new(width, window.device_pixel_ratio()))
    }

    /// An HTML canvas with an opaque 2D context.
    #[derive(Clone, Debug)]
    pub struct WebCanvas {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    impl WebCanvas {
        /// Acquire an opaque (`alpha: false`) 2D context for `canvas`.
        pub fn new(canvas: HtmlCanvasElement) -> Result<Self, String> {
            let options = js_sys::Object::new();
            js_sys::Reflect::set(&options, &JsValue::from_str("alpha"), &JsValue::FALSE)
                .map_err(|_| "Failed to build context options")?;

            let ctx = canvas
                .get_context_with_context_options("2d", &options)
                .map_err(|_| "Failed to get 2d context")?
                .ok_or("No 2d context available")?
                .dyn_into::<CanvasRenderingContext2d>()
                .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;

            Ok(Self { canvas, ctx })
        }

        pub fn canvas(&self) -> &HtmlCanvasElement {
            &self.canvas
        }
    }

    impl DrawSurface<HtmlImageElement> for WebCanvas {
        fn logical_size(&self) -> (f64, f64) {
            (
                self.canvas.client_width() as f64,
                self.canvas.client_height() as f64,
            )
        }

        fn backing_size(&self) -> (u32, u32) {
            (self.canvas.width(), self.canvas.height())
        }

        fn resize_backing(&mut self, width: u32, height: u32, dpr: f64) {
            // Resizing resets the context transform, so the scale is applied once.
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Err(err) = self.ctx.scale(dpr, dpr) {
                warn!(?err, "failed to apply device pixel ratio scale");
            }
        }

        fn enable_smoothing(&mut self) {
            self.ctx.set_image_smoothing_enabled(true);
            if let Err(err) = js_sys::Reflect::set(
                &self.ctx,
                &JsValue::from_str("imageSmoothingQuality"),
                &JsValue::from_str("high"),
            ) {
                warn!(?err, "failed to set image smoothing quality");
            }
        }

        fn clear(&mut self, width: f64, height: f64) {
            self.ctx.clear_rect(0.0, 0.0, width, height);
        }

        fn draw_image(&mut self, image: &HtmlImageElement, rect: DrawRect) {
            if let Err(err) = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                image,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
            ) {
                warn!(?err, "drawImage failed");
            }
        }
    }
}

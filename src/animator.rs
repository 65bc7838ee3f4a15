//! Scroll-driven animator lifecycle.

use tracing::debug;

use crate::config::AnimatorConfig;
use crate::data::{FrameImage, FrameNaming, FrameRequest};
use crate::error::ConfigError;
use crate::loader::{FrameStore, LoadResult};
use crate::mapper::frame_index_for_progress;
use crate::render::{CanvasRenderer, DrawOutcome, DrawSurface, SkipReason, Viewport};

/// Delays (ms) after binding at which the caller should call
/// [`ScrollAnimator::refresh`] to catch late layout shifts.
const SETTLE_REFRESH_MS: [u32; 2] = [100, 500];

/// Lifecycle phase of a [`ScrollAnimator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorPhase {
    /// Created, nothing requested yet
    Idle,
    /// Frames still loading
    Loading,
    /// Frames loaded, page gate still closed
    ReadyUnbound,
    /// Frames loaded and page gate released; scroll drives drawing
    ReadyBound,
    /// Unmounted; every event is ignored
    TornDown,
}

/// Platform-agnostic scroll-synchronized frame animator.
///
/// The animator owns its frame store and drawing surface but no timers or
/// listeners. The caller forwards events:
///
/// - [`mount`](Self::mount) once, then issue the [`requests`](Self::requests)
///   and report each result through [`record_frame`](Self::record_frame)
/// - [`poll_tick`](Self::poll_tick) every [`poll_interval_ms`](Self::poll_interval_ms)
///   while [`wants_polling`](Self::wants_polling) is true
/// - [`release_gate`](Self::release_gate) when the page preloader finishes
/// - [`on_scroll`](Self::on_scroll) and [`on_resize`](Self::on_resize) from listeners
/// - [`tear_down`](Self::tear_down) on unmount
///
/// ## Example
///
/// ```rust,ignore
/// let mut animator = ScrollAnimator::new(config, surface)?;
/// animator.mount(viewport);
/// // ... frames load, preloader exits ...
/// animator.release_gate(viewport);
/// animator.on_scroll(0.5, viewport);
/// assert_eq!(animator.phase(), AnimatorPhase::ReadyBound);
/// ```
#[derive(Debug)]
pub struct ScrollAnimator<H, S> {
    config: AnimatorConfig,
    store: FrameStore<H>,
    renderer: CanvasRenderer,
    surface: S,
    phase: AnimatorPhase,
    /// Page-level gate; latches once released
    gate_released: bool,
    /// Last scroll progress reported, in [0, 1]
    progress: f64,
    /// Last viewport seen by any event
    viewport: Viewport,
}

impl<H, S> ScrollAnimator<H, S>
where
    H: FrameImage,
    S: DrawSurface<H>,
{
    /// Create an animator for a validated configuration.
    pub fn new(config: AnimatorConfig, surface: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = FrameStore::new(
            config.sequence.frame_count,
            config.failed_frames_complete_loading,
        );
        let renderer = CanvasRenderer::new(config.responsive.clone());
        Ok(Self {
            config,
            store,
            renderer,
            surface,
            phase: AnimatorPhase::Idle,
            gate_released: false,
            progress: 0.0,
            viewport: Viewport::default(),
        })
    }

    #[inline]
    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> AnimatorPhase {
        self.phase
    }

    #[inline]
    pub fn store(&self) -> &FrameStore<H> {
        &self.store
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.store.len()
    }

    /// Check if frames are still loading (for a loading indicator).
    #[inline]
    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    /// Loading progress, 0-100.
    #[inline]
    pub fn progress_percent(&self) -> u8 {
        self.store.progress_percent()
    }

    pub fn loading_message(&self) -> String {
        self.store.progress().message()
    }

    /// Last scroll progress reported through [`on_scroll`](Self::on_scroll).
    #[inline]
    pub fn scroll_progress(&self) -> f64 {
        self.progress
    }

    /// Frame index the current scroll progress maps to.
    #[inline]
    pub fn current_frame_index(&self) -> usize {
        frame_index_for_progress(self.progress, self.frame_count())
    }

    /// One load request per frame, in sequence order.
    pub fn requests(&self) -> Vec<FrameRequest> {
        FrameNaming::from(&self.config.sequence).requests(self.frame_count())
    }

    /// Period for [`poll_tick`](Self::poll_tick).
    #[inline]
    pub fn poll_interval_ms(&self) -> u32 {
        self.config.poll_interval_ms
    }

    /// Delays after binding at which to call [`refresh`](Self::refresh).
    #[inline]
    pub fn settle_refresh_delays_ms(&self) -> &'static [u32] {
        &SETTLE_REFRESH_MS
    }

    /// Check if the frame-0 redraw timer should be running.
    ///
    /// True from mount until the page gate releases.
    pub fn wants_polling(&self) -> bool {
        matches!(
            self.phase,
            AnimatorPhase::Loading | AnimatorPhase::ReadyUnbound
        ) && !self.gate_released
    }

    /// Start the lifecycle and draw frame 0.
    ///
    /// Only valid from `Idle`; later calls are ignored.
    pub fn mount(&mut self, viewport: Viewport) -> DrawOutcome {
        match self.phase {
            AnimatorPhase::Idle => {}
            AnimatorPhase::TornDown => return DrawOutcome::Skipped(SkipReason::TornDown),
            _ => return DrawOutcome::Skipped(SkipReason::Inactive),
        }
        self.viewport = viewport;
        self.set_phase(AnimatorPhase::Loading);
        self.update_phase();
        self.draw_index(0)
    }

    /// Record the outcome of one frame load.
    ///
    /// Ignored before mount and after teardown, so late completions from
    /// requests still in flight are harmless. Completing the sequence while
    /// the gate is already open binds the animator and draws immediately.
    pub fn record_frame(&mut self, index: usize, result: LoadResult<H>) -> bool {
        if matches!(self.phase, AnimatorPhase::Idle | AnimatorPhase::TornDown) {
            return false;
        }
        let recorded = self.store.record(index, result);
        if recorded && self.update_phase() {
            self.bind();
        }
        recorded
    }

    /// Release the page-level loading gate.
    ///
    /// The gate latches: it cannot be closed again. Polling stops here.
    pub fn release_gate(&mut self, viewport: Viewport) -> DrawOutcome {
        if self.phase == AnimatorPhase::TornDown {
            return DrawOutcome::Skipped(SkipReason::TornDown);
        }
        self.viewport = viewport;
        if !self.gate_released {
            debug!("page loading gate released");
            self.gate_released = true;
        }
        if self.update_phase() {
            self.bind()
        } else {
            DrawOutcome::Skipped(SkipReason::Inactive)
        }
    }

    #[inline]
    pub fn gate_released(&self) -> bool {
        self.gate_released
    }

    /// Redraw frame 0 while waiting on the page gate.
    pub fn poll_tick(&mut self, viewport: Viewport) -> DrawOutcome {
        if self.phase == AnimatorPhase::TornDown {
            return DrawOutcome::Skipped(SkipReason::TornDown);
        }
        if !self.wants_polling() {
            return DrawOutcome::Skipped(SkipReason::Inactive);
        }
        self.viewport = viewport;
        self.draw_index(0)
    }

    /// Handle a scroll update.
    ///
    /// Progress is remembered in every live phase so binding and resizes pick
    /// up where the page already is; it only draws once bound.
    pub fn on_scroll(&mut self, progress: f64, viewport: Viewport) -> DrawOutcome {
        if self.phase == AnimatorPhase::TornDown {
            return DrawOutcome::Skipped(SkipReason::TornDown);
        }
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.viewport = viewport;

        if self.phase != AnimatorPhase::ReadyBound {
            return DrawOutcome::Skipped(SkipReason::Inactive);
        }
        self.draw_index(self.current_frame_index())
    }

    /// Handle a window resize: refit at the current position.
    pub fn on_resize(&mut self, viewport: Viewport) -> DrawOutcome {
        if self.phase == AnimatorPhase::TornDown {
            return DrawOutcome::Skipped(SkipReason::TornDown);
        }
        self.viewport = viewport;
        if self.phase == AnimatorPhase::ReadyBound {
            self.draw_at_position(self.scroll_position())
        } else if self.wants_polling() {
            self.draw_index(0)
        } else {
            DrawOutcome::Skipped(SkipReason::Inactive)
        }
    }

    /// Redraw at the current scroll position once bound.
    pub fn refresh(&mut self, viewport: Viewport) -> DrawOutcome {
        if self.phase != AnimatorPhase::ReadyBound {
            return self.inactive();
        }
        self.viewport = viewport;
        self.draw_at_position(self.scroll_position())
    }

    /// Draw at a fractional frame position, rounded to the nearest frame.
    pub fn draw_at_position(&mut self, position: f64) -> DrawOutcome {
        if matches!(self.phase, AnimatorPhase::Idle | AnimatorPhase::TornDown) {
            return self.inactive();
        }
        let index = if position.is_nan() {
            0
        } else {
            self.store.clamp_index(position.round() as i64)
        };
        self.draw_index(index)
    }

    /// Stop responding to events. Idempotent.
    pub fn tear_down(&mut self) {
        self.set_phase(AnimatorPhase::TornDown);
    }

    fn scroll_position(&self) -> f64 {
        self.progress * self.frame_count().saturating_sub(1) as f64
    }

    fn inactive(&self) -> DrawOutcome {
        if self.phase == AnimatorPhase::TornDown {
            DrawOutcome::Skipped(SkipReason::TornDown)
        } else {
            DrawOutcome::Skipped(SkipReason::Inactive)
        }
    }

    fn bind(&mut self) -> DrawOutcome {
        debug!(progress = self.progress, "binding animator to scroll");
        self.draw_at_position(self.scroll_position())
    }

    fn draw_index(&mut self, index: usize) -> DrawOutcome {
        let viewport = self.viewport;
        let mode = self.renderer.fit_mode_for(viewport);
        let frame = self.store.get_frame(index as i64);
        self.renderer
            .draw::<H, S>(&mut self.surface, frame, index, mode, viewport)
    }

    fn set_phase(&mut self, next: AnimatorPhase) {
        if self.phase != next {
            debug!(from = ?self.phase, to = ?next, "animator phase changed");
            self.phase = next;
        }
    }

    /// Recompute the live phase. Returns true on entering `ReadyBound`.
    fn update_phase(&mut self) -> bool {
        if matches!(self.phase, AnimatorPhase::Idle | AnimatorPhase::TornDown) {
            return false;
        }
        let next = if self.store.is_loading() {
            AnimatorPhase::Loading
        } else if self.gate_released {
            AnimatorPhase::ReadyBound
        } else {
            AnimatorPhase::ReadyUnbound
        };
        let entered_bound = next == AnimatorPhase::ReadyBound && self.phase != next;
        self.set_phase(next);
        entered_bound
    }
}

/// Browser glue: listeners, timers and loading for a mounted animator.
#[cfg(feature = "web")]
pub mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tracing::warn;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use web_sys::{Element, HtmlCanvasElement, HtmlImageElement, Window};

    use super::*;
    use crate::loader::{load_frames, web::WebImageProvider};
    use crate::mapper::{web::ElementRegion, ScrollFrameMapper};
    use crate::render::web::{window_viewport, WebCanvas};

    type WebAnimator = ScrollAnimator<HtmlImageElement, WebCanvas>;

    /// An animator wired to a canvas, a scroll region and the window.
    ///
    /// Dropping the handle tears everything down.
    pub struct MountedAnimator {
        window: Window,
        animator: Rc<RefCell<WebAnimator>>,
        mapper: Rc<ScrollFrameMapper<ElementRegion>>,
        listeners: Vec<(&'static str, Closure<dyn FnMut()>)>,
        poll: Option<(i32, Closure<dyn FnMut()>)>,
        timeouts: Vec<(i32, Closure<dyn FnMut()>)>,
    }

    fn viewport() -> Viewport {
        window_viewport().unwrap_or_default()
    }

    impl MountedAnimator {
        /// Mount on `canvas`, tracking scroll through `region`, and start loading.
        pub fn mount(config: AnimatorConfig, canvas: HtmlCanvasElement, region: Element) -> Result<Self, String> {
            let window = web_sys::window().ok_or("No window available")?;
            let surface = WebCanvas::new(canvas)?;
            let animator: WebAnimator = ScrollAnimator::new(config, surface).map_err(|err| err.to_string())?;
            let frame_count = animator.frame_count();
            let requests = animator.requests();

            let animator = Rc::new(RefCell::new(animator));
            let mapper = Rc::new(ScrollFrameMapper::new(ElementRegion::new(region), frame_count));
            animator.borrow_mut().mount(viewport());

            let mut mounted = Self {
                window,
                animator,
                mapper,
                listeners: Vec::new(),
                poll: None,
                timeouts: Vec::new(),
            };
            mounted.start_polling()?;
            mounted.listen()?;
            mounted.spawn_loading(requests);
            Ok(mounted)
        }

        /// Loading state for a preloader: `(is_loading, percent)`.
        pub fn status(&self) -> (bool, u8) {
            let animator = self.animator.borrow();
            (animator.is_loading(), animator.progress_percent())
        }

        pub fn phase(&self) -> AnimatorPhase {
            self.animator.borrow().phase()
        }

        /// Signal that the page preloader has finished.
        pub fn release_gate(&mut self) -> Result<(), String> {
            self.stop_polling();
            self.animator.borrow_mut().release_gate(viewport());
            // Refreshes are no-ops until the last frame lands and binds.
            self.schedule_settle_refreshes()
        }

        fn start_polling(&mut self) -> Result<(), String> {
            let animator = Rc::clone(&self.animator);
            let interval = animator.borrow().poll_interval_ms() as i32;
            let tick = Closure::<dyn FnMut()>::new(move || {
                animator.borrow_mut().poll_tick(viewport());
            });
            let handle = self
                .window
                .set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), interval)
                .map_err(|_| "Failed to start poll interval")?;
            self.poll = Some((handle, tick));
            Ok(())
        }

        fn stop_polling(&mut self) {
            if let Some((handle, _tick)) = self.poll.take() {
                self.window.clear_interval_with_handle(handle);
            }
        }

        fn listen(&mut self) -> Result<(), String> {
            let animator = Rc::clone(&self.animator);
            let mapper = Rc::clone(&self.mapper);
            let on_scroll = Closure::<dyn FnMut()>::new(move || {
                animator.borrow_mut().on_scroll(mapper.progress(), viewport());
            });

            let animator = Rc::clone(&self.animator);
            let on_resize = Closure::<dyn FnMut()>::new(move || {
                animator.borrow_mut().on_resize(viewport());
            });

            for (event, callback) in [("scroll", on_scroll), ("resize", on_resize)] {
                self.window
                    .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
                    .map_err(|_| format!("Failed to add {event} listener"))?;
                self.listeners.push((event, callback));
            }
            Ok(())
        }

        fn schedule_settle_refreshes(&mut self) -> Result<(), String> {
            let delays = self.animator.borrow().settle_refresh_delays_ms();
            for &delay in delays {
                let animator = Rc::clone(&self.animator);
                let refresh = Closure::<dyn FnMut()>::new(move || {
                    animator.borrow_mut().refresh(viewport());
                });
                let handle = self
                    .window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(refresh.as_ref().unchecked_ref(), delay as i32)
                    .map_err(|_| "Failed to schedule refresh")?;
                self.timeouts.push((handle, refresh));
            }
            Ok(())
        }

        fn spawn_loading(&self, requests: Vec<FrameRequest>) {
            let weak = Rc::downgrade(&self.animator);
            wasm_bindgen_futures::spawn_local(async move {
                load_frames(&WebImageProvider, &requests, |index, result| {
                    // The handle may have been dropped while requests were in flight.
                    if let Some(animator) = weak.upgrade() {
                        animator.borrow_mut().record_frame(index, result);
                    }
                })
                .await;
            });
        }
    }

    impl Drop for MountedAnimator {
        fn drop(&mut self) {
            self.stop_polling();
            for (handle, _refresh) in self.timeouts.drain(..) {
                self.window.clear_timeout_with_handle(handle);
            }
            for (event, callback) in self.listeners.drain(..) {
                if self
                    .window
                    .remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
                    .is_err()
                {
                    warn!(event, "failed to remove listener");
                }
            }
            self.animator.borrow_mut().tear_down();
        }
    }
}

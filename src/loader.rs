//! Frame loading and storage.
//!
//! Loading is split in two pieces:
//! 1. [`load_frames`] drives one independent future per frame and reports each
//!    completion, in whatever order they finish, to a callback.
//! 2. [`FrameStore`] records those completions and answers synchronous
//!    "what can I draw for index N" queries from the render path.

use std::future::Future;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, warn};

use crate::data::{FrameRequest, FrameSlot};
use crate::error::FrameLoadError;

/// Result type for frame loading operations
pub type LoadResult<T> = Result<T, FrameLoadError>;

/// Progress information for frame loading
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadingProgress {
    /// Frames loaded successfully
    pub loaded: usize,
    /// Frames whose load failed
    pub failed: usize,
    /// Total number of frames in the sequence
    pub total: usize,
    /// Count failures as finished
    pub failures_complete: bool,
}

impl LoadingProgress {
    /// Create a progress tracker for `total` frames
    pub fn new(total: usize, failures_complete: bool) -> Self {
        Self {
            loaded: 0,
            failed: 0,
            total,
            failures_complete,
        }
    }

    /// Frames that count toward completion
    pub fn completed(&self) -> usize {
        if self.failures_complete {
            self.loaded + self.failed
        } else {
            self.loaded
        }
    }

    /// Get loading percentage (0-100), rounded to the nearest integer.
    ///
    /// Holds at 99 until every frame has completed, so 100 always means done.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let percent = ((self.completed() as f64 / self.total as f64) * 100.0).round() as u8;
        if self.is_complete() {
            percent
        } else {
            percent.min(99)
        }
    }

    /// Check if loading is complete
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed() >= self.total
    }

    /// Format a loading message for a preloader
    pub fn message(&self) -> String {
        if self.total > 0 {
            format!(
                "Loading frames... {} / {} ({}%)",
                self.completed(),
                self.total,
                self.percent()
            )
        } else {
            "Loading frames...".to_string()
        }
    }
}

/// Instance-owned, ordered store of frame handles.
///
/// Reads never fail: indices saturate into `[0, len - 1]`, and frames that are
/// pending or failed simply come back as `None`.
#[derive(Clone, Debug)]
pub struct FrameStore<H> {
    slots: Vec<FrameSlot<H>>,
    progress: LoadingProgress,
}

impl<H> FrameStore<H> {
    /// Create a store with `count` pending slots.
    pub fn new(count: usize, failures_complete: bool) -> Self {
        let mut slots = Vec::with_capacity(count);
        slots.resize_with(count, FrameSlot::default);
        Self {
            slots,
            progress: LoadingProgress::new(count, failures_complete),
        }
    }

    /// Number of frames in the sequence
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Saturate any index into `[0, len - 1]`.
    #[inline]
    pub fn clamp_index(&self, index: i64) -> usize {
        let last = self.slots.len().saturating_sub(1) as i64;
        index.clamp(0, last.max(0)) as usize
    }

    /// Get the slot for an index, clamped into range.
    ///
    /// Returns `None` only for an empty store.
    pub fn slot(&self, index: i64) -> Option<&FrameSlot<H>> {
        if self.slots.is_empty() {
            return None;
        }
        self.slots.get(self.clamp_index(index))
    }

    /// Get the loaded frame at an index, clamped into range.
    ///
    /// ```rust
    /// use scrubframe_core::FrameStore;
    ///
    /// let mut store = FrameStore::new(3, true);
    /// store.record(0, Ok("first"));
    /// store.record(2, Ok("last"));
    ///
    /// assert_eq!(store.get_frame(-5), Some(&"first"));
    /// assert_eq!(store.get_frame(1), None); // still loading
    /// assert_eq!(store.get_frame(8), Some(&"last"));
    /// ```
    pub fn get_frame(&self, index: i64) -> Option<&H> {
        self.slot(index).and_then(FrameSlot::ready)
    }

    /// Record the outcome of a frame load.
    ///
    /// Each slot accepts exactly one outcome; later reports for the same slot
    /// and out-of-range indices are ignored. Returns `true` when recorded.
    pub fn record(&mut self, index: usize, result: LoadResult<H>) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        if !slot.is_pending() {
            return false;
        }

        match result {
            Ok(handle) => {
                *slot = FrameSlot::Ready(handle);
                self.progress.loaded += 1;
            }
            Err(_) => {
                *slot = FrameSlot::Failed;
                self.progress.failed += 1;
            }
        }

        if self.progress.is_complete() {
            debug!(
                loaded = self.progress.loaded,
                failed = self.progress.failed,
                "frame sequence finished loading"
            );
        }
        true
    }

    #[inline]
    pub fn progress(&self) -> &LoadingProgress {
        &self.progress
    }

    #[inline]
    pub fn progress_percent(&self) -> u8 {
        self.progress.percent()
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        !self.progress.is_complete()
    }
}

/// Totals from one [`load_frames`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub failed: usize,
}

/// Trait for async frame image providers.
///
/// Implement this trait to fetch frames through your specific I/O mechanism
/// (browser image elements, filesystem, HTTP, etc.)
///
/// No `Send` bounds, so it works in both native and WASM (single-threaded) contexts.
pub trait FrameProvider {
    /// Image handle produced by this provider
    type Image;

    /// Load a single frame. Failures are final and never retried.
    fn load_frame(&self, request: &FrameRequest) -> impl Future<Output = LoadResult<Self::Image>>;
}

/// Load every requested frame concurrently.
///
/// All requests are issued up front. `on_frame(index, result)` is called once
/// per request as it completes, in completion order. Failed loads are logged
/// here so callers only need to store the result.
pub async fn load_frames<P, F>(provider: &P, requests: &[FrameRequest], mut on_frame: F) -> LoadSummary
where
    P: FrameProvider,
    F: FnMut(usize, LoadResult<P::Image>),
{
    let mut pending: FuturesUnordered<_> = requests
        .iter()
        .map(|request| async move { (request, provider.load_frame(request).await) })
        .collect();

    let mut summary = LoadSummary::default();
    while let Some((request, result)) = pending.next().await {
        match &result {
            Ok(_) => summary.loaded += 1,
            Err(err) => {
                summary.failed += 1;
                warn!(index = request.index, path = %request.path, %err, "frame failed to load");
            }
        }
        on_frame(request.index, result);
    }
    summary
}

/// Load every frame of `store` straight into it.
///
/// Convenience for owners that hold the store exclusively while loading; the
/// web glue instead records through a weak handle to the animator.
pub async fn load_into_store<P>(provider: &P, requests: &[FrameRequest], store: &mut FrameStore<P::Image>) -> LoadSummary
where
    P: FrameProvider,
{
    load_frames(provider, requests, |index, result| {
        store.record(index, result);
    })
    .await
}

/// Browser image loading.
#[cfg(feature = "web")]
pub mod web {
    use super::*;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlImageElement;

    fn js_error(path: &str, err: JsValue) -> FrameLoadError {
        FrameLoadError::Js {
            path: path.to_string(),
            message: format!("{err:?}"),
        }
    }

    /// Loads frames as `<img>` elements, resolving on `load` and failing on `error`.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct WebImageProvider;

    impl FrameProvider for WebImageProvider {
        type Image = HtmlImageElement;

        async fn load_frame(&self, request: &FrameRequest) -> LoadResult<HtmlImageElement> {
            let image = HtmlImageElement::new().map_err(|err| js_error(&request.path, err))?;
            let loaded = js_sys::Promise::new(&mut |resolve, reject| {
                image.set_onload(Some(&resolve));
                image.set_onerror(Some(&reject));
            });
            image.set_src(&request.path);

            let result = JsFuture::from(loaded).await;
            image.set_onload(None);
            image.set_onerror(None);
            result.map_err(|err| js_error(&request.path, err))?;
            Ok(image)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FrameNaming;

    #[test]
    fn test_loading_progress() {
        let mut progress = LoadingProgress::new(10, true);

        assert_eq!(progress.percent(), 0);
        assert!(!progress.is_complete());

        progress.loaded = 5;
        assert_eq!(progress.percent(), 50);

        progress.loaded = 9;
        progress.failed = 1;
        assert!(progress.is_complete());
        assert_eq!(progress.percent(), 100);
        assert_eq!(progress.message(), "Loading frames... 10 / 10 (100%)");
    }

    #[test]
    fn test_progress_rounds() {
        let mut progress = LoadingProgress::new(3, true);
        progress.loaded = 1;
        assert_eq!(progress.percent(), 33);
        progress.loaded = 2;
        assert_eq!(progress.percent(), 67);
    }

    #[test]
    fn test_percent_reaches_100_only_when_complete() {
        let mut store: FrameStore<u8> = FrameStore::new(278, true);
        for i in 0..277 {
            store.record(i, Ok(0));
        }
        assert!(store.is_loading());
        assert_eq!(store.progress_percent(), 99);

        store.record(277, Ok(0));
        assert!(!store.is_loading());
        assert_eq!(store.progress_percent(), 100);
    }

    #[test]
    fn test_failures_can_block_completion() {
        let mut store: FrameStore<u8> = FrameStore::new(2, false);
        store.record(0, Ok(1));
        store.record(1, Err(FrameLoadError::NotFound { path: "x".into() }));

        assert!(store.is_loading());
        assert_eq!(store.progress_percent(), 50);
        assert_eq!(store.progress().failed, 1);
    }

    #[test]
    fn test_clamped_reads() {
        let mut store = FrameStore::new(4, true);
        for i in 0..4 {
            store.record(i, Ok(i as u32 * 10));
        }

        assert_eq!(store.get_frame(-5), store.get_frame(0));
        assert_eq!(store.get_frame(9), store.get_frame(3));
        assert_eq!(store.get_frame(9), Some(&30));
        assert_eq!(store.clamp_index(i64::MIN), 0);
        assert_eq!(store.clamp_index(i64::MAX), 3);
    }

    #[test]
    fn test_empty_store_reads_nothing() {
        let store: FrameStore<u8> = FrameStore::new(0, true);
        assert!(store.is_empty());
        assert!(store.get_frame(0).is_none());
        assert!(store.is_loading());
        assert_eq!(store.progress_percent(), 0);
    }

    #[test]
    fn test_record_once_per_slot() {
        let mut store = FrameStore::new(2, true);
        assert!(store.record(0, Ok("a")));
        assert!(!store.record(0, Ok("b")));
        assert!(!store.record(5, Ok("c")));

        assert_eq!(store.get_frame(0), Some(&"a"));
        assert_eq!(store.progress().loaded, 1);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut store = FrameStore::new(5, true);
        let mut last = store.progress_percent();
        let outcomes = [3usize, 0, 4, 1, 2];
        for (n, index) in outcomes.into_iter().enumerate() {
            let result = if n % 2 == 0 {
                Ok(index)
            } else {
                Err(FrameLoadError::NotFound { path: String::new() })
            };
            store.record(index, result);
            let now = store.progress_percent();
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, 100);
        assert!(!store.is_loading());
    }

    struct MissingEvens;

    impl FrameProvider for MissingEvens {
        type Image = String;

        async fn load_frame(&self, request: &FrameRequest) -> LoadResult<String> {
            if request.index % 2 == 0 {
                Err(FrameLoadError::NotFound {
                    path: request.path.clone(),
                })
            } else {
                Ok(request.path.clone())
            }
        }
    }

    #[test]
    fn test_load_frames_reports_every_request() {
        let naming = FrameNaming::new("/f/", "frame_", ".jpg", false);
        let requests = naming.requests(5);

        let mut seen = Vec::new();
        let summary = pollster::block_on(load_frames(&MissingEvens, &requests, |index, result| {
            seen.push((index, result.is_ok()));
        }));

        seen.sort();
        assert_eq!(summary, LoadSummary { loaded: 2, failed: 3 });
        assert_eq!(
            seen,
            vec![(0, false), (1, true), (2, false), (3, true), (4, false)]
        );
    }

    #[test]
    fn test_load_into_store() {
        let naming = FrameNaming::new("/f/", "frame_", ".jpg", false);
        let requests = naming.requests(4);
        let mut store = FrameStore::new(4, true);

        pollster::block_on(load_into_store(&MissingEvens, &requests, &mut store));

        assert!(!store.is_loading());
        assert_eq!(store.get_frame(1).map(String::as_str), Some("/f/frame_2.jpg"));
        assert!(store.get_frame(0).is_none());
        assert!(store.slot(2).is_some_and(FrameSlot::is_failed));
    }
}

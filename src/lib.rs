//! # scrubframe-core
//!
//! Scroll-synchronized image-sequence playback for canvas surfaces.
//!
//! A sequence of still frames stands in for a video; scrolling through a page
//! region scrubs through it. This crate provides platform-agnostic logic for:
//! - Preloading frame sequences concurrently and tracking progress
//! - Mapping scroll progress within a region to a frame index
//! - Fitting frames into a DPR-correct surface (cover/contain, mobile zoom
//!   and height stretch)
//! - Driving the mount → load → bind → teardown lifecycle
//!
//! ## Features
//!
//! - `serde` - Enable serialization/deserialization for configuration
//! - `toml` - Load [`AnimatorConfig`] from TOML
//! - `image` - Filesystem frame provider decoding with the `image` crate
//! - `web` - Enable web/WASM canvas rendering, image loading and DOM glue
//!
//! ## Example
//!
//! ```rust,ignore
//! use scrubframe_core::{AnimatorConfig, ScrollAnimator, SequenceConfig, Viewport};
//!
//! let config = AnimatorConfig::with_sequence(SequenceConfig {
//!     frame_count: 80,
//!     prefix: "frame (".into(),
//!     extension: ").jpg".into(),
//!     zero_pad: false,
//!     ..Default::default()
//! });
//!
//! let mut animator = ScrollAnimator::new(config, surface)?;
//! animator.mount(viewport);
//!
//! // Issue animator.requests() through a FrameProvider, then for each result:
//! animator.record_frame(index, result);
//!
//! // Once the page preloader is gone:
//! animator.release_gate(viewport);
//! animator.on_scroll(region.progress(), viewport);
//! ```

mod animator;
mod config;
mod data;
mod error;
pub mod fit;
#[cfg(feature = "image")]
mod fs;
pub mod loader;
pub mod mapper;
pub mod render;

pub use animator::{AnimatorPhase, ScrollAnimator};
pub use config::{AnimatorConfig, ResponsiveConfig, SequenceConfig};
pub use data::{FrameImage, FrameNaming, FrameRequest, FrameSlot};
pub use error::{ConfigError, FrameLoadError};
pub use fit::{DrawRect, FitMode, FitParameters};
pub use loader::{load_frames, load_into_store, FrameProvider, FrameStore, LoadResult, LoadSummary, LoadingProgress};
pub use mapper::{frame_index_for_progress, RegionGeometry, ScrollFrameMapper, ScrollProgressSource};
pub use render::{CanvasRenderer, DrawOutcome, DrawSurface, SkipReason, Viewport};

#[cfg(feature = "image")]
pub use fs::FsFrameProvider;

#[cfg(feature = "web")]
pub use animator::web::MountedAnimator;
#[cfg(feature = "web")]
pub use loader::web::WebImageProvider;
#[cfg(feature = "web")]
pub use mapper::web::ElementRegion;
#[cfg(feature = "web")]
pub use render::web::{window_viewport, WebCanvas};

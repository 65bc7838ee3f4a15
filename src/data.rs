//! Core data structures for frame sequences.

use crate::config::SequenceConfig;

/// Filename pattern for the frames of a sequence.
///
/// Frames are numbered from 1 on disk; indices everywhere else in the crate
/// are 0-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameNaming {
    pub folder: String,
    pub prefix: String,
    pub extension: String,
    pub zero_pad: bool,
}

impl FrameNaming {
    pub fn new(
        folder: impl Into<String>,
        prefix: impl Into<String>,
        extension: impl Into<String>,
        zero_pad: bool,
    ) -> Self {
        Self {
            folder: folder.into(),
            prefix: prefix.into(),
            extension: extension.into(),
            zero_pad,
        }
    }

    /// Format a 1-based frame number.
    ///
    /// - zero-padded: `7` -> `"007"`, `278` -> `"278"`, `1234` -> `"1234"`
    /// - unpadded: `7` -> `"7"`
    pub fn number(&self, number: usize) -> String {
        if self.zero_pad {
            format!("{number:03}")
        } else {
            number.to_string()
        }
    }

    /// Build the path for a 1-based frame number.
    ///
    /// ```rust
    /// use scrubframe_core::FrameNaming;
    ///
    /// let naming = FrameNaming::new("/frames/", "frame (", ").jpg", false);
    /// assert_eq!(naming.path_for(12), "/frames/frame (12).jpg");
    /// ```
    pub fn path_for(&self, number: usize) -> String {
        format!(
            "{}{}{}{}",
            self.folder,
            self.prefix,
            self.number(number),
            self.extension
        )
    }

    /// One request per frame, in order, for a sequence of `count` frames.
    pub fn requests(&self, count: usize) -> Vec<FrameRequest> {
        (0..count)
            .map(|index| FrameRequest {
                index,
                path: self.path_for(index + 1),
            })
            .collect()
    }
}

impl From<&SequenceConfig> for FrameNaming {
    fn from(config: &SequenceConfig) -> Self {
        Self::new(
            config.folder.clone(),
            config.prefix.clone(),
            config.extension.clone(),
            config.zero_pad,
        )
    }
}

/// A single frame to fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRequest {
    /// 0-based slot the result belongs to
    pub index: usize,
    /// Resource path built from the naming pattern
    pub path: String,
}

/// A decoded (or decoding) image that can be drawn.
///
/// Browser images report `is_complete() == false` and zero dimensions until
/// decoding finishes; in-memory images are always complete.
pub trait FrameImage {
    fn natural_width(&self) -> u32;
    fn natural_height(&self) -> u32;

    fn is_complete(&self) -> bool {
        true
    }

    /// Check whether this image can be drawn right now.
    #[inline]
    fn is_drawable(&self) -> bool {
        self.is_complete() && self.natural_width() > 0 && self.natural_height() > 0
    }
}

impl<T: FrameImage + ?Sized> FrameImage for &T {
    fn natural_width(&self) -> u32 {
        (**self).natural_width()
    }

    fn natural_height(&self) -> u32 {
        (**self).natural_height()
    }

    fn is_complete(&self) -> bool {
        (**self).is_complete()
    }
}

/// Load state of one frame.
#[derive(Clone, Debug, Default)]
pub enum FrameSlot<H> {
    /// Request issued, no result yet
    #[default]
    Pending,
    /// Loaded successfully
    Ready(H),
    /// Load failed; never retried
    Failed,
}

impl<H> FrameSlot<H> {
    /// The loaded handle, if any.
    #[inline]
    pub fn ready(&self) -> Option<&H> {
        match self {
            FrameSlot::Ready(handle) => Some(handle),
            _ => None,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, FrameSlot::Pending)
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, FrameSlot::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_paths() {
        let naming = FrameNaming::from(&SequenceConfig::default());
        assert_eq!(naming.path_for(1), "/frames/ezgif-frame-001.jpg");
        assert_eq!(naming.path_for(42), "/frames/ezgif-frame-042.jpg");
        assert_eq!(naming.path_for(278), "/frames/ezgif-frame-278.jpg");
        assert_eq!(naming.number(1234), "1234");
    }

    #[test]
    fn requests_are_one_based_on_disk() {
        let naming = FrameNaming::new("f/", "frame_", ".png", false);
        let requests = naming.requests(3);
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].index, 0);
        assert_eq!(requests[0].path, "f/frame_1.png");
        assert_eq!(requests[2].index, 2);
        assert_eq!(requests[2].path, "f/frame_3.png");
    }

    struct Img(u32, u32, bool);

    impl FrameImage for Img {
        fn natural_width(&self) -> u32 {
            self.0
        }
        fn natural_height(&self) -> u32 {
            self.1
        }
        fn is_complete(&self) -> bool {
            self.2
        }
    }

    #[test]
    fn drawable_needs_dimensions_and_completion() {
        assert!(Img(10, 10, true).is_drawable());
        assert!(!Img(0, 10, true).is_drawable());
        assert!(!Img(10, 0, true).is_drawable());
        assert!(!Img(10, 10, false).is_drawable());
        assert!((&Img(4, 4, true)).is_drawable());
    }

    #[test]
    fn slot_accessors() {
        let slot: FrameSlot<u8> = FrameSlot::default();
        assert!(slot.is_pending());
        assert!(slot.ready().is_none());

        let slot = FrameSlot::Ready(7u8);
        assert_eq!(slot.ready(), Some(&7));

        let slot: FrameSlot<u8> = FrameSlot::Failed;
        assert!(slot.is_failed());
        assert!(slot.ready().is_none());
    }
}

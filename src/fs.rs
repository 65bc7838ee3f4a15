//! Filesystem frame provider.
//!
//! Resolves request paths against a root directory and decodes them to RGBA8
//! with the `image` crate. Decoding runs inline on the polling thread.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::data::{FrameImage, FrameRequest};
use crate::error::FrameLoadError;
use crate::loader::{FrameProvider, LoadResult};

impl FrameImage for RgbaImage {
    fn natural_width(&self) -> u32 {
        self.width()
    }

    fn natural_height(&self) -> u32 {
        self.height()
    }
}

/// Loads frames from disk.
#[derive(Clone, Debug)]
pub struct FsFrameProvider {
    root: PathBuf,
}

impl FsFrameProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a request path onto the root. Leading slashes are treated as
    /// relative to the root, the way a web server would serve them.
    pub fn resolve(&self, request_path: &str) -> PathBuf {
        self.root.join(request_path.trim_start_matches('/'))
    }
}

fn decode_rgba8(path: &Path) -> LoadResult<RgbaImage> {
    let display = path.display().to_string();
    let img = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|err| FrameLoadError::decode(display, err.to_string()))?;
    Ok(img.to_rgba8())
}

impl FrameProvider for FsFrameProvider {
    type Image = RgbaImage;

    async fn load_frame(&self, request: &FrameRequest) -> LoadResult<RgbaImage> {
        let path = self.resolve(&request.path);
        if !path.is_file() {
            return Err(FrameLoadError::NotFound {
                path: path.display().to_string(),
            });
        }
        decode_rgba8(&path)
    }
}

use std::path::{Path, PathBuf};

use crate::capture::domain::frame_source::{CaptureError, DeviceDescriptor, FrameSource};
use crate::shared::frame::Frame;
use crate::shared::image_codec;

/// A single decoded image file.
///
/// Never live: it can be captured for detection but not tracked.
pub struct StaticImageSource {
    path: PathBuf,
    frame: Frame,
}

impl StaticImageSource {
    pub fn open(path: &Path) -> Result<Self, CaptureError> {
        let bytes = std::fs::read(path).map_err(|source| CaptureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let frame = image_codec::decode(&bytes).map_err(|source| CaptureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "Loaded {} ({}x{})",
            path.display(),
            frame.width(),
            frame.height()
        );
        Ok(Self {
            path: path.to_path_buf(),
            frame,
        })
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn into_frame(self) -> Frame {
        self.frame
    }
}

impl FrameSource for StaticImageSource {
    fn capture(&mut self) -> Result<Frame, CaptureError> {
        Ok(self.frame.clone())
    }

    fn is_live(&self) -> bool {
        false
    }

    fn descriptor(&self) -> DeviceDescriptor {
        let label = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        DeviceDescriptor::new(self.path.display().to_string(), label)
    }
}

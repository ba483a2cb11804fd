use std::path::PathBuf;

use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("frame source has no more frames")]
    Exhausted,
    #[error("no image files in {0}")]
    EmptySequence(PathBuf),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Identifies a capture device. Referenced by sources, never owned by the
/// tracking loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub id: String,
    pub label: String,
}

impl DeviceDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Supplies the current frame of a live stream or a static image.
///
/// Capturing is a read-only snapshot; the only state a source may advance
/// is its own stream position.
pub trait FrameSource: Send {
    fn capture(&mut self) -> Result<Frame, CaptureError>;

    /// Whether the source is a running stream that tracking can poll.
    fn is_live(&self) -> bool;

    fn descriptor(&self) -> DeviceDescriptor;

    /// Releases the stream. Called once when the source is detached.
    fn close(&mut self) {}
}

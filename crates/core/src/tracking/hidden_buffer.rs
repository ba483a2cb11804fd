use crate::capture::domain::frame_source::{CaptureError, FrameSource};
use crate::shared::frame::Frame;

/// Off-screen copy of the frame a tracking cycle submits.
///
/// The visible surface is repainted from this buffer once the match
/// arrives, so the boxes always sit on the exact frame they were found in.
#[derive(Debug)]
pub struct HiddenBuffer {
    frame: Frame,
}

impl HiddenBuffer {
    pub fn new() -> Self {
        Self {
            frame: Frame::blank(0, 0),
        }
    }

    /// Captures the source's current frame, taking on its dimensions.
    ///
    /// On failure the previous snapshot is kept.
    pub fn snapshot(&mut self, source: &mut dyn FrameSource) -> Result<&Frame, CaptureError> {
        self.frame = source.capture()?;
        Ok(&self.frame)
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.frame.dimensions()
    }
}

impl Default for HiddenBuffer {
    fn default() -> Self {
        Self::new()
    }
}

use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// Stroke/fill colour and label size shared by every shape in a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawStyle {
    pub color: [u8; 3],
    pub font_px: u32,
}

impl DrawStyle {
    pub const YELLOW: [u8; 3] = [255, 255, 0];
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            color: Self::YELLOW,
            font_px: 15,
        }
    }
}

/// A 2D output surface. Holds no tracking logic.
///
/// Draw calls between two `present()` calls form one batch.
pub trait RenderSurface: Send {
    fn dimensions(&self) -> (u32, u32);

    /// Resizes the surface to the frame and paints it, erasing any shapes.
    fn draw_frame(&mut self, frame: &Frame);

    fn set_style(&mut self, style: &DrawStyle);

    fn stroke_rect(&mut self, rect: &BoundingBox);

    fn fill_text(&mut self, text: &str, x: i32, y: i32);

    /// Ends a draw batch.
    fn present(&mut self) {}
}

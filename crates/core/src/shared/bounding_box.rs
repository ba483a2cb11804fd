use serde::{Deserialize, Serialize};

/// An axis-aligned face box in source-frame pixel coordinates.
///
/// Field names match the wire format of both remote services.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Stable identifier for the `index`-th face of a detection batch.
    ///
    /// Equal geometry at the same index yields the same id, so ids are only
    /// unique within one batch.
    pub fn face_id(&self, index: usize) -> String {
        format!(
            "{index}=x:{};y:{};w:{};h:{}",
            self.x, self.y, self.width, self.height
        )
    }

    /// Clips the box to a `width` x `height` canvas.
    ///
    /// Returns `(x1, y1, x2, y2)` with exclusive right/bottom edges, or
    /// `None` when nothing of the box is visible.
    pub fn clip(&self, width: u32, height: u32) -> Option<(usize, usize, usize, usize)> {
        let x1 = self.x.max(0) as i64;
        let y1 = self.y.max(0) as i64;
        let x2 = (self.x as i64 + self.width as i64).min(width as i64);
        let y2 = (self.y as i64 + self.height as i64).min(height as i64);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some((x1 as usize, y1 as usize, x2 as usize, y2 as usize))
    }
}

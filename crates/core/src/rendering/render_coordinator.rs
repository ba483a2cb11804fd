use crate::detection::domain::detected_face::DetectedFace;
use crate::matching::domain::matching_service::MatchEntry;
use crate::rendering::domain::render_surface::{DrawStyle, RenderSurface};
use crate::shared::constants::LABEL_OFFSET;
use crate::shared::frame::Frame;

/// Turns detection and tracking results into draw batches.
///
/// Every batch starts from a freshly painted frame and re-applies the one
/// style, so nothing carries over between batches.
#[derive(Clone, Debug, Default)]
pub struct RenderCoordinator {
    style: DrawStyle,
}

impl RenderCoordinator {
    pub fn new(style: DrawStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &DrawStyle {
        &self.style
    }

    /// Shows a frame with no overlay.
    pub fn draw_still(&self, surface: &mut dyn RenderSurface, frame: &Frame) {
        surface.draw_frame(frame);
        surface.present();
    }

    /// Draws one box and index label per candidate, in candidate order.
    pub fn draw_candidates(
        &self,
        surface: &mut dyn RenderSurface,
        frame: &Frame,
        faces: &[DetectedFace],
    ) {
        surface.draw_frame(frame);
        surface.set_style(&self.style);
        for (i, face) in faces.iter().enumerate() {
            let rect = face.bounding_box();
            surface.stroke_rect(rect);
            surface.fill_text(
                &i.to_string(),
                rect.x.saturating_add(LABEL_OFFSET.0),
                rect.y.saturating_add(LABEL_OFFSET.1),
            );
        }
        surface.present();
    }

    /// Draws the matched snapshot and a box per verified entry, unlabelled.
    ///
    /// Returns how many boxes were drawn.
    pub fn draw_tracked_matches(
        &self,
        surface: &mut dyn RenderSurface,
        snapshot: &Frame,
        entries: &[MatchEntry],
    ) -> usize {
        surface.draw_frame(snapshot);
        surface.set_style(&self.style);
        let mut drawn = 0;
        for entry in entries.iter().filter(|e| e.verified) {
            surface.stroke_rect(&entry.bounding_box);
            drawn += 1;
        }
        surface.present();
        drawn
    }
}

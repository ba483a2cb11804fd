use std::path::{Path, PathBuf};

use crate::rendering::domain::render_surface::{DrawStyle, RenderSurface};
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

const LINE_WIDTH: usize = 2;

/// A text label as it was drawn: content and anchor point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

/// In-memory RGB canvas.
///
/// Rectangles are stroked into the pixels. Glyph rendering is out of
/// reach without a font, so labels are recorded and marked with a small
/// filled tag at their anchor. With an output directory, every presented
/// batch is written as `frame_NNNNN.png`.
pub struct FrameSurface {
    canvas: Frame,
    style: DrawStyle,
    labels: Vec<Label>,
    output_dir: Option<PathBuf>,
    presented: usize,
}

impl FrameSurface {
    pub fn new() -> Self {
        Self {
            canvas: Frame::blank(0, 0),
            style: DrawStyle::default(),
            labels: Vec::new(),
            output_dir: None,
            presented: 0,
        }
    }

    /// Writes each presented batch into `dir`.
    pub fn with_output_dir(mut self, dir: &Path) -> Self {
        self.output_dir = Some(dir.to_path_buf());
        self
    }

    pub fn canvas(&self) -> &Frame {
        &self.canvas
    }

    /// Labels drawn since the last `draw_frame`.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn presented(&self) -> usize {
        self.presented
    }

    pub fn save(&self, path: &Path) -> Result<(), image::ImageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(image::ImageError::IoError)?;
        }
        let img = image::RgbImage::from_raw(
            self.canvas.width(),
            self.canvas.height(),
            self.canvas.data().to_vec(),
        )
        .ok_or_else(|| {
            image::ImageError::Parameter(image::error::ParameterError::from_kind(
                image::error::ParameterErrorKind::DimensionMismatch,
            ))
        })?;
        img.save(path)
    }

    fn fill(&mut self, x1: usize, y1: usize, x2: usize, y2: usize) {
        let color = self.style.color;
        let mut px = self.canvas.as_ndarray_mut();
        for row in y1..y2 {
            for col in x1..x2 {
                for (c, &value) in color.iter().enumerate() {
                    px[[row, col, c]] = value;
                }
            }
        }
    }
}

impl Default for FrameSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for FrameSurface {
    fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    fn draw_frame(&mut self, frame: &Frame) {
        self.canvas = frame.clone();
        self.labels.clear();
    }

    fn set_style(&mut self, style: &DrawStyle) {
        self.style = *style;
    }

    fn stroke_rect(&mut self, rect: &BoundingBox) {
        let Some((x1, y1, x2, y2)) = rect.clip(self.canvas.width(), self.canvas.height()) else {
            return;
        };
        let line = LINE_WIDTH.min(x2 - x1).min(y2 - y1);
        self.fill(x1, y1, x2, y1 + line);
        self.fill(x1, y2 - line, x2, y2);
        self.fill(x1, y1, x1 + line, y2);
        self.fill(x2 - line, y1, x2, y2);
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32) {
        self.labels.push(Label {
            text: text.to_string(),
            x,
            y,
        });
        // Tag sits above the baseline, like the glyphs would.
        let size = (self.style.font_px as i32 / 3).max(1);
        let tag = BoundingBox::new(x, y.saturating_sub(size), size, size);
        if let Some((x1, y1, x2, y2)) = tag.clip(self.canvas.width(), self.canvas.height()) {
            self.fill(x1, y1, x2, y2);
        }
    }

    fn present(&mut self) {
        let Some(dir) = &self.output_dir else {
            self.presented += 1;
            return;
        };
        let path = dir.join(format!("frame_{:05}.png", self.presented));
        if let Err(e) = self.save(&path) {
            log::warn!("Failed to write {}: {e}", path.display());
        }
        self.presented += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YELLOW: [u8; 3] = DrawStyle::YELLOW;

    fn pixel(surface: &FrameSurface, x: usize, y: usize) -> [u8; 3] {
        let px = surface.canvas().as_ndarray();
        [px[[y, x, 0]], px[[y, x, 1]], px[[y, x, 2]]]
    }

    #[test]
    fn test_draw_frame_resizes_canvas() {
        let mut surface = FrameSurface::new();
        surface.draw_frame(&Frame::blank(20, 10));
        assert_eq!(surface.dimensions(), (20, 10));
    }

    #[test]
    fn test_stroke_rect_paints_border_only() {
        let mut surface = FrameSurface::new();
        surface.draw_frame(&Frame::blank(20, 20));
        surface.set_style(&DrawStyle::default());

        surface.stroke_rect(&BoundingBox::new(2, 2, 10, 10));

        assert_eq!(pixel(&surface, 2, 2), YELLOW);
        assert_eq!(pixel(&surface, 11, 11), YELLOW);
        assert_eq!(pixel(&surface, 6, 6), [0, 0, 0]);
        assert_eq!(pixel(&surface, 15, 15), [0, 0, 0]);
    }

    #[test]
    fn test_stroke_rect_clips_to_canvas() {
        let mut surface = FrameSurface::new();
        surface.draw_frame(&Frame::blank(10, 10));
        surface.stroke_rect(&BoundingBox::new(-5, -5, 30, 30));
        surface.stroke_rect(&BoundingBox::new(50, 50, 5, 5));
        assert_eq!(pixel(&surface, 9, 5), YELLOW);
    }

    #[test]
    fn test_draw_frame_erases_previous_shapes() {
        let mut surface = FrameSurface::new();
        surface.draw_frame(&Frame::blank(10, 10));
        surface.stroke_rect(&BoundingBox::new(0, 0, 10, 10));
        surface.fill_text("0", 2, 15);

        surface.draw_frame(&Frame::blank(10, 10));

        assert_eq!(pixel(&surface, 0, 0), [0, 0, 0]);
        assert!(surface.labels().is_empty());
    }

    #[test]
    fn test_fill_text_records_label() {
        let mut surface = FrameSurface::new();
        surface.draw_frame(&Frame::blank(40, 40));
        surface.fill_text("3", 12, 35);
        assert_eq!(
            surface.labels(),
            &[Label {
                text: "3".into(),
                x: 12,
                y: 35
            }]
        );
        assert_eq!(pixel(&surface, 12, 31), YELLOW);
    }

    #[test]
    fn test_fill_text_at_extreme_anchor_draws_nothing() {
        let mut surface = FrameSurface::new();
        surface.draw_frame(&Frame::blank(10, 10));

        surface.fill_text("0", 0, i32::MIN);
        surface.fill_text("1", i32::MAX, i32::MAX);

        assert_eq!(surface.labels().len(), 2);
        assert_eq!(pixel(&surface, 0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_present_writes_numbered_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = FrameSurface::new().with_output_dir(dir.path());
        surface.draw_frame(&Frame::blank(8, 8));

        surface.present();
        surface.present();

        assert!(dir.path().join("frame_00000.png").exists());
        assert!(dir.path().join("frame_00001.png").exists());
        assert_eq!(surface.presented(), 2);
    }

    #[test]
    fn test_present_without_dir_only_counts() {
        let mut surface = FrameSurface::new();
        surface.draw_frame(&Frame::blank(8, 8));
        surface.present();
        assert_eq!(surface.presented(), 1);
    }
}

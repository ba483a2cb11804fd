use ndarray::{ArrayView3, ArrayViewMut3};

/// Bytes per pixel; frames are always packed RGB.
pub const CHANNELS: usize = 3;

/// Packed RGB pixels of one captured or loaded image, row-major.
///
/// Only the codec and the canvas look inside; the tracking loop just moves
/// frames between the source, the hidden buffer and the surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// A black frame of the given size.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(
            vec![0u8; (width as usize) * (height as usize) * CHANNELS],
            width,
            height,
        )
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// `[row, column, channel]` view.
    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, CHANNELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_frame_is_black_rgb() {
        let frame = Frame::blank(4, 3);
        assert_eq!(frame.dimensions(), (4, 3));
        assert_eq!(frame.data().len(), 4 * 3 * CHANNELS);
        assert!(frame.data().iter().all(|&b| b == 0));
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * 3")]
    fn test_short_buffer_rejected_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2);
    }

    #[test]
    fn test_pixel_view_indexes_row_then_column() {
        let mut data = vec![0u8; 2 * 3 * CHANNELS];
        // row 1, column 2, green channel
        data[(3 + 2) * CHANNELS + 1] = 90;
        let frame = Frame::new(data, 3, 2);

        let px = frame.as_ndarray();
        assert_eq!(px.shape(), &[2, 3, 3]);
        assert_eq!(px[[1, 2, 1]], 90);
    }

    #[test]
    fn test_snapshot_copy_is_detached_from_source() {
        let live = Frame::blank(2, 2);
        let mut snapshot = live.clone();
        snapshot.as_ndarray_mut()[[0, 1, 0]] = 255;
        assert_eq!(snapshot.data()[CHANNELS], 255);
        assert_eq!(live.data()[CHANNELS], 0);
    }
}

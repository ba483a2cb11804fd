use std::io::Cursor;

use image::{ImageFormat, RgbImage};

use crate::shared::frame::Frame;

/// Encodes a frame as PNG bytes for upload.
pub fn encode_png(frame: &Frame) -> Result<Vec<u8>, image::ImageError> {
    let img = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        .ok_or_else(|| {
            image::ImageError::Parameter(image::error::ParameterError::from_kind(
                image::error::ParameterErrorKind::DimensionMismatch,
            ))
        })?;
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Decodes any supported image format into an RGB frame.
pub fn decode(bytes: &[u8]) -> Result<Frame, image::ImageError> {
    Ok(from_rgb(image::load_from_memory(bytes)?.to_rgb8()))
}

pub fn from_rgb(img: RgbImage) -> Frame {
    let (w, h) = img.dimensions();
    Frame::new(img.into_raw(), w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_produces_png_signature() {
        let bytes = encode_png(&Frame::blank(8, 4)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_decode_restores_pixels() {
        let mut frame = Frame::blank(3, 2);
        frame.as_ndarray_mut()[[1, 2, 0]] = 200;
        let decoded = decode(&encode_png(&frame).unwrap()).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode(b"not an image").is_err());
    }
}

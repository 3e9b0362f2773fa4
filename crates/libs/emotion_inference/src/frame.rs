use crate::error::{InferenceError, Result};
use image::RgbImage;

/// A decoded RGB8 frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGB8 rows, `width * height * 3` bytes.
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(InferenceError::InvalidImage(format!(
                "frame buffer is {} bytes, expected {expected} for {width}x{height} RGB8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[must_use]
    pub fn from_rgb_image(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }

    /// Decodes an encoded image (JPEG, PNG, ...) into a frame.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| InferenceError::InvalidImage(format!("failed to decode image: {e}")))?;
        Ok(Self::from_rgb_image(decoded.to_rgb8()))
    }

    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            InferenceError::InvalidImage("frame buffer does not match its dimensions".to_string())
        })
    }

    /// Encodes the frame as JPEG, for the streamed preview.
    pub fn to_jpeg(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, 80);
        encoder
            .encode(
                &self.data,
                self.width,
                self.height,
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| InferenceError::InvalidImage(format!("failed to encode JPEG: {e}")))?;
        Ok(bytes)
    }
}

/// Axis-aligned face bounding box in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceRect {
    #[must_use]
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

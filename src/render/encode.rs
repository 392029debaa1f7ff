//! Source decoding and cover encoding.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbImage};

use crate::error::CovertoneError;

/// JPEG quality of exported covers.
pub const JPEG_QUALITY: u8 = 90;

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg { quality: u8 },
    Png,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg { quality: JPEG_QUALITY }
    }
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// A finished cover.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedCover {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

/// Encode an RGB buffer.
pub fn encode(img: &RgbImage, format: OutputFormat) -> Result<EncodedCover, CovertoneError> {
    let (width, height) = img.dimensions();
    let mut bytes = Vec::new();
    let result = match format {
        OutputFormat::Jpeg { quality } => {
            JpegEncoder::new_with_quality(&mut bytes, quality).write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        }
        OutputFormat::Png => {
            PngEncoder::new(&mut bytes).write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        }
    };
    result.map_err(|e| CovertoneError::Encode(e.to_string()))?;

    Ok(EncodedCover {
        bytes,
        format,
        width,
        height,
    })
}

/// Decode source photo bytes (any format the `image` crate recognizes).
pub fn decode_source(bytes: &[u8]) -> Result<DynamicImage, CovertoneError> {
    let img = image::load_from_memory(bytes).map_err(|e| CovertoneError::SourceDecode(e.to_string()))?;
    if img.width() == 0 || img.height() == 0 {
        return Err(CovertoneError::SourceDecode("image has no pixels".to_string()));
    }
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn checker() -> RgbImage {
        RgbImage::from_fn(16, 8, |x, y| if (x + y) % 2 == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) })
    }

    #[test]
    fn test_default_is_jpeg_90() {
        assert_eq!(OutputFormat::default(), OutputFormat::Jpeg { quality: 90 });
        assert_eq!(OutputFormat::default().mime_type(), "image/jpeg");
    }

    #[test]
    fn test_jpeg_decodes_back() {
        let cover = encode(&checker(), OutputFormat::default()).unwrap();
        assert_eq!(&cover.bytes[..2], &[0xFF, 0xD8]);
        let img = decode_source(&cover.bytes).unwrap();
        assert_eq!((img.width(), img.height()), (16, 8));
    }

    #[test]
    fn test_png_is_lossless() {
        let cover = encode(&checker(), OutputFormat::Png).unwrap();
        let img = decode_source(&cover.bytes).unwrap().to_rgb8();
        assert_eq!(img, checker());
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = decode_source(b"not an image").unwrap_err();
        assert!(matches!(err, CovertoneError::SourceDecode(_)));
    }
}

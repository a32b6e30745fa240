//! [`ImageCodec`] backed by the `image` crate.
//!
//! Images are decoded straight to 8-bit RGB: the collage is encoded as JPEG,
//! so alpha would be discarded anyway.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ImageReader, Rgb, RgbImage};

use crate::collage::{CodecError, ImageCodec, Layer};
use crate::constraint::{CanvasColor, Size};

/// Pure-Rust codec: decodes JPEG and PNG, encodes JPEG.
#[derive(Copy, Clone, Debug)]
pub struct ImageCrateCodec {
    filter: FilterType,
}

impl Default for ImageCrateCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCrateCodec {
    /// Lanczos3 resampling.
    pub const fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }

    /// Use a different resampling filter.
    pub const fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }
}

impl ImageCodec for ImageCrateCodec {
    type Image = RgbImage;

    fn decode(&self, bytes: &[u8]) -> Result<RgbImage, CodecError> {
        let image =
            image::load_from_memory(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
        Ok(image.into_rgb8())
    }

    fn metadata(&self, bytes: &[u8]) -> Result<Size, CodecError> {
        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))?
            .into_dimensions()
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        Ok(Size::new(width, height))
    }

    fn dimensions(&self, image: &RgbImage) -> Size {
        Size::new(image.width(), image.height())
    }

    fn resize(&self, image: &RgbImage, to: Size) -> Result<RgbImage, CodecError> {
        if to.is_empty() {
            return Err(CodecError::Resize(format!(
                "cannot resize to {}×{}",
                to.width, to.height
            )));
        }
        Ok(imageops::resize(image, to.width, to.height, self.filter))
    }

    fn composite(
        &self,
        canvas: Size,
        background: CanvasColor,
        quality: u8,
        layers: &[Layer<'_, RgbImage>],
    ) -> Result<Vec<u8>, CodecError> {
        let mut out = RgbImage::from_pixel(canvas.width, canvas.height, Rgb(background.to_rgb()));
        for layer in layers {
            let p = &layer.placement;
            if !p.is_visible() {
                continue;
            }
            match p.source_crop {
                Some(c) => {
                    let visible =
                        imageops::crop_imm(layer.image, c.x, c.y, c.width, c.height).to_image();
                    imageops::overlay(
                        &mut out,
                        &visible,
                        i64::from(p.x + c.x),
                        i64::from(p.y + c.y),
                    );
                }
                None => imageops::overlay(&mut out, layer.image, i64::from(p.x), i64::from(p.y)),
            }
        }
        self.encode(&out, quality)
    }

    fn encode(&self, image: &RgbImage, quality: u8) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100))
            .encode_image(image)
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        Ok(buf)
    }
}

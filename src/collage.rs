//! Collage pipeline: decode, normalize, lay out, composite, fit.
//!
//! [`build_collage`] is the single operation a request handler needs. Pixel
//! work goes through an [`ImageCodec`]; geometry comes from
//! [`plan_collage`]. Any failure aborts the whole build: there is no
//! partial collage.
//!
//! ```text
//!     bytes ─decode─▶ image ─normalize─▶ 500px tall ─┐
//!     bytes ─decode─▶ image ─normalize─▶ 500px tall ─┼─▶ plan_collage ─▶ scale ─▶ composite ─▶ fit ─▶ JPEG
//!     bytes ─decode─▶ image ─normalize─▶ 500px tall ─┘
//! ```
//!
//! Per-image decode and resize have no data dependencies and run on
//! `rayon` with the `parallel` feature. Planning and composition wait for
//! all of them.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::compose::Placement;
use crate::constraint::{CanvasColor, LayoutError, Size, fit_output, normalized_size};
use crate::plan::{CollagePlan, plan_collage};

/// Settings for one collage build. Immutable once built.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CollageConfig {
    /// Height every source is normalized to before layout. Shorter sources
    /// are not enlarged.
    pub normalize_height: u32,
    /// Bounds the finished collage is fitted into.
    pub max_output: Size,
    /// Canvas fill behind the images.
    pub background: CanvasColor,
    /// JPEG quality, 1–100.
    pub jpeg_quality: u8,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CollageConfig {
    pub const DEFAULT_NORMALIZE_HEIGHT: u32 = 500;
    pub const DEFAULT_MAX_OUTPUT: Size = Size::new(5000, 5000);
    pub const DEFAULT_JPEG_QUALITY: u8 = 80;

    /// Defaults: 500px normalization, 5000×5000 bound, black, quality 80.
    pub const fn new() -> Self {
        Self {
            normalize_height: Self::DEFAULT_NORMALIZE_HEIGHT,
            max_output: Self::DEFAULT_MAX_OUTPUT,
            background: CanvasColor::Black,
            jpeg_quality: Self::DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set the normalization height.
    pub fn normalize_height(mut self, height: u32) -> Self {
        self.normalize_height = height;
        self
    }

    /// Set the output bounds.
    pub fn max_output(mut self, width: u32, height: u32) -> Self {
        self.max_output = Size::new(width, height);
        self
    }

    /// Set the canvas background.
    pub fn background(mut self, color: CanvasColor) -> Self {
        self.background = color;
        self
    }

    /// Set JPEG quality, clamped to 1–100.
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

/// Failure inside an [`ImageCodec`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("resize failed: {0}")]
    Resize(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Why a collage could not be built.
#[derive(Debug, thiserror::Error)]
pub enum CollageError {
    #[error("no images provided")]
    NoImages,
    #[error("image {index} is empty")]
    EmptyImage { index: usize },
    #[error("image {index} could not be decoded")]
    Decode {
        index: usize,
        #[source]
        source: CodecError,
    },
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl CollageError {
    /// Whether the caller sent bad input (as opposed to a server-side failure).
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::NoImages | Self::EmptyImage { .. })
    }
}

/// One image to draw during compositing.
#[derive(Debug)]
pub struct Layer<'a, I> {
    pub image: &'a I,
    pub placement: Placement,
}

/// Pixel operations the pipeline delegates.
///
/// Implementations must be deterministic for identical input so repeated
/// builds produce identical output.
pub trait ImageCodec: Sync {
    /// Decoded image handle.
    type Image: Send;

    /// Decode an encoded buffer.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Image, CodecError>;

    /// Read dimensions of an encoded buffer without a full decode.
    fn metadata(&self, bytes: &[u8]) -> Result<Size, CodecError>;

    /// Dimensions of a decoded image.
    fn dimensions(&self, image: &Self::Image) -> Size;

    /// Resample to exactly `to`.
    fn resize(&self, image: &Self::Image, to: Size) -> Result<Self::Image, CodecError>;

    /// Fill a `canvas`-sized background, draw every layer at its placement
    /// (clipped to its `source_crop`), and encode the result.
    fn composite(
        &self,
        canvas: Size,
        background: CanvasColor,
        quality: u8,
        layers: &[Layer<'_, Self::Image>],
    ) -> Result<Vec<u8>, CodecError>;

    /// Encode a decoded image.
    fn encode(&self, image: &Self::Image, quality: u8) -> Result<Vec<u8>, CodecError>;
}

/// A finished collage.
#[derive(Clone, Debug)]
pub struct Collage {
    /// Encoded output.
    pub encoded: Vec<u8>,
    /// Geometry the collage was composited from.
    pub plan: CollagePlan,
    /// Dimensions of `encoded` (after fitting into the output bounds).
    pub output: Size,
    /// Wall time of the build.
    pub elapsed: Duration,
}

/// Build a collage from encoded images, in the given order.
pub fn build_collage<C, B>(
    codec: &C,
    images: &[B],
    config: &CollageConfig,
) -> Result<Collage, CollageError>
where
    C: ImageCodec,
    B: AsRef<[u8]> + Sync,
{
    let start = Instant::now();
    if images.is_empty() {
        return Err(CollageError::NoImages);
    }
    if let Some(index) = images.iter().position(|b| b.as_ref().is_empty()) {
        return Err(CollageError::EmptyImage { index });
    }

    let normalized = normalize_all(codec, images, config.normalize_height)?;
    let sizes: Vec<Size> = normalized.iter().map(|i| codec.dimensions(i)).collect();

    let plan = plan_collage(&sizes)?;
    let scaled = rescale_all(codec, normalized, plan.scaled.sizes())?;

    let layers: Vec<Layer<'_, C::Image>> = plan
        .layout
        .placements
        .iter()
        .map(|&placement| Layer {
            image: &scaled[placement.index],
            placement,
        })
        .collect();
    let composite = codec.composite(
        plan.layout.canvas,
        config.background,
        config.jpeg_quality,
        &layers,
    )?;

    let (encoded, output) = fit_to_bounds(codec, composite, config)?;
    let elapsed = start.elapsed();

    info!(
        images = images.len(),
        rows = plan.rows.row_count(),
        canvas = %format_size(plan.layout.canvas),
        output = %format_size(output),
        bytes = encoded.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "collage built"
    );

    Ok(Collage {
        encoded,
        plan,
        output,
        elapsed,
    })
}

fn normalize_all<C, B>(codec: &C, images: &[B], height: u32) -> Result<Vec<C::Image>, CollageError>
where
    C: ImageCodec,
    B: AsRef<[u8]> + Sync,
{
    let prepare = |(index, bytes): (usize, &B)| normalize_one(codec, index, bytes.as_ref(), height);

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        images.par_iter().enumerate().map(prepare).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        images.iter().enumerate().map(prepare).collect()
    }
}

fn normalize_one<C: ImageCodec>(
    codec: &C,
    index: usize,
    bytes: &[u8],
    height: u32,
) -> Result<C::Image, CollageError> {
    let image = codec
        .decode(bytes)
        .map_err(|source| CollageError::Decode { index, source })?;
    let source = codec.dimensions(&image);
    let target = normalized_size(source, height)?;
    debug!(
        index,
        source = %format_size(source),
        normalized = %format_size(target),
        "decoded image"
    );
    if target == source {
        Ok(image)
    } else {
        Ok(codec.resize(&image, target)?)
    }
}

fn rescale_all<C: ImageCodec>(
    codec: &C,
    images: Vec<C::Image>,
    sizes: Vec<Size>,
) -> Result<Vec<C::Image>, CollageError> {
    if images.len() != sizes.len() {
        return Err(LayoutError::InvalidRows.into());
    }
    let rescale = |(image, to): (C::Image, Size)| -> Result<C::Image, CollageError> {
        if codec.dimensions(&image) == to {
            Ok(image)
        } else {
            Ok(codec.resize(&image, to)?)
        }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        images
            .into_par_iter()
            .zip(sizes.into_par_iter())
            .map(rescale)
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        images.into_iter().zip(sizes).map(rescale).collect()
    }
}

/// Shrink the encoded composite into `config.max_output` if it overflows.
fn fit_to_bounds<C: ImageCodec>(
    codec: &C,
    composite: Vec<u8>,
    config: &CollageConfig,
) -> Result<(Vec<u8>, Size), CollageError> {
    let actual = codec.metadata(&composite)?;
    let target = fit_output(actual, config.max_output)?;
    if target == actual {
        return Ok((composite, actual));
    }

    debug!(
        from = %format_size(actual),
        to = %format_size(target),
        "fitting collage into output bounds"
    );
    let image = codec.decode(&composite)?;
    let resized = codec.resize(&image, target)?;
    Ok((codec.encode(&resized, config.jpeg_quality)?, target))
}

fn format_size(s: Size) -> String {
    format!("{}×{}", s.width, s.height)
}

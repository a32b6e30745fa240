//! Shared geometry and the size constraints applied around a collage.
//!
//! Two constraints bracket the row layout: every source is first normalized
//! to a common height (never enlarged), and the finished canvas is fitted
//! into the output bounds. Both preserve aspect ratio. Pure geometry, no
//! pixel operations.
//!
//! # Example
//!
//! ```
//! use zencollage::{Size, fit_output, normalized_size};
//!
//! // 1000×2000 source normalized to 500px tall
//! assert_eq!(normalized_size(Size::new(1000, 2000), 500).unwrap(), Size::new(250, 500));
//!
//! // 6000×3000 canvas fitted into 5000×5000
//! assert_eq!(
//!     fit_output(Size::new(6000, 3000), Size::new(5000, 5000)).unwrap(),
//!     Size::new(5000, 2500)
//! );
//! ```

use core::fmt;

use num_traits::Float;

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either axis is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether this rect lies inside `(0, 0, size.width, size.height)`.
    pub fn is_within(&self, size: Size) -> bool {
        self.right() <= size.width && self.bottom() <= size.height
    }

    /// Whether two rects share at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Canvas background color.
///
/// The collage is encoded without alpha, so a translucent color is flattened
/// over black before filling (see [`CanvasColor::to_rgb`]).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CanvasColor {
    /// Transparent black `[0, 0, 0, 0]`. Renders as black.
    Transparent,
    /// sRGB color with alpha (8-bit per channel).
    Srgb { r: u8, g: u8, b: u8, a: u8 },
    /// Opaque black, the collage default.
    #[default]
    Black,
}

impl CanvasColor {
    /// White, fully opaque.
    pub const fn white() -> Self {
        Self::Srgb {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        }
    }

    /// Black, fully opaque.
    pub const fn black() -> Self {
        Self::Black
    }

    /// Opaque RGB fill, alpha flattened over black.
    pub fn to_rgb(&self) -> [u8; 3] {
        match *self {
            Self::Transparent | Self::Black => [0, 0, 0],
            Self::Srgb { r, g, b, a } => {
                let flatten = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
                [flatten(r), flatten(g), flatten(b)]
            }
        }
    }
}

/// Size a source is resampled to before layout: `height` tall, width
/// derived from the source aspect ratio. Sources already at most `height`
/// tall are left alone.
pub fn normalized_size(source: Size, height: u32) -> Result<Size, LayoutError> {
    if source.is_empty() {
        return Err(LayoutError::ZeroSourceDimension);
    }
    if height == 0 {
        return Err(LayoutError::ZeroTargetDimension);
    }
    if source.height <= height {
        return Ok(source);
    }
    let width = round_u32(source.width as f64 * height as f64 / source.height as f64).max(1);
    Ok(Size::new(width, height))
}

/// Fit a finished canvas into `max`, preserving aspect ratio.
///
/// Width is checked first: an over-wide canvas is scaled to `max.width`.
/// Otherwise an over-tall canvas is scaled to `max.height`. A width fit that
/// still overflows the height bound gets a second, height-driven fit, so the
/// result always lies within `max`. Never upscales.
pub fn fit_output(size: Size, max: Size) -> Result<Size, LayoutError> {
    if size.is_empty() {
        return Err(LayoutError::ZeroSourceDimension);
    }
    if max.is_empty() {
        return Err(LayoutError::ZeroTargetDimension);
    }

    let (mut w, mut h) = (size.width, size.height);
    if w > max.width {
        h = round_u32(size.height as f64 / size.width as f64 * max.width as f64).max(1);
        w = max.width;
    } else if h > max.height {
        w = round_u32(size.width as f64 / size.height as f64 * max.height as f64).max(1);
        h = max.height;
    }

    if h > max.height {
        w = round_u32(size.width as f64 / size.height as f64 * max.height as f64).max(1);
        h = max.height;
    }
    Ok(Size::new(w, h))
}

/// Layout computation error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// No images to lay out.
    NoImages,
    /// Source image has zero width or height.
    ZeroSourceDimension,
    /// Target width or height is zero.
    ZeroTargetDimension,
    /// A partition into zero rows was requested.
    ZeroRows,
    /// More rows requested than there are images to fill them.
    TooManyRows { rows: usize, images: usize },
    /// Row ranges are empty, overlap, leave gaps, or run past the image list.
    InvalidRows,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoImages => f.write_str("no images to lay out"),
            Self::ZeroSourceDimension => f.write_str("source image has zero width or height"),
            Self::ZeroTargetDimension => f.write_str("target width or height is zero"),
            Self::ZeroRows => f.write_str("cannot partition into zero rows"),
            Self::TooManyRows { rows, images } => {
                write!(f, "cannot split {images} images into {rows} non-empty rows")
            }
            Self::InvalidRows => f.write_str("row ranges do not partition the image list"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LayoutError {}

/// Round half away from zero and truncate into `u32`. Negative inputs
/// saturate to 0.
pub(crate) fn round_u32(v: f64) -> u32 {
    Float::round(v) as u32
}

/// Smallest even integer ≥ `n`.
pub(crate) const fn ensure_even(n: u32) -> u32 {
    if n % 2 == 0 { n } else { n + 1 }
}

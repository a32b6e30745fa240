//! Canvas size and absolute placement of every scaled image.
//!
//! Rows are stacked top to bottom; images within a row run left to right
//! from `x = 0`. The canvas is as wide as the narrowest scaled row and as
//! tall as the stacked row heights, each rounded up to an even integer.
//!
//! ```text
//!     (0,0) ┌──────┬────────────┐
//!           │  0   │     1      │  row 0, height = tallest image
//!           ├────┬─┴────────────┤
//!           │ 2  │      3       │  row 1
//!           └────┴──────────────┘
//! ```
//!
//! A row that rounds out a pixel or two wider than the canvas has its last
//! images clipped at the right edge; [`Placement::source_crop`] records the
//! visible part.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use core::ops::Range;

use crate::constraint::{LayoutError, Rect, Size, ensure_even};
use crate::scale::ScaledRows;

/// Where one image lands on the canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Index of the image in the input list.
    pub index: usize,
    /// Left edge on the canvas.
    pub x: u32,
    /// Top edge on the canvas.
    pub y: u32,
    /// Scaled image size.
    pub size: Size,
    /// Part of the scaled image that lies on the canvas, in image
    /// coordinates. `None` = the whole image.
    pub source_crop: Option<Rect>,
}

impl Placement {
    /// Full footprint on the canvas, ignoring clipping.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.size.width, self.size.height)
    }

    /// Footprint on the canvas after clipping.
    pub fn visible(&self) -> Rect {
        match self.source_crop {
            Some(c) => Rect::new(self.x + c.x, self.y + c.y, c.width, c.height),
            None => self.rect(),
        }
    }

    /// Whether any pixel of the image reaches the canvas.
    pub fn is_visible(&self) -> bool {
        let v = self.visible();
        v.width > 0 && v.height > 0
    }
}

/// One horizontal band of the canvas.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowBand {
    /// Images in this row.
    pub images: Range<usize>,
    /// Top edge on the canvas.
    pub y: u32,
    /// Tallest image in the row.
    pub height: u32,
    /// Total scaled width of the row, before clipping.
    pub width: u32,
}

/// Final collage geometry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    /// Canvas dimensions. Both even.
    pub canvas: Size,
    /// Sum of row heights before the even round-up.
    pub content_height: u32,
    /// Row bands, top first.
    pub rows: Vec<RowBand>,
    /// One placement per image, row-major.
    pub placements: Vec<Placement>,
}

impl Layout {
    /// Whether any placement had to be clipped at the right edge.
    pub fn needs_clipping(&self) -> bool {
        self.placements.iter().any(|p| p.source_crop.is_some())
    }
}

/// Compute canvas size and placements for scaled rows.
pub fn compose(scaled: &ScaledRows) -> Result<Layout, LayoutError> {
    if scaled.rows.is_empty() {
        return Err(LayoutError::NoImages);
    }

    let min_width = scaled
        .rows
        .iter()
        .map(|r| r.width())
        .min()
        .unwrap_or(0);
    let canvas_width = ensure_even(saturate(min_width));

    let mut rows = Vec::with_capacity(scaled.rows.len());
    let mut placements = Vec::new();
    let mut y = 0u32;
    for row in &scaled.rows {
        let height = row.height();
        let mut x = 0u32;
        for (index, &size) in row.images.clone().zip(&row.sizes) {
            placements.push(Placement {
                index,
                x,
                y,
                size,
                source_crop: clip_to_width(x, size, canvas_width),
            });
            x = x.saturating_add(size.width);
        }
        rows.push(RowBand {
            images: row.images.clone(),
            y,
            height,
            width: saturate(row.width()),
        });
        y = y.saturating_add(height);
    }

    let canvas = Size::new(canvas_width, ensure_even(y));
    if canvas.is_empty() {
        return Err(LayoutError::ZeroTargetDimension);
    }

    tracing::debug!(
        width = canvas.width,
        height = canvas.height,
        rows = rows.len(),
        images = placements.len(),
        "composed canvas"
    );

    Ok(Layout {
        canvas,
        content_height: y,
        rows,
        placements,
    })
}

/// Visible part of an image starting at `x` on a canvas `canvas_width` wide.
fn clip_to_width(x: u32, size: Size, canvas_width: u32) -> Option<Rect> {
    if x.saturating_add(size.width) <= canvas_width {
        return None;
    }
    let visible = canvas_width.saturating_sub(x);
    Some(Rect::new(0, 0, visible, size.height))
}

fn saturate(v: u64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

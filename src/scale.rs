//! Per-row scale factors that bring every row to a common width.
//!
//! Each row is shrunk by `min_row_width / row_width`, so the narrowest row
//! stays untouched and wider rows converge on it. Width and height of each
//! image are rounded independently (width first), so an image's aspect ratio
//! may drift by a fraction of a pixel. That drift is accepted.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
use core::ops::Range;

use crate::constraint::{LayoutError, Size, round_u32};

/// One row after scaling.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledRow {
    /// Indices of the images in this row.
    pub images: Range<usize>,
    /// Total width of the row before scaling.
    pub source_width: u64,
    /// Multiplier applied to every image in the row (≤ 1).
    pub factor: f64,
    /// New per-image sizes, in row order.
    pub sizes: Vec<Size>,
}

impl ScaledRow {
    /// Total scaled width.
    pub fn width(&self) -> u64 {
        self.sizes.iter().map(|s| s.width as u64).sum()
    }

    /// Tallest scaled image in the row.
    pub fn height(&self) -> u32 {
        self.sizes.iter().map(|s| s.height).max().unwrap_or(0)
    }

    /// Whether no image in this row changes size.
    pub fn is_identity(&self) -> bool {
        self.factor == 1.0
    }
}

/// All rows after scaling, top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledRows {
    /// Width every row was scaled toward.
    pub target_width: u64,
    pub rows: Vec<ScaledRow>,
}

impl ScaledRows {
    /// Scaled size of every image in original input order.
    pub fn sizes(&self) -> Vec<Size> {
        self.rows.iter().flat_map(|r| r.sizes.iter().copied()).collect()
    }
}

/// Scale `rows` of `sizes` so their widths converge on the narrowest row.
///
/// `rows` must be contiguous, non-empty ranges that cover `sizes` exactly,
/// as produced by [`plan_rows`](crate::plan::plan_rows).
pub fn scale_rows(sizes: &[Size], rows: &[Range<usize>]) -> Result<ScaledRows, LayoutError> {
    if sizes.is_empty() || rows.is_empty() {
        return Err(LayoutError::NoImages);
    }
    check_rows(rows, sizes.len())?;

    let widths: Vec<u64> = rows
        .iter()
        .map(|r| sizes[r.clone()].iter().map(|s| s.width as u64).sum())
        .collect();
    let target_width = widths.iter().copied().min().unwrap_or(0);
    if target_width == 0 {
        return Err(LayoutError::ZeroSourceDimension);
    }

    let rows = rows
        .iter()
        .zip(&widths)
        .map(|(range, &source_width)| {
            let factor = target_width as f64 / source_width as f64;
            let sizes = sizes[range.clone()]
                .iter()
                .map(|s| {
                    let width = round_u32(s.width as f64 * factor).max(1);
                    let height = round_u32(s.height as f64 * factor).max(1);
                    Size::new(width, height)
                })
                .collect();
            ScaledRow {
                images: range.clone(),
                source_width,
                factor,
                sizes,
            }
        })
        .collect();

    Ok(ScaledRows { target_width, rows })
}

/// Row ranges must tile `0..n` in order with no empty rows.
pub(crate) fn check_rows(rows: &[Range<usize>], n: usize) -> Result<(), LayoutError> {
    let mut next = 0;
    for r in rows {
        if r.start != next || r.end <= r.start {
            return Err(LayoutError::InvalidRows);
        }
        next = r.end;
    }
    if next != n {
        return Err(LayoutError::InvalidRows);
    }
    Ok(())
}

//! Row planning: how many rows, and which images go in each.
//!
//! [`plan_collage`] runs the whole geometry pipeline on image sizes:
//! row assignment, row scaling, and canvas composition. No pixels involved.
//!
//! # Example
//!
//! ```
//! use zencollage::{Size, plan_collage};
//!
//! let plan = plan_collage(&[
//!     Size::new(500, 500),
//!     Size::new(1000, 500),
//!     Size::new(250, 500),
//!     Size::new(1000, 500),
//! ])
//! .unwrap();
//!
//! assert_eq!(plan.rows.rows, [0..2, 2..4]);
//! assert_eq!(plan.layout.canvas, Size::new(1250, 918));
//! ```

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};
use core::ops::Range;

use num_traits::Float;

use crate::compose::{Layout, compose};
use crate::constraint::{LayoutError, Size};
use crate::partition::partition;
use crate::scale::{ScaledRows, scale_rows};
use crate::weight::weights;

/// How the rows of a [`RowPlan`] were produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RowStrategy {
    /// Every image in one row.
    SingleRow,
    /// Each image in its own row.
    OnePerRow,
    /// Optimal contiguous partition over aspect weights.
    Partitioned,
}

/// Assignment of images to rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowPlan {
    /// Which branch produced the rows.
    pub strategy: RowStrategy,
    /// Image index ranges, top row first. Contiguous, non-empty, and
    /// covering every image exactly once.
    pub rows: Vec<Range<usize>>,
}

impl RowPlan {
    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Target row count for a set of (normalized) images.
///
/// `round(total_width / (average_width × √n))`, then clamped to `1..=n`.
/// Rounding happens before clamping.
pub fn row_count(sizes: &[Size]) -> Result<usize, LayoutError> {
    let n = sizes.len();
    if n == 0 {
        return Err(LayoutError::NoImages);
    }
    if sizes.iter().any(Size::is_empty) {
        return Err(LayoutError::ZeroSourceDimension);
    }

    let total: u64 = sizes.iter().map(|s| s.width as u64).sum();
    let average = total as f64 / n as f64;
    let raw = Float::round(total as f64 / (average * Float::sqrt(n as f64)));

    Ok(if raw < 1.0 {
        1
    } else if raw > n as f64 {
        n
    } else {
        raw as usize
    })
}

/// Decide the row count and assign images to rows.
pub fn plan_rows(sizes: &[Size]) -> Result<RowPlan, LayoutError> {
    let rows = row_count(sizes)?;
    assign_rows(sizes, rows)
}

/// Assign images to exactly `rows` rows.
///
/// One row and one-image-per-row are produced directly; anything in
/// between goes through [`partition`] over the images' aspect weights.
pub fn assign_rows(sizes: &[Size], rows: usize) -> Result<RowPlan, LayoutError> {
    let n = sizes.len();
    if n == 0 {
        return Err(LayoutError::NoImages);
    }

    let plan = if rows == 1 {
        RowPlan {
            strategy: RowStrategy::SingleRow,
            rows: vec![0..n],
        }
    } else if rows == n {
        RowPlan {
            strategy: RowStrategy::OnePerRow,
            rows: (0..n).map(|i| i..i + 1).collect(),
        }
    } else {
        let weights = weights(sizes);
        RowPlan {
            strategy: RowStrategy::Partitioned,
            rows: partition(&weights, rows)?,
        }
    };

    tracing::debug!(
        images = n,
        rows = plan.row_count(),
        strategy = ?plan.strategy,
        "planned rows"
    );
    Ok(plan)
}

/// Geometry of a whole collage, computed from normalized image sizes.
#[derive(Clone, Debug, PartialEq)]
pub struct CollagePlan {
    /// Normalized input sizes, in input order.
    pub sources: Vec<Size>,
    /// Row assignment.
    pub rows: RowPlan,
    /// Per-row scale factors and scaled sizes.
    pub scaled: ScaledRows,
    /// Canvas size and placements.
    pub layout: Layout,
}

/// Plan rows, scale them, and place every image on the canvas.
pub fn plan_collage(sizes: &[Size]) -> Result<CollagePlan, LayoutError> {
    let rows = plan_rows(sizes)?;
    let scaled = scale_rows(sizes, &rows.rows)?;
    let layout = compose(&scaled)?;
    Ok(CollagePlan {
        sources: sizes.to_vec(),
        rows,
        scaled,
        layout,
    })
}

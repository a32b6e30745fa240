//! Integer aspect-ratio weights used to balance rows.
//!
//! A weight is `round(width / height × 100)`. It only drives the row
//! partition; final pixel dimensions come from the row scaler.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::constraint::{Size, round_u32};

/// Aspect weight of a single image.
///
/// Extremely tall slivers (aspect below 0.005) weigh 0. The partitioner
/// accepts zero weights.
pub fn aspect_weight(size: Size) -> u32 {
    if size.height == 0 {
        return 0;
    }
    round_u32(size.width as f64 / size.height as f64 * 100.0)
}

/// Weights for a sequence of images, same length and order.
pub fn weights(sizes: &[Size]) -> Vec<u32> {
    sizes.iter().map(|&s| aspect_weight(s)).collect()
}

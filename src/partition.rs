//! Optimal contiguous partition of a weight sequence into rows.
//!
//! Splits an ordered weight sequence into exactly `rows` consecutive,
//! non-empty groups so that the largest group sum is as small as possible.
//! Images are never reordered: group `k` always precedes group `k + 1`.
//!
//! ```text
//!     weights   100  200 │ 50  200        rows = 2
//!               ───────── ─────────
//!     sums         300       250          max = 300
//! ```
//!
//! # Algorithm
//!
//! Classic linear-partition dynamic program. `cost[i][j]` is the smallest
//! achievable maximum group sum when the first `i + 1` weights form `j + 1`
//! groups; `split[i - 1][j - 1]` records the index `x` after which the last
//! of those groups starts. Candidate split points are scanned in ascending
//! order with a strict `<`, so among equally good splits the smallest `x`
//! wins. Only feasible split points are scanned (the prefix `0..=x` must
//! still hold `j` non-empty groups), which keeps every group non-empty.
//!
//! O(n² · rows) time, O(n · rows) space. `n` is an upload count, so tens of
//! images, not millions.
//!
//! # Example
//!
//! ```
//! use zencollage::partition::{max_group_sum, partition};
//!
//! let weights = [100, 200, 50, 200];
//! let rows = partition(&weights, 2).unwrap();
//! assert_eq!(rows, [0..2, 2..4]);
//! assert_eq!(max_group_sum(&weights, &rows), 300);
//! ```

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};
use core::ops::Range;

use crate::constraint::LayoutError;

/// Partition `weights` into exactly `rows` contiguous, non-empty index
/// ranges minimizing the maximum range sum.
///
/// The ranges are returned left to right and concatenate to `0..weights.len()`.
///
/// # Errors
///
/// - [`LayoutError::NoImages`] for an empty sequence.
/// - [`LayoutError::ZeroRows`] when `rows == 0`.
/// - [`LayoutError::TooManyRows`] when `rows > weights.len()`.
pub fn partition(weights: &[u32], rows: usize) -> Result<Vec<Range<usize>>, LayoutError> {
    let n = weights.len();
    if n == 0 {
        return Err(LayoutError::NoImages);
    }
    if rows == 0 {
        return Err(LayoutError::ZeroRows);
    }
    if rows > n {
        return Err(LayoutError::TooManyRows { rows, images: n });
    }
    if rows == 1 {
        return Ok(vec![0..n]);
    }

    let split = split_table(weights, rows);

    // Walk back from the last element: each recorded split closes one group.
    let mut groups = Vec::with_capacity(rows);
    let mut last = n - 1;
    let mut row = rows - 2;
    loop {
        let start = split[last - 1][row];
        groups.push(start + 1..last + 1);
        last = start;
        if row == 0 {
            break;
        }
        row -= 1;
    }
    groups.push(0..last + 1);
    groups.reverse();

    tracing::trace!(images = n, rows, groups = ?groups, "linear partition");
    Ok(groups)
}

/// Fill the cost table and return the split table used for backtracking.
///
/// Requires `2 <= rows <= weights.len()`.
fn split_table(weights: &[u32], rows: usize) -> Vec<Vec<usize>> {
    let n = weights.len();
    let mut cost = vec![vec![0u64; rows]; n];
    let mut split = vec![vec![0usize; rows - 1]; n - 1];

    let mut prefix = 0u64;
    for (i, &w) in weights.iter().enumerate() {
        prefix += w as u64;
        cost[i][0] = prefix;
    }
    for cell in cost[0].iter_mut() {
        *cell = weights[0] as u64;
    }

    for i in 1..n {
        // j groups need at least j + 1 elements: cells with j > i stay unused.
        for j in 1..rows.min(i + 1) {
            let mut best_cost = u64::MAX;
            let mut best_x = j - 1;
            for x in (j - 1)..i {
                let tail = cost[i][0] - cost[x][0];
                let candidate = cost[x][j - 1].max(tail);
                if candidate < best_cost {
                    best_cost = candidate;
                    best_x = x;
                }
            }
            cost[i][j] = best_cost;
            split[i - 1][j - 1] = best_x;
        }
    }

    split
}

/// Sum of weights in each group.
pub fn group_sums(weights: &[u32], groups: &[Range<usize>]) -> Vec<u64> {
    groups
        .iter()
        .map(|g| weights[g.clone()].iter().map(|&w| w as u64).sum())
        .collect()
}

/// Largest group sum, 0 for no groups.
pub fn max_group_sum(weights: &[u32], groups: &[Range<usize>]) -> u64 {
    group_sums(weights, groups).into_iter().max().unwrap_or(0)
}

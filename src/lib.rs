//! Balanced-row image collages: row partitioning, row scaling, and canvas placement.
//!
//! Images are reduced to integer aspect weights, split into rows by an
//! optimal contiguous partition (input order is never changed), scaled so
//! every row converges on the same width, and stacked onto an even-sized
//! canvas. The geometry core is pure, allocation-only, `no_std` compatible.
//! Pixels are handled by an [`ImageCodec`] behind the `std` pipeline.
//!
//! # Modules
//!
//! - [`constraint`] — Shared geometry, height normalization, output bounds
//! - [`weight`] — Aspect-ratio weights
//! - [`partition`] — Optimal contiguous partition (linear-partition DP)
//! - [`plan`] — Row count, row assignment, whole-collage planning
//! - [`scale`] — Per-row scale factors
//! - [`compose`] — Canvas size and placements
//! - `collage` — Decode → normalize → plan → composite → fit pipeline (`std`)
//! - `codec` — [`ImageCodec`] backed by the `image` crate (`codec`)
//! - `svg` — Layout visualization (`svg`)
//! - `query` — Query-string configuration (`query`)

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod compose;
pub mod constraint;
pub mod partition;
pub mod plan;
pub mod scale;
pub mod weight;

#[cfg(feature = "std")]
pub mod collage;

#[cfg(feature = "codec")]
pub mod codec;

#[cfg(feature = "svg")]
pub mod svg;

#[cfg(feature = "query")]
pub mod query;

// Re-exports: core types
pub use compose::{Layout, Placement, RowBand, compose};
pub use constraint::{CanvasColor, LayoutError, Rect, Size, fit_output, normalized_size};
pub use partition::partition;
pub use plan::{CollagePlan, RowPlan, RowStrategy, plan_collage, plan_rows, row_count};
pub use scale::{ScaledRow, ScaledRows, scale_rows};
pub use weight::{aspect_weight, weights};

#[cfg(feature = "std")]
pub use collage::{
    CodecError, Collage, CollageConfig, CollageError, ImageCodec, Layer, build_collage,
};

#[cfg(feature = "codec")]
pub use codec::ImageCrateCodec;

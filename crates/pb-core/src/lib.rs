//! pb-core: shared foundation for propbench.
//!
//! Contains:
//! - ids (typed compact ids + monotonic allocation)
//! - geometry (canvas points)
//! - numeric (rounding and positivity checks)

pub mod geometry;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use geometry::Point;
pub use ids::*;
pub use numeric::*;

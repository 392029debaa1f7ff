//! # Shader Primitives
//!
//! Small numeric building blocks shared by the halftone and text layers.
//!
//! - [`adjust`]: Luma, contrast, levels, clamping
//! - [`blend`]: Linear interpolation, source-over
//! - [`distance`]: Euclidean distance, anti-aliased edge coverage
//! - [`transform`]: Rotation

pub mod adjust;
pub mod blend;
pub mod distance;
pub mod transform;

// Re-export all primitives at the top level for convenience
pub use adjust::*;
pub use blend::*;
pub use distance::*;
pub use transform::*;

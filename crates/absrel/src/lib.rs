//! AbsRel - symbolic engine for the Absolute Relativity algebra
//!
//! This is the top-level umbrella crate that re-exports the AbsRel
//! components.
//!
//! # Architecture
//!
//! - **Algebra layer**: `algebra` — configuration, basis elements, symbolic
//!   values, multivectors, the canonical product and differentiation
//! - **Reduction layer**: `reduce` — pattern templates rewriting term
//!   streams into del notation

pub use absrel_algebra as algebra;
pub use absrel_reduce as reduce;

//! # absrel-reduce
//!
//! Pattern-template reduction engine for the Absolute Relativity algebra.
//!
//! Raw differentiation and multiplication leave a multivector as a flat
//! stream of per-basis-element terms. This crate recognizes the
//! vector-calculus idioms hiding in such streams — gradient, divergence,
//! curl and whole-3-vector derivative groupings, plus the product groupings
//! (dot, wedge, blade·3-vector) — and rewrites each complete group into a
//! single compact del-notation term.
//!
//! ## Matching model
//!
//! A [`Template`] is an ordered list of [`TermPattern`]s with free
//! variables: orientations constrain term shape, zet-group variables must
//! bind consistently across the whole template, and the group's sign is
//! relative (a fully negated set of terms still matches, carrying the sign
//! onto the replacement). Matching is greedy and deterministic; overlapping
//! alternatives are resolved by candidate order, not search.
//!
//! ## Pipeline
//!
//! [`reduce_to_del_notation`] runs the standard stage order — cancel,
//! partial, grad, div, curl, blade·3-vector (both factor orders), dot,
//! wedge, whole-3-vector squared, whole-3-vector — and repackages the
//! result under the grouped alphabet ([`GroupedMultiVector`]).
//! [`del_notation`] stops after the derivative groupings and buckets purely
//! by group ([`DelMultiVector`]).
//!
//! ```rust
//! use std::sync::Arc;
//! use absrel_algebra::{ArConfig, MultiVector, d_mu};
//! use absrel_reduce::del_notation;
//!
//! let cfg = ArConfig::default_shared();
//! let field = MultiVector::parse("01 02 03 23 31 12", Arc::clone(&cfg)).unwrap();
//! let derivative = d_mu(cfg).unwrap().apply(&field).unwrap();
//! let del = del_notation(&derivative);
//! assert!(del.len() < derivative.len());
//! ```

mod grouped;
mod pattern;
mod reducers;
mod template;

pub use grouped::{del_notation, reduce_to_del_notation, DelMultiVector, GroupedMultiVector};
pub use pattern::{Binding, Bindings, Slot, TermPattern};
pub use reducers::{
    blade_3vec_flipped_template, blade_3vec_template, cancel_like_terms, curl_template,
    del_stages, div_template, dot_template, full_stages, grad_template, partial_template,
    reduce_terms, wedge_template, whole_3vec_squared_template, whole_3vec_template,
};
pub use template::{Replacement, Template};

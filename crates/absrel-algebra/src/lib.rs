//! # absrel-algebra
//!
//! Core engine for the Absolute Relativity algebra: a 16-element
//! Clifford-like algebra built from 4 generators with a configurable metric
//! signature and multiplication ordering.
//!
//! ## Core components
//!
//! ### Configuration ([`ArConfig`])
//! An immutable value fixing the basis labelling and ordering, the metric
//! signature, and the division convention, with every derived lookup table
//! (zet partitions, orientation classes, group names, the full Cayley table)
//! computed at construction. Changing a parameter means building a new
//! configuration and new algebra values from it; there is no shared mutable
//! state to invalidate.
//!
//! ### Basis elements ([`Alpha`])
//! Signed unit elements indexed by generator subsets. The canonical product
//! ([`find_prod`]) contracts repeated generators against the metric and
//! permutes what remains into the configured label order, counting sign
//! pops. [`inverse`], [`div_by`]/[`div_into`], [`commutator`], dagger and
//! grade projection are all defined in terms of it.
//!
//! ### Symbolic values ([`Xi`], [`XiProduct`], [`XiValue`])
//! Signed symbolic scalars carrying their partial-derivative history,
//! most-recent-first. Products fold factor signs into one aggregate sign.
//!
//! ### The container ([`MultiVector`])
//! A canonical, auto-cancelling sum of terms with one bucket per basis
//! label. All arithmetic rebuilds through construction, so cancellation is
//! re-applied everywhere; `+`, `-` and the full geometric product `*` are
//! available both as operators and as checked `try_*` methods.
//!
//! ### Differentiation ([`Differential`])
//! Operator values applying `∂μ` with the configured division convention,
//! with the standard pre-bound operators ([`d_mu`], [`d_g`], [`d_zet`],
//! [`d_f`]) available as constructors.
//!
//! ## Example
//!
//! ```rust
//! use absrel_algebra::{ArConfig, MultiVector, d_mu};
//!
//! let cfg = ArConfig::default_shared();
//! let field = MultiVector::parse("01 02 03", cfg.clone()).unwrap();
//! let derivative = d_mu(cfg).unwrap().apply(&field).unwrap();
//! assert_eq!(derivative.len(), 12);
//! ```

mod alpha;
mod config;
mod differential;
mod display;
mod error;
mod multivector;
mod product;
mod term;
mod xi;
mod zet;


pub use alpha::{Alpha, Sign};
pub use config::{ArConfig, DivisionType, Metric};
pub use display::subscripted;
pub use differential::{component_partial, d_f, d_g, d_mu, d_zet, Differential};
pub use error::AlgebraError;
pub use multivector::{LabelSubstitution, MultiVector};
pub use product::{
    commutator, dagger_alpha, dagger_term, div_by, div_into, find_prod, full, full_alpha_mvec,
    full_alpha_term, full_mvec, full_mvec_alpha, full_term_alpha, inverse, project_alpha,
    project_term,
};
pub use term::Term;
pub use xi::{Xi, XiProduct, XiValue};
pub use zet::{Orientation, Zet};

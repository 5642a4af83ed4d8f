// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # provable
//!
//! A generic proof and derivability engine. Given named inferences
//! (conclusion <- premises) over opaque conclusions, it decides which
//! conclusions are derivable, builds and traverses proofs for them, and
//! rewrites those proofs while preserving derivability.
//!
//! ## Architecture
//!
//! - **Data model** (`inference`, `proof`): inferences, proofs, dynamic proofs
//!   with change listeners, caching and union views, an ASCII printer
//! - **Derivability** (`derivability`): incremental watched-premise checking
//!   with blocking
//! - **Proof nodes** (`node`): lazily expanded views with cycle elimination,
//!   derivability filtering and assertion rewriting
//! - **Graph algorithms** (`graph`): unfolding, essential conclusions,
//!   forward-chaining expansion, pruning
//! - **Engine** (`engine`, `config`): string-labelled inference files and the
//!   `provable` CLI behind them
//!
//! ## Library usage
//!
//! ```
//! use provable::derivability::{DerivabilityChecker, InferenceDerivabilityChecker};
//! use provable::inference::BaseInference;
//! use provable::proof::BaseProof;
//!
//! let proof: BaseProof<BaseInference<&str>> = [
//!     BaseInference::new("Asserted", "a", vec![]),
//!     BaseInference::new("r1", "b", vec!["a"]),
//!     BaseInference::new("r2", "c", vec!["b", "c"]),
//! ]
//! .into_iter()
//! .collect();
//!
//! let mut checker = InferenceDerivabilityChecker::new(&proof);
//! assert!(checker.is_derivable(&"b"));
//! assert!(!checker.is_derivable(&"c"));
//! ```

pub mod config;
pub mod derivability;
pub mod engine;
pub mod error;
pub mod graph;
pub mod inference;
pub mod node;
pub mod producer;
pub mod proof;

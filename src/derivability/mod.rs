//! Derivability checking.
//!
//! A conclusion is derivable when a finite, acyclic chain of inferences
//! produces it from premise-free inferences. Checkers with blocking can
//! temporarily exclude conclusions from every derivation without touching the
//! underlying proof.

pub mod checker;

pub use checker::{Derivation, InferenceDerivabilityChecker};

/// Answers "is this conclusion derivable?".
///
/// Checkers evaluate lazily and remember what they learned, hence `&mut self`.
pub trait DerivabilityChecker<C> {
    fn is_derivable(&mut self, conclusion: &C) -> bool;
}

/// A [`DerivabilityChecker`] whose answers exclude blocked conclusions.
///
/// Blocking can only make fewer conclusions derivable.
pub trait DerivabilityCheckerWithBlocking<C>: DerivabilityChecker<C> {
    /// Block `conclusion`; returns `false` if it was already blocked.
    fn block(&mut self, conclusion: &C) -> bool;

    /// Unblock `conclusion`; returns `false` if it was not blocked.
    fn unblock(&mut self, conclusion: &C) -> bool;

    fn is_blocked(&self, conclusion: &C) -> bool;
}

//! Predicate-restricted view of a proof.

use std::marker::PhantomData;

use crate::inference::Inference;

use super::Proof;

/// Exposes only the inferences of `proof` accepted by `keep`.
pub struct FilteredProof<I, P, F> {
    proof: P,
    keep: F,
    _inference: PhantomData<fn() -> I>,
}

impl<I, P, F> FilteredProof<I, P, F>
where
    I: Inference,
    P: Proof<I>,
    F: Fn(&I) -> bool,
{
    pub fn new(proof: P, keep: F) -> Self {
        Self {
            proof,
            keep,
            _inference: PhantomData,
        }
    }
}

impl<I, P, F> Proof<I> for FilteredProof<I, P, F>
where
    I: Inference,
    P: Proof<I>,
    F: Fn(&I) -> bool,
{
    fn inferences(&self, conclusion: &I::Conclusion) -> Vec<I> {
        self.proof
            .inferences(conclusion)
            .into_iter()
            .filter(|inference| (self.keep)(inference))
            .collect()
    }
}

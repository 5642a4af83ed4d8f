//! Union of several proofs.

use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

use crate::inference::Inference;

use super::{ChangeListener, DynamicProof, Proof};

/// Exposes, for every conclusion, the union of the inferences of its members.
///
/// Inferences returned by several members are reported once, in the order of
/// first appearance.
#[derive(Debug, Clone)]
pub struct ProofUnion<P> {
    members: Vec<P>,
}

impl<P> ProofUnion<P> {
    pub fn new(members: Vec<P>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[P] {
        &self.members
    }
}

impl<P> FromIterator<P> for ProofUnion<P> {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<I, P> Proof<I> for ProofUnion<P>
where
    I: Inference + Eq + Hash,
    P: Proof<I>,
{
    fn inferences(&self, conclusion: &I::Conclusion) -> Vec<I> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for member in &self.members {
            for inference in member.inferences(conclusion) {
                if seen.insert(inference.clone()) {
                    result.push(inference);
                }
            }
        }
        result
    }
}

impl<I, P> DynamicProof<I> for ProofUnion<P>
where
    I: Inference + Eq + Hash,
    P: DynamicProof<I>,
{
    fn add_listener(&self, listener: Rc<dyn ChangeListener>) {
        for member in &self.members {
            member.add_listener(Rc::clone(&listener));
        }
    }

    fn remove_listener(&self, listener: &Rc<dyn ChangeListener>) {
        for member in &self.members {
            member.remove_listener(listener);
        }
    }
}

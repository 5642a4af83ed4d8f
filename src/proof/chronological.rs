//! Append-only proof accepting inferences in causal order.

use std::rc::Rc;

use crate::error::{ProofError, ProofResult};
use crate::inference::Inference;

use super::{BaseProof, ChangeListener, DynamicProof, Proof};

/// A [`BaseProof`] whose `produce` requires every premise to already be the
/// conclusion of some stored inference.
///
/// Constructing a proof this way guarantees every stored conclusion is
/// derivable.
#[derive(Debug)]
pub struct ChronologicalProof<I: Inference> {
    proof: BaseProof<I>,
}

impl<I: Inference> ChronologicalProof<I> {
    pub fn new() -> Self {
        Self {
            proof: BaseProof::new(),
        }
    }

    /// Register `inference`, or reject it if one of its premises has not been
    /// concluded yet.
    pub fn produce(&self, inference: I) -> ProofResult<()> {
        if let Some(missing) = inference
            .premises()
            .iter()
            .find(|premise| !self.proof.has_conclusion(premise))
        {
            return Err(ProofError::InvalidInference {
                inference: format!("{inference:?}"),
                premise: format!("{missing:?}"),
            });
        }
        crate::proof::ModifiableProof::produce(&self.proof, inference);
        Ok(())
    }

    pub fn clear(&self) {
        crate::proof::ModifiableProof::clear(&self.proof);
    }

    /// The underlying unchecked proof.
    pub fn as_base(&self) -> &BaseProof<I> {
        &self.proof
    }

    pub fn into_base(self) -> BaseProof<I> {
        self.proof
    }
}

impl<I: Inference> Default for ChronologicalProof<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Inference> Proof<I> for ChronologicalProof<I> {
    fn inferences(&self, conclusion: &I::Conclusion) -> Vec<I> {
        self.proof.inferences(conclusion)
    }
}

impl<I: Inference> DynamicProof<I> for ChronologicalProof<I> {
    fn add_listener(&self, listener: Rc<dyn ChangeListener>) {
        self.proof.add_listener(listener);
    }

    fn remove_listener(&self, listener: &Rc<dyn ChangeListener>) {
        self.proof.remove_listener(listener);
    }
}

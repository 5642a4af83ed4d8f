//! Reducing a proof to the inferences that matter for one goal.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use crate::derivability::InferenceDerivabilityChecker;
use crate::inference::{Inference, is_asserted};
use crate::proof::{BaseProof, FilteredProof, Proof};

use super::essential::essential_conclusions_with;
use super::expand::InferenceExpander;
use super::unfold::unfold_recursively;

/// The non-asserted inferences of `proof` that can take part in a
/// derivation of `goal`.
///
/// The essential conclusions of `goal` are computed first; an empty set
/// means `goal` is not derivable and the result is empty. An inference
/// `c <- ps` is then kept when every premise is derivable and `c` is not
/// essential for any of them, i.e. the inference is not circular for `c`.
/// Survivors in the closure of `goal` are forward-chained from the asserted
/// conclusions of that closure, so every inference kept has derivable
/// premises. Any derivation of `goal` from some of the asserted conclusions
/// of `proof` remains a derivation once those assertions are added to the
/// result.
pub fn prune<I, P>(proof: &P, goal: &I::Conclusion) -> BaseProof<I>
where
    I: Inference,
    P: Proof<I> + ?Sized,
{
    let mut pruned = BaseProof::new();
    let mut checker = InferenceDerivabilityChecker::new(proof);
    if essential_conclusions_with(&mut checker, goal).is_empty() {
        tracing::debug!(?goal, "goal not derivable, nothing to prune");
        return pruned;
    }

    let mut asserted = HashSet::new();
    unfold_recursively(proof, goal, &mut |inference: I| {
        if is_asserted(&inference) {
            asserted.insert(inference.conclusion().clone());
        }
    });

    let checker = RefCell::new(checker);
    let essential_for: RefCell<HashMap<I::Conclusion, HashSet<I::Conclusion>>> =
        RefCell::new(HashMap::new());
    let survivors = FilteredProof::new(proof, |inference: &I| {
        if is_asserted(inference) {
            return false;
        }
        let mut essential_for = essential_for.borrow_mut();
        inference.premises().iter().all(|premise| {
            let essential = essential_for.entry(premise.clone()).or_insert_with(|| {
                essential_conclusions_with(&mut *checker.borrow_mut(), premise)
            });
            !essential.is_empty() && !essential.contains(inference.conclusion())
        })
    });

    let mut expander = InferenceExpander::with_derivable(&survivors, asserted);
    expander.expand(goal, &mut pruned);

    tracing::debug!(
        kept = pruned.len(),
        conclusions = pruned.conclusions().len(),
        "pruned proof"
    );
    pruned
}

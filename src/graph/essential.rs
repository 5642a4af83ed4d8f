//! Conclusions every derivation of a goal must use.

use std::collections::HashSet;

use crate::derivability::{
    DerivabilityChecker, DerivabilityCheckerWithBlocking, InferenceDerivabilityChecker,
};
use crate::inference::Inference;
use crate::proof::Proof;

/// The conclusions without which `goal` is not derivable, `goal` included.
///
/// Empty when `goal` is not derivable at all. Only the conclusions of one
/// derivation are candidates: an essential conclusion occurs in every
/// derivation. Each candidate costs one incremental derivability test.
pub fn essential_conclusions<I, P>(proof: &P, goal: &I::Conclusion) -> HashSet<I::Conclusion>
where
    I: Inference,
    P: Proof<I> + ?Sized,
{
    let mut checker = InferenceDerivabilityChecker::new(proof);
    essential_conclusions_with(&mut checker, goal)
}

/// Like [`essential_conclusions`], reusing what `checker` already learned.
///
/// Conclusions blocked in `checker` stay blocked and are never essential;
/// the blocking state is the same on return.
pub fn essential_conclusions_with<I, P>(
    checker: &mut InferenceDerivabilityChecker<I, P>,
    goal: &I::Conclusion,
) -> HashSet<I::Conclusion>
where
    I: Inference,
    P: Proof<I>,
{
    let candidates = match checker.derivation(goal) {
        Some(derivation) => derivation.conclusions(),
        None => return HashSet::new(),
    };

    let mut essential = HashSet::new();
    for candidate in &candidates {
        if !checker.block(candidate) {
            continue;
        }
        if !checker.is_derivable(goal) {
            essential.insert(candidate.clone());
        }
        checker.unblock(candidate);
    }

    tracing::debug!(
        candidates = candidates.len(),
        essential = essential.len(),
        "computed essential conclusions"
    );
    essential
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::BaseInference;
    use crate::proof::BaseProof;

    type Inf = BaseInference<&'static str>;

    fn proof(inferences: &[(&'static str, &'static str, &[&'static str])]) -> BaseProof<Inf> {
        inferences
            .iter()
            .map(|(name, conclusion, premises)| Inf::new(*name, *conclusion, premises.to_vec()))
            .collect()
    }

    #[test]
    fn bottleneck_is_essential_alternatives_are_not() {
        let p = proof(&[
            ("ax", "a", &[]),
            ("r1", "b", &["a"]),
            ("r2", "c", &["a"]),
            ("via_b", "d", &["b"]),
            ("via_c", "d", &["c"]),
            ("r3", "e", &["d"]),
        ]);
        let essential = essential_conclusions(&p, &"e");
        assert_eq!(essential, HashSet::from(["a", "d", "e"]));
    }

    #[test]
    fn blocking_any_essential_conclusion_breaks_the_goal() {
        let p = proof(&[
            ("ax1", "a", &[]),
            ("ax2", "b", &[]),
            ("r1", "c", &["a", "b"]),
            ("r2", "c", &["c"]),
            ("r3", "d", &["c"]),
        ]);
        for e in essential_conclusions(&p, &"d") {
            let mut checker = InferenceDerivabilityChecker::new(&p);
            checker.block(&e);
            assert!(!checker.is_derivable(&"d"), "{e} should be essential");
        }
    }

    #[test]
    fn shared_checker_keeps_its_blocks() {
        let p = proof(&[
            ("ax1", "a", &[]),
            ("ax2", "b", &[]),
            ("from_a", "c", &["a"]),
            ("from_b", "c", &["b"]),
        ]);
        let mut checker = InferenceDerivabilityChecker::new(&p);
        assert_eq!(essential_conclusions_with(&mut checker, &"c"), HashSet::from(["c"]));

        checker.block(&"a");
        assert_eq!(
            essential_conclusions_with(&mut checker, &"c"),
            HashSet::from(["b", "c"])
        );
        assert!(checker.is_blocked(&"a"));
        assert!(!checker.is_blocked(&"b"));
    }

    #[test]
    fn underivable_goal_has_no_essentials() {
        let p = proof(&[("ax", "a", &[]), ("r", "c", &["b", "c"]), ("r1", "b", &["a"])]);
        assert!(essential_conclusions(&p, &"c").is_empty());
    }
}

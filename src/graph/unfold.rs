//! Enumerating the inferences reachable from a goal.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::inference::Inference;
use crate::producer::{Discard, Producer};
use crate::proof::Proof;

/// Breadth-first traversal from `goal`, reporting every inference of every
/// visited conclusion. Each conclusion is visited once.
///
/// Returns the visited conclusions, `goal` included.
pub fn unfold_recursively<I, P>(
    proof: &P,
    goal: &I::Conclusion,
    producer: &mut impl Producer<I>,
) -> HashSet<I::Conclusion>
where
    I: Inference,
    P: Proof<I> + ?Sized,
{
    let mut visited: HashSet<I::Conclusion> = HashSet::new();
    let mut queue: VecDeque<I::Conclusion> = VecDeque::new();
    visited.insert(goal.clone());
    queue.push_back(goal.clone());

    while let Some(next) = queue.pop_front() {
        for inference in proof.inferences(&next) {
            for premise in inference.premises() {
                if visited.insert(premise.clone()) {
                    queue.push_back(premise.clone());
                }
            }
            producer.produce(inference);
        }
    }

    tracing::debug!(visited = visited.len(), "unfolded recursively");
    visited
}

/// The conclusions reachable from `goal` through premises.
pub fn reachable_conclusions<I, P>(proof: &P, goal: &I::Conclusion) -> HashSet<I::Conclusion>
where
    I: Inference,
    P: Proof<I> + ?Sized,
{
    unfold_recursively(proof, goal, &mut Discard)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Open,
    Done,
}

/// Like [`unfold_recursively`], but the inferences of a conclusion are
/// reported only after those of all its premises.
///
/// A premise that is still being expanded (it closes a cycle) does not hold
/// back its consumer, so in cyclic proofs the order is as close to
/// topological as the cycles allow.
pub fn unfold_topologically<I, P>(
    proof: &P,
    goal: &I::Conclusion,
    producer: &mut impl Producer<I>,
) -> HashSet<I::Conclusion>
where
    I: Inference,
    P: Proof<I> + ?Sized,
{
    let mut marks: HashMap<I::Conclusion, Mark> = HashMap::new();
    let mut pending: HashMap<I::Conclusion, Vec<I>> = HashMap::new();
    let mut stack = vec![(goal.clone(), false)];

    while let Some((conclusion, expanded)) = stack.pop() {
        if expanded {
            marks.insert(conclusion.clone(), Mark::Done);
            for inference in pending.remove(&conclusion).unwrap_or_default() {
                producer.produce(inference);
            }
            continue;
        }
        if marks.contains_key(&conclusion) {
            continue;
        }
        marks.insert(conclusion.clone(), Mark::Open);

        let inferences = proof.inferences(&conclusion);
        stack.push((conclusion.clone(), true));
        for inference in inferences.iter().rev() {
            for premise in inference.premises().iter().rev() {
                if !marks.contains_key(premise) {
                    stack.push((premise.clone(), false));
                }
            }
        }
        pending.insert(conclusion, inferences);
    }

    debug_assert!(marks.values().all(|m| *m == Mark::Done));
    tracing::debug!(visited = marks.len(), "unfolded topologically");
    marks.into_keys().collect()
}

//! Forward chaining over the dependency closure of a goal.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::inference::Inference;
use crate::producer::Producer;
use crate::proof::Proof;

/// Fires every inference in the closure of a goal whose premises are
/// derivable, starting from a given set of derivable conclusions.
///
/// Inferences wait on the first premise not yet derivable, as in the
/// derivability checker, but nothing is ever blocked or retracted. An
/// expander can be reused for several goals; closures already visited are
/// not fetched again.
pub struct InferenceExpander<'p, I: Inference, P: ?Sized> {
    proof: &'p P,
    derivable: HashSet<I::Conclusion>,
    visited: HashSet<I::Conclusion>,
    watched: HashMap<I::Conclusion, Vec<(I, usize)>>,
    to_propagate: VecDeque<I::Conclusion>,
    fired: usize,
}

impl<'p, I, P> InferenceExpander<'p, I, P>
where
    I: Inference,
    P: Proof<I> + ?Sized,
{
    pub fn new(proof: &'p P) -> Self {
        Self::with_derivable(proof, HashSet::new())
    }

    pub fn with_derivable(proof: &'p P, derivable: HashSet<I::Conclusion>) -> Self {
        Self {
            proof,
            derivable,
            visited: HashSet::new(),
            watched: HashMap::new(),
            to_propagate: VecDeque::new(),
            fired: 0,
        }
    }

    pub fn derivable(&self) -> &HashSet<I::Conclusion> {
        &self.derivable
    }

    pub fn into_derivable(self) -> HashSet<I::Conclusion> {
        self.derivable
    }

    /// Number of inferences produced so far.
    pub fn fired(&self) -> usize {
        self.fired
    }

    /// Visit the closure of `goal`, producing each inference once its
    /// premises are derivable.
    pub fn expand(&mut self, goal: &I::Conclusion, producer: &mut impl Producer<I>) {
        let mut todo = vec![goal.clone()];
        while let Some(next) = todo.pop() {
            if !self.visited.insert(next.clone()) {
                continue;
            }
            for inference in self.proof.inferences(&next) {
                todo.extend(
                    inference
                        .premises()
                        .iter()
                        .filter(|p| !self.visited.contains(*p))
                        .cloned(),
                );
                self.advance(inference, 0, producer);
            }
            self.propagate(producer);
        }
    }

    fn advance(&mut self, inference: I, start: usize, producer: &mut impl Producer<I>) {
        let premises = inference.premises();
        let n = premises.len();
        let pending = (0..n)
            .map(|k| (start + k) % n)
            .find(|&pos| !self.derivable.contains(&premises[pos]));
        match pending {
            Some(pos) => {
                let premise = premises[pos].clone();
                self.watched.entry(premise).or_default().push((inference, pos));
            }
            None => self.fire(inference, producer),
        }
    }

    fn fire(&mut self, inference: I, producer: &mut impl Producer<I>) {
        let conclusion = inference.conclusion().clone();
        self.fired += 1;
        producer.produce(inference);
        if self.derivable.insert(conclusion.clone()) {
            self.to_propagate.push_back(conclusion);
        }
    }

    fn propagate(&mut self, producer: &mut impl Producer<I>) {
        while let Some(next) = self.to_propagate.pop_front() {
            for (inference, pos) in self.watched.remove(&next).unwrap_or_default() {
                self.advance(inference, pos, producer);
            }
        }
    }
}

/// Expand `goal` from `derivable`, producing the fired inferences; returns
/// the derivable conclusions afterwards.
pub fn expand<I, P>(
    derivable: HashSet<I::Conclusion>,
    proof: &P,
    goal: &I::Conclusion,
    producer: &mut impl Producer<I>,
) -> HashSet<I::Conclusion>
where
    I: Inference,
    P: Proof<I> + ?Sized,
{
    let mut expander = InferenceExpander::with_derivable(proof, derivable);
    expander.expand(goal, producer);
    tracing::debug!(
        fired = expander.fired(),
        derivable = expander.derivable().len(),
        "expanded"
    );
    expander.into_derivable()
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
    fn fires_inferences_with_derivable_premises() {
        let p = proof(&[
            ("ax", "a", &[]),
            ("r1", "b", &["a"]),
            ("r2", "c", &["b", "x"]),
            ("r3", "c", &["b"]),
            ("r4", "d", &["c", "a"]),
        ]);
        let mut fired = Vec::new();
        let derivable = expand(HashSet::new(), &p, &"d", &mut fired);
        assert_eq!(derivable, HashSet::from(["a", "b", "c", "d"]));
        let mut names: Vec<_> = fired.iter().map(|i| i.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["ax", "r1", "r3", "r4"]);
    }

    #[test]
    fn starts_from_given_derivable_set() {
        let p = proof(&[("r1", "b", &["a"]), ("r2", "c", &["b"])]);
        let mut fired = Vec::new();
        let derivable = expand(HashSet::from(["a"]), &p, &"c", &mut fired);
        assert_eq!(derivable, HashSet::from(["a", "b", "c"]));
        assert_eq!(fired.len(), 2);
    }

    #[test]
    fn cycles_without_support_never_fire() {
        let p = proof(&[("r1", "a", &["b"]), ("r2", "b", &["a"])]);
        let mut fired: Vec<Inf> = Vec::new();
        let derivable = expand(HashSet::new(), &p, &"a", &mut fired);
        assert!(derivable.is_empty());
        assert!(fired.is_empty());
    }

    #[test]
    fn expander_reuses_visited_closure() {
        let p = proof(&[("ax", "a", &[]), ("r1", "b", &["a"]), ("r2", "c", &["a"])]);
        let mut expander = InferenceExpander::new(&p);
        let mut fired = Vec::new();
        expander.expand(&"b", &mut fired);
        expander.expand(&"c", &mut fired);
        expander.expand(&"b", &mut fired);
        assert_eq!(fired.len(), 3);
        assert_eq!(expander.fired(), 3);
    }
}

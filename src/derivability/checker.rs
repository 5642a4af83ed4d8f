//! Incremental watched-premise derivability checking with blocking.
//!
//! Every inference fetched from the proof is in exactly one of four states:
//!
//! 1. **Queued**: in the remaining queue of its conclusion, not looked at yet
//! 2. **Watching**: registered at the position of a premise that is not
//!    derivable (or blocked); revisited only when that premise becomes derivable
//! 3. **Fired**: all premises were derivable, and it is the one recorded
//!    justification of its conclusion
//! 4. **Idle**: all premises were derivable, but the conclusion already had a
//!    justification
//!
//! Checking a goal alternates between propagating newly derivable conclusions
//! to their watchers and pulling one more queued inference of an unresolved
//! goal. Blocking a conclusion un-derives everything whose recorded
//! justification depends on it, re-queuing the affected inferences, so later
//! queries resume from the current state instead of starting over.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::inference::Inference;
use crate::proof::Proof;

use super::{DerivabilityChecker, DerivabilityCheckerWithBlocking};

type InferenceId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Queued,
    Watching,
    Fired,
    Idle,
}

#[derive(Debug)]
struct Entry<I> {
    inference: I,
    status: Status,
}

/// Derivability checker over a [`Proof`], supporting blocking.
///
/// The proof is asked for the inferences of each conclusion at most once.
/// Only one justification is kept per conclusion (the first inference to
/// fire), which suffices to decide derivability and to produce one
/// derivation, not all of them and not necessarily a shortest one.
pub struct InferenceDerivabilityChecker<I: Inference, P> {
    proof: P,
    entries: Vec<Entry<I>>,
    /// Inferences fetched for each conclusion; presence means fetched.
    by_conclusion: HashMap<I::Conclusion, Vec<InferenceId>>,
    remaining: HashMap<I::Conclusion, VecDeque<InferenceId>>,
    /// Premise -> (inference, premise position) waiting for it.
    watched: HashMap<I::Conclusion, Vec<(InferenceId, usize)>>,
    /// Conclusion -> its recorded justification.
    fired: HashMap<I::Conclusion, InferenceId>,
    /// Premise -> fired inferences using it.
    fired_by_premise: HashMap<I::Conclusion, Vec<InferenceId>>,
    /// Conclusions with a justification, blocked or not.
    derivable: HashSet<I::Conclusion>,
    blocked: HashSet<I::Conclusion>,
    goals: HashSet<I::Conclusion>,
    to_check: Vec<I::Conclusion>,
    to_propagate: VecDeque<I::Conclusion>,
    to_invalidate: VecDeque<I::Conclusion>,
}

impl<I: Inference, P: Proof<I>> InferenceDerivabilityChecker<I, P> {
    pub fn new(proof: P) -> Self {
        Self {
            proof,
            entries: Vec::new(),
            by_conclusion: HashMap::new(),
            remaining: HashMap::new(),
            watched: HashMap::new(),
            fired: HashMap::new(),
            fired_by_premise: HashMap::new(),
            derivable: HashSet::new(),
            blocked: HashSet::new(),
            goals: HashSet::new(),
            to_check: Vec::new(),
            to_propagate: VecDeque::new(),
            to_invalidate: VecDeque::new(),
        }
    }

    pub fn proof(&self) -> &P {
        &self.proof
    }

    /// The recorded justification of `conclusion`, if it is derivable and
    /// not blocked as of the last check.
    pub fn justification(&self, conclusion: &I::Conclusion) -> Option<&I> {
        if !self.usable(conclusion) {
            return None;
        }
        self.fired
            .get(conclusion)
            .map(|&id| &self.entries[id].inference)
    }

    /// A derivation of `conclusion`: a proof exposing exactly the recorded
    /// justification of every derivable conclusion, or `None` if
    /// `conclusion` is not derivable.
    pub fn derivation(&mut self, conclusion: &I::Conclusion) -> Option<Derivation<'_, I, P>> {
        if !self.is_derivable(conclusion) {
            return None;
        }
        Some(Derivation {
            checker: self,
            goal: conclusion.clone(),
        })
    }

    /// Conclusions known to be derivable and not blocked.
    pub fn derivable_conclusions(&self) -> impl Iterator<Item = &I::Conclusion> + '_ {
        self.derivable
            .iter()
            .filter(|c| !self.blocked.contains(*c))
    }

    /// Goals checked so far that are currently not derivable.
    pub fn non_derivable_goals(&self) -> Vec<I::Conclusion> {
        self.goals
            .iter()
            .filter(|c| !self.usable(c))
            .cloned()
            .collect()
    }

    fn usable(&self, conclusion: &I::Conclusion) -> bool {
        self.derivable.contains(conclusion) && !self.blocked.contains(conclusion)
    }

    fn schedule_check(&mut self, conclusion: I::Conclusion) {
        self.goals.insert(conclusion.clone());
        self.to_check.push(conclusion);
    }

    /// Run until nothing is left to propagate or to check.
    fn process(&mut self) {
        loop {
            if let Some(next) = self.to_propagate.pop_front() {
                self.propagate(&next);
                continue;
            }
            let Some(top) = self.to_check.last() else {
                break;
            };
            if self.derivable.contains(top) || self.blocked.contains(top) {
                self.to_check.pop();
                continue;
            }
            let top = top.clone();
            match self.next_queued(&top) {
                Some(id) => self.advance(id, 0),
                None => {
                    self.to_check.pop();
                }
            }
        }
    }

    fn next_queued(&mut self, conclusion: &I::Conclusion) -> Option<InferenceId> {
        if !self.by_conclusion.contains_key(conclusion) {
            self.fetch(conclusion);
        }
        self.remaining
            .get_mut(conclusion)
            .and_then(VecDeque::pop_front)
    }

    fn fetch(&mut self, conclusion: &I::Conclusion) {
        let inferences = self.proof.inferences(conclusion);
        let mut ids = Vec::with_capacity(inferences.len());
        for inference in inferences {
            debug_assert!(
                inference.conclusion() == conclusion,
                "proof returned {inference:?} for {conclusion:?}"
            );
            ids.push(self.entries.len());
            self.entries.push(Entry {
                inference,
                status: Status::Queued,
            });
        }
        tracing::trace!(?conclusion, count = ids.len(), "fetched inferences");
        self.remaining
            .insert(conclusion.clone(), ids.iter().copied().collect());
        self.by_conclusion.insert(conclusion.clone(), ids);
    }

    /// Scan the premises of `id` cyclically from `start`: watch the first one
    /// that is not usable, or fire if there is none.
    fn advance(&mut self, id: InferenceId, start: usize) {
        let pending = {
            let premises = self.entries[id].inference.premises();
            let n = premises.len();
            (0..n)
                .map(|k| (start + k) % n)
                .find(|&pos| !self.usable(&premises[pos]))
                .map(|pos| (pos, premises[pos].clone()))
        };
        match pending {
            Some((pos, premise)) => {
                self.entries[id].status = Status::Watching;
                self.watched
                    .entry(premise.clone())
                    .or_default()
                    .push((id, pos));
                self.schedule_check(premise);
            }
            None => self.fire(id),
        }
    }

    fn fire(&mut self, id: InferenceId) {
        let conclusion = self.entries[id].inference.conclusion().clone();
        if self.derivable.contains(&conclusion) {
            self.entries[id].status = Status::Idle;
            return;
        }
        self.entries[id].status = Status::Fired;
        for premise in self.entries[id].inference.premises() {
            self.fired_by_premise
                .entry(premise.clone())
                .or_default()
                .push(id);
        }
        tracing::trace!(
            ?conclusion,
            rule = self.entries[id].inference.name(),
            "fired"
        );
        self.fired.insert(conclusion.clone(), id);
        self.derivable.insert(conclusion.clone());
        if !self.blocked.contains(&conclusion) {
            self.to_propagate.push_back(conclusion);
        }
    }

    fn propagate(&mut self, conclusion: &I::Conclusion) {
        // Blocked or un-derived since it was scheduled: keep the watchers.
        if !self.usable(conclusion) {
            return;
        }
        let Some(watchers) = self.watched.remove(conclusion) else {
            return;
        };
        for (id, pos) in watchers {
            if self.entries[id].status == Status::Watching {
                self.advance(id, pos);
            }
        }
    }

    /// Un-derive every conclusion whose justification uses `premise`.
    fn invalidate_dependents(&mut self, premise: &I::Conclusion) {
        let Some(ids) = self.fired_by_premise.remove(premise) else {
            return;
        };
        for id in ids {
            if self.entries[id].status != Status::Fired {
                continue;
            }
            let conclusion = self.entries[id].inference.conclusion().clone();
            if self.fired.get(&conclusion) == Some(&id) {
                self.set_unknown(conclusion);
            }
        }
    }

    fn set_unknown(&mut self, conclusion: I::Conclusion) {
        tracing::trace!(?conclusion, "lost justification");
        self.derivable.remove(&conclusion);
        let queue = self.remaining.entry(conclusion.clone()).or_default();
        if let Some(id) = self.fired.remove(&conclusion) {
            self.entries[id].status = Status::Queued;
            queue.push_back(id);
            // A re-fired inference is indexed again; keep one entry per firing.
            for premise in self.entries[id].inference.premises() {
                if let Some(ids) = self.fired_by_premise.get_mut(premise) {
                    ids.retain(|&other| other != id);
                    if ids.is_empty() {
                        self.fired_by_premise.remove(premise);
                    }
                }
            }
        }
        // Idle inferences get another chance to justify the conclusion.
        if let Some(ids) = self.by_conclusion.get(&conclusion) {
            for &id in ids {
                if self.entries[id].status == Status::Idle {
                    self.entries[id].status = Status::Queued;
                    queue.push_back(id);
                }
            }
        }
        if self.goals.contains(&conclusion) {
            self.to_check.push(conclusion.clone());
        }
        self.to_invalidate.push_back(conclusion);
    }
}

impl<I: Inference, P: Proof<I>> DerivabilityChecker<I::Conclusion> for InferenceDerivabilityChecker<I, P> {
    fn is_derivable(&mut self, conclusion: &I::Conclusion) -> bool {
        debug_assert!(self.to_invalidate.is_empty(), "stale invalidation queue");
        self.goals.insert(conclusion.clone());
        if self.blocked.contains(conclusion) {
            return false;
        }
        self.to_check.push(conclusion.clone());
        self.process();
        self.usable(conclusion)
    }
}

impl<I: Inference, P: Proof<I>> DerivabilityCheckerWithBlocking<I::Conclusion>
    for InferenceDerivabilityChecker<I, P>
{
    fn block(&mut self, conclusion: &I::Conclusion) -> bool {
        if !self.blocked.insert(conclusion.clone()) {
            return false;
        }
        tracing::trace!(?conclusion, "blocked");
        self.to_invalidate.push_back(conclusion.clone());
        while let Some(next) = self.to_invalidate.pop_front() {
            self.invalidate_dependents(&next);
        }
        true
    }

    fn unblock(&mut self, conclusion: &I::Conclusion) -> bool {
        if !self.blocked.remove(conclusion) {
            return false;
        }
        tracing::trace!(?conclusion, "unblocked");
        if self.derivable.contains(conclusion) {
            self.to_propagate.push_back(conclusion.clone());
        } else if self.goals.contains(conclusion) {
            self.to_check.push(conclusion.clone());
        }
        true
    }

    fn is_blocked(&self, conclusion: &I::Conclusion) -> bool {
        self.blocked.contains(conclusion)
    }
}

// ---------------------------------------------------------------------------
// Derivation view
// ---------------------------------------------------------------------------

/// One derivation found by an [`InferenceDerivabilityChecker`].
///
/// Every derivable conclusion has exactly one inference, and following
/// premises never leads back to a conclusion already visited.
pub struct Derivation<'c, I: Inference, P> {
    checker: &'c InferenceDerivabilityChecker<I, P>,
    goal: I::Conclusion,
}

impl<I: Inference, P: Proof<I>> Derivation<'_, I, P> {
    pub fn goal(&self) -> &I::Conclusion {
        &self.goal
    }

    /// The conclusions used by the derivation of the goal.
    pub fn conclusions(&self) -> HashSet<I::Conclusion> {
        let mut seen = HashSet::new();
        let mut todo = vec![self.goal.clone()];
        while let Some(next) = todo.pop() {
            if !seen.insert(next.clone()) {
                continue;
            }
            if let Some(inference) = self.checker.justification(&next) {
                todo.extend(inference.premises().iter().cloned());
            }
        }
        seen
    }

    /// The inferences of the derivation of the goal, premises first.
    pub fn inferences_in_order(&self) -> Vec<I> {
        let mut order = Vec::new();
        let mut done = HashSet::new();
        let mut stack = vec![(self.goal.clone(), false)];
        while let Some((next, expanded)) = stack.pop() {
            let Some(inference) = self.checker.justification(&next) else {
                continue;
            };
            if expanded {
                order.push(inference.clone());
                continue;
            }
            if !done.insert(next.clone()) {
                continue;
            }
            stack.push((next, true));
            stack.extend(inference.premises().iter().map(|p| (p.clone(), false)));
        }
        order
    }
}

impl<I: Inference, P: Proof<I>> Proof<I> for Derivation<'_, I, P> {
    fn inferences(&self, conclusion: &I::Conclusion) -> Vec<I> {
        self.checker
            .justification(conclusion)
            .cloned()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

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

    fn example() -> BaseProof<Inf> {
        proof(&[("ax", "a", &[]), ("r1", "b", &["a"]), ("r2", "c", &["b", "c"])])
    }

    #[test]
    fn self_supporting_conclusion_is_not_derivable() {
        let p = example();
        let mut checker = InferenceDerivabilityChecker::new(&p);
        assert!(!checker.is_derivable(&"c"));
        assert!(checker.is_derivable(&"b"));
        assert!(checker.is_derivable(&"a"));
        assert!(!checker.is_derivable(&"c"));
        assert_eq!(checker.non_derivable_goals(), vec!["c"]);
    }

    #[test]
    fn unknown_conclusion_is_not_derivable() {
        let p = example();
        let mut checker = InferenceDerivabilityChecker::new(&p);
        assert!(!checker.is_derivable(&"zzz"));
    }

    #[test]
    fn blocking_round_trip() {
        let p = example();
        let mut checker = InferenceDerivabilityChecker::new(&p);
        assert!(checker.is_derivable(&"b"));

        assert!(checker.block(&"a"));
        assert!(!checker.block(&"a"), "second block is a no-op");
        assert!(!checker.is_derivable(&"b"));
        assert!(!checker.is_derivable(&"a"));

        assert!(checker.unblock(&"a"));
        assert!(!checker.unblock(&"a"));
        assert!(checker.is_derivable(&"b"));
        assert!(checker.is_derivable(&"a"));
    }

    #[test]
    fn alternative_justification_survives_blocking() {
        let p = proof(&[
            ("ax1", "a", &[]),
            ("ax2", "b", &[]),
            ("from_a", "c", &["a"]),
            ("from_b", "c", &["b"]),
            ("r", "d", &["c"]),
        ]);
        let mut checker = InferenceDerivabilityChecker::new(&p);
        assert!(checker.is_derivable(&"d"));

        checker.block(&"a");
        assert!(checker.is_derivable(&"d"));
        checker.block(&"b");
        assert!(!checker.is_derivable(&"d"));
        checker.unblock(&"a");
        assert!(checker.is_derivable(&"d"));
        assert_eq!(checker.justification(&"c").map(|i| i.name.as_str()), Some("from_a"));
    }

    #[test]
    fn cascade_through_chain() {
        let p = proof(&[
            ("ax", "a", &[]),
            ("r1", "b", &["a"]),
            ("r2", "c", &["b"]),
            ("r3", "d", &["c"]),
        ]);
        let mut checker = InferenceDerivabilityChecker::new(&p);
        assert!(checker.is_derivable(&"d"));
        checker.block(&"b");
        assert!(checker.is_derivable(&"a"));
        assert!(!checker.is_derivable(&"c"));
        assert!(!checker.is_derivable(&"d"));
        checker.unblock(&"b");
        assert!(checker.is_derivable(&"d"));
    }

    #[test]
    fn mutual_recursion_needs_an_entry_point() {
        let p = proof(&[
            ("ab", "a", &["b"]),
            ("ba", "b", &["a"]),
            ("cb", "b", &["c"]),
            ("ax", "c", &[]),
        ]);
        let mut checker = InferenceDerivabilityChecker::new(&p);
        assert!(checker.is_derivable(&"a"));
        checker.block(&"c");
        assert!(!checker.is_derivable(&"a"));
        assert!(!checker.is_derivable(&"b"));
        checker.unblock(&"c");
        assert!(checker.is_derivable(&"a"));
    }

    #[test]
    fn blocked_before_first_query() {
        let p = example();
        let mut checker = InferenceDerivabilityChecker::new(&p);
        checker.block(&"a");
        assert!(!checker.is_derivable(&"b"));
        assert!(checker.is_blocked(&"a"));
        checker.unblock(&"a");
        assert!(checker.is_derivable(&"b"));
    }

    #[test]
    fn derivation_has_one_inference_per_conclusion() {
        let p = proof(&[
            ("ax1", "a", &[]),
            ("ax2", "b", &[]),
            ("r1", "c", &["a", "b"]),
            ("r2", "c", &["c"]),
            ("r3", "d", &["c", "a"]),
            ("r4", "d", &["b"]),
        ]);
        let mut checker = InferenceDerivabilityChecker::new(&p);
        let derivation = checker.derivation(&"d").expect("d is derivable");
        assert_eq!(derivation.goal(), &"d");

        for conclusion in derivation.conclusions() {
            let inferences = derivation.inferences(&conclusion);
            assert_eq!(inferences.len(), 1, "{conclusion} must have one inference");
        }

        let ordered = derivation.inferences_in_order();
        let mut seen = HashSet::new();
        for inference in &ordered {
            assert!(inference.premises.iter().all(|p| seen.contains(p)));
            seen.insert(inference.conclusion);
        }
        assert_eq!(ordered.last().map(|i| i.conclusion), Some("d"));
    }

    #[test]
    fn no_derivation_for_underivable_conclusion() {
        let p = example();
        let mut checker = InferenceDerivabilityChecker::new(&p);
        assert!(checker.derivation(&"c").is_none());
    }

    #[test]
    fn each_conclusion_fetched_once() {
        struct Counting<'a> {
            proof: &'a BaseProof<Inf>,
            queries: Cell<usize>,
        }
        impl Proof<Inf> for Counting<'_> {
            fn inferences(&self, conclusion: &&'static str) -> Vec<Inf> {
                self.queries.set(self.queries.get() + 1);
                self.proof.inferences(conclusion)
            }
        }

        let p = example();
        let counting = Counting {
            proof: &p,
            queries: Cell::new(0),
        };
        let mut checker = InferenceDerivabilityChecker::new(&counting);
        for _ in 0..3 {
            checker.is_derivable(&"c");
            checker.block(&"a");
            checker.is_derivable(&"b");
            checker.unblock(&"a");
        }
        assert_eq!(counting.queries.get(), 3);
    }

    #[test]
    fn repeated_block_cycles_keep_the_premise_index_bounded() {
        let p = proof(&[("ax1", "c", &[]), ("ax2", "x", &[]), ("r", "d", &["c", "x"])]);
        let mut checker = InferenceDerivabilityChecker::new(&p);
        for _ in 0..1000 {
            checker.block(&"c");
            assert!(!checker.is_derivable(&"d"));
            checker.unblock(&"c");
            assert!(checker.is_derivable(&"d"));
        }
        assert_eq!(checker.entries.len(), 3);
        assert_eq!(checker.fired_by_premise.get(&"x").map(Vec::len), Some(1));
        assert_eq!(checker.fired_by_premise.get(&"c").map(Vec::len), Some(1));
    }

    #[test]
    fn derivable_conclusions_exclude_blocked() {
        let p = example();
        let mut checker = InferenceDerivabilityChecker::new(&p);
        checker.is_derivable(&"b");
        checker.block(&"b");
        let derivable: HashSet<_> = checker.derivable_conclusions().copied().collect();
        assert_eq!(derivable, HashSet::from(["a"]));
    }
}

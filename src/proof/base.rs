//! Mutable in-memory proof with change notification.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::inference::Inference;
use crate::producer::Producer;

use super::{ChangeListener, DynamicProof, ListenerList, ModifiableProof, Proof};

/// Inferences bucketed by conclusion.
///
/// Listeners are notified on `produce` only when the new inference's
/// conclusion was queried since the previous notification; nobody can hold a
/// stale answer for a conclusion that was never asked for.
pub struct BaseProof<I: Inference> {
    inferences: RefCell<HashMap<I::Conclusion, Vec<I>>>,
    /// Conclusions queried since the last notification.
    queried: RefCell<HashSet<I::Conclusion>>,
    listeners: ListenerList,
}

impl<I: Inference> BaseProof<I> {
    pub fn new() -> Self {
        Self {
            inferences: RefCell::new(HashMap::new()),
            queried: RefCell::new(HashSet::new()),
            listeners: ListenerList::new(),
        }
    }

    /// Whether some stored inference derives `conclusion`.
    ///
    /// Does not count as a query for notification purposes.
    pub fn has_conclusion(&self, conclusion: &I::Conclusion) -> bool {
        self.inferences
            .borrow()
            .get(conclusion)
            .is_some_and(|bucket| !bucket.is_empty())
    }

    /// All conclusions with at least one inference.
    pub fn conclusions(&self) -> Vec<I::Conclusion> {
        self.inferences.borrow().keys().cloned().collect()
    }

    /// Every stored inference, bucket by bucket.
    pub fn all_inferences(&self) -> Vec<I> {
        self.inferences
            .borrow()
            .values()
            .flat_map(|bucket| bucket.iter().cloned())
            .collect()
    }

    /// Total number of stored inferences.
    pub fn len(&self) -> usize {
        self.inferences.borrow().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn notify(&self) {
        self.queried.borrow_mut().clear();
        self.listeners.notify();
    }
}

impl<I: Inference> Default for BaseProof<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Inference> std::fmt::Debug for BaseProof<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseProof")
            .field("inferences", &*self.inferences.borrow())
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl<I: Inference> Proof<I> for BaseProof<I> {
    fn inferences(&self, conclusion: &I::Conclusion) -> Vec<I> {
        self.queried.borrow_mut().insert(conclusion.clone());
        self.inferences
            .borrow()
            .get(conclusion)
            .cloned()
            .unwrap_or_default()
    }
}

impl<I: Inference> ModifiableProof<I> for BaseProof<I> {
    fn produce(&self, inference: I) {
        let conclusion = inference.conclusion().clone();
        self.inferences
            .borrow_mut()
            .entry(conclusion.clone())
            .or_default()
            .push(inference);
        let seen = self.queried.borrow().contains(&conclusion);
        if seen {
            self.notify();
        }
    }

    fn clear(&self) {
        self.inferences.borrow_mut().clear();
        let seen = !self.queried.borrow().is_empty();
        if seen {
            self.notify();
        }
    }
}

impl<I: Inference> DynamicProof<I> for BaseProof<I> {
    fn add_listener(&self, listener: Rc<dyn ChangeListener>) {
        self.listeners.add(listener);
    }

    fn remove_listener(&self, listener: &Rc<dyn ChangeListener>) {
        self.listeners.remove(listener);
    }
}

impl<I: Inference> Producer<I> for BaseProof<I> {
    fn produce(&mut self, inference: I) {
        ModifiableProof::produce(&*self, inference);
    }
}

impl<I: Inference> FromIterator<I> for BaseProof<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let proof = Self::new();
        for inference in iter {
            ModifiableProof::produce(&proof, inference);
        }
        proof
    }
}

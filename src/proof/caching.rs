//! Memoizing view over a dynamic proof.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::inference::Inference;

use super::{ChangeListener, DynamicProof, ListenerList, Proof};

type Cache<I> = RefCell<HashMap<<I as Inference>::Conclusion, Vec<I>>>;

/// Caches the inferences returned by a [`DynamicProof`].
///
/// The cache is emptied synchronously inside the delegate's notification,
/// before this proof forwards the notification to its own listeners, so no
/// reentrant query triggered by that notification sees a stale entry.
pub struct CachingProof<I: Inference, P: DynamicProof<I>> {
    delegate: P,
    cache: Rc<Cache<I>>,
    listeners: Rc<ListenerList>,
    invalidator: Rc<dyn ChangeListener>,
}

struct Invalidator<I: Inference> {
    cache: Rc<Cache<I>>,
    listeners: Rc<ListenerList>,
}

impl<I: Inference> ChangeListener for Invalidator<I> {
    fn inferences_changed(&self) {
        self.cache.borrow_mut().clear();
        self.listeners.notify();
    }
}

impl<I: Inference + 'static, P: DynamicProof<I>> CachingProof<I, P> {
    pub fn new(delegate: P) -> Self {
        let cache: Rc<Cache<I>> = Rc::new(RefCell::new(HashMap::new()));
        let listeners = Rc::new(ListenerList::new());
        let invalidator: Rc<dyn ChangeListener> = Rc::new(Invalidator {
            cache: Rc::clone(&cache),
            listeners: Rc::clone(&listeners),
        });
        delegate.add_listener(Rc::clone(&invalidator));
        Self {
            delegate,
            cache,
            listeners,
            invalidator,
        }
    }
}

impl<I: Inference, P: DynamicProof<I>> CachingProof<I, P> {
    pub fn delegate(&self) -> &P {
        &self.delegate
    }

    /// Number of conclusions currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<I: Inference, P: DynamicProof<I>> Proof<I> for CachingProof<I, P> {
    fn inferences(&self, conclusion: &I::Conclusion) -> Vec<I> {
        if let Some(cached) = self.cache.borrow().get(conclusion) {
            return cached.clone();
        }
        let fetched = self.delegate.inferences(conclusion);
        self.cache
            .borrow_mut()
            .insert(conclusion.clone(), fetched.clone());
        fetched
    }
}

impl<I: Inference, P: DynamicProof<I>> DynamicProof<I> for CachingProof<I, P> {
    fn add_listener(&self, listener: Rc<dyn ChangeListener>) {
        self.listeners.add(listener);
    }

    fn remove_listener(&self, listener: &Rc<dyn ChangeListener>) {
        self.listeners.remove(listener);
    }
}

impl<I: Inference, P: DynamicProof<I>> Drop for CachingProof<I, P> {
    fn drop(&mut self) {
        self.delegate.remove_listener(&self.invalidator);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::inference::BaseInference;
    use crate::proof::{BaseProof, ModifiableProof};

    type Inf = BaseInference<&'static str>;

    /// Counts delegate queries.
    struct Counting {
        proof: BaseProof<Inf>,
        queries: Cell<usize>,
    }

    impl Proof<Inf> for Counting {
        fn inferences(&self, conclusion: &&'static str) -> Vec<Inf> {
            self.queries.set(self.queries.get() + 1);
            self.proof.inferences(conclusion)
        }
    }

    impl DynamicProof<Inf> for Counting {
        fn add_listener(&self, listener: Rc<dyn ChangeListener>) {
            self.proof.add_listener(listener);
        }

        fn remove_listener(&self, listener: &Rc<dyn ChangeListener>) {
            self.proof.remove_listener(listener);
        }
    }

    fn counting() -> Rc<Counting> {
        let base = BaseProof::new();
        base.produce(Inf::new("ax", "a", vec![]));
        Rc::new(Counting {
            proof: base,
            queries: Cell::new(0),
        })
    }

    #[test]
    fn repeated_queries_hit_the_cache() {
        let delegate = counting();
        let cache = CachingProof::new(Rc::clone(&delegate));

        assert_eq!(cache.inferences(&"a").len(), 1);
        assert_eq!(cache.inferences(&"a").len(), 1);
        assert_eq!(delegate.queries.get(), 1);
        assert_eq!(cache.cached_len(), 1);
    }

    #[test]
    fn change_invalidates_before_forwarding() {
        let delegate = counting();
        let cache = Rc::new(CachingProof::new(Rc::clone(&delegate)));

        // A downstream listener re-queries the cache while being notified.
        let observed = Rc::new(Cell::new(0));
        let (weak, seen) = (Rc::downgrade(&cache), Rc::clone(&observed));
        cache.add_listener(Rc::new(move || {
            if let Some(cache) = weak.upgrade() {
                seen.set(cache.inferences(&"a").len());
            }
        }));

        assert_eq!(cache.inferences(&"a").len(), 1);
        delegate.proof.produce(Inf::new("r1", "a", vec!["b"]));
        assert_eq!(observed.get(), 2, "listener must not see the stale entry");
        assert_eq!(cache.inferences(&"a").len(), 2);
    }

    #[test]
    fn drop_unregisters_from_delegate() {
        let delegate = counting();
        {
            let cache = CachingProof::new(Rc::clone(&delegate));
            let _ = cache.inferences(&"a");
        }
        // No invalidator left: producing must not touch a dropped cache.
        delegate.proof.produce(Inf::new("r1", "a", vec!["b"]));
        assert_eq!(delegate.proof.inferences(&"a").len(), 2);
    }
}

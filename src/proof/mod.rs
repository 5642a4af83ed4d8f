//! Proofs: read-only mappings from conclusions to the inferences deriving them.
//!
//! - [`Proof`]: the single read primitive everything else is built on
//! - [`ModifiableProof`]: proofs that accumulate inferences via `produce`
//! - [`DynamicProof`]: proofs that notify [`ChangeListener`]s when previously
//!   returned inference sets may have changed
//!
//! Mutation goes through `&self`: proofs are shared between views, caches and
//! their producers on one thread, and listeners are invoked only after every
//! internal borrow has been released, so a listener may query the proof again.

pub mod base;
pub mod caching;
pub mod chronological;
pub mod filter;
pub mod printer;
pub mod union;

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::inference::Inference;

pub use base::BaseProof;
pub use caching::CachingProof;
pub use chronological::ChronologicalProof;
pub use filter::FilteredProof;
pub use printer::ProofPrinter;
pub use union::ProofUnion;

/// A mapping `conclusion -> inferences whose conclusion is that value`.
///
/// Repeated calls for the same conclusion return the same inferences unless a
/// [`DynamicProof`] notified its listeners in between.
pub trait Proof<I: Inference> {
    fn inferences(&self, conclusion: &I::Conclusion) -> Vec<I>;
}

/// A proof that accumulates inferences.
pub trait ModifiableProof<I: Inference>: Proof<I> {
    /// Register one inference.
    fn produce(&self, inference: I);

    /// Remove every inference.
    fn clear(&self);
}

/// Receives a notification whenever a dynamic proof may have changed.
///
/// The notification carries no payload: receivers assume anything may have
/// changed.
pub trait ChangeListener {
    fn inferences_changed(&self);
}

impl<F: Fn()> ChangeListener for F {
    fn inferences_changed(&self) {
        self()
    }
}

/// A proof whose inferences can change over time.
pub trait DynamicProof<I: Inference>: Proof<I> {
    fn add_listener(&self, listener: Rc<dyn ChangeListener>);

    /// Unregister a listener previously added, compared by pointer.
    fn remove_listener(&self, listener: &Rc<dyn ChangeListener>);
}

// ---------------------------------------------------------------------------
// Listener list
// ---------------------------------------------------------------------------

/// Ordered list of change listeners.
#[derive(Default)]
pub struct ListenerList {
    listeners: RefCell<Vec<Rc<dyn ChangeListener>>>,
}

impl ListenerList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: Rc<dyn ChangeListener>) {
        self.listeners.borrow_mut().push(listener);
    }

    pub fn remove(&self, listener: &Rc<dyn ChangeListener>) {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(pos) = listeners.iter().position(|l| Rc::ptr_eq(l, listener)) {
            listeners.remove(pos);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Notify every listener registered at the time of the call.
    pub fn notify(&self) {
        // Snapshot so listeners may (un)register during the callback.
        let snapshot: Vec<_> = self.listeners.borrow().iter().cloned().collect();
        for listener in snapshot {
            listener.inferences_changed();
        }
    }
}

impl std::fmt::Debug for ListenerList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerList")
            .field("len", &self.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Trivial and forwarding implementations
// ---------------------------------------------------------------------------

/// The proof without inferences.
pub struct EmptyProof<I>(PhantomData<fn() -> I>);

impl<I> EmptyProof<I> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<I> Default for EmptyProof<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Inference> Proof<I> for EmptyProof<I> {
    fn inferences(&self, _conclusion: &I::Conclusion) -> Vec<I> {
        Vec::new()
    }
}

impl<I: Inference, P: Proof<I> + ?Sized> Proof<I> for &P {
    fn inferences(&self, conclusion: &I::Conclusion) -> Vec<I> {
        (**self).inferences(conclusion)
    }
}

impl<I: Inference, P: Proof<I> + ?Sized> Proof<I> for Rc<P> {
    fn inferences(&self, conclusion: &I::Conclusion) -> Vec<I> {
        (**self).inferences(conclusion)
    }
}

impl<I: Inference, P: Proof<I> + ?Sized> Proof<I> for Box<P> {
    fn inferences(&self, conclusion: &I::Conclusion) -> Vec<I> {
        (**self).inferences(conclusion)
    }
}

impl<I: Inference, P: DynamicProof<I> + ?Sized> DynamicProof<I> for &P {
    fn add_listener(&self, listener: Rc<dyn ChangeListener>) {
        (**self).add_listener(listener)
    }

    fn remove_listener(&self, listener: &Rc<dyn ChangeListener>) {
        (**self).remove_listener(listener)
    }
}

impl<I: Inference, P: DynamicProof<I> + ?Sized> DynamicProof<I> for Rc<P> {
    fn add_listener(&self, listener: Rc<dyn ChangeListener>) {
        (**self).add_listener(listener)
    }

    fn remove_listener(&self, listener: &Rc<dyn ChangeListener>) {
        (**self).remove_listener(listener)
    }
}

impl<I: Inference, P: ModifiableProof<I> + ?Sized> ModifiableProof<I> for Rc<P> {
    fn produce(&self, inference: I) {
        (**self).produce(inference)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

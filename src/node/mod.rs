//! Lazily expanded views of a proof rooted at one conclusion.
//!
//! A [`ProofNode`] stands for "every inference deriving this member", with
//! premises again represented as nodes over the same source. Its
//! [`ProofStep`]s are computed on first access and memoized for the lifetime
//! of the node.
//!
//! Nodes either read a [`Proof`] directly or convert another node through a
//! view: cycle elimination, derivability filtering, both
//! combined, forbidden-premise filtering, and adding or removing asserted
//! inferences. Views compose: each one wraps the node produced by the last.

mod view;

use std::cell::{OnceCell, RefCell};
use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::derivability::{
    DerivabilityChecker, DerivabilityCheckerWithBlocking, InferenceDerivabilityChecker,
};
use crate::inference::{Assertable, Inference};
use crate::proof::Proof;

use view::{PathLink, View};

/// Derivability checker over the nodes of one structure, shared by the
/// nodes of a derivable view.
pub type SharedChecker<'a, I> = Rc<RefCell<dyn DerivabilityChecker<ProofNode<'a, I>> + 'a>>;

/// Blocking derivability checker shared by the nodes of an acyclic derivable view.
pub type SharedBlockingChecker<'a, I> =
    Rc<RefCell<dyn DerivabilityCheckerWithBlocking<ProofNode<'a, I>> + 'a>>;

// ---------------------------------------------------------------------------
// ProofNode
// ---------------------------------------------------------------------------

/// All inferences deriving one member, with premises as nodes.
///
/// Two nodes are equal when they have the same member and the same origin:
/// the same proof (by address) for base nodes, or an equal delegate seen
/// through an equal view for converted ones.
pub struct ProofNode<'a, I: Inference> {
    data: Rc<NodeData<'a, I>>,
}

struct NodeData<'a, I: Inference> {
    member: I::Conclusion,
    origin: Origin<'a, I>,
    steps: OnceCell<Vec<ProofStep<'a, I>>>,
}

enum Origin<'a, I: Inference> {
    Base(&'a dyn Proof<I>),
    Converted {
        delegate: ProofNode<'a, I>,
        view: View<'a, I>,
    },
}

impl<'a, I: Inference + 'a> ProofNode<'a, I> {
    /// A node reading the inferences of `member` from `proof`.
    pub fn new(proof: &'a dyn Proof<I>, member: I::Conclusion) -> Self {
        Self::with_origin(member, Origin::Base(proof))
    }

    fn with_origin(member: I::Conclusion, origin: Origin<'a, I>) -> Self {
        Self {
            data: Rc::new(NodeData {
                member,
                origin,
                steps: OnceCell::new(),
            }),
        }
    }

    fn converted(delegate: ProofNode<'a, I>, view: View<'a, I>) -> Self {
        let member = delegate.member().clone();
        Self::with_origin(member, Origin::Converted { delegate, view })
    }

    /// An equal node with its own, empty memo. Steps refer to their
    /// conclusion through such a copy so a node never owns itself.
    fn detached(&self) -> Self {
        let origin = match &self.data.origin {
            Origin::Base(proof) => Origin::Base(*proof),
            Origin::Converted { delegate, view } => Origin::Converted {
                delegate: delegate.clone(),
                view: view.clone(),
            },
        };
        Self::with_origin(self.data.member.clone(), origin)
    }

    pub fn member(&self) -> &I::Conclusion {
        &self.data.member
    }

    /// The inference steps deriving the member, computed on first access.
    pub fn steps(&self) -> &[ProofStep<'a, I>] {
        self.data.steps.get_or_init(|| self.compute_steps())
    }

    fn compute_steps(&self) -> Vec<ProofStep<'a, I>> {
        match &self.data.origin {
            Origin::Base(proof) => proof
                .inferences(self.member())
                .into_iter()
                .map(|inference| {
                    let premises = inference
                        .premises()
                        .iter()
                        .map(|p| ProofNode::new(*proof, p.clone()))
                        .collect();
                    ProofStep::new(inference, self.detached(), premises)
                })
                .collect(),
            Origin::Converted { delegate, view } => view.steps(self, delegate),
        }
    }

    /// The same structure with every inference dropped that uses a premise
    /// already on the path from the root to this node.
    pub fn eliminate_cycles(&self) -> Self {
        let path = PathLink::root(self.clone());
        Self::converted(self.clone(), View::Acyclic { path })
    }

    /// The same structure restricted to inferences whose premises are all
    /// derivable, or `None` if this node is not derivable.
    pub fn eliminate_not_derivable(&self) -> Option<Self> {
        let checker: SharedChecker<'a, I> = Rc::new(RefCell::new(
            InferenceDerivabilityChecker::<ProofStep<'a, I>, _>::new(ProofNodeProof),
        ));
        self.eliminate_not_derivable_with(checker)
    }

    /// Like [`eliminate_not_derivable`](Self::eliminate_not_derivable), with a
    /// checker over the nodes of this structure supplied by the caller.
    pub fn eliminate_not_derivable_with(&self, checker: SharedChecker<'a, I>) -> Option<Self> {
        if !checker.borrow_mut().is_derivable(self) {
            return None;
        }
        Some(Self::converted(self.clone(), View::Derivable { checker }))
    }

    /// Cycle elimination where an inference also survives only if its
    /// premises are derivable without any conclusion on the path from the
    /// root. `None` if this node is not derivable.
    pub fn eliminate_not_derivable_and_cycles(&self) -> Option<Self> {
        let checker: SharedBlockingChecker<'a, I> = Rc::new(RefCell::new(
            InferenceDerivabilityChecker::<ProofStep<'a, I>, _>::new(ProofNodeProof),
        ));
        self.eliminate_not_derivable_and_cycles_with(checker)
    }

    pub fn eliminate_not_derivable_and_cycles_with(
        &self,
        checker: SharedBlockingChecker<'a, I>,
    ) -> Option<Self> {
        if !checker.borrow_mut().is_derivable(self) {
            return None;
        }
        let path = PathLink::root(self.clone());
        Some(Self::converted(
            self.clone(),
            View::AcyclicDerivable { path, checker },
        ))
    }

    /// The same structure without inferences using a forbidden premise.
    ///
    /// `forbidden` holds members, not nodes: a premise is forbidden when its
    /// member is in the set, whatever view the premise node comes from.
    pub fn remove_forbidden(&self, forbidden: HashSet<I::Conclusion>) -> Self {
        Self::converted(
            self.clone(),
            View::Filtered {
                forbidden: Rc::new(forbidden),
            },
        )
    }

    /// The same structure where every member of `asserted` additionally has
    /// an asserted inference.
    pub fn add_asserted_inferences(&self, asserted: HashSet<I::Conclusion>) -> Self
    where
        I: Assertable,
    {
        Self::converted(
            self.clone(),
            View::AddAssertions {
                asserted: Rc::new(asserted),
                make: I::asserted,
            },
        )
    }

    /// The same structure without asserted inferences.
    pub fn remove_asserted_inferences(&self) -> Self {
        Self::converted(self.clone(), View::RemoveAssertions)
    }
}

impl<I: Inference> Clone for ProofNode<'_, I> {
    fn clone(&self) -> Self {
        Self {
            data: Rc::clone(&self.data),
        }
    }
}

impl<I: Inference> PartialEq for ProofNode<'_, I> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
            || (self.data.member == other.data.member && self.data.origin == other.data.origin)
    }
}

impl<I: Inference> Eq for ProofNode<'_, I> {}

impl<I: Inference> Hash for ProofNode<'_, I> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.member.hash(state);
    }
}

impl<I: Inference> PartialEq for Origin<'_, I> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Origin::Base(a), Origin::Base(b)) => std::ptr::addr_eq(*a, *b),
            (
                Origin::Converted {
                    delegate: d1,
                    view: v1,
                },
                Origin::Converted {
                    delegate: d2,
                    view: v2,
                },
            ) => d1 == d2 && v1 == v2,
            _ => false,
        }
    }
}

impl<I: Inference> fmt::Debug for ProofNode<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProofNode").field(&self.data.member).finish()
    }
}

impl<I> fmt::Display for ProofNode<'_, I>
where
    I: Inference,
    I::Conclusion: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data.member.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// ProofStep
// ---------------------------------------------------------------------------

/// One inference of a [`ProofNode`], with node premises.
///
/// Carries the source inference it was built from; equality is structural
/// over name, conclusion and premises, and the hash is computed once.
pub struct ProofStep<'a, I: Inference> {
    inner: Rc<StepInner<'a, I>>,
}

struct StepInner<'a, I: Inference> {
    inference: I,
    conclusion: ProofNode<'a, I>,
    premises: Vec<ProofNode<'a, I>>,
    hash: u64,
}

impl<'a, I: Inference + 'a> ProofStep<'a, I> {
    fn new(inference: I, conclusion: ProofNode<'a, I>, premises: Vec<ProofNode<'a, I>>) -> Self {
        let mut hasher = DefaultHasher::new();
        inference.name().hash(&mut hasher);
        conclusion.hash(&mut hasher);
        premises.hash(&mut hasher);
        Self {
            inner: Rc::new(StepInner {
                inference,
                conclusion,
                premises,
                hash: hasher.finish(),
            }),
        }
    }

    /// The source inference.
    pub fn inference(&self) -> &I {
        &self.inner.inference
    }
}

impl<'a, I: Inference + 'a> Inference for ProofStep<'a, I> {
    type Conclusion = ProofNode<'a, I>;

    fn name(&self) -> &str {
        self.inner.inference.name()
    }

    fn conclusion(&self) -> &ProofNode<'a, I> {
        &self.inner.conclusion
    }

    fn premises(&self) -> &[ProofNode<'a, I>] {
        &self.inner.premises
    }
}

impl<I: Inference> Clone for ProofStep<'_, I> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<I: Inference> PartialEq for ProofStep<'_, I> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.inner, &other.inner);
        Rc::ptr_eq(a, b)
            || (a.hash == b.hash
                && a.inference.name() == b.inference.name()
                && a.conclusion == b.conclusion
                && a.premises == b.premises)
    }
}

impl<I: Inference> Eq for ProofStep<'_, I> {}

impl<I: Inference> Hash for ProofStep<'_, I> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.inner.hash);
    }
}

impl<I: Inference> fmt::Debug for ProofStep<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProofStep")
            .field("name", &self.inner.inference.name())
            .field("conclusion", &self.inner.conclusion)
            .field("premises", &self.inner.premises)
            .finish()
    }
}

/// The proof formed by proof nodes: the inferences of a node are its steps.
///
/// Lets checkers, graph algorithms and the printer run over any view.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProofNodeProof;

impl<'a, I: Inference + 'a> Proof<ProofStep<'a, I>> for ProofNodeProof {
    fn inferences(&self, conclusion: &ProofNode<'a, I>) -> Vec<ProofStep<'a, I>> {
        conclusion.steps().to_vec()
    }
}

//! The kinds of conversion a [`ProofNode`] can apply to its delegate.
//!
//! Every view keeps only the state it needs. Converting a node takes the
//! delegate's steps, drops the ones the view rejects, and wraps the premises
//! of the survivors with the view for the child position.

use std::collections::HashSet;
use std::rc::Rc;

use crate::inference::{Inference, is_asserted};

use super::{ProofNode, ProofStep, SharedBlockingChecker, SharedChecker};

/// Delegate nodes from the root of an acyclic view down to one node.
pub(super) struct PathLink<'a, I: Inference> {
    node: ProofNode<'a, I>,
    parent: Option<Rc<PathLink<'a, I>>>,
}

impl<'a, I: Inference + 'a> PathLink<'a, I> {
    pub(super) fn root(node: ProofNode<'a, I>) -> Rc<Self> {
        Rc::new(Self { node, parent: None })
    }

    fn push(parent: &Rc<Self>, node: ProofNode<'a, I>) -> Rc<Self> {
        Rc::new(Self {
            node,
            parent: Some(Rc::clone(parent)),
        })
    }

    fn iter(&self) -> impl Iterator<Item = &ProofNode<'a, I>> {
        std::iter::successors(Some(self), |link| link.parent.as_deref()).map(|link| &link.node)
    }

    fn contains(&self, node: &ProofNode<'a, I>) -> bool {
        self.iter().any(|n| n == node)
    }
}

fn same_path<'a, I: Inference>(a: &Rc<PathLink<'a, I>>, b: &Rc<PathLink<'a, I>>) -> bool {
    let (mut a, mut b) = (Some(a), Some(b));
    loop {
        match (a, b) {
            (None, None) => return true,
            (Some(x), Some(y)) => {
                if Rc::ptr_eq(x, y) {
                    return true;
                }
                if x.node != y.node {
                    return false;
                }
                a = x.parent.as_ref();
                b = y.parent.as_ref();
            }
            _ => return false,
        }
    }
}

pub(super) enum View<'a, I: Inference> {
    Acyclic {
        path: Rc<PathLink<'a, I>>,
    },
    Derivable {
        checker: SharedChecker<'a, I>,
    },
    AcyclicDerivable {
        path: Rc<PathLink<'a, I>>,
        checker: SharedBlockingChecker<'a, I>,
    },
    Filtered {
        forbidden: Rc<HashSet<I::Conclusion>>,
    },
    AddAssertions {
        asserted: Rc<HashSet<I::Conclusion>>,
        make: fn(I::Conclusion) -> I,
    },
    RemoveAssertions,
}

impl<'a, I: Inference + 'a> View<'a, I> {
    /// The steps of `node`, which wraps `delegate` with this view.
    pub(super) fn steps(
        &self,
        node: &ProofNode<'a, I>,
        delegate: &ProofNode<'a, I>,
    ) -> Vec<ProofStep<'a, I>> {
        let kept: Vec<&ProofStep<'a, I>> = match self {
            View::Acyclic { path } => delegate
                .steps()
                .iter()
                .filter(|step| !step.premises().iter().any(|p| path.contains(p)))
                .collect(),
            View::Derivable { checker } => {
                let mut checker = checker.borrow_mut();
                let kept: Vec<_> = delegate
                    .steps()
                    .iter()
                    .filter(|step| step.premises().iter().all(|p| checker.is_derivable(p)))
                    .collect();
                assert!(
                    !kept.is_empty(),
                    "derivable node {:?} has no surviving inference",
                    node.member()
                );
                kept
            }
            View::AcyclicDerivable { path, checker } => {
                let mut checker = checker.borrow_mut();
                let newly_blocked: Vec<_> = path
                    .iter()
                    .filter(|n| checker.block(n))
                    .cloned()
                    .collect();
                let kept: Vec<_> = delegate
                    .steps()
                    .iter()
                    .filter(|step| {
                        let premises = step.premises();
                        !premises.iter().any(|p| path.contains(p))
                            && premises.iter().all(|p| checker.is_derivable(p))
                    })
                    .collect();
                for n in &newly_blocked {
                    checker.unblock(n);
                }
                assert!(
                    !kept.is_empty(),
                    "derivable node {:?} has no surviving inference",
                    node.member()
                );
                kept
            }
            View::Filtered { forbidden } => delegate
                .steps()
                .iter()
                .filter(|step| !step.premises().iter().any(|p| forbidden.contains(p.member())))
                .collect(),
            View::AddAssertions { .. } => delegate.steps().iter().collect(),
            View::RemoveAssertions => delegate
                .steps()
                .iter()
                .filter(|step| !is_asserted(*step))
                .collect(),
        };

        let mut steps: Vec<_> = kept.into_iter().map(|s| self.convert(node, s)).collect();
        if let View::AddAssertions { asserted, make } = self {
            if asserted.contains(node.member()) && !steps.iter().any(is_asserted) {
                let inference = make(node.member().clone());
                steps.push(ProofStep::new(inference, node.detached(), Vec::new()));
            }
        }
        steps
    }

    fn convert(&self, node: &ProofNode<'a, I>, step: &ProofStep<'a, I>) -> ProofStep<'a, I> {
        let premises = step
            .premises()
            .iter()
            .map(|p| ProofNode::converted(p.clone(), self.child(p)))
            .collect();
        ProofStep::new(step.inference().clone(), node.detached(), premises)
    }

    /// The view applied to `premise` below the current node.
    fn child(&self, premise: &ProofNode<'a, I>) -> Self {
        match self {
            View::Acyclic { path } => View::Acyclic {
                path: PathLink::push(path, premise.clone()),
            },
            View::AcyclicDerivable { path, checker } => View::AcyclicDerivable {
                path: PathLink::push(path, premise.clone()),
                checker: Rc::clone(checker),
            },
            other => other.clone(),
        }
    }
}

impl<I: Inference> Clone for View<'_, I> {
    fn clone(&self) -> Self {
        match self {
            View::Acyclic { path } => View::Acyclic {
                path: Rc::clone(path),
            },
            View::Derivable { checker } => View::Derivable {
                checker: Rc::clone(checker),
            },
            View::AcyclicDerivable { path, checker } => View::AcyclicDerivable {
                path: Rc::clone(path),
                checker: Rc::clone(checker),
            },
            View::Filtered { forbidden } => View::Filtered {
                forbidden: Rc::clone(forbidden),
            },
            View::AddAssertions { asserted, make } => View::AddAssertions {
                asserted: Rc::clone(asserted),
                make: *make,
            },
            View::RemoveAssertions => View::RemoveAssertions,
        }
    }
}

impl<I: Inference> PartialEq for View<'_, I> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (View::Acyclic { path: a }, View::Acyclic { path: b }) => same_path(a, b),
            (View::Derivable { checker: a }, View::Derivable { checker: b }) => Rc::ptr_eq(a, b),
            (
                View::AcyclicDerivable {
                    path: pa,
                    checker: ca,
                },
                View::AcyclicDerivable {
                    path: pb,
                    checker: cb,
                },
            ) => Rc::ptr_eq(ca, cb) && same_path(pa, pb),
            (View::Filtered { forbidden: a }, View::Filtered { forbidden: b }) => a == b,
            (View::AddAssertions { asserted: a, .. }, View::AddAssertions { asserted: b, .. }) => {
                a == b
            }
            (View::RemoveAssertions, View::RemoveAssertions) => true,
            _ => false,
        }
    }
}

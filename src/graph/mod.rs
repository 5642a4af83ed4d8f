//! Algorithms over the conclusion graph of a proof.
//!
//! - [`unfold`]: breadth-first and dependency-ordered enumeration of
//!   everything reachable from a goal
//! - [`essential`](mod@essential): conclusions every derivation of a goal passes through
//! - [`expand`](mod@expand): forward chaining from a set of derivable conclusions
//! - [`prune`](mod@prune): a reduced proof preserving the derivability of a goal

pub mod essential;
pub mod expand;
pub mod prune;
pub mod unfold;

pub use essential::{essential_conclusions, essential_conclusions_with};
pub use expand::{InferenceExpander, expand};
pub use prune::prune;
pub use unfold::{reachable_conclusions, unfold_recursively, unfold_topologically};

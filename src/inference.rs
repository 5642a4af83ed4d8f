//! Inferences: named steps deriving one conclusion from ordered premises.
//!
//! Conclusions are opaque values; the engine only needs equality, hashing and
//! a debug rendering. Concrete inference types implement [`Inference`] so the
//! checker, the proof views and the graph algorithms stay generic over them.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Reserved name of the zero-premise inference marking a conclusion as asserted.
pub const ASSERTED_INFERENCE_NAME: &str = "Asserted";

/// A named inference `conclusion <- premises`.
pub trait Inference: Clone + fmt::Debug {
    /// The type of conclusions and premises.
    type Conclusion: Clone + Eq + Hash + fmt::Debug;

    /// The rule name.
    fn name(&self) -> &str;

    /// The derived conclusion.
    fn conclusion(&self) -> &Self::Conclusion;

    /// The premises, in order.
    fn premises(&self) -> &[Self::Conclusion];
}

/// Inferences carrying a justification, e.g. the axioms they stem from.
pub trait Justified: Inference {
    type Justification: fmt::Debug;

    fn justification(&self) -> &Self::Justification;
}

/// Inference types able to represent "this conclusion is asserted".
pub trait Assertable: Inference {
    /// Build the zero-premise asserted inference for `conclusion`.
    fn asserted(conclusion: Self::Conclusion) -> Self;
}

/// Whether `inference` is an asserted-conclusion marker.
pub fn is_asserted<I: Inference>(inference: &I) -> bool {
    inference.premises().is_empty() && inference.name() == ASSERTED_INFERENCE_NAME
}

// ---------------------------------------------------------------------------
// Base inference
// ---------------------------------------------------------------------------

/// Immutable inference value with structural equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseInference<C> {
    pub name: String,
    pub conclusion: C,
    #[serde(default = "Vec::new")]
    pub premises: Vec<C>,
}

impl<C> BaseInference<C> {
    pub fn new(name: impl Into<String>, conclusion: C, premises: Vec<C>) -> Self {
        Self {
            name: name.into(),
            conclusion,
            premises,
        }
    }
}

impl<C: Clone + Eq + Hash + fmt::Debug> Inference for BaseInference<C> {
    type Conclusion = C;

    fn name(&self) -> &str {
        &self.name
    }

    fn conclusion(&self) -> &C {
        &self.conclusion
    }

    fn premises(&self) -> &[C] {
        &self.premises
    }
}

impl<C: Clone + Eq + Hash + fmt::Debug> Assertable for BaseInference<C> {
    fn asserted(conclusion: C) -> Self {
        Self::new(ASSERTED_INFERENCE_NAME, conclusion, Vec::new())
    }
}

impl<C: fmt::Display> fmt::Display for BaseInference<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_inference(f, &self.name, &self.conclusion, &self.premises)
    }
}

// ---------------------------------------------------------------------------
// Justified inference
// ---------------------------------------------------------------------------

/// An inference plus its justification. Identity includes the justification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JustifiedInference<C, J> {
    #[serde(flatten)]
    pub inference: BaseInference<C>,
    pub justification: J,
}

impl<C, J> JustifiedInference<C, J> {
    pub fn new(name: impl Into<String>, conclusion: C, premises: Vec<C>, justification: J) -> Self {
        Self {
            inference: BaseInference::new(name, conclusion, premises),
            justification,
        }
    }
}

impl<C, J> Inference for JustifiedInference<C, J>
where
    C: Clone + Eq + Hash + fmt::Debug,
    J: Clone + fmt::Debug,
{
    type Conclusion = C;

    fn name(&self) -> &str {
        &self.inference.name
    }

    fn conclusion(&self) -> &C {
        &self.inference.conclusion
    }

    fn premises(&self) -> &[C] {
        &self.inference.premises
    }
}

impl<C, J> Justified for JustifiedInference<C, J>
where
    C: Clone + Eq + Hash + fmt::Debug,
    J: Clone + fmt::Debug,
{
    type Justification = J;

    fn justification(&self) -> &J {
        &self.justification
    }
}

impl<C, J> Assertable for JustifiedInference<C, J>
where
    C: Clone + Eq + Hash + fmt::Debug,
    J: Clone + fmt::Debug + Default,
{
    fn asserted(conclusion: C) -> Self {
        Self {
            inference: BaseInference::asserted(conclusion),
            justification: J::default(),
        }
    }
}

impl<C: fmt::Display, J: fmt::Debug> fmt::Display for JustifiedInference<C, J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.inference, self.justification)
    }
}

fn write_inference<C: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    conclusion: &C,
    premises: &[C],
) -> fmt::Result {
    write!(f, "{name}: {conclusion} <-")?;
    for (i, premise) in premises.iter().enumerate() {
        let sep = if i == 0 { " " } else { ", " };
        write!(f, "{sep}{premise}")?;
    }
    Ok(())
}

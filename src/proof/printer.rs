//! Indented ASCII rendering of a proof rooted at one conclusion.

use std::collections::HashSet;
use std::fmt::{self, Display, Write};

use crate::inference::{Inference, Justified};

use super::Proof;

/// Marker appended to a conclusion that was already expanded earlier.
pub const SHOWN_ABOVE: &str = "(shown above)";

type JustificationFn<'p, I> = Box<dyn Fn(&I) -> Option<String> + 'p>;

/// Renders the inferences reachable from a conclusion as an indented tree.
///
/// Each conclusion is expanded at most once; later occurrences, including
/// the ones closing a cycle, get a [`SHOWN_ABOVE`] marker instead.
/// Zero-premise inferences and justifications are leaves.
///
/// ```text
/// c
///   <- r2
///     b
///       <- r1
///         a
///           <- Asserted
///     c (shown above)
/// ```
pub struct ProofPrinter<'p, I: Inference, P: ?Sized> {
    proof: &'p P,
    indent: usize,
    justification: Option<JustificationFn<'p, I>>,
}

enum Line<I: Inference> {
    Conclusion(I::Conclusion, usize),
    Inference(I, usize),
}

impl<'p, I, P> ProofPrinter<'p, I, P>
where
    I: Inference,
    I::Conclusion: Display,
    P: Proof<I> + ?Sized,
{
    pub fn new(proof: &'p P) -> Self {
        Self {
            proof,
            indent: 2,
            justification: None,
        }
    }

    /// Spaces per nesting level (at least one).
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }

    /// Append the rendering returned by `render` to each inference line.
    pub fn with_justifications(mut self, render: impl Fn(&I) -> Option<String> + 'p) -> Self {
        self.justification = Some(Box::new(render));
        self
    }

    pub fn render(&self, goal: &I::Conclusion) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(goal, &mut out);
        out
    }

    pub fn write_to(&self, goal: &I::Conclusion, out: &mut impl Write) -> fmt::Result {
        let mut shown: HashSet<I::Conclusion> = HashSet::new();
        let mut stack = vec![Line::<I>::Conclusion(goal.clone(), 0)];

        while let Some(line) = stack.pop() {
            match line {
                Line::Conclusion(conclusion, depth) => {
                    self.pad(out, depth)?;
                    if !shown.insert(conclusion.clone()) {
                        writeln!(out, "{conclusion} {SHOWN_ABOVE}")?;
                        continue;
                    }
                    writeln!(out, "{conclusion}")?;
                    let inferences = self.proof.inferences(&conclusion);
                    stack.extend(
                        inferences
                            .into_iter()
                            .rev()
                            .map(|inf| Line::Inference(inf, depth + 1)),
                    );
                }
                Line::Inference(inference, depth) => {
                    self.pad(out, depth)?;
                    write!(out, "<- {}", inference.name())?;
                    if let Some(justification) =
                        self.justification.as_ref().and_then(|render| render(&inference))
                    {
                        write!(out, " {justification}")?;
                    }
                    writeln!(out)?;
                    stack.extend(
                        inference
                            .premises()
                            .iter()
                            .rev()
                            .map(|p| Line::Conclusion(p.clone(), depth + 1)),
                    );
                }
            }
        }
        Ok(())
    }

    fn pad(&self, out: &mut impl Write, depth: usize) -> fmt::Result {
        write!(out, "{:width$}", "", width = depth * self.indent)
    }
}

impl<'p, I, P> ProofPrinter<'p, I, P>
where
    I: Justified,
    I::Conclusion: Display,
    P: Proof<I> + ?Sized,
{
    /// A printer that shows every inference's justification.
    pub fn justified(proof: &'p P) -> Self {
        Self::new(proof).with_justifications(|inf: &I| Some(format!("{:?}", inf.justification())))
    }
}

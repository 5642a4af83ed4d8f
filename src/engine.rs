//! Engine facade: string-labelled inference sets loaded from files.
//!
//! The `Engine` owns one [`BaseProof`] of [`EngineInference`]s and exposes the
//! derivability checker, the graph algorithms and the proof-node views over
//! it, reporting bad input through [`ProofError`].

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::derivability::{
    DerivabilityChecker, DerivabilityCheckerWithBlocking, InferenceDerivabilityChecker,
};
use crate::error::{ProofError, ProofResult};
use crate::graph;
use crate::inference::{Assertable, Inference, JustifiedInference, is_asserted};
use crate::node::{ProofNode, ProofNodeProof, ProofStep};
use crate::proof::{BaseProof, ChronologicalProof, Proof, ProofPrinter};

/// Inferences handled by the engine: string conclusions justified by a set
/// of axiom labels.
pub type EngineInference = JustifiedInference<String, BTreeSet<String>>;

// ---------------------------------------------------------------------------
// Inference files
// ---------------------------------------------------------------------------

/// The contents of a JSON or TOML inference file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceFile {
    /// Conclusions asserted outright.
    #[serde(default)]
    pub asserted: Vec<String>,
    #[serde(default, rename = "inference")]
    pub inferences: Vec<InferenceEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceEntry {
    pub name: String,
    pub conclusion: String,
    #[serde(default)]
    pub premises: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub justification: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> ProofResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            _ => Err(ProofError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

impl InferenceFile {
    pub fn load(path: &Path) -> ProofResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| ProofError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let parse_error = |message: String| ProofError::Parse {
            path: path.display().to_string(),
            message,
        };
        match format {
            Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
            Format::Toml => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
        }
    }

    /// Write as JSON or TOML, chosen by the extension of `path`.
    pub fn save(&self, path: &Path) -> ProofResult<()> {
        let content = match Format::of(path)? {
            Format::Json => self.to_json(),
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ProofError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?,
        };
        std::fs::write(path, content).map_err(|e| ProofError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn to_json(&self) -> String {
        // Plain strings and vectors always serialize.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Asserted markers become `asserted` entries, everything else an
    /// `[[inference]]` entry.
    pub fn from_inferences(inferences: impl IntoIterator<Item = EngineInference>) -> Self {
        let mut file = Self::default();
        for inference in inferences {
            if is_asserted(&inference) && inference.justification.is_empty() {
                file.asserted.push(inference.inference.conclusion);
                continue;
            }
            let JustifiedInference {
                inference,
                justification,
            } = inference;
            file.inferences.push(InferenceEntry {
                name: inference.name,
                conclusion: inference.conclusion,
                premises: inference.premises,
                justification,
            });
        }
        file
    }

    /// Asserted conclusions first, then the entries in file order.
    pub fn into_inferences(self) -> Vec<EngineInference> {
        let asserted = self.asserted.into_iter().map(EngineInference::asserted);
        let entries = self.inferences.into_iter().map(|e| {
            EngineInference::new(e.name, e.conclusion, e.premises, e.justification)
        });
        asserted.chain(entries).collect()
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Which proof-node view [`Engine::render`] prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// The proof as loaded; repeated conclusions are marked, not expanded.
    #[default]
    Plain,
    /// Inferences closing a cycle along the current branch are dropped.
    Acyclic,
    /// Only inferences whose premises are all derivable.
    Derivable,
    /// Both: premises must be derivable without the current branch.
    AcyclicDerivable,
}

impl RenderMode {
    pub fn new(acyclic: bool, derivable: bool) -> Self {
        match (acyclic, derivable) {
            (false, false) => RenderMode::Plain,
            (true, false) => RenderMode::Acyclic,
            (false, true) => RenderMode::Derivable,
            (true, true) => RenderMode::AcyclicDerivable,
        }
    }
}

/// Summary counts of a loaded engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStats {
    pub inferences: usize,
    pub conclusions: usize,
    pub asserted: usize,
    pub derivable: usize,
}

impl std::fmt::Display for EngineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "provable engine stats")?;
        writeln!(f, "  inferences:   {}", self.inferences)?;
        writeln!(f, "  conclusions:  {}", self.conclusions)?;
        writeln!(f, "  asserted:     {}", self.asserted)?;
        writeln!(f, "  derivable:    {}", self.derivable)?;
        Ok(())
    }
}

/// A loaded set of inferences and the operations over it.
pub struct Engine {
    config: EngineConfig,
    proof: BaseProof<EngineInference>,
    /// Every conclusion or premise some inference mentions.
    mentioned: HashSet<String>,
}

impl Engine {
    /// Build from inferences, checking causal order when the config asks for it.
    pub fn from_inferences(
        config: EngineConfig,
        inferences: impl IntoIterator<Item = EngineInference>,
    ) -> ProofResult<Self> {
        config.validate()?;

        let inferences: Vec<_> = inferences.into_iter().collect();
        let mut mentioned = HashSet::new();
        for inference in &inferences {
            mentioned.insert(inference.conclusion().clone());
            mentioned.extend(inference.premises().iter().cloned());
        }

        let proof = if config.chronological {
            let chronological = ChronologicalProof::new();
            for inference in inferences {
                chronological.produce(inference)?;
            }
            chronological.into_base()
        } else {
            inferences.into_iter().collect()
        };

        tracing::info!(
            inferences = proof.len(),
            conclusions = mentioned.len(),
            chronological = config.chronological,
            "engine loaded"
        );

        Ok(Self {
            config,
            proof,
            mentioned,
        })
    }

    /// Load an inference file (`.json` or `.toml`).
    pub fn load(config: EngineConfig, path: &Path) -> ProofResult<Self> {
        let file = InferenceFile::load(path)?;
        Self::from_inferences(config, file.into_inferences())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn proof(&self) -> &BaseProof<EngineInference> {
        &self.proof
    }

    fn require(&self, conclusion: &str) -> ProofResult<String> {
        if self.mentioned.contains(conclusion) {
            Ok(conclusion.to_string())
        } else {
            Err(ProofError::UnknownConclusion {
                conclusion: conclusion.to_string(),
            })
        }
    }

    /// Whether `goal` is derivable without any of `blocked`.
    pub fn is_derivable(&self, goal: &str, blocked: &[String]) -> ProofResult<bool> {
        let goal = self.require(goal)?;
        let mut checker = InferenceDerivabilityChecker::new(&self.proof);
        for conclusion in blocked {
            checker.block(&self.require(conclusion)?);
        }
        Ok(checker.is_derivable(&goal))
    }

    /// One derivation of `goal`, premises before conclusions, or `None` if
    /// `goal` is not derivable.
    pub fn derivation(&self, goal: &str) -> ProofResult<Option<Vec<EngineInference>>> {
        let goal = self.require(goal)?;
        let mut checker = InferenceDerivabilityChecker::new(&self.proof);
        Ok(checker
            .derivation(&goal)
            .map(|derivation| derivation.inferences_in_order()))
    }

    pub fn essential_conclusions(&self, goal: &str) -> ProofResult<BTreeSet<String>> {
        let goal = self.require(goal)?;
        Ok(graph::essential_conclusions(&self.proof, &goal)
            .into_iter()
            .collect())
    }

    /// The inferences of the pruned proof for `goal` together with the
    /// asserted inferences they start from, sorted. Saved as an inference
    /// file, the result derives `goal` on its own.
    pub fn prune(&self, goal: &str) -> ProofResult<Vec<EngineInference>> {
        let goal = self.require(goal)?;
        let mut inferences = graph::prune(&self.proof, &goal).all_inferences();

        let mut leaves: HashSet<&String> = inferences
            .iter()
            .flat_map(|inference| inference.premises())
            .collect();
        leaves.insert(&goal);
        let assertions: Vec<_> = leaves
            .into_iter()
            .flat_map(|leaf| self.proof.inferences(leaf))
            .filter(|inference| is_asserted(inference))
            .collect();
        inferences.extend(assertions);
        Ok(sorted(inferences))
    }

    /// Every inference reachable from `goal`, breadth first or premises first.
    pub fn unfold(&self, goal: &str, topological: bool) -> ProofResult<Vec<EngineInference>> {
        let goal = self.require(goal)?;
        let mut inferences = Vec::new();
        if topological {
            graph::unfold_topologically(&self.proof, &goal, &mut inferences);
        } else {
            graph::unfold_recursively(&self.proof, &goal, &mut inferences);
        }
        Ok(inferences)
    }

    /// Render the proof of `goal` through the view selected by `mode`.
    ///
    /// `None` when a derivable view is asked for and `goal` is not derivable.
    pub fn render(&self, goal: &str, mode: RenderMode) -> ProofResult<Option<String>> {
        let goal = self.require(goal)?;
        if mode == RenderMode::Plain {
            let mut printer =
                ProofPrinter::<EngineInference, _>::new(&self.proof).with_indent(self.config.indent);
            if self.config.show_justifications {
                printer = printer.with_justifications(|i: &EngineInference| {
                    describe_justification(&i.justification)
                });
            }
            return Ok(Some(printer.render(&goal)));
        }

        let root = ProofNode::new(&self.proof, goal);
        let node = match mode {
            RenderMode::Acyclic => Some(root.eliminate_cycles()),
            RenderMode::Derivable => root.eliminate_not_derivable(),
            RenderMode::AcyclicDerivable => root.eliminate_not_derivable_and_cycles(),
            RenderMode::Plain => Some(root),
        };
        let Some(node) = node else {
            return Ok(None);
        };

        let mut printer = ProofPrinter::<ProofStep<'_, EngineInference>, _>::new(&ProofNodeProof)
            .with_indent(self.config.indent);
        if self.config.show_justifications {
            printer = printer.with_justifications(|step: &ProofStep<'_, EngineInference>| {
                describe_justification(&step.inference().justification)
            });
        }
        Ok(Some(printer.render(&node)))
    }

    pub fn stats(&self) -> EngineStats {
        let mut checker = InferenceDerivabilityChecker::new(&self.proof);
        let derivable = self
            .mentioned
            .iter()
            .filter(|c| checker.is_derivable(*c))
            .count();
        let asserted = self
            .proof
            .all_inferences()
            .iter()
            .filter(|i| is_asserted(*i))
            .count();
        EngineStats {
            inferences: self.proof.len(),
            conclusions: self.mentioned.len(),
            asserted,
            derivable,
        }
    }
}

fn describe_justification(justification: &BTreeSet<String>) -> Option<String> {
    if justification.is_empty() {
        return None;
    }
    let labels: Vec<&str> = justification.iter().map(String::as_str).collect();
    Some(format!("[{}]", labels.join(", ")))
}

fn sorted(mut inferences: Vec<EngineInference>) -> Vec<EngineInference> {
    inferences.sort_by(|a, b| {
        (a.conclusion(), a.name(), a.premises()).cmp(&(b.conclusion(), b.name(), b.premises()))
    });
    inferences
}

//! End-to-end integration tests for the provable engine.
//!
//! These tests load inference files from disk, run the engine operations
//! over them, and drive the `provable` binary, validating that file parsing,
//! configuration, the derivability checker and the proof views work together.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;

use provable::config::EngineConfig;
use provable::derivability::{
    DerivabilityChecker, DerivabilityCheckerWithBlocking, InferenceDerivabilityChecker,
};
use provable::engine::{Engine, InferenceFile, RenderMode};
use provable::error::ProofError;
use provable::inference::BaseInference;
use provable::proof::{BaseProof, CachingProof, ModifiableProof, Proof, ProofUnion};

const CLASSIFICATION: &str = r#"
asserted = ["cat", "cat-is-mammal"]

[[inference]]
name = "subsumption"
conclusion = "mammal"
premises = ["cat", "cat-is-mammal"]
justification = ["ax1"]

[[inference]]
name = "subsumption"
conclusion = "animal"
premises = ["mammal"]
justification = ["ax2"]

[[inference]]
name = "loop"
conclusion = "animal"
premises = ["animal"]

[[inference]]
name = "guess"
conclusion = "pet"
premises = ["animal", "owned"]
"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn classification(dir: &Path) -> Engine {
    let path = write(dir, "classification.toml", CLASSIFICATION);
    Engine::load(EngineConfig::default(), &path).unwrap()
}

#[test]
fn toml_file_end_to_end() {
    let dir = tempfile::TempDir::new().unwrap();
    let engine = classification(dir.path());

    assert!(engine.is_derivable("animal", &[]).unwrap());
    assert!(!engine.is_derivable("pet", &[]).unwrap());
    assert!(!engine.is_derivable("animal", &["cat".to_string()]).unwrap());

    let essential = engine.essential_conclusions("animal").unwrap();
    let expected: BTreeSet<String> = ["animal", "cat", "cat-is-mammal", "mammal"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(essential, expected);

    let pruned = engine.prune("animal").unwrap();
    assert!(pruned.iter().all(|i| i.inference.name != "loop"));
    assert_eq!(pruned.len(), 4);

    let derivation = engine.derivation("animal").unwrap().unwrap();
    assert_eq!(derivation.last().unwrap().inference.conclusion, "animal");
}

#[test]
fn json_file_matches_toml_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let toml_path = write(dir.path(), "classification.toml", CLASSIFICATION);
    let file = InferenceFile::load(&toml_path).unwrap();

    let json_path = dir.path().join("classification.json");
    file.save(&json_path).unwrap();
    assert_eq!(InferenceFile::load(&json_path).unwrap(), file);

    let engine = Engine::load(EngineConfig::default(), &json_path).unwrap();
    assert_eq!(engine.stats(), classification(dir.path()).stats());
}

#[test]
fn pruned_file_reloads_with_same_verdict() {
    let dir = tempfile::TempDir::new().unwrap();
    let engine = classification(dir.path());

    let pruned = InferenceFile::from_inferences(engine.prune("animal").unwrap());
    let path = write(dir.path(), "pruned.json", &pruned.to_json());
    let reloaded = Engine::load(EngineConfig::default(), &path).unwrap();

    assert!(reloaded.is_derivable("animal", &[]).unwrap());
    assert!(matches!(
        reloaded.is_derivable("pet", &[]),
        Err(ProofError::UnknownConclusion { .. })
    ));
}

#[test]
fn rendered_views_differ_as_expected() {
    let dir = tempfile::TempDir::new().unwrap();
    let engine = classification(dir.path());

    let plain = engine.render("animal", RenderMode::Plain).unwrap().unwrap();
    assert!(plain.contains("<- loop"));
    assert!(plain.contains("<- subsumption [ax2]"));

    let acyclic = engine
        .render("animal", RenderMode::AcyclicDerivable)
        .unwrap()
        .unwrap();
    assert!(!acyclic.contains("<- loop"));
    assert!(acyclic.contains("cat-is-mammal"));

    assert!(engine.render("pet", RenderMode::Derivable).unwrap().is_none());
}

#[test]
fn bad_inputs_are_diagnosed() {
    let dir = tempfile::TempDir::new().unwrap();

    let yaml = write(dir.path(), "proof.yaml", "asserted: [a]");
    assert!(matches!(
        Engine::load(EngineConfig::default(), &yaml),
        Err(ProofError::UnsupportedFormat { .. })
    ));

    let missing = dir.path().join("missing.toml");
    assert!(matches!(
        Engine::load(EngineConfig::default(), &missing),
        Err(ProofError::Io { .. })
    ));

    let broken = write(dir.path(), "broken.json", "{\"inference\": 3}");
    assert!(matches!(
        Engine::load(EngineConfig::default(), &broken),
        Err(ProofError::Parse { .. })
    ));
}

#[test]
fn chronological_config_file_enforces_order() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = write(dir.path(), "provable.toml", "chronological = true\n");
    let config = EngineConfig::load(&config_path).unwrap();

    // Asserted conclusions are produced before any `[[inference]]` entry.
    let ordered = write(
        dir.path(),
        "ordered.toml",
        "asserted = [\"a\"]\n\n[[inference]]\nname = \"r\"\nconclusion = \"b\"\npremises = [\"a\"]\n",
    );
    assert!(Engine::load(config.clone(), &ordered).is_ok());

    let dangling = write(dir.path(), "dangling.toml", CLASSIFICATION);
    assert!(matches!(
        Engine::load(config.clone(), &dangling),
        Err(ProofError::InvalidInference { premise, .. }) if premise.contains("owned")
    ));

    let unordered = write(
        dir.path(),
        "unordered.toml",
        "[[inference]]\nname = \"r\"\nconclusion = \"b\"\npremises = [\"a\"]\n",
    );
    assert!(matches!(
        Engine::load(config, &unordered),
        Err(ProofError::InvalidInference { .. })
    ));
}

#[test]
fn checker_over_caching_union_of_growing_proofs() {
    type Inf = BaseInference<&'static str>;

    let left = Rc::new(BaseProof::<Inf>::new());
    let right = Rc::new(BaseProof::<Inf>::new());
    left.produce(Inf::new("r1", "b", vec!["a"]));
    let cached = CachingProof::new(ProofUnion::new(vec![Rc::clone(&left), Rc::clone(&right)]));

    {
        let mut checker = InferenceDerivabilityChecker::new(&cached);
        assert!(!checker.is_derivable(&"b"));
    }
    assert!(cached.cached_len() > 0);

    right.produce(Inf::new("Asserted", "a", vec![]));
    assert_eq!(cached.cached_len(), 0, "notification must empty the cache");
    assert_eq!(cached.inferences(&"a").len(), 1);

    let mut checker = InferenceDerivabilityChecker::new(&cached);
    assert!(checker.is_derivable(&"b"));
    checker.block(&"a");
    assert!(!checker.is_derivable(&"b"));
}

#[test]
fn cli_checks_and_renders() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "classification.toml", CLASSIFICATION);
    let run = |args: &[&str]| {
        let output = Command::new(env!("CARGO_BIN_EXE_provable"))
            .arg("--file")
            .arg(&path)
            .args(args)
            .output()
            .unwrap();
        assert!(output.status.success(), "{args:?} failed");
        String::from_utf8(output.stdout).unwrap()
    };

    assert_eq!(run(&["check", "animal"]), "animal: derivable\n");
    assert_eq!(
        run(&["check", "animal", "--block", "cat,mammal"]),
        "animal: not derivable (blocked: cat, mammal)\n"
    );
    assert!(run(&["show", "animal", "--acyclic"]).starts_with("animal\n"));
    assert!(run(&["stats"]).contains("asserted:     2"));
}

#[test]
fn cli_reports_unknown_conclusions() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write(dir.path(), "classification.toml", CLASSIFICATION);
    let output = Command::new(env!("CARGO_BIN_EXE_provable"))
        .arg("--file")
        .arg(&path)
        .args(["check", "unicorn"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown conclusion"));
}

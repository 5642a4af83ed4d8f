//! Rich diagnostic error types for the provable engine.
//!
//! Contract breaches inside the core algorithms (a derivable proof node that
//! ends up without inferences, for instance) are defects and panic. Everything
//! a caller can reasonably trigger with bad input is reported through
//! [`ProofError`], with an error code and help text so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the provable engine.
#[derive(Debug, Error, Diagnostic)]
pub enum ProofError {
    #[error("invalid inference {inference}: premise {premise} has not been derived")]
    #[diagnostic(
        code(provable::proof::invalid_inference),
        help(
            "A chronological proof only accepts inferences whose premises are \
             conclusions of inferences produced earlier. Produce the inferences \
             for the premise first, or load the proof without chronological checking."
        )
    )]
    InvalidInference { inference: String, premise: String },

    #[error("unknown conclusion: {conclusion}")]
    #[diagnostic(
        code(provable::engine::unknown_conclusion),
        help(
            "No loaded inference mentions this conclusion, neither as a conclusion \
             nor as a premise. Check the spelling or list the loaded inferences \
             with `provable stats`."
        )
    )]
    UnknownConclusion { conclusion: String },

    #[error("I/O error reading {path}")]
    #[diagnostic(
        code(provable::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    #[diagnostic(
        code(provable::parse),
        help(
            "Inference files list `[[inference]]` entries with `name`, `conclusion` \
             and `premises`, plus an optional top-level `asserted` list. \
             Check the syntax against that shape."
        )
    )]
    Parse { path: String, message: String },

    #[error("unsupported file format: {path}")]
    #[diagnostic(
        code(provable::unsupported_format),
        help("Use a `.json` or `.toml` file extension.")
    )]
    UnsupportedFormat { path: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(provable::config::invalid),
        help("Check the EngineConfig fields. {message}")
    )]
    InvalidConfig { message: String },
}

/// Convenience alias for functions returning provable results.
pub type ProofResult<T> = std::result::Result<T, ProofError>;

//! provable CLI: derivability and proof inspection over inference files.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

use provable::config::EngineConfig;
use provable::engine::{Engine, EngineInference, InferenceFile, RenderMode};

#[derive(Parser)]
#[command(name = "provable", version, about = "Proof and derivability engine")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Inference file (`.json` or `.toml`).
    #[arg(long)]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a conclusion is derivable.
    Check {
        goal: String,

        /// Conclusions to block (comma-separated).
        #[arg(long, value_delimiter = ',')]
        block: Vec<String>,
    },

    /// Print one derivation, premises first.
    Derivation { goal: String },

    /// List the conclusions every derivation of the goal uses.
    Essential { goal: String },

    /// Print the inferences relevant to deriving the goal.
    Prune {
        goal: String,

        /// Emit a reloadable JSON inference file instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List every inference reachable from the goal.
    Unfold {
        goal: String,

        /// Premises before the conclusions using them.
        #[arg(long)]
        topological: bool,
    },

    /// Render the proof of the goal as a tree.
    Show {
        goal: String,

        /// Drop inferences that close a cycle.
        #[arg(long)]
        acyclic: bool,

        /// Keep only inferences with derivable premises.
        #[arg(long)]
        derivable: bool,
    },

    /// Show counts for the loaded file.
    Stats,
}

fn print_inferences(inferences: &[EngineInference]) {
    for inference in inferences {
        println!("{}", inference.inference);
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let engine = Engine::load(config, &cli.file)?;

    match cli.command {
        Commands::Check { goal, block } => {
            let derivable = engine.is_derivable(&goal, &block)?;
            if block.is_empty() {
                println!("{goal}: {}", verdict(derivable));
            } else {
                println!(
                    "{goal}: {} (blocked: {})",
                    verdict(derivable),
                    block.join(", ")
                );
            }
        }

        Commands::Derivation { goal } => match engine.derivation(&goal)? {
            Some(inferences) => print_inferences(&inferences),
            None => println!("{goal}: not derivable"),
        },

        Commands::Essential { goal } => {
            let essential = engine.essential_conclusions(&goal)?;
            if essential.is_empty() {
                println!("{goal}: not derivable");
            }
            for conclusion in essential {
                println!("{conclusion}");
            }
        }

        Commands::Prune { goal, json } => {
            let pruned = engine.prune(&goal)?;
            if json {
                println!("{}", InferenceFile::from_inferences(pruned).to_json());
            } else {
                print_inferences(&pruned);
            }
        }

        Commands::Unfold { goal, topological } => {
            print_inferences(&engine.unfold(&goal, topological)?);
        }

        Commands::Show {
            goal,
            acyclic,
            derivable,
        } => match engine.render(&goal, RenderMode::new(acyclic, derivable))? {
            Some(text) => print!("{text}"),
            None => println!("{goal}: not derivable"),
        },

        Commands::Stats => {
            println!("{}", engine.stats());
        }
    }

    Ok(())
}

fn verdict(derivable: bool) -> &'static str {
    if derivable {
        "derivable"
    } else {
        "not derivable"
    }
}

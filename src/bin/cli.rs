//! Command-line interface for the rxnet library
//!
//! This binary inspects reaction networks stored either as JSON network
//! documents (`.json`) or as batch declarations (any other extension).
//!
//! # Usage
//!
//! ```bash
//! # Print species, parameters and reactions
//! rxnet inspect model.rxn
//!
//! # Print the dependency graph used to update rates after a reaction fires
//! rxnet graphs model.rxn --kind reaction-reaction
//!
//! # Convert a declaration into a JSON network document
//! rxnet convert model.rxn --output model.json
//! ```

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rxnet::{
    info::{graph_table, stoichiometry_table},
    io::{load_any, save_network, IOError},
    network::{NetworkDocument, ReactionNetwork},
    parser::ParserConfigBuilder,
    system::{OdeSystem, SystemConfigBuilder},
    validation::check_consistency,
};

/// Main CLI configuration struct
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Do not register undeclared species found in reactions
    #[arg(long, global = true)]
    no_infer_species: bool,

    /// Do not register undeclared symbols found in rate expressions as parameters
    #[arg(long, global = true)]
    no_infer_parameters: bool,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Print species, parameters and reactions of a network
    Inspect {
        /// Path to the network file
        path: PathBuf,
    },
    /// Print dependency graphs of a network
    Graphs {
        /// Path to the network file
        path: PathBuf,

        /// Which graph to print
        #[arg(short, long, value_enum, default_value_t = GraphKind::All)]
        kind: GraphKind,
    },
    /// Print the net stoichiometry matrix
    Stoich {
        /// Path to the network file
        path: PathBuf,
    },
    /// Check a network for unused symbols and suspicious reactions
    Validate {
        /// Path to the network file
        path: PathBuf,
    },
    /// Print the reaction rate equations of every species
    Odes {
        /// Path to the network file
        path: PathBuf,

        /// Do not divide mass-action rate laws by coefficient factorials
        #[arg(long)]
        no_combinatoric: bool,
    },
    /// Write a network as a JSON network document
    Convert {
        /// Path to the network file
        path: PathBuf,

        /// Path to the output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the JSON schema of network documents
    Schema,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GraphKind {
    ReactionSpecies,
    SpeciesReaction,
    ReactionReaction,
    All,
}

/// Main entry point for the CLI application
pub fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".bold().red(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match &cli.command {
        Commands::Inspect { path } => {
            let network = load(cli, path)?;
            println!("{network}");
        }
        Commands::Graphs { path, kind } => {
            let network = load(cli, path)?;
            print_graphs(&network, *kind);
        }
        Commands::Stoich { path } => {
            let network = load(cli, path)?;
            println!("{}", stoichiometry_table(&network));
        }
        Commands::Validate { path } => {
            let network = load(cli, path)?;
            let report = check_consistency(&network);
            println!("{report}");
            if !report.is_valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Odes {
            path,
            no_combinatoric,
        } => {
            let network = load(cli, path)?;
            let config = SystemConfigBuilder::default()
                .combinatoric_ratelaws(!no_combinatoric)
                .build()?;
            let system = OdeSystem::from_network(&network, &config)?;
            for ode in system.equations() {
                println!("d{}/dt = {}", ode.species().bold(), ode.equation());
            }
        }
        Commands::Convert { path, output } => {
            let network = load(cli, path)?;
            save_network(output, &network)?;
            println!(
                "{} {}",
                "Network written to".bold().green(),
                output.display()
            );
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(NetworkDocument);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load(cli: &Cli, path: &PathBuf) -> Result<ReactionNetwork, IOError> {
    let config = ParserConfigBuilder::default()
        .infer_species(!cli.no_infer_species)
        .infer_parameters(!cli.no_infer_parameters)
        .build()
        .unwrap_or_default();
    load_any(path, &config)
}

fn print_graphs(network: &ReactionNetwork, kind: GraphKind) {
    let reaction = |r: usize| format!("R{r}");
    let species = |s: usize| network.species()[s].clone();

    if matches!(kind, GraphKind::ReactionSpecies | GraphKind::All) {
        println!("{}", "Reaction -> changed species".bold());
        println!(
            "{}",
            graph_table(&network.reaction_to_species_graph(), reaction, species)
        );
    }
    if matches!(kind, GraphKind::SpeciesReaction | GraphKind::All) {
        println!("{}", "Species -> dependent reactions".bold());
        println!(
            "{}",
            graph_table(&network.species_to_reaction_graph(), species, reaction)
        );
    }
    if matches!(kind, GraphKind::ReactionReaction | GraphKind::All) {
        println!("{}", "Reaction -> affected reactions".bold());
        println!(
            "{}",
            graph_table(&network.reaction_to_reaction_graph(), reaction, reaction)
        );
    }
}

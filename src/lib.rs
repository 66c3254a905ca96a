//! Reaction Network Registry
//!
//! This library provides an in-memory catalog of chemical species, parameters
//! and reactions, including:
//! - Building networks incrementally or from a batch declaration
//! - Net stoichiometry and stoichiometry matrices
//! - Dependency graphs between reactions and species
//! - Deriving reaction rate equations
//! - Checking networks for consistency
//! - Reading/writing JSON network documents

#![warn(unused_imports)]

/// Commonly used types and functionality re-exported for convenience
pub mod prelude {
    pub use crate::error::*;
    pub use crate::graphs::*;
    pub use crate::io::*;
    pub use crate::network::*;
    pub use crate::parser::{parse_network, parse_network_with, ParserConfig, ParserConfigBuilder};
    pub use crate::rate::*;
    pub use crate::stoich::*;
    pub use crate::system::{OdeSystem, SystemConfig, SystemConfigBuilder};
}

/// Registry error types
pub mod error;

/// The reaction network registry
pub mod network;

/// Rate specifications and their structural comparison
pub mod rate;

/// Dependency graphs derived from a network
pub mod graphs;

/// Stoichiometry matrices
pub mod stoich;

/// Batch declaration parser
pub mod parser;

/// Reaction rate equations derived from a network
pub mod system;

/// Consistency checks of reaction networks
pub mod validation {
    pub use crate::validation::consistency::*;
    /// Main consistency interface
    pub mod consistency;
    /// Checks of parameter usage
    mod parameters;
    /// Checks of reaction rates and effects
    mod reactions;
    /// Checks of species usage
    mod species;
}

/// Procedural and helper macros
pub mod macros {
    /// Macros for reaction specifications
    #[macro_use]
    pub mod reaction_macro;
}

/// Table rendering of networks and derived views
pub mod info;

/// IO functionality
pub mod io;

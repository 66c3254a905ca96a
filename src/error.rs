//! Registry Error Module
//!
//! The [`NetworkError`] enum covers every precondition the reaction network
//! registry enforces. All of them are raised synchronously by the call that
//! violates the precondition, and none of them leave partial state behind.

use thiserror::Error;

/// The namespace a registered name lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Species,
    Parameter,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SymbolKind::Species => write!(f, "species"),
            SymbolKind::Parameter => write!(f, "parameter"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Name '{name}' is already registered as a {existing}")]
    DuplicateName { name: String, existing: SymbolKind },
    #[error("Species '{0}' is not registered in the network")]
    UnknownSpecies(String),
    #[error("Rate expression references unknown symbol '{0}'")]
    UnknownSymbol(String),
    #[error("Reaction index {index} is out of range (network has {len} reactions)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Stoichiometric coefficient of '{species}' must be positive, got {coefficient}")]
    MalformedStoichiometry { species: String, coefficient: u32 },
    #[error("Summed stoichiometric coefficient of '{0}' exceeds {max}", max = u32::MAX)]
    CoefficientOverflow(String),
    #[error("Invalid name '{0}': expected an identifier that does not shadow t, pi or e")]
    InvalidName(String),
    #[error("Invalid rate: {0}")]
    InvalidRate(String),
}

use std::path::PathBuf;

use thiserror::Error;

use crate::{
    network::ReactionNetwork,
    parser::{parse_network_with, ParseError, ParserConfig},
    rate::Rate,
};

/// Loads a reaction network from a JSON network document.
///
/// The document is replayed through the registry operations, so invalid
/// content (duplicate names, unknown species) fails to load.
///
/// # Errors
///
/// * `IOError::FileNotFound` if the file cannot be opened
/// * `IOError::JsonParseError` if the content is not a valid network document
pub fn load_network(path: impl Into<PathBuf>) -> Result<ReactionNetwork, IOError> {
    let path = path.into();
    let file = std::fs::File::open(path).map_err(IOError::FileNotFound)?;
    serde_json::from_reader(file).map_err(IOError::JsonParseError)
}

/// Saves a reaction network as a pretty printed JSON network document.
///
/// # Errors
///
/// * `IOError::NonFiniteRate` if a numeric rate is NaN or infinite, which JSON
///   cannot represent. Nothing is written in that case.
/// * `IOError::FileNotFound` if the file cannot be created
pub fn save_network(path: impl Into<PathBuf>, network: &ReactionNetwork) -> Result<(), IOError> {
    if let Some((index, reaction)) = network
        .reactions()
        .iter()
        .enumerate()
        .find(|(_, reaction)| matches!(reaction.rate(), Rate::Numeric(v) if !v.is_finite()))
    {
        return Err(IOError::NonFiniteRate {
            reaction: index,
            rate: reaction.rate().to_string(),
        });
    }

    let path = path.into();
    let file = std::fs::File::create(path).map_err(IOError::FileNotFound)?;
    serde_json::to_writer_pretty(file, network).map_err(IOError::JsonParseError)
}

/// Loads a reaction network from a batch declaration file.
///
/// See [`crate::parser`] for the format.
pub fn load_declaration(
    path: impl Into<PathBuf>,
    config: &ParserConfig,
) -> Result<ReactionNetwork, IOError> {
    let path = path.into();
    let source = std::fs::read_to_string(path).map_err(IOError::FileNotFound)?;
    Ok(parse_network_with(&source, config)?)
}

/// Loads a network from either format, choosing JSON for `.json` files and
/// the declaration format otherwise.
pub fn load_any(path: impl Into<PathBuf>, config: &ParserConfig) -> Result<ReactionNetwork, IOError> {
    let path = path.into();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => load_network(path),
        _ => load_declaration(path, config),
    }
}

/// Represents errors that can occur during network I/O operations.
#[derive(Error, Debug)]
pub enum IOError {
    /// The file could not be found, opened or written.
    #[error("File not found: {0}")]
    FileNotFound(#[from] std::io::Error),

    /// The file contents could not be parsed as a JSON network document.
    ///
    /// Registry violations inside the document surface here as well.
    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    /// A numeric rate has no JSON representation.
    #[error("Reaction {reaction} has the non-finite rate {rate}, which JSON cannot store")]
    NonFiniteRate { reaction: usize, rate: String },

    /// The file contents are not a valid declaration.
    #[error("Failed to parse declaration: {0}")]
    DeclarationError(#[from] ParseError),
}

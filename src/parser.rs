//! Batch declaration of reaction networks.
//!
//! A declaration is a line oriented text block. Each non-empty line is either
//! a directive or a reaction:
//!
//! ```text
//! # comments run to the end of the line
//! @species P
//! @parameters k1, k2
//! k1, A + B --> C
//! (kf, kb), C <--> 2D
//! k2, C <-- A
//! v * P^2 / (K^2 + P^2), 0 => P
//! ```
//!
//! Reactions are `rate, substrates ARROW products`. The arrows `-->`, `<--`
//! and `<-->` declare mass-action kinetics, `=>`, `<=` and `<=>` declare that
//! the rate is the complete rate law. Bidirectional arrows take a
//! `(forward, backward)` rate pair. `0` or `∅` denotes an empty side.
//!
//! Species are ordered by explicit declaration first, then by first
//! appearance in the reactions. Parameters are ordered by explicit
//! declaration first, then by first appearance in rate expressions. The
//! resulting network is built through the regular registry operations, so it
//! is identical to one built incrementally with the same content.

use std::str::FromStr;

use derive_builder::Builder;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::{
    error::NetworkError,
    network::{borrow_terms, Kinetics, ReactionNetwork},
    rate::{Rate, RESERVED_SYMBOLS},
};

lazy_static! {
    static ref ARROW: Regex = Regex::new(r"<-->|<=>|-->|<--|=>|<=").unwrap();
    static ref TERM: Regex =
        Regex::new(r"^(?:(\d+)\s*\*?\s*)?([A-Za-z_][A-Za-z0-9_]*)$").unwrap();
}

/// Options for [`parse_network_with`]
///
/// # Examples
///
/// ```
/// use rxnet::parser::ParserConfigBuilder;
///
/// let config = ParserConfigBuilder::default()
///     .infer_parameters(false)
///     .build()
///     .unwrap();
/// assert!(config.infer_species);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ParserConfig {
    /// Register species that are used in reactions but not declared
    #[builder(default = "true")]
    pub infer_species: bool,
    /// Register rate symbols that are neither species nor declared parameters
    #[builder(default = "true")]
    pub infer_parameters: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            infer_species: true,
            infer_parameters: true,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: no reaction arrow found in '{text}'")]
    MissingArrow { line: usize, text: String },
    #[error("line {line}: expected 'rate, substrates --> products' but found '{text}'")]
    MissingRate { line: usize, text: String },
    #[error("line {line}: bidirectional reactions need a '(forward, backward)' rate, found '{text}'")]
    ExpectedRatePair { line: usize, text: String },
    #[error("line {line}: invalid stoichiometric term '{term}'")]
    InvalidTerm { line: usize, term: String },
    #[error("line {line}: unknown directive '{directive}'")]
    UnknownDirective { line: usize, directive: String },
    #[error("line {line}: {source}")]
    Network {
        line: usize,
        #[source]
        source: NetworkError,
    },
}

/// A reaction line after syntactic parsing, before registration
#[derive(Debug)]
struct ReactionStatement {
    line: usize,
    rate: Rate,
    substrates: Vec<(String, u32)>,
    products: Vec<(String, u32)>,
    kinetics: Kinetics,
}

#[derive(Debug, Default)]
struct Declaration {
    species: Vec<(usize, String)>,
    parameters: Vec<(usize, String)>,
    reactions: Vec<ReactionStatement>,
}

/// Parses a declaration with the default [`ParserConfig`].
pub fn parse_network(source: &str) -> Result<ReactionNetwork, ParseError> {
    parse_network_with(source, &ParserConfig::default())
}

/// Parses a declaration into a new [`ReactionNetwork`].
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the 1-based line of the first problem,
/// either syntactic or a registry precondition such as a duplicate name.
pub fn parse_network_with(
    source: &str,
    config: &ParserConfig,
) -> Result<ReactionNetwork, ParseError> {
    let mut declaration = read_declaration(source)?;

    if config.infer_species {
        infer_species(&mut declaration);
    }
    if config.infer_parameters {
        infer_parameters(&mut declaration);
    }

    let network = register(declaration)?;
    log::info!(
        "Parsed reaction network with {} species, {} parameters and {} reactions",
        network.num_species(),
        network.num_parameters(),
        network.num_reactions()
    );

    Ok(network)
}

impl FromStr for ReactionNetwork {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_network(s)
    }
}

fn read_declaration(source: &str) -> Result<Declaration, ParseError> {
    let mut declaration = Declaration::default();

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let text = match raw.split_once('#') {
            Some((code, _)) => code.trim(),
            None => raw.trim(),
        };

        if text.is_empty() {
            continue;
        }

        if let Some(directive) = text.strip_prefix('@') {
            read_directive(line, directive, &mut declaration)?;
        } else {
            declaration.reactions.push(read_reaction(line, text)?);
        }
    }

    Ok(declaration)
}

fn read_directive(
    line: usize,
    directive: &str,
    declaration: &mut Declaration,
) -> Result<(), ParseError> {
    let (keyword, rest) = directive
        .split_once(char::is_whitespace)
        .unwrap_or((directive, ""));
    let names = rest
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|name| !name.is_empty())
        .map(|name| (line, name.to_string()));

    match keyword {
        "species" => declaration.species.extend(names),
        "parameters" => declaration.parameters.extend(names),
        _ => {
            return Err(ParseError::UnknownDirective {
                line,
                directive: format!("@{keyword}"),
            })
        }
    }

    Ok(())
}

fn read_reaction(line: usize, text: &str) -> Result<ReactionStatement, ParseError> {
    let arrow = ARROW.find(text).ok_or_else(|| ParseError::MissingArrow {
        line,
        text: text.to_string(),
    })?;

    let lhs = &text[..arrow.start()];
    let rhs = &text[arrow.end()..];
    let (rate_text, left) = split_top_level(lhs).ok_or_else(|| ParseError::MissingRate {
        line,
        text: text.to_string(),
    })?;

    let left = read_side(line, left)?;
    let right = read_side(line, rhs)?;

    let kinetics = match arrow.as_str() {
        "=>" | "<=" | "<=>" => Kinetics::Explicit,
        _ => Kinetics::MassAction,
    };

    let (rate, substrates, products) = match arrow.as_str() {
        "<-->" | "<=>" => (read_rate_pair(line, rate_text)?, left, right),
        "<--" | "<=" => (read_rate(line, rate_text)?, right, left),
        _ => (read_rate(line, rate_text)?, left, right),
    };

    Ok(ReactionStatement {
        line,
        rate,
        substrates,
        products,
        kinetics,
    })
}

/// Splits at the last comma outside of parentheses.
fn split_top_level(text: &str) -> Option<(&str, &str)> {
    let mut depth: i32 = 0;
    let mut split = None;

    for (pos, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => split = Some(pos),
            _ => {}
        }
    }

    split.map(|pos| (&text[..pos], &text[pos + 1..]))
}

fn read_rate(line: usize, text: &str) -> Result<Rate, ParseError> {
    text.parse::<Rate>()
        .map_err(|source| ParseError::Network { line, source })
}

fn read_rate_pair(line: usize, text: &str) -> Result<Rate, ParseError> {
    let expected = || ParseError::ExpectedRatePair {
        line,
        text: text.trim().to_string(),
    };

    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(expected)?;
    let (forward, backward) = split_top_level(inner).ok_or_else(expected)?;

    Ok(Rate::reversible(
        read_rate(line, forward)?,
        read_rate(line, backward)?,
    ))
}

fn read_side(line: usize, text: &str) -> Result<Vec<(String, u32)>, ParseError> {
    let text = text.trim();
    if text == "0" || text == "∅" {
        return Ok(Vec::new());
    }

    text.split('+')
        .map(|term| {
            let term = term.trim();
            let captures = TERM.captures(term).ok_or_else(|| ParseError::InvalidTerm {
                line,
                term: term.to_string(),
            })?;
            let coefficient: u32 = match captures.get(1) {
                Some(c) => c.as_str().parse().map_err(|_| ParseError::InvalidTerm {
                    line,
                    term: term.to_string(),
                })?,
                None => 1,
            };
            Ok((captures[2].to_string(), coefficient))
        })
        .collect()
}

fn infer_species(declaration: &mut Declaration) {
    for reaction in &declaration.reactions {
        for (name, _) in reaction.substrates.iter().chain(&reaction.products) {
            let known = declaration.species.iter().any(|(_, s)| s == name)
                || declaration.parameters.iter().any(|(_, p)| p == name);
            if !known {
                declaration.species.push((reaction.line, name.clone()));
            }
        }
    }
}

fn infer_parameters(declaration: &mut Declaration) {
    for reaction in &declaration.reactions {
        for symbol in reaction.rate.symbols() {
            let known = RESERVED_SYMBOLS.contains(&symbol)
                || declaration.species.iter().any(|(_, s)| s == symbol)
                || declaration.parameters.iter().any(|(_, p)| p == symbol);
            if !known {
                declaration
                    .parameters
                    .push((reaction.line, symbol.to_string()));
            }
        }
    }
}

fn register(declaration: Declaration) -> Result<ReactionNetwork, ParseError> {
    let mut network = ReactionNetwork::new();

    for (line, name) in &declaration.species {
        network
            .add_species(name)
            .map_err(|source| ParseError::Network { line: *line, source })?;
    }
    for (line, name) in &declaration.parameters {
        network
            .add_parameter(name)
            .map_err(|source| ParseError::Network { line: *line, source })?;
    }
    for reaction in declaration.reactions {
        network
            .add_reaction_with_kinetics(
                reaction.rate,
                &borrow_terms(&reaction.substrates),
                &borrow_terms(&reaction.products),
                reaction.kinetics,
            )
            .map_err(|source| ParseError::Network {
                line: reaction.line,
                source,
            })?;
    }

    Ok(network)
}

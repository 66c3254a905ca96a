//! Reaction Network Registry
//!
//! [`ReactionNetwork`] is an append-only catalog of species, parameters and
//! reactions. Species and parameters receive stable 0-based indices in
//! registration order, reactions receive stable 0-based indices in insertion
//! order. Every mutating operation validates its input completely before it
//! touches the registry, so a failed call leaves the network unchanged.
//!
//! Derived views (stoichiometry matrices, dependency graphs, ODE systems) live
//! in their own modules and are computed from a network snapshot on demand.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    ops::Range,
};

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{NetworkError, SymbolKind},
    rate::{Rate, RESERVED_SYMBOLS},
};

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// How the rate of a reaction turns into its rate law
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Kinetics {
    /// The rate is a coefficient multiplied by the substrate concentrations
    #[default]
    MassAction,
    /// The rate expression already is the complete rate law
    Explicit,
}

impl Kinetics {
    fn is_mass_action(&self) -> bool {
        matches!(self, Kinetics::MassAction)
    }
}

/// A species and its stoichiometric coefficient on one side of a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoichTerm {
    pub species: usize,
    pub coefficient: u32,
}

/// A single, irreversible reaction stored in the network.
///
/// Reversible input is split into two `Reaction`s, so `rate` is never a
/// [`Rate::ReversiblePair`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    rate: Rate,
    substrates: Vec<StoichTerm>,
    products: Vec<StoichTerm>,
    dependents: Vec<usize>,
    kinetics: Kinetics,
}

impl Reaction {
    pub fn rate(&self) -> &Rate {
        &self.rate
    }

    pub fn substrates(&self) -> &[StoichTerm] {
        &self.substrates
    }

    pub fn products(&self) -> &[StoichTerm] {
        &self.products
    }

    /// Sorted species indices whose value the rate law reads
    pub fn dependents(&self) -> &[usize] {
        &self.dependents
    }

    pub fn kinetics(&self) -> Kinetics {
        self.kinetics
    }

    /// Product coefficient minus substrate coefficient per species, sorted by
    /// species index with zero entries omitted.
    pub fn net_stoichiometry(&self) -> Vec<(usize, i64)> {
        let mut net: BTreeMap<usize, i64> = BTreeMap::new();
        for term in &self.substrates {
            *net.entry(term.species).or_default() -= i64::from(term.coefficient);
        }
        for term in &self.products {
            *net.entry(term.species).or_default() += i64::from(term.coefficient);
        }
        net.into_iter().filter(|(_, c)| *c != 0).collect()
    }
}

/// The registry of species, parameters and reactions.
///
/// Serializes through [`NetworkDocument`], which refers to species by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "NetworkDocument", into = "NetworkDocument")]
pub struct ReactionNetwork {
    species: Vec<String>,
    parameters: Vec<String>,
    reactions: Vec<Reaction>,
    symbols: HashMap<String, (SymbolKind, usize)>,
}

impl ReactionNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new species and returns its index.
    ///
    /// # Errors
    ///
    /// * [`NetworkError::DuplicateName`] if the name is taken by a species or a parameter
    /// * [`NetworkError::InvalidName`] if the name is not an identifier or is reserved
    pub fn add_species(&mut self, name: &str) -> Result<usize, NetworkError> {
        self.check_new_name(name)?;
        let index = self.species.len();
        self.species.push(name.to_string());
        self.symbols
            .insert(name.to_string(), (SymbolKind::Species, index));
        log::debug!("Registered species '{name}' at index {index}");
        Ok(index)
    }

    /// Registers a new parameter and returns its index.
    ///
    /// Fails under the same conditions as [`ReactionNetwork::add_species`].
    pub fn add_parameter(&mut self, name: &str) -> Result<usize, NetworkError> {
        self.check_new_name(name)?;
        let index = self.parameters.len();
        self.parameters.push(name.to_string());
        self.symbols
            .insert(name.to_string(), (SymbolKind::Parameter, index));
        log::debug!("Registered parameter '{name}' at index {index}");
        Ok(index)
    }

    fn check_new_name(&self, name: &str) -> Result<(), NetworkError> {
        if !IDENTIFIER.is_match(name) || RESERVED_SYMBOLS.contains(&name) {
            return Err(NetworkError::InvalidName(name.to_string()));
        }
        if let Some((existing, _)) = self.symbols.get(name) {
            return Err(NetworkError::DuplicateName {
                name: name.to_string(),
                existing: *existing,
            });
        }
        Ok(())
    }

    /// Adds a mass-action reaction.
    ///
    /// See [`ReactionNetwork::add_reaction_with_kinetics`].
    pub fn add_reaction(
        &mut self,
        rate: impl Into<Rate>,
        substrates: &[(&str, u32)],
        products: &[(&str, u32)],
    ) -> Result<Range<usize>, NetworkError> {
        self.add_reaction_with_kinetics(rate, substrates, products, Kinetics::MassAction)
    }

    /// Adds a reaction and returns the range of indices it occupies.
    ///
    /// A [`Rate::ReversiblePair`] is split into a forward reaction
    /// (`substrates -> products`) followed by a backward reaction
    /// (`products -> substrates`), so the returned range has length two.
    /// Species listed more than once on the same side have their
    /// coefficients summed.
    ///
    /// # Errors
    ///
    /// * [`NetworkError::UnknownSpecies`] if a substrate or product is not a registered species
    /// * [`NetworkError::MalformedStoichiometry`] if a coefficient is zero
    /// * [`NetworkError::CoefficientOverflow`] if repeated terms sum past `u32::MAX`
    /// * [`NetworkError::UnknownSymbol`] if the rate references an unregistered symbol
    /// * [`NetworkError::InvalidRate`] if a reversible pair is nested
    pub fn add_reaction_with_kinetics(
        &mut self,
        rate: impl Into<Rate>,
        substrates: &[(&str, u32)],
        products: &[(&str, u32)],
        kinetics: Kinetics,
    ) -> Result<Range<usize>, NetworkError> {
        let rate = rate.into();
        let substrates = self.resolve_terms(substrates)?;
        let products = self.resolve_terms(products)?;

        let new_reactions = match rate {
            Rate::ReversiblePair(forward, backward) => {
                let forward = self.build_reaction(*forward, &substrates, &products, kinetics)?;
                let backward = self.build_reaction(*backward, &products, &substrates, kinetics)?;
                vec![forward, backward]
            }
            rate => vec![self.build_reaction(rate, &substrates, &products, kinetics)?],
        };

        let start = self.reactions.len();
        self.reactions.extend(new_reactions);
        log::debug!(
            "Added reaction(s) {:?}: {}",
            start..self.reactions.len(),
            (start..self.reactions.len())
                .filter_map(|i| self.reaction_equation(i).ok())
                .join("; ")
        );

        Ok(start..self.reactions.len())
    }

    fn resolve_terms(&self, terms: &[(&str, u32)]) -> Result<Vec<StoichTerm>, NetworkError> {
        let mut resolved: Vec<StoichTerm> = Vec::with_capacity(terms.len());
        for (name, coefficient) in terms {
            let species = self
                .species_index(name)
                .ok_or_else(|| NetworkError::UnknownSpecies(name.to_string()))?;
            if *coefficient == 0 {
                return Err(NetworkError::MalformedStoichiometry {
                    species: name.to_string(),
                    coefficient: *coefficient,
                });
            }
            match resolved.iter_mut().find(|t| t.species == species) {
                Some(term) => {
                    term.coefficient = term
                        .coefficient
                        .checked_add(*coefficient)
                        .ok_or_else(|| NetworkError::CoefficientOverflow(name.to_string()))?;
                }
                None => resolved.push(StoichTerm {
                    species,
                    coefficient: *coefficient,
                }),
            }
        }
        Ok(resolved)
    }

    fn build_reaction(
        &self,
        rate: Rate,
        substrates: &[StoichTerm],
        products: &[StoichTerm],
        kinetics: Kinetics,
    ) -> Result<Reaction, NetworkError> {
        if rate.is_reversible() {
            return Err(NetworkError::InvalidRate(format!(
                "reversible pairs cannot be nested: {rate}"
            )));
        }

        let mut dependents: BTreeSet<usize> = substrates.iter().map(|t| t.species).collect();
        for symbol in rate.symbols() {
            match self.symbols.get(symbol) {
                Some((SymbolKind::Species, index)) => {
                    dependents.insert(*index);
                }
                Some((SymbolKind::Parameter, _)) => {}
                None if RESERVED_SYMBOLS.contains(&symbol) => {}
                None => return Err(NetworkError::UnknownSymbol(symbol.to_string())),
            }
        }

        Ok(Reaction {
            rate,
            substrates: substrates.to_vec(),
            products: products.to_vec(),
            dependents: dependents.into_iter().collect(),
            kinetics,
        })
    }

    /// Registered species names in registration order
    pub fn species(&self) -> &[String] {
        &self.species
    }

    /// Registered parameter names in registration order
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn num_species(&self) -> usize {
        self.species.len()
    }

    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    pub fn num_reactions(&self) -> usize {
        self.reactions.len()
    }

    pub fn species_index(&self, name: &str) -> Option<usize> {
        match self.symbols.get(name) {
            Some((SymbolKind::Species, index)) => Some(*index),
            _ => None,
        }
    }

    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        match self.symbols.get(name) {
            Some((SymbolKind::Parameter, index)) => Some(*index),
            _ => None,
        }
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn reaction(&self, index: usize) -> Result<&Reaction, NetworkError> {
        self.reactions
            .get(index)
            .ok_or(NetworkError::IndexOutOfRange {
                index,
                len: self.reactions.len(),
            })
    }

    pub fn substrates(&self, index: usize) -> Result<&[StoichTerm], NetworkError> {
        Ok(self.reaction(index)?.substrates())
    }

    pub fn products(&self, index: usize) -> Result<&[StoichTerm], NetworkError> {
        Ok(self.reaction(index)?.products())
    }

    /// Species indices the rate law of reaction `index` reads.
    ///
    /// Always contains the substrates, plus any species named in the rate
    /// expression itself (e.g. a repressor in a Hill-type law).
    pub fn dependents(&self, index: usize) -> Result<&[usize], NetworkError> {
        Ok(self.reaction(index)?.dependents())
    }

    pub fn net_stoichiometry(&self, index: usize) -> Result<Vec<(usize, i64)>, NetworkError> {
        Ok(self.reaction(index)?.net_stoichiometry())
    }

    pub fn rate_expression(&self, index: usize) -> Result<&Rate, NetworkError> {
        Ok(self.reaction(index)?.rate())
    }

    /// Renders reaction `index` as `2A + B --> C`, using `0` for an empty side
    /// and `=>` for explicit kinetics.
    pub fn reaction_equation(&self, index: usize) -> Result<String, NetworkError> {
        let reaction = self.reaction(index)?;
        let arrow = if reaction.kinetics.is_mass_action() {
            "-->"
        } else {
            "=>"
        };
        Ok(format!(
            "{} {} {}",
            self.format_side(&reaction.substrates),
            arrow,
            self.format_side(&reaction.products)
        ))
    }

    fn format_side(&self, terms: &[StoichTerm]) -> String {
        if terms.is_empty() {
            return "0".to_string();
        }
        terms
            .iter()
            .map(|t| match t.coefficient {
                1 => self.species[t.species].clone(),
                c => format!("{c}{}", self.species[t.species]),
            })
            .join(" + ")
    }
}

/// Name-based representation of a network used for serialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NetworkDocument {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub species: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<ReactionRecord>,
}

/// A reaction as stored in a [`NetworkDocument`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReactionRecord {
    pub rate: Rate,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub substrates: Vec<StoichiometryEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<StoichiometryEntry>,
    #[serde(default)]
    pub kinetics: Kinetics,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoichiometryEntry {
    pub species: String,
    #[serde(default = "default_coefficient")]
    pub coefficient: u32,
}

fn default_coefficient() -> u32 {
    1
}

impl From<ReactionNetwork> for NetworkDocument {
    fn from(network: ReactionNetwork) -> Self {
        let entries = |terms: &[StoichTerm]| {
            terms
                .iter()
                .map(|t| StoichiometryEntry {
                    species: network.species[t.species].clone(),
                    coefficient: t.coefficient,
                })
                .collect::<Vec<_>>()
        };

        let reactions = network
            .reactions
            .iter()
            .map(|r| ReactionRecord {
                rate: r.rate.clone(),
                substrates: entries(&r.substrates),
                products: entries(&r.products),
                kinetics: r.kinetics,
            })
            .collect();

        NetworkDocument {
            species: network.species.clone(),
            parameters: network.parameters.clone(),
            reactions,
        }
    }
}

impl TryFrom<NetworkDocument> for ReactionNetwork {
    type Error = NetworkError;

    /// Replays the document through the registry operations, so a loaded
    /// network satisfies the same invariants as one built by hand.
    fn try_from(document: NetworkDocument) -> Result<Self, Self::Error> {
        let mut network = ReactionNetwork::new();
        for name in &document.species {
            network.add_species(name)?;
        }
        for name in &document.parameters {
            network.add_parameter(name)?;
        }
        for record in document.reactions {
            let terms = |entries: &[StoichiometryEntry]| -> Vec<(String, u32)> {
                entries
                    .iter()
                    .map(|e| (e.species.clone(), e.coefficient))
                    .collect()
            };
            let substrates = terms(&record.substrates);
            let products = terms(&record.products);
            network.add_reaction_with_kinetics(
                record.rate,
                &borrow_terms(&substrates),
                &borrow_terms(&products),
                record.kinetics,
            )?;
        }
        Ok(network)
    }
}

/// Turns owned `(name, coefficient)` pairs into the borrowed form
/// `add_reaction` takes.
pub(crate) fn borrow_terms(terms: &[(String, u32)]) -> Vec<(&str, u32)> {
    terms.iter().map(|(n, c)| (n.as_str(), *c)).collect()
}

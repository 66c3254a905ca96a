//! Dependency graphs derived from a reaction network.
//!
//! All graphs are adjacency lists (`Vec<Vec<usize>>`) whose entries are sorted
//! and free of duplicates. They are pure functions of the network they are
//! computed from and have to be recomputed after the network grows.
//!
//! The three graphs answer the questions a stochastic or ODE simulator asks
//! after a reaction fires:
//!
//! - which species change? ([`reaction_to_species_graph`])
//! - which rates read a given species? ([`species_to_reaction_graph`])
//! - which rates must be recomputed? ([`reaction_to_reaction_graph`])

use std::collections::BTreeSet;

use crate::network::ReactionNetwork;

/// Adjacency list indexed by source node
pub type Adjacency = Vec<Vec<usize>>;

/// For each reaction, the species whose quantity changes when it fires.
///
/// Species that appear on both sides with equal coefficients (catalysts) are
/// not included, since their net stoichiometry is zero.
pub fn reaction_to_species_graph(network: &ReactionNetwork) -> Adjacency {
    network
        .reactions()
        .iter()
        .map(|reaction| {
            reaction
                .net_stoichiometry()
                .into_iter()
                .map(|(species, _)| species)
                .collect()
        })
        .collect()
}

/// For each species, the reactions whose rate law reads that species.
pub fn species_to_reaction_graph(network: &ReactionNetwork) -> Adjacency {
    let mut graph: Adjacency = vec![Vec::new(); network.num_species()];
    for (index, reaction) in network.reactions().iter().enumerate() {
        for &species in reaction.dependents() {
            graph[species].push(index);
        }
    }
    graph
}

/// For each reaction `r`, the reactions whose rate depends on a species that
/// `r` changes. Contains `r` itself when `r` consumes or produces one of its
/// own dependents.
pub fn reaction_to_reaction_graph(network: &ReactionNetwork) -> Adjacency {
    let changed = reaction_to_species_graph(network);
    let readers = species_to_reaction_graph(network);

    changed
        .iter()
        .map(|species| {
            species
                .iter()
                .flat_map(|&s| readers[s].iter().copied())
                .collect::<BTreeSet<usize>>()
                .into_iter()
                .collect()
        })
        .collect()
}

impl ReactionNetwork {
    /// See [`reaction_to_species_graph`]
    pub fn reaction_to_species_graph(&self) -> Adjacency {
        reaction_to_species_graph(self)
    }

    /// See [`species_to_reaction_graph`]
    pub fn species_to_reaction_graph(&self) -> Adjacency {
        species_to_reaction_graph(self)
    }

    /// See [`reaction_to_reaction_graph`]
    pub fn reaction_to_reaction_graph(&self) -> Adjacency {
        reaction_to_reaction_graph(self)
    }
}

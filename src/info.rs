//! Information display module for reaction networks
//!
//! Implements `Display` for [`ReactionNetwork`] and provides table renderings
//! of the derived views (stoichiometry matrix, dependency graphs) for the CLI.

use std::fmt::{self, Display};

use itertools::Itertools;
use tabled::{builder::Builder, settings::Style};

use crate::{graphs::Adjacency, network::ReactionNetwork, stoich::net_stoichiometry_matrix};

/// Conversion of model components to table rows
///
/// Implementors provide column headers and one string per column.
trait TableRecord {
    fn columns() -> Vec<String>;
    fn to_record(&self) -> Vec<String>;
}

struct SymbolRow<'a> {
    index: usize,
    name: &'a str,
}

impl TableRecord for SymbolRow<'_> {
    fn columns() -> Vec<String> {
        vec!["Index".to_string(), "Name".to_string()]
    }

    fn to_record(&self) -> Vec<String> {
        vec![self.index.to_string(), self.name.to_string()]
    }
}

struct ReactionRow {
    index: usize,
    equation: String,
    rate: String,
    dependents: String,
}

impl TableRecord for ReactionRow {
    /// Index, Scheme, Rate, Dependents
    fn columns() -> Vec<String> {
        vec![
            "Index".to_string(),
            "Scheme".to_string(),
            "Rate".to_string(),
            "Dependents".to_string(),
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.index.to_string(),
            self.equation.clone(),
            self.rate.clone(),
            self.dependents.clone(),
        ]
    }
}

impl Display for ReactionNetwork {
    /// Formats a network as nested tables of species, parameters and
    /// reactions, skipping empty sections.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(vec!["Reaction Network"]);

        if !self.species().is_empty() {
            builder.push_record(vec!["Species".to_string()]);
            builder.push_record(vec![to_table(&symbol_rows(self.species()))]);
        }

        if !self.parameters().is_empty() {
            builder.push_record(vec!["Parameters".to_string()]);
            builder.push_record(vec![to_table(&symbol_rows(self.parameters()))]);
        }

        if self.num_reactions() > 0 {
            let rows = (0..self.num_reactions())
                .map(|index| {
                    let reaction = &self.reactions()[index];
                    ReactionRow {
                        index,
                        equation: self.reaction_equation(index).unwrap_or_default(),
                        rate: reaction.rate().to_string(),
                        dependents: self.names(reaction.dependents()),
                    }
                })
                .collect::<Vec<_>>();
            builder.push_record(vec!["Reactions".to_string()]);
            builder.push_record(vec![to_table(&rows)]);
        }

        let mut table = builder.build();
        table.with(Style::sharp());
        write!(f, "{table}")
    }
}

impl ReactionNetwork {
    fn names(&self, species: &[usize]) -> String {
        species.iter().map(|&s| &self.species()[s]).join(", ")
    }
}

fn symbol_rows(names: &[String]) -> Vec<SymbolRow<'_>> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| SymbolRow { index, name })
        .collect()
}

/// Converts a collection of TableRecord implementors to a formatted table string
fn to_table<T: TableRecord>(records: &[T]) -> String {
    let mut builder = Builder::default();
    builder.push_record(T::columns());

    for record in records {
        builder.push_record(record.to_record());
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Renders the net stoichiometry matrix with species as rows and reactions
/// as columns.
pub fn stoichiometry_table(network: &ReactionNetwork) -> String {
    let matrix = net_stoichiometry_matrix(network);
    let mut builder = Builder::default();

    let mut header = vec!["Species".to_string()];
    header.extend((0..network.num_reactions()).map(|j| format!("R{j}")));
    builder.push_record(header);

    for (i, name) in network.species().iter().enumerate() {
        let mut row = vec![name.clone()];
        row.extend(matrix.row(i).iter().map(|c| c.to_string()));
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Renders an adjacency list as a two column table.
///
/// # Arguments
/// * `graph` - The adjacency list
/// * `source` - Formats a source node index
/// * `target` - Formats a target node index
pub fn graph_table(
    graph: &Adjacency,
    source: impl Fn(usize) -> String,
    target: impl Fn(usize) -> String,
) -> String {
    let mut builder = Builder::default();
    builder.push_record(vec!["From".to_string(), "To".to_string()]);

    for (node, edges) in graph.iter().enumerate() {
        builder.push_record(vec![
            source(node),
            edges.iter().map(|&e| target(e)).join(", "),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

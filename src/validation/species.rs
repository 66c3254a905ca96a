use crate::network::ReactionNetwork;
use crate::validation::consistency::{Report, Severity, ValidationResult};

/// Warns about species that appear in no reaction and in no rate expression.
pub fn check_species(network: &ReactionNetwork, report: &mut Report) {
    let readers = network.species_to_reaction_graph();

    for (species_idx, name) in network.species().iter().enumerate() {
        let is_read = !readers[species_idx].is_empty();
        let is_touched = network.reactions().iter().any(|r| {
            r.substrates()
                .iter()
                .chain(r.products())
                .any(|t| t.species == species_idx)
        });

        if !is_read && !is_touched {
            report.add_result(ValidationResult::new(
                format!("/species/{species_idx}"),
                format!("Species '{name}' does not take part in any reaction."),
                Severity::Warning,
                Some(name.clone()),
            ));
        }
    }
}

use crate::network::{Reaction, ReactionNetwork};
use crate::rate::Rate;
use crate::validation::consistency::{Report, Severity, ValidationResult};

pub fn check_reactions(network: &ReactionNetwork, report: &mut Report) {
    for (reaction_idx, reaction) in network.reactions().iter().enumerate() {
        check_reaction_rate(report, reaction, reaction_idx);
        check_reaction_effect(report, network, reaction, reaction_idx);
    }
}

fn check_reaction_rate(report: &mut Report, reaction: &Reaction, reaction_idx: usize) {
    if let Rate::Numeric(value) = reaction.rate() {
        if !value.is_finite() || *value < 0.0 {
            report.add_result(ValidationResult::new(
                format!("/reactions/{reaction_idx}/rate"),
                format!("Reaction rate must be finite and non-negative, got {value}."),
                Severity::Error,
                None,
            ));
        }
    }
}

fn check_reaction_effect(
    report: &mut Report,
    network: &ReactionNetwork,
    reaction: &Reaction,
    reaction_idx: usize,
) {
    if reaction.net_stoichiometry().is_empty() {
        let equation = network
            .reaction_equation(reaction_idx)
            .unwrap_or_default();
        report.add_result(ValidationResult::new(
            format!("/reactions/{reaction_idx}"),
            format!("Reaction '{equation}' does not change any species."),
            Severity::Info,
            None,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_network;

    #[test]
    fn test_negative_rate() {
        let network = parse_network("-1, A --> B\nNaN, B --> A").unwrap();
        let mut report = Report::new();
        check_reactions(&network, &mut report);

        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[1].location(), "/reactions/1/rate");
    }

    #[test]
    fn test_reaction_without_effect() {
        let network = parse_network("k, A --> A").unwrap();
        let mut report = Report::new();
        check_reactions(&network, &mut report);

        assert!(report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].severity(), &Severity::Info);
    }
}

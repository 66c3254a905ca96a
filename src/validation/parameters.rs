use crate::network::ReactionNetwork;
use crate::validation::consistency::{Report, Severity, ValidationResult};

/// Validates the parameters of a network
///
/// # Arguments
/// * `network` - The network containing parameters to validate
/// * `report` - Validation report to add any validation warnings to
///
/// # Details
/// For each parameter, checks whether any rate expression reads it.
/// Adds a warning to the report for parameters no rate uses.
pub fn check_parameters(network: &ReactionNetwork, report: &mut Report) {
    for (param_idx, parameter) in network.parameters().iter().enumerate() {
        check_parameter_usage(report, network, parameter, param_idx);
    }
}

fn check_parameter_usage(
    report: &mut Report,
    network: &ReactionNetwork,
    parameter: &str,
    param_idx: usize,
) {
    let is_used = network
        .reactions()
        .iter()
        .any(|r| r.rate().symbols().contains(&parameter));

    if !is_used {
        let result = ValidationResult::new(
            format!("/parameters/{param_idx}"),
            format!("Parameter '{parameter}' is not used by any rate expression."),
            Severity::Warning,
            Some(parameter.to_string()),
        );

        report.add_result(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_network;

    /// Test that an unused parameter produces a warning but keeps the network valid
    #[test]
    fn test_unused_parameter() {
        let mut report = Report::new();
        let network = parse_network("@parameters k2\nk1, A --> B").unwrap();

        check_parameters(&network, &mut report);
        assert!(report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].identifier(), &Some("k2".to_string()));
    }
}

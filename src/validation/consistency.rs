//! Consistency module for checking reaction networks.
//!
//! The registry already rejects structurally invalid input, so the checks here
//! look for networks that are well-formed but probably not what the author
//! meant:
//! - Species that no reaction touches
//! - Parameters that no rate reads
//! - Reactions that change nothing
//! - Numeric rates that are negative or not finite
//!
//! The main entry point is the `check_consistency` function which runs all
//! checks and returns a `Report` with the results.

use std::fmt;

use colored::Colorize;

use crate::network::ReactionNetwork;
use crate::validation::parameters::check_parameters;
use crate::validation::reactions::check_reactions;
use crate::validation::species::check_species;

/// The `check_consistency` function is used to check the consistency of a `ReactionNetwork`.
/// It returns a `Report` containing the results of the checks.
///
/// # Arguments
///
/// * `network` - A reference to the `ReactionNetwork` to be checked.
///
/// # Returns
///
/// Returns a `Report` containing the results of the consistency checks.
pub fn check_consistency(network: &ReactionNetwork) -> Report {
    let mut report = Report::new();

    check_species(network, &mut report);
    check_parameters(network, &mut report);
    check_reactions(network, &mut report);

    report
}

/// The `Report` struct is used to store the results of the validation checks.
///
/// The network is considered invalid if any validation results have Error severity.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct Report {
    /// Whether the network is valid overall. False if any errors were found.
    pub is_valid: bool,
    /// Vector of individual validation results found during checks.
    pub errors: Vec<ValidationResult>,
}

impl Report {
    pub(crate) fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Adds a validation result to the report.
    ///
    /// If the result has Error severity, marks the overall report as invalid.
    pub fn add_result(&mut self, result: ValidationResult) {
        if result.severity == Severity::Error {
            self.is_valid = false;
        }
        self.errors.push(result);
    }

    /// Filters the results by the identifier of the object they refer to.
    pub fn filter_results(&self, identifier: &str) -> Vec<ValidationResult> {
        self.errors
            .iter()
            .filter(|result| result.identifier.as_deref() == Some(identifier))
            .cloned()
            .collect()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "{}", "Network is consistent".bold().green());
        }
        for result in &self.errors {
            writeln!(f, "{result}")?;
        }
        Ok(())
    }
}

/// A single validation issue found during checking.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ValidationResult {
    /// JSON pointer path into the network document, e.g. `/reactions/2`
    location: String,
    /// Human readable description of the validation issue
    message: String,
    severity: Severity,
    /// Name of the species or parameter concerned, if any
    identifier: Option<String>,
}

impl ValidationResult {
    pub fn new(
        location: String,
        message: String,
        severity: Severity,
        identifier: Option<String>,
    ) -> Self {
        Self {
            location,
            message,
            severity,
            identifier,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> &Severity {
        &self.severity
    }

    pub fn identifier(&self) -> &Option<String> {
        &self.identifier
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self.severity {
            Severity::Error => self.message.bold().red(),
            Severity::Warning => self.message.bold().yellow(),
            Severity::Info => self.message.bold().green(),
        };

        let severity = match self.severity {
            Severity::Error => "Error".bold().red(),
            Severity::Warning => "Warning".bold().yellow(),
            Severity::Info => "Info".bold().green(),
        };

        write!(
            f,
            "[{}] {}:\n\t└── {}",
            self.location.bold(),
            severity,
            message
        )
    }
}

/// Severity levels for validation issues.
///
/// - Error: The network is invalid for simulation
/// - Warning: The network may have issues but is still usable
/// - Info: Informational message
#[derive(Debug, Clone, PartialEq, Copy, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "Error"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Info => write!(f, "Info"),
        }
    }
}

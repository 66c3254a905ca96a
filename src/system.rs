//! ODE System Generation for Reaction Networks
//!
//! This module derives the reaction rate equations of a network. It reads the
//! registry only through its public views (species, net stoichiometry and rate
//! expressions) and is a consumer of the network, not part of it.
//!
//! The main components include:
//! - Rendering the rate law of a single reaction
//! - Assembling one right-hand side per species from the net stoichiometry
//! - Evaluating the assembled right-hand side for a given state

use derive_builder::Builder;
use itertools::Itertools;
use meval::{Context, Expr};
use thiserror::Error;

use crate::{
    error::NetworkError,
    network::{Kinetics, ReactionNetwork},
    rate::Rate,
};

/// Configuration of rate law generation
///
/// # Examples
///
/// ```
/// use rxnet::system::SystemConfigBuilder;
///
/// let config = SystemConfigBuilder::default()
///     .combinatoric_ratelaws(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Builder)]
pub struct SystemConfig {
    /// Divide mass-action rate laws by the factorials of the substrate
    /// coefficients, e.g. `k * A^2 / 2` for `2A --> B`
    #[builder(default = "true")]
    pub combinatoric_ratelaws: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            combinatoric_ratelaws: true,
        }
    }
}

/// Renders the rate law of reaction `index` as an expression string.
///
/// For explicit kinetics the rate expression is returned as is. For
/// mass-action kinetics the rate is multiplied by every substrate raised to
/// its coefficient.
///
/// # Arguments
///
/// * `network` - The network containing the reaction
/// * `index` - Index of the reaction
/// * `config` - Rate law options
///
/// # Returns
///
/// * `Result<String, SystemError>` - The rate law, or an error if the index is
///   invalid or the combinatoric divisor does not fit into a `u64`
pub fn rate_law(
    network: &ReactionNetwork,
    index: usize,
    config: &SystemConfig,
) -> Result<String, SystemError> {
    let reaction = network.reaction(index)?;

    if reaction.kinetics() == Kinetics::Explicit {
        return Ok(reaction.rate().to_string());
    }

    let mut factors = vec![render_rate(reaction.rate())];
    for term in reaction.substrates() {
        let name = &network.species()[term.species];
        match term.coefficient {
            1 => factors.push(name.clone()),
            c => factors.push(format!("{name}^{c}")),
        }
    }
    let law = factors.join(" * ");

    if !config.combinatoric_ratelaws {
        return Ok(law);
    }

    let divisor = reaction
        .substrates()
        .iter()
        .try_fold(1u64, |acc, term| acc.checked_mul(factorial(term.coefficient)?))
        .ok_or(SystemError::CombinatoricOverflow(index))?;

    if divisor > 1 {
        Ok(format!("{law} / {divisor}"))
    } else {
        Ok(law)
    }
}

fn render_rate(rate: &Rate) -> String {
    match rate {
        Rate::Symbolic(symbolic) if symbolic.expr().len() > 1 => format!("({symbolic})"),
        rate => rate.to_string(),
    }
}

/// `n!`, or `None` once it no longer fits into a `u64` (from `21!` on)
fn factorial(n: u32) -> Option<u64> {
    (1..=u64::from(n)).try_fold(1u64, |acc, i| acc.checked_mul(i))
}

/// The rate equation of a single species
#[derive(Debug, Clone)]
pub struct SpeciesOde {
    species: String,
    equation: String,
    expr: Expr,
}

impl SpeciesOde {
    pub fn species(&self) -> &str {
        &self.species
    }

    /// The right-hand side as an expression string
    pub fn equation(&self) -> &str {
        &self.equation
    }
}

/// The reaction rate equations of a network, one per species in registration
/// order.
#[derive(Debug, Clone)]
pub struct OdeSystem {
    species: Vec<String>,
    parameters: Vec<String>,
    equations: Vec<SpeciesOde>,
}

impl OdeSystem {
    /// Derives the rate equations of a network.
    ///
    /// Every species gets the sum over all reactions of its net coefficient
    /// times the reaction's rate law. Species that no reaction changes get
    /// the equation `0`.
    ///
    /// # Errors
    ///
    /// Returns an error if a rate law cannot be rendered or an assembled
    /// equation cannot be parsed again.
    pub fn from_network(
        network: &ReactionNetwork,
        config: &SystemConfig,
    ) -> Result<Self, SystemError> {
        let laws = (0..network.num_reactions())
            .map(|index| rate_law(network, index, config))
            .collect::<Result<Vec<_>, _>>()?;

        let mut terms: Vec<Vec<String>> = vec![Vec::new(); network.num_species()];
        for (index, reaction) in network.reactions().iter().enumerate() {
            for (species, coefficient) in reaction.net_stoichiometry() {
                let law = &laws[index];
                terms[species].push(match coefficient {
                    1 => format!("({law})"),
                    -1 => format!("-({law})"),
                    c => format!("{c} * ({law})"),
                });
            }
        }

        let equations = network
            .species()
            .iter()
            .zip(terms)
            .map(|(species, terms)| {
                let equation = if terms.is_empty() {
                    "0".to_string()
                } else {
                    terms.iter().join(" + ")
                };
                let expr = equation
                    .parse::<Expr>()
                    .map_err(|e| SystemError::EquationError(species.clone(), e))?;
                Ok(SpeciesOde {
                    species: species.clone(),
                    equation,
                    expr,
                })
            })
            .collect::<Result<Vec<_>, SystemError>>()?;

        log::debug!("Derived {} species equations", equations.len());

        Ok(Self {
            species: network.species().to_vec(),
            parameters: network.parameters().to_vec(),
            equations,
        })
    }

    pub fn equations(&self) -> &[SpeciesOde] {
        &self.equations
    }

    /// Evaluates the right-hand side.
    ///
    /// # Arguments
    ///
    /// * `u` - Species values in registration order
    /// * `p` - Parameter values in registration order
    /// * `t` - Time
    ///
    /// # Returns
    ///
    /// * `Result<Vec<f64>, SystemError>` - The time derivative of every species
    pub fn rhs(&self, u: &[f64], p: &[f64], t: f64) -> Result<Vec<f64>, SystemError> {
        if u.len() != self.species.len() {
            return Err(SystemError::DimensionMismatch {
                what: "species",
                expected: self.species.len(),
                got: u.len(),
            });
        }
        if p.len() != self.parameters.len() {
            return Err(SystemError::DimensionMismatch {
                what: "parameters",
                expected: self.parameters.len(),
                got: p.len(),
            });
        }

        let mut ctx = Context::new();
        for (name, value) in self.species.iter().zip(u) {
            ctx.var(name.as_str(), *value);
        }
        for (name, value) in self.parameters.iter().zip(p) {
            ctx.var(name.as_str(), *value);
        }
        ctx.var("t", t);

        self.equations
            .iter()
            .map(|ode| {
                ode.expr
                    .eval_with_context(&ctx)
                    .map_err(|e| SystemError::EquationError(ode.species.clone(), e))
            })
            .collect()
    }
}

/// Errors that can occur during ODE system generation and evaluation
#[derive(Error, Debug)]
pub enum SystemError {
    /// Error when the network rejects a query
    #[error("Network error: {0}")]
    NetworkError(#[from] NetworkError),

    /// Error when an equation cannot be parsed or evaluated
    #[error("Equation of species '{0}' failed: {1}")]
    EquationError(String, meval::Error),

    /// Error when the combinatoric divisor of a rate law exceeds `u64`
    #[error("Combinatoric divisor of reaction {0} is too large")]
    CombinatoricOverflow(usize),

    /// Error when an input vector has the wrong length
    #[error("Expected {expected} {what} values, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_network;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mass_action_rate_law() {
        let network = parse_network("k1, 2A + B --> C\n(kf + 1) * kb, C --> 0").unwrap();
        let config = SystemConfig::default();

        assert_eq!(rate_law(&network, 0, &config).unwrap(), "k1 * A^2 * B / 2");
        assert_eq!(rate_law(&network, 1, &config).unwrap(), "((kf + 1) * kb) * C");

        let config = SystemConfigBuilder::default()
            .combinatoric_ratelaws(false)
            .build()
            .unwrap();
        assert_eq!(rate_law(&network, 0, &config).unwrap(), "k1 * A^2 * B");
    }

    #[test]
    fn test_explicit_rate_law() {
        let network = parse_network("@species R\nv / (1 + R), 0 => P").unwrap();
        assert_eq!(
            rate_law(&network, 0, &SystemConfig::default()).unwrap(),
            "v / (1 + R)"
        );
    }

    #[test]
    fn test_explicit_rate_law_ignores_substrates() {
        let network = parse_network("(v + 1) * A, 3A => B").unwrap();
        assert_eq!(
            rate_law(&network, 0, &SystemConfig::default()).unwrap(),
            "(v + 1) * A"
        );
    }

    #[test]
    fn test_combinatoric_divisor_overflow() {
        // 20! still fits into a u64, 21! does not
        let network = parse_network("k, 20A --> B\nk, 21A --> B\nk, 20A + 20B --> C").unwrap();
        let config = SystemConfig::default();

        assert_eq!(
            rate_law(&network, 0, &config).unwrap(),
            "k * A^20 / 2432902008176640000"
        );
        assert!(matches!(
            rate_law(&network, 1, &config),
            Err(SystemError::CombinatoricOverflow(1))
        ));
        assert!(matches!(
            rate_law(&network, 2, &config),
            Err(SystemError::CombinatoricOverflow(2))
        ));
        assert!(matches!(
            OdeSystem::from_network(&network, &config),
            Err(SystemError::CombinatoricOverflow(1))
        ));

        let config = SystemConfigBuilder::default()
            .combinatoric_ratelaws(false)
            .build()
            .unwrap();
        assert_eq!(rate_law(&network, 1, &config).unwrap(), "k * A^21");
    }

    #[test]
    fn test_rate_law_index_out_of_range() {
        let network = parse_network("k, A --> B").unwrap();
        let result = rate_law(&network, 3, &SystemConfig::default());
        assert!(matches!(
            result,
            Err(SystemError::NetworkError(NetworkError::IndexOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_derive_equations() {
        let network = parse_network("(kf, kb), A <--> B\nk, 2B --> C\n@species D").unwrap();
        let system = OdeSystem::from_network(&network, &SystemConfig::default()).unwrap();

        let equations: Vec<(&str, &str)> = system
            .equations()
            .iter()
            .map(|ode| (ode.species(), ode.equation()))
            .collect();

        assert_eq!(
            equations,
            vec![
                ("D", "0"),
                ("A", "-(kf * A) + (kb * B)"),
                ("B", "(kf * A) + -(kb * B) + -2 * (k * B^2 / 2)"),
                ("C", "(k * B^2 / 2)"),
            ]
        );
    }

    #[test]
    fn test_rhs() {
        // A <--> B with kf = 2, kb = 1 at A = 3, B = 1
        let network = parse_network("(kf, kb), A <--> B").unwrap();
        let system = OdeSystem::from_network(&network, &SystemConfig::default()).unwrap();

        let du = system.rhs(&[3.0, 1.0], &[2.0, 1.0], 0.0).unwrap();
        assert_eq!(du, vec![-5.0, 5.0]);

        assert!(matches!(
            system.rhs(&[1.0], &[2.0, 1.0], 0.0),
            Err(SystemError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_rhs_with_time() {
        let network = parse_network("k * t, 0 --> A").unwrap();
        let system = OdeSystem::from_network(&network, &SystemConfig::default()).unwrap();

        let du = system.rhs(&[0.0], &[3.0], 2.0).unwrap();
        assert_eq!(du, vec![6.0]);
    }
}

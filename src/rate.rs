//! Rate specifications for reactions.
//!
//! A [`Rate`] is either a numeric constant, a symbolic expression, or a
//! forward/backward pair describing a reversible reaction. Symbolic rates are
//! parsed with `meval` so that the referenced symbols can be resolved against
//! the network, but they are never evaluated here. Two rates are equal when
//! they have the same structure: the same numeric value or the same token
//! sequence.

use std::{fmt, str::FromStr};

use meval::{tokenizer::Token, Expr};
use ordered_float::OrderedFloat;
use schemars::{gen::SchemaGenerator, schema::Schema, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

/// Symbols that may appear in a rate without being registered.
///
/// `t` denotes time, `pi` and `e` are the constants `meval` provides.
pub const RESERVED_SYMBOLS: [&str; 3] = ["t", "pi", "e"];

/// A parsed symbolic rate expression such as `k1 * A / (Km + A)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymbolicRate {
    source: String,
    expr: Expr,
    symbols: Vec<String>,
}

impl SymbolicRate {
    /// Parses a rate expression.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidRate`] if `meval` cannot parse the expression.
    pub fn parse(source: &str) -> Result<Self, NetworkError> {
        let source = source.trim();
        let expr: Expr = source
            .parse()
            .map_err(|e: meval::Error| NetworkError::InvalidRate(format!("'{source}': {e}")))?;
        let symbols = extract_symbols(&expr);

        Ok(Self {
            source: source.to_string(),
            expr,
            symbols,
        })
    }

    /// The expression as it was written
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed expression
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Variable symbols in order of first appearance (function names excluded)
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

/// Collects the variables of an expression, keeping their first-seen order.
fn extract_symbols(expr: &Expr) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for token in expr.iter() {
        if let Token::Var(v) = token {
            if !symbols.contains(v) {
                symbols.push(v.clone());
            }
        }
    }
    symbols
}

impl PartialEq for SymbolicRate {
    fn eq(&self, other: &Self) -> bool {
        self.expr.iter().eq(other.expr.iter())
    }
}

impl Eq for SymbolicRate {}

impl TryFrom<String> for SymbolicRate {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SymbolicRate::parse(&value)
    }
}

impl From<SymbolicRate> for String {
    fn from(value: SymbolicRate) -> Self {
        value.source
    }
}

impl JsonSchema for SymbolicRate {
    fn schema_name() -> String {
        "SymbolicRate".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

impl fmt::Display for SymbolicRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The rate specification of a reaction.
///
/// In JSON a numeric rate is a number, a symbolic rate is a string and a
/// reversible pair is a two element array.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Rate {
    Numeric(f64),
    Symbolic(SymbolicRate),
    ReversiblePair(Box<Rate>, Box<Rate>),
}

impl Rate {
    /// Parses a symbolic rate expression.
    pub fn symbolic(source: &str) -> Result<Self, NetworkError> {
        Ok(Rate::Symbolic(SymbolicRate::parse(source)?))
    }

    /// Creates a reversible pair from a forward and a backward rate.
    pub fn reversible(forward: impl Into<Rate>, backward: impl Into<Rate>) -> Self {
        Rate::ReversiblePair(Box::new(forward.into()), Box::new(backward.into()))
    }

    pub fn is_reversible(&self) -> bool {
        matches!(self, Rate::ReversiblePair(..))
    }

    /// All variable symbols the rate references, without duplicates.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = Vec::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols<'a>(&'a self, symbols: &mut Vec<&'a str>) {
        match self {
            Rate::Numeric(_) => {}
            Rate::Symbolic(rate) => {
                for symbol in rate.symbols() {
                    if !symbols.contains(&symbol.as_str()) {
                        symbols.push(symbol);
                    }
                }
            }
            Rate::ReversiblePair(forward, backward) => {
                forward.collect_symbols(symbols);
                backward.collect_symbols(symbols);
            }
        }
    }
}

impl PartialEq for Rate {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Rate::Numeric(a), Rate::Numeric(b)) => OrderedFloat(*a) == OrderedFloat(*b),
            (Rate::Symbolic(a), Rate::Symbolic(b)) => a == b,
            (Rate::ReversiblePair(fa, ba), Rate::ReversiblePair(fb, bb)) => fa == fb && ba == bb,
            _ => false,
        }
    }
}

impl Eq for Rate {}

impl From<f64> for Rate {
    fn from(value: f64) -> Self {
        Rate::Numeric(value)
    }
}

impl From<SymbolicRate> for Rate {
    fn from(value: SymbolicRate) -> Self {
        Rate::Symbolic(value)
    }
}

impl FromStr for Rate {
    type Err = NetworkError;

    /// Plain numbers become [`Rate::Numeric`], everything else is parsed as
    /// a symbolic expression.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<f64>() {
            Ok(value) => Ok(Rate::Numeric(value)),
            Err(_) => Rate::symbolic(s),
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::Numeric(value) => write!(f, "{value}"),
            Rate::Symbolic(rate) => write!(f, "{rate}"),
            Rate::ReversiblePair(forward, backward) => write!(f, "({forward}, {backward})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbolic_equality_is_structural() {
        let a = Rate::symbolic("k1 * A").unwrap();
        let b = Rate::symbolic("k1*A").unwrap();
        let c = Rate::symbolic("A * k1").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_numeric_equality() {
        assert_eq!(Rate::from(2.0), Rate::from(2.0));
        assert_ne!(Rate::from(2.0), Rate::from(3.0));
        assert_eq!(Rate::from(f64::NAN), Rate::from(f64::NAN));
        assert_ne!(Rate::from(1.0), Rate::symbolic("1").unwrap());
    }

    #[test]
    fn test_symbols_exclude_functions() {
        let rate = Rate::symbolic("v * exp(-E / T) * A").unwrap();
        assert_eq!(rate.symbols(), vec!["v", "E", "T", "A"]);
    }

    #[test]
    fn test_reversible_symbols_are_deduplicated() {
        let rate = Rate::reversible(
            Rate::symbolic("kf * A").unwrap(),
            Rate::symbolic("kb * A").unwrap(),
        );
        assert!(rate.is_reversible());
        assert_eq!(rate.symbols(), vec!["kf", "A", "kb"]);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("0.5".parse::<Rate>().unwrap(), Rate::Numeric(0.5));
        assert!(matches!("k".parse::<Rate>().unwrap(), Rate::Symbolic(_)));
        assert!(matches!(
            "k * (".parse::<Rate>(),
            Err(NetworkError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_serde_untagged() {
        let rate = Rate::reversible(1.5, Rate::symbolic("kb").unwrap());
        let json = serde_json::to_string(&rate).unwrap();
        assert_eq!(json, r#"[1.5,"kb"]"#);

        let parsed: Rate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rate);
    }
}

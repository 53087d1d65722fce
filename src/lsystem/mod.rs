/*
    This module is for storing and applying L-systems
*/

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::expression::{self, Bindings, ExprError};
use crate::generator::RandomSource;

// A concrete symbol in a derived state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub symbol: char,
    pub values: BTreeMap<String, f64>,
}

impl Symbol {
    pub fn new(symbol: char) -> Self {
        Symbol {
            symbol,
            values: BTreeMap::new(),
        }
    }

    pub fn with_values(symbol: char, values: &[(&str, f64)]) -> Self {
        Symbol {
            symbol,
            values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.values.is_empty() {
            write!(f, "{}", self.symbol)
        } else {
            let values = self.values.iter().map(|(k, v)| format!("{}: {}", k, v)).join(", ");
            write!(f, "{}({})", self.symbol, values)
        }
    }
}

/// A symbol on the right-hand side of a production, with one compiled
/// expression per parameter name.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTemplate {
    pub symbol: char,
    pub parameters: Vec<(String, Vec<String>)>,
}

impl SymbolTemplate {
    pub fn new(symbol: char, parameters: Vec<(String, Vec<String>)>) -> Self {
        SymbolTemplate { symbol, parameters }
    }

    // Every name bound to an empty expression, which evaluates to no value
    pub fn unvalued(symbol: char, names: &[String]) -> Self {
        SymbolTemplate {
            symbol,
            parameters: names.iter().map(|name| (name.clone(), Vec::new())).collect(),
        }
    }

    pub fn evaluate(&self, bindings: &Bindings) -> Result<Symbol, ExprError> {
        let mut values = BTreeMap::new();
        for (name, rpn) in &self.parameters {
            if let Some(value) = expression::eval_rpn(rpn, bindings)? {
                values.insert(name.clone(), value);
            }
        }

        Ok(Symbol {
            symbol: self.symbol,
            values,
        })
    }
}

// The templates of one right-hand side
pub type Successor = Vec<SymbolTemplate>;

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    // Left-hand side signature, e.g. `F(s)`
    pub lhs: String,
    pub alternatives: Vec<Successor>,
}

impl Rule {
    pub fn fixed(lhs: &str, successor: Successor) -> Self {
        Rule {
            lhs: lhs.to_string(),
            alternatives: vec![successor],
        }
    }

    pub fn is_stochastic(&self) -> bool {
        self.alternatives.len() > 1
    }

    /// Rewrites one symbol. A stochastic rule picks its successor here, once
    /// per invocation; a fixed rule never touches `random`.
    pub fn apply(&self, bindings: &Bindings, random: &mut dyn RandomSource) -> Result<Vec<Symbol>, ExprError> {
        let successor = match self.alternatives.len() {
            0 => return Ok(Vec::new()),
            1 => &self.alternatives[0],
            count => &self.alternatives[random.choose(count) % count],
        };

        successor.iter().map(|template| template.evaluate(bindings)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSystem {
    pub angle: f64,
    pub level: u32,
    pub consts: Bindings,
    pub rules: HashMap<char, Rule>,
    pub axiom: Vec<Symbol>,
    pub symbols: BTreeSet<char>,
    pub tropism: Option<[f64; 3]>,
}

impl ParsedSystem {
    // The symbols a renderer can give their own line style
    pub fn drawable_symbols(&self) -> Vec<char> {
        self.symbols.iter().copied().filter(char::is_ascii_uppercase).collect()
    }
}

// A production's right-hand side as written in the input
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Production {
    Fixed(String),
    Stochastic(Vec<String>),
}

impl Production {
    pub fn alternatives(&self) -> Vec<&str> {
        match self {
            Production::Fixed(text) => vec![text.as_str()],
            Production::Stochastic(texts) => texts.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Axiom {
    Tokens(Vec<String>),
    Text(String),
}

/// The system as it is written in a file or typed into an editor
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SystemDescription {
    pub angle: f64,
    pub level: u32,
    #[serde(default)]
    pub consts: HashMap<String, f64>,
    pub axiom: Axiom,
    pub productions: BTreeMap<String, Production>,
    #[serde(default)]
    pub tropism: Option<[f64; 3]>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::FixedSequence;

    fn template(symbol: char, parameters: &[(&str, &[&str])]) -> SymbolTemplate {
        SymbolTemplate::new(
            symbol,
            parameters
                .iter()
                .map(|(name, rpn)| (name.to_string(), rpn.iter().map(|t| t.to_string()).collect()))
                .collect(),
        )
    }

    #[test]
    fn symbol_display() {
        assert_eq!(Symbol::new('+').to_string(), "+");
        assert_eq!(Symbol::with_values('A', &[("t", -4.0), ("s", 2.5)]).to_string(), "A(s: 2.5, t: -4)");
    }

    #[test]
    fn template_evaluation() {
        let bindings: Bindings = [("s".to_string(), 0.5)].into_iter().collect();

        let scaled = template('+', &[("a", &["s", "90", "*"])]);
        assert_eq!(scaled.evaluate(&bindings).unwrap(), Symbol::with_values('+', &[("a", 45.0)]));

        // Empty expressions leave the value out
        let unvalued = SymbolTemplate::unvalued('F', &["s".to_string()]);
        assert_eq!(unvalued.evaluate(&bindings).unwrap(), Symbol::new('F'));

        let undefined = template('F', &[("s", &["q"])]);
        assert_eq!(undefined.evaluate(&bindings), Err(ExprError::UndefinedVariable("q".to_string())));
    }

    #[test]
    fn stochastic_rule_uses_random_source() {
        let rule = Rule {
            lhs: "F".to_string(),
            alternatives: vec![vec![template('F', &[])], vec![template('G', &[]), template('G', &[])]],
        };
        assert!(rule.is_stochastic());

        let mut random = FixedSequence::new(vec![1, 0]);
        let bindings = Bindings::new();
        assert_eq!(rule.apply(&bindings, &mut random).unwrap(), vec![Symbol::new('G'), Symbol::new('G')]);
        assert_eq!(rule.apply(&bindings, &mut random).unwrap(), vec![Symbol::new('F')]);
    }

    #[test]
    fn drawable_symbols_are_uppercase() {
        let system = ParsedSystem {
            angle: 90.0,
            level: 1,
            consts: Bindings::new(),
            rules: HashMap::new(),
            axiom: Vec::new(),
            symbols: "X+F[f]-G(s)".chars().collect(),
            tropism: None,
        };
        assert_eq!(system.drawable_symbols(), vec!['F', 'G', 'X']);
    }

    #[test]
    fn description_from_json() {
        let text = r#"{
            "angle": 25,
            "level": 2,
            "axiom": "F",
            "productions": { "F": ["F[+F]F", "F[-F]F"], "X": "FX" },
            "tropism": [0, -1, 0]
        }"#;
        let description: SystemDescription = serde_json::from_str(text).unwrap();

        assert_eq!(description.angle, 25.0);
        assert!(description.consts.is_empty());
        assert_eq!(description.axiom, Axiom::Text("F".to_string()));
        assert_eq!(description.productions["F"].alternatives(), vec!["F[+F]F", "F[-F]F"]);
        assert_eq!(description.productions["X"], Production::Fixed("FX".to_string()));
        assert_eq!(description.tropism, Some([0.0, -1.0, 0.0]));
    }
}

/*
    This module derives the states of an L-system
*/

use std::collections::HashMap;
use std::path::PathBuf;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::error_handling::*;
use crate::expression::{Bindings, ExprError};
use crate::lsystem::*;

#[derive(Error, Debug, PartialEq)]
pub enum GenerateErrorType {
    // A rule's parameter expression failed while rewriting `symbol`
    #[error("Could not rewrite `{symbol}`: {source}")]
    Expression { symbol: char, source: ExprError },
}

impl ErrorType for GenerateErrorType {}

pub type GenerateError = Error<GenerateErrorType>;
pub type GenResult = Result<Vec<Symbol>, GenerateError>;

/// Picks among the alternatives of a stochastic production
pub trait RandomSource {
    // Must return an index below `count`
    fn choose(&mut self, count: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn choose(&mut self, count: usize) -> usize {
        self.gen_range(0..count)
    }
}

/// Cycles through a preset list of indices
#[derive(Debug, Clone)]
pub struct FixedSequence {
    indices: Vec<usize>,
    position: usize,
}

impl FixedSequence {
    pub fn new(indices: Vec<usize>) -> Self {
        FixedSequence { indices, position: 0 }
    }
}

impl RandomSource for FixedSequence {
    fn choose(&mut self, count: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let index = self.indices[self.position % self.indices.len()];
        self.position += 1;
        index % count
    }
}

// Bindings for a rule invocation. Constants are merged last, so they win
// over a parameter of the same name.
fn invocation_bindings(symbol: &Symbol, consts: &Bindings) -> Bindings {
    let mut bindings: Bindings = symbol.values.iter().map(|(k, v)| (k.clone(), *v)).collect();
    bindings.extend(consts.iter().map(|(k, v)| (k.clone(), *v)));
    bindings
}

fn rewrite(
    state: &[Symbol],
    rules: &HashMap<char, Rule>,
    consts: &Bindings,
    random: &mut dyn RandomSource,
    file: &PathBuf,
) -> GenResult {
    let mut next = Vec::with_capacity(state.len());

    for symbol in state {
        let Some(rule) = rules.get(&symbol.symbol) else {
            next.push(symbol.clone());
            continue;
        };

        trace!(symbol = %symbol, rule = %rule.lhs, "rewriting");
        let successor = rule
            .apply(&invocation_bindings(symbol, consts), random)
            .map_err(|source| GenerateError {
                location: Location::production(file.clone(), &rule.lhs),
                error: GenerateErrorType::Expression {
                    symbol: symbol.symbol,
                    source,
                },
            })?;
        next.extend(successor);
    }

    Ok(next)
}

fn evolve_from(
    axiom: &[Symbol],
    rules: &HashMap<char, Rule>,
    consts: &Bindings,
    level: u32,
    random: &mut dyn RandomSource,
    file: &PathBuf,
) -> GenResult {
    let mut state = axiom.to_vec();

    for generation in 0..level {
        state = rewrite(&state, rules, consts, random, file)?;
        debug!(generation = generation + 1, length = state.len(), "derived generation");
    }

    Ok(state)
}

/// Rewrites `axiom` exactly `level` times. Symbols without a rule are
/// copied unchanged.
pub fn evolve(
    axiom: &[Symbol],
    rules: &HashMap<char, Rule>,
    consts: &Bindings,
    level: u32,
    random: &mut dyn RandomSource,
) -> GenResult {
    evolve_from(axiom, rules, consts, level, random, &PathBuf::new())
}

// Derives a parsed system to its own level
pub fn generate(system: &ParsedSystem, file: PathBuf, random: &mut dyn RandomSource) -> GenResult {
    generate_with_level(system, system.level, file, random)
}

pub fn generate_with_level(
    system: &ParsedSystem,
    level: u32,
    file: PathBuf,
    random: &mut dyn RandomSource,
) -> GenResult {
    evolve_from(&system.axiom, &system.rules, &system.consts, level, random, &file)
}

pub fn state_to_string(state: &[Symbol]) -> String {
    state.iter().map(Symbol::to_string).collect()
}

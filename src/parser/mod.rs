/*
    This module parses L-system descriptions
*/

mod lexer;
mod verifier;

use std::collections::BTreeSet;
use std::fs;
use std::iter::Peekable;
use std::path::PathBuf;

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error_handling::*;
use crate::expression::{self, ExprError};
use crate::lsystem::*;
use lexer::Token;
pub use verifier::{default_arities, parse_signature, Arities};

#[derive(Error, Debug)]
pub enum CompileErrorType {
    // A rule or axiom string does not lex into symbols and parameter lists
    #[error("Malformed rule: {0}")]
    MalformedRule(String),
    // A production's left-hand side is not `X` or `X(a,b,...)`
    #[error("Invalid signature `{0}`")]
    InvalidSignature(String),
    // Two productions rewrite the same symbol
    #[error("More than one production for `{0}`")]
    DuplicateProduction(char),
    #[error("`{symbol}` takes {expected} parameter(s) but {found} were given")]
    ArityMismatch {
        symbol: char,
        expected: usize,
        found: usize,
    },
    // An axiom parameter is not a number
    #[error("Invalid value `{0}`")]
    InvalidValue(String),
    #[error("Empty axiom entry")]
    EmptyAxiomEntry,
    // A stochastic production with nothing to choose from
    #[error("No alternatives given")]
    EmptyAlternatives,
    #[error("{0}")]
    Expression(#[from] ExprError),
    // The description is not valid JSON for a system
    #[error("Invalid system description: {0}")]
    Json(String),
    // There was an issue with reading a file
    #[error("File error: {0}")]
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        if let (CompileErrorType::FileError(a), CompileErrorType::FileError(b)) = (self, other) {
            return a.kind() == b.kind();
        }
        return std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.to_string() == other.to_string();
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn system_error(error: CompileErrorType, file: &PathBuf) -> CompileError {
    CompileError {
        location: Location::new(file.clone(), Entry::System),
        error,
    }
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

// A symbol with the raw text of its parameter list, if it has one
type Call = (char, Vec<String>);

fn parse_arguments(tokens: &mut Peekable<impl Iterator<Item = Token>>) -> Result<Vec<String>> {
    let mut arguments = Vec::new();

    loop {
        match tokens.next() {
            Some(Token::Parameter(text)) => arguments.push(text),
            Some(Token::Comma) => {}
            Some(Token::Close) => break,
            _ => return Err(CompileErrorType::MalformedRule("unterminated parameter list".to_string())),
        }
    }

    // `X()` has no parameters at all
    if arguments.len() == 1 && arguments[0].trim().is_empty() {
        arguments.clear();
    }

    Ok(arguments)
}

fn parse_calls(tokens: Vec<Token>) -> Result<Vec<Call>> {
    let mut tokens = tokens.into_iter().peekable();
    let mut calls = Vec::new();

    while let Some(token) = tokens.next() {
        let symbol = match token {
            Token::Symbol(c) => c,
            _ => return Err(CompileErrorType::MalformedRule("parameter list without a symbol".to_string())),
        };

        let arguments = if tokens.next_if_eq(&Token::Open).is_some() {
            parse_arguments(&mut tokens)?
        } else {
            Vec::new()
        };
        calls.push((symbol, arguments));
    }

    Ok(calls)
}

// Parameter names for symbols no production declares
fn fallback_parameter(symbol: char) -> Option<&'static str> {
    match symbol {
        'F' | 'f' => Some("s"),
        '+' | '-' => Some("a"),
        '!' => Some("w"),
        _ => None,
    }
}

fn parameter_names(arities: &Arities, symbol: char, found: usize) -> Result<Vec<String>> {
    let names = match (arities.get(&symbol), fallback_parameter(symbol)) {
        (Some(names), _) => names.clone(),
        (None, Some(name)) => vec![name.to_string()],
        (None, None) => Vec::new(),
    };

    if names.len() != found {
        return Err(CompileErrorType::ArityMismatch {
            symbol,
            expected: names.len(),
            found,
        });
    }

    Ok(names)
}

fn parse_template(arities: &Arities, (symbol, arguments): Call) -> Result<SymbolTemplate> {
    if arguments.is_empty() {
        let names = arities.get(&symbol).map(Vec::as_slice).unwrap_or_default();
        return Ok(SymbolTemplate::unvalued(symbol, names));
    }

    let names = parameter_names(arities, symbol, arguments.len())?;
    let parameters = names
        .into_iter()
        .zip(arguments)
        .map(|(name, argument)| Ok((name, expression::compile(&argument)?)))
        .collect::<Result<Vec<_>>>()?;

    Ok(SymbolTemplate::new(symbol, parameters))
}

/// Parses a right-hand side into the templates it produces, compiling each
/// parameter expression once.
pub fn parse_successor(arities: &Arities, text: &str) -> Result<Successor> {
    parse_calls(lexer::lex_rule(text)?)?
        .into_iter()
        .map(|call| parse_template(arities, call))
        .collect()
}

pub fn parse_rule_string(arities: &Arities, lhs: &str, text: &str) -> Result<Rule> {
    Ok(Rule::fixed(lhs, parse_successor(arities, text)?))
}

fn parse_production(arities: &Arities, lhs: &str, production: &Production) -> Result<Rule> {
    let alternatives = production
        .alternatives()
        .into_iter()
        .map(|text| parse_successor(arities, text))
        .collect::<Result<Vec<_>>>()?;

    if alternatives.is_empty() {
        return Err(CompileErrorType::EmptyAlternatives);
    }

    Ok(Rule {
        lhs: lhs.to_string(),
        alternatives,
    })
}

fn parse_value(text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CompileErrorType::InvalidValue(text.trim().to_string())),
    }
}

fn parse_axiom_symbol(arities: &Arities, (symbol, arguments): Call) -> Result<Symbol> {
    let mut current = Symbol::new(symbol);
    if arguments.is_empty() {
        return Ok(current);
    }

    let names = match parameter_names(arities, symbol, arguments.len()) {
        Ok(names) => names,
        Err(CompileErrorType::ArityMismatch { expected: 0, .. }) => {
            warn!(symbol = %symbol, "dropping values of a symbol without parameters");
            return Ok(current);
        }
        Err(error) => return Err(error),
    };

    for (name, argument) in names.into_iter().zip(arguments) {
        current.values.insert(name, parse_value(&argument)?);
    }

    Ok(current)
}

fn parse_axiom_entry(arities: &Arities, text: &str) -> Result<Vec<Symbol>> {
    let calls = parse_calls(lexer::lex_rule(text)?)?;
    if calls.is_empty() {
        return Err(CompileErrorType::EmptyAxiomEntry);
    }

    calls.into_iter().map(|call| parse_axiom_symbol(arities, call)).collect()
}

fn parse_axiom(arities: &Arities, axiom: &Axiom, file: &PathBuf) -> FileResult<Vec<Symbol>> {
    let entries = match axiom {
        Axiom::Tokens(tokens) => tokens.iter().map(String::as_str).collect_vec(),
        Axiom::Text(text) => vec![text.as_str()],
    };

    let (symbols, errors): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            parse_axiom_entry(arities, entry).map_err(|error| CompileError {
                location: Location::new(file.clone(), Entry::Axiom(index)),
                error,
            })
        })
        .partition_result();

    if errors.len() > 0 {
        return Err(errors);
    }

    Ok(symbols.into_iter().flatten().collect())
}

fn parse_system_in(description: &SystemDescription, file: &PathBuf) -> FileResult<ParsedSystem> {
    let arities = verifier::verify_signatures(&description.productions, file)?;

    let mut system = ParsedSystem {
        angle: description.angle,
        level: description.level,
        consts: description.consts.clone(),
        rules: Default::default(),
        axiom: Vec::new(),
        symbols: BTreeSet::new(),
        tropism: description.tropism,
    };

    let mut errors = Vec::new();
    for (lhs, production) in &description.productions {
        let Some(symbol) = lhs.chars().next() else { continue };

        match parse_production(&arities, lhs, production) {
            Ok(rule) => {
                debug!(lhs = %lhs, alternatives = rule.alternatives.len(), "parsed production");
                system.rules.insert(symbol, rule);
            }
            Err(error) => errors.push(CompileError {
                location: Location::production(file.clone(), lhs),
                error,
            }),
        }

        system.symbols.insert(symbol);
        for text in production.alternatives() {
            system.symbols.extend(text.chars().filter(|c| !c.is_whitespace()));
        }
    }

    match parse_axiom(&arities, &description.axiom, file) {
        Ok(axiom) => system.axiom = axiom,
        Err(axiom_errors) => errors.extend(axiom_errors),
    }

    if errors.len() > 0 {
        return Err(errors);
    }

    Ok(system)
}

pub fn parse_system(description: &SystemDescription) -> FileResult<ParsedSystem> {
    parse_system_in(description, &PathBuf::new())
}

fn parse_description(text: &str, file: &PathBuf) -> FileResult<ParsedSystem> {
    let description: SystemDescription = serde_json::from_str(text)
        .map_err(|e| vec![system_error(CompileErrorType::Json(e.to_string()), file)])?;

    parse_system_in(&description, file)
}

pub fn parse_system_str(text: &str) -> FileResult<ParsedSystem> {
    parse_description(text, &PathBuf::new())
}

pub fn parse_file(path: &PathBuf) -> FileResult<ParsedSystem> {
    let text = fs::read_to_string(path)
        .map_err(|e| vec![system_error(CompileErrorType::FileError(e), path)])?;

    parse_description(&text, path)
}

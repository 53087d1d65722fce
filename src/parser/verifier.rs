use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

use itertools::Itertools;

use super::CompileErrorType::{DuplicateProduction, InvalidSignature};
use super::{CompileError, CompileErrorType, FileResult, Location, Production};

// Parameter names of every symbol, in declaration order
pub type Arities = HashMap<char, Vec<String>>;

// Parameters the renderer reads even when no production declares them
pub fn default_arities() -> Arities {
    let mut arities = Arities::new();
    arities.insert('+', vec!["a".to_string()]);
    arities.insert('-', vec!["a".to_string()]);
    arities.insert('!', vec!["w".to_string()]);
    arities
}

fn is_parameter_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase()) && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Splits a left-hand side such as `A(s,t)` into its symbol and parameter
/// names. Anything three characters or shorter has no parameters.
pub fn parse_signature(lhs: &str) -> Result<(char, Vec<String>), CompileErrorType> {
    let invalid = || InvalidSignature(lhs.to_string());
    let chars = lhs.chars().collect_vec();

    let symbol = *chars.first().ok_or_else(invalid)?;
    if chars.len() <= 3 {
        return Ok((symbol, Vec::new()));
    }

    if chars[1] != '(' || chars[chars.len() - 1] != ')' {
        return Err(invalid());
    }

    let inner: String = chars[2..chars.len() - 1].iter().collect();
    let names = inner.split(',').map(|name| name.trim().to_string()).collect_vec();

    if !names.iter().all(|name| is_parameter_name(name)) || !names.iter().all_unique() {
        return Err(invalid());
    }

    Ok((symbol, names))
}

/// Checks every production's left-hand side and collects the parameter
/// names they declare, reporting every bad signature at once.
pub fn verify_signatures(productions: &BTreeMap<String, Production>, file: &PathBuf) -> FileResult<Arities> {
    let mut arities = default_arities();
    let mut defined = HashSet::new();
    let mut errors = Vec::new();

    for lhs in productions.keys() {
        let error = match parse_signature(lhs) {
            Ok((symbol, _)) if defined.contains(&symbol) => DuplicateProduction(symbol),
            Ok((symbol, names)) => {
                defined.insert(symbol);
                arities.insert(symbol, names);
                continue;
            }
            Err(error) => error,
        };

        errors.push(CompileError {
            location: Location::production(file.clone(), lhs),
            error,
        });
    }

    if errors.len() > 0 {
        Err(errors)
    } else {
        Ok(arities)
    }
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn parse_normal_signature() {
        let lines = vec!["F", "F()", "F(s)", "A(s, t)", "X(len,w2)"];
        let answers = vec![
            ('F', names(&[])),
            ('F', names(&[])),
            ('F', names(&["s"])),
            ('A', names(&["s", "t"])),
            ('X', names(&["len", "w2"])),
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(parse_signature(line).unwrap(), answer);
        }
    }

    #[test]
    fn parse_malformed_signature() {
        let lines = vec!["", "FFFF", "F(s,t", "F(S)", "F(s,)", "F(s,s)", "F[s]"];

        for line in lines {
            assert_eq!(parse_signature(line), Err(InvalidSignature(line.to_string())), "{}", line);
        }
    }

    #[test]
    fn verify_collects_arities() {
        let mut productions = BTreeMap::new();
        productions.insert("A(s,t)".to_string(), Production::Fixed("A(s,t)".to_string()));
        productions.insert("F".to_string(), Production::Fixed("FF".to_string()));
        productions.insert("-(x)".to_string(), Production::Fixed("+(x)".to_string()));

        let arities = verify_signatures(&productions, &PathBuf::new()).unwrap();
        assert_eq!(arities[&'A'], names(&["s", "t"]));
        assert_eq!(arities[&'F'], names(&[]));
        assert_eq!(arities[&'+'], names(&["a"]));
        assert_eq!(arities[&'-'], names(&["x"]));
        assert_eq!(arities[&'!'], names(&["w"]));
    }

    #[test]
    fn verify_reports_every_error() {
        let file = PathBuf::from("bad.json");
        let mut productions = BTreeMap::new();
        productions.insert("F".to_string(), Production::Fixed("FF".to_string()));
        productions.insert("F(s)".to_string(), Production::Fixed("F(s)".to_string()));
        productions.insert("G(S)".to_string(), Production::Fixed("G".to_string()));

        assert_eq!(verify_signatures(&productions, &file).unwrap_err(), vec![
            CompileError {
                location: Location::production(file.clone(), "F(s)"),
                error: DuplicateProduction('F'),
            },
            CompileError {
                location: Location::production(file.clone(), "G(S)"),
                error: InvalidSignature("G(S)".to_string()),
            },
        ]);
    }
}

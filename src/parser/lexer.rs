use itertools::{Itertools, PeekingNext};

use super::{CompileErrorType, Result};

#[derive(PartialEq, Debug, Clone)]
pub enum Token {
    Symbol(char),
    Open,
    Parameter(String),
    Comma,
    Close,
}

// Lexes the inside of a parameter list, after its open paren. Grouping
// parens inside a parameter are kept as part of its text.
pub fn lex_parameters(text: &mut impl Iterator<Item = char>) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut parameter = String::new();
    let mut depth = 0usize;

    for c in text.by_ref() {
        match c {
            ',' if depth == 0 => {
                tokens.push(Token::Parameter(std::mem::take(&mut parameter)));
                tokens.push(Token::Comma);
            }
            ')' if depth == 0 => {
                tokens.push(Token::Parameter(parameter));
                tokens.push(Token::Close);
                return Ok(tokens);
            }
            '(' => {
                depth += 1;
                parameter.push(c);
            }
            ')' => {
                depth -= 1;
                parameter.push(c);
            }
            _ => parameter.push(c),
        }
    }

    Err(CompileErrorType::MalformedRule("unterminated parameter list".to_string()))
}

pub fn lex_symbol(text: &mut impl PeekingNext<Item = char>) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    // Whitespace between symbols carries no meaning
    text.peeking_take_while(|c| c.is_whitespace()).for_each(drop);

    match text.next() {
        Some(')') => return Err(CompileErrorType::MalformedRule("unmatched `)`".to_string())),
        Some('(') => {
            tokens.push(Token::Open);
            tokens.extend(lex_parameters(text)?);
        }
        Some(c) => tokens.push(Token::Symbol(c)),
        None => {}
    }

    Ok(tokens)
}

pub fn lex_rule(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut chars = text.chars().peekable();
    while chars.peek().is_some() {
        tokens.extend(lex_symbol(&mut chars)?);
    }

    Ok(tokens)
}

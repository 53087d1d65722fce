/*
    This module evaluates the arithmetic in symbol parameters
*/

use std::collections::HashMap;

use thiserror::Error;

pub type Bindings = HashMap<String, f64>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    // A literal could not be read as a finite number
    #[error("Invalid number `{0}`")]
    InvalidNumber(String),
    #[error("Missing binding for variable `{0}`")]
    UndefinedVariable(String),
    // An operator was reached with fewer than two operands
    #[error("Operator `{0}` is missing an operand")]
    StackUnderflow(String),
    // Operands were left over after the last operator
    #[error("Missing operator")]
    MissingOperator,
    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,
}

pub type Result<T> = std::result::Result<T, ExprError>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn from_token(token: &str) -> Option<Operator> {
        match token {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Subtract),
            "*" => Some(Operator::Multiply),
            "/" => Some(Operator::Divide),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide => 2,
        }
    }

    // No guard on division: dividing by zero gives an infinity
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
        }
    }
}

fn is_variable(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_lowercase())
}

fn eval_operand(token: &str, bindings: &Bindings) -> Result<f64> {
    if is_variable(token) {
        return bindings
            .get(token)
            .copied()
            .ok_or_else(|| ExprError::UndefinedVariable(token.to_string()));
    }

    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ExprError::InvalidNumber(token.to_string())),
    }
}

/// Evaluates a token sequence in reverse polish notation.
///
/// An empty sequence has no value, which is `Ok(None)` rather than an error.
pub fn eval_rpn<S: AsRef<str>>(tokens: &[S], bindings: &Bindings) -> Result<Option<f64>> {
    let mut stack: Vec<f64> = Vec::new();

    for token in tokens.iter().map(AsRef::as_ref) {
        match Operator::from_token(token) {
            Some(op) => {
                let underflow = || ExprError::StackUnderflow(token.to_string());
                let right = stack.pop().ok_or_else(underflow)?;
                let left = stack.pop().ok_or_else(underflow)?;
                stack.push(op.apply(left, right));
            }
            None => stack.push(eval_operand(token, bindings)?),
        }
    }

    if stack.len() > 1 {
        return Err(ExprError::MissingOperator);
    }

    Ok(stack.pop())
}

/// Converts infix tokens to reverse polish notation.
///
/// Operands are passed through unchecked; `eval_rpn` validates them.
pub fn shunting_yard<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<String>> {
    let mut stack: Vec<&str> = Vec::new();
    let mut output = Vec::with_capacity(tokens.len());

    for token in tokens.iter().map(AsRef::as_ref) {
        if let Some(op) = Operator::from_token(token) {
            while let Some(&top) = stack.last() {
                match Operator::from_token(top) {
                    Some(top_op) if top_op.precedence() >= op.precedence() => {
                        output.push(top.to_string());
                        stack.pop();
                    }
                    _ => break,
                }
            }
            stack.push(token);
        } else if token == "(" {
            stack.push(token);
        } else if token == ")" {
            loop {
                match stack.pop() {
                    Some("(") => break,
                    Some(top) => output.push(top.to_string()),
                    None => return Err(ExprError::UnbalancedParentheses),
                }
            }
        } else {
            output.push(token.to_string());
        }
    }

    while let Some(top) = stack.pop() {
        if top == "(" {
            return Err(ExprError::UnbalancedParentheses);
        }
        output.push(top.to_string());
    }

    Ok(output)
}

/// Splits an infix expression into tokens by padding every operator and
/// parenthesis with whitespace. There is no unary minus, so `-1` comes out
/// as two tokens.
pub fn tokenize(expression: &str) -> Vec<String> {
    let mut padded = String::with_capacity(expression.len() * 2);
    for c in expression.chars() {
        if matches!(c, '(' | ')' | '*' | '+' | '/' | '-') {
            padded.push(' ');
            padded.push(c);
            padded.push(' ');
        } else {
            padded.push(c);
        }
    }

    padded.split_whitespace().map(str::to_string).collect()
}

/// Tokenizes an infix expression and converts it to reverse polish notation
pub fn compile(expression: &str) -> Result<Vec<String>> {
    shunting_yard(&tokenize(expression))
}

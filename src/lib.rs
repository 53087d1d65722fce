/*
    Parametric L-system parsing and rewriting
*/

pub mod error_handling;
pub mod expression;
pub mod generator;
pub mod lsystem;
pub mod parser;

pub use expression::{eval_rpn, shunting_yard, Bindings, ExprError};
pub use generator::{evolve, generate, FixedSequence, RandomSource};
pub use lsystem::{ParsedSystem, Production, Rule, Symbol, SymbolTemplate, SystemDescription};
pub use parser::{parse_file, parse_system, parse_system_str};

//! Expression language for `setz` write triggers.
//!
//! A narrowed script-expression grammar: literals, store variables, member
//! access, unary and binary operators, logical operators and the conditional.
//! Expressions never mutate the store.

mod eval;
mod lexer;
mod parser;

use crate::store::Store;
use crate::value::Value;
use log::error;
use thiserror::Error;

pub use parser::parse;

/// Why an expression could not be parsed or evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("SyntaxError: unexpected character `{found}` at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },
    #[error("SyntaxError: unterminated string literal")]
    UnterminatedString,
    #[error("SyntaxError: invalid number literal `{0}`")]
    InvalidNumber(String),
    #[error("SyntaxError: unexpected token `{found}`, expected {expected}")]
    UnexpectedToken { found: String, expected: &'static str },
    #[error("SyntaxError: unexpected end of input")]
    UnexpectedEnd,
    #[error("RangeError: expression nested deeper than {0} levels")]
    TooDeep(usize),
    #[error("ReferenceError: {0} is not defined")]
    NotDefined(String),
    #[error("TypeError: Cannot read properties of {base} (reading '{property}')")]
    NullProperty { base: &'static str, property: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
    TypeOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Lt,
    LtEq,
    Gt,
    GtEq,
    LooseEq,
    LooseNe,
    StrictEq,
    StrictNe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Coalesce,
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Variable(String),
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
}

/// Parse and evaluate `text` with the store as the variable scope.
/// Blank text evaluates to `undefined`.
///
/// # Errors
/// Returns the syntax or evaluation error that stopped the expression.
pub fn try_evaluate(text: &str, store: &Store) -> Result<Value, ExprError> {
    if text.trim().is_empty() {
        return Ok(Value::Undefined);
    }
    let expr = parse(text)?;
    eval::eval(&expr, store)
}

/// Like [`try_evaluate`] but failures are logged and yield `undefined`.
pub fn evaluate(text: &str, store: &Store) -> Value {
    try_evaluate(text, store).unwrap_or_else(|err| {
        error!("Gen-Z expression error: {err} in \"{text}\"");
        Value::Undefined
    })
}

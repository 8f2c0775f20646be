use super::lexer::{Token, tokenize};
use super::{BinaryOp, Expr, ExprError, LogicalOp, UnaryOp};
use crate::value::Value;

/// Deepest tree the parser will build. Parsing, evaluation and drop all
/// recurse over the tree, so the bound keeps them on the stack.
pub const MAX_DEPTH: usize = 256;

/// Parse expression text into a tree.
///
/// # Errors
/// Returns a syntax error for input outside the grammar, or
/// [`ExprError::TooDeep`] when nesting exceeds [`MAX_DEPTH`].
pub fn parse(source: &str) -> Result<Expr, ExprError> {
    let mut parser = Parser {
        tokens: tokenize(source)?,
        pos: 0,
        depth: 0,
    };
    let expr = parser.conditional()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(unexpected(token, "end of expression")),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Nesting of the node being parsed, counting operator chains.
    depth: usize,
}

fn describe(token: &Token) -> String {
    match token {
        Token::Number(number) => Value::Number(*number).to_js_string(),
        Token::Str(text) => format!("{text:?}"),
        Token::Ident(name) => name.clone(),
        Token::Punct(punct) => (*punct).to_owned(),
    }
}

fn unexpected(token: &Token, expected: &'static str) -> ExprError {
    ExprError::UnexpectedToken {
        found: describe(token),
        expected,
    }
}

fn boxed(expr: Expr) -> Box<Expr> {
    Box::new(expr)
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token, ExprError> {
        let token = self.peek().cloned().ok_or(ExprError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    /// Consume the punctuator if it is next.
    fn eat(&mut self, punct: &str) -> bool {
        if matches!(self.peek(), Some(Token::Punct(found)) if *found == punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: &'static str) -> Result<(), ExprError> {
        if self.eat(punct) {
            return Ok(());
        }
        match self.peek() {
            Some(token) => Err(unexpected(token, punct)),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    /// One level deeper, or `TooDeep` past the limit.
    fn descend(&mut self) -> Result<(), ExprError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExprError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `parse` one level deeper.
    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Expr, ExprError>,
    ) -> Result<Expr, ExprError> {
        self.descend()?;
        let expr = parse(self);
        self.depth -= 1;
        expr
    }

    /// Next punctuator among `ops`, consumed.
    fn eat_any<const N: usize>(&mut self, ops: [&'static str; N]) -> Option<&'static str> {
        let Some(Token::Punct(found)) = self.peek() else {
            return None;
        };
        let found = *found;
        let op = ops.into_iter().find(|op| *op == found)?;
        self.pos += 1;
        Some(op)
    }

    fn conditional(&mut self) -> Result<Expr, ExprError> {
        self.nested(Self::conditional_body)
    }

    fn conditional_body(&mut self) -> Result<Expr, ExprError> {
        let test = self.logical_or()?;
        if !self.eat("?") {
            return Ok(test);
        }
        let consequent = self.conditional()?;
        self.expect(":")?;
        let alternate = self.conditional()?;
        Ok(Expr::Conditional {
            test: boxed(test),
            consequent: boxed(consequent),
            alternate: boxed(alternate),
        })
    }

    fn logical_or(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.logical_and()?;
        let mut links = 0;
        while let Some(op) = self.eat_any(["||", "??"]) {
            self.descend()?;
            links += 1;
            let right = self.logical_and()?;
            left = Expr::Logical {
                op: if op == "||" {
                    LogicalOp::Or
                } else {
                    LogicalOp::Coalesce
                },
                left: boxed(left),
                right: boxed(right),
            };
        }
        self.depth -= links;
        Ok(left)
    }

    fn logical_and(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.equality()?;
        let mut links = 0;
        while self.eat("&&") {
            self.descend()?;
            links += 1;
            let right = self.equality()?;
            left = Expr::Logical {
                op: LogicalOp::And,
                left: boxed(left),
                right: boxed(right),
            };
        }
        self.depth -= links;
        Ok(left)
    }

    fn equality(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.relational()?;
        let mut links = 0;
        while let Some(op) = self.eat_any(["===", "!==", "==", "!="]) {
            self.descend()?;
            links += 1;
            let op = match op {
                "===" => BinaryOp::StrictEq,
                "!==" => BinaryOp::StrictNe,
                "==" => BinaryOp::LooseEq,
                _ => BinaryOp::LooseNe,
            };
            left = self.binary(op, left, Self::relational)?;
        }
        self.depth -= links;
        Ok(left)
    }

    fn relational(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.additive()?;
        let mut links = 0;
        while let Some(op) = self.eat_any(["<=", ">=", "<", ">"]) {
            self.descend()?;
            links += 1;
            let op = match op {
                "<=" => BinaryOp::LtEq,
                ">=" => BinaryOp::GtEq,
                "<" => BinaryOp::Lt,
                _ => BinaryOp::Gt,
            };
            left = self.binary(op, left, Self::additive)?;
        }
        self.depth -= links;
        Ok(left)
    }

    fn additive(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.multiplicative()?;
        let mut links = 0;
        while let Some(op) = self.eat_any(["+", "-"]) {
            self.descend()?;
            links += 1;
            let op = if op == "+" { BinaryOp::Add } else { BinaryOp::Sub };
            left = self.binary(op, left, Self::multiplicative)?;
        }
        self.depth -= links;
        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.unary()?;
        let mut links = 0;
        while let Some(op) = self.eat_any(["*", "/", "%"]) {
            self.descend()?;
            links += 1;
            let op = match op {
                "*" => BinaryOp::Mul,
                "/" => BinaryOp::Div,
                _ => BinaryOp::Rem,
            };
            left = self.binary(op, left, Self::unary)?;
        }
        self.depth -= links;
        Ok(left)
    }

    fn binary(
        &mut self,
        op: BinaryOp,
        left: Expr,
        operand: fn(&mut Self) -> Result<Expr, ExprError>,
    ) -> Result<Expr, ExprError> {
        let right = operand(self)?;
        Ok(Expr::Binary {
            op,
            left: boxed(left),
            right: boxed(right),
        })
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        let op = if let Some(punct) = self.eat_any(["!", "-", "+"]) {
            match punct {
                "!" => UnaryOp::Not,
                "-" => UnaryOp::Negate,
                _ => UnaryOp::Plus,
            }
        } else if matches!(self.peek(), Some(Token::Ident(name)) if name == "typeof") {
            self.pos += 1;
            UnaryOp::TypeOf
        } else {
            return self.member();
        };
        let operand = self.nested(Self::unary)?;
        Ok(Expr::Unary {
            op,
            operand: boxed(operand),
        })
    }

    fn member(&mut self) -> Result<Expr, ExprError> {
        let mut object = self.primary()?;
        let mut links = 0;
        loop {
            if matches!(self.peek(), Some(Token::Punct("." | "["))) {
                self.descend()?;
                links += 1;
            }
            if self.eat(".") {
                let property = match self.next()? {
                    Token::Ident(name) => name,
                    other => return Err(unexpected(&other, "property name")),
                };
                object = Expr::Member {
                    object: boxed(object),
                    property: boxed(Expr::Literal(Value::String(property))),
                };
            } else if self.eat("[") {
                let property = self.conditional()?;
                self.expect("]")?;
                object = Expr::Member {
                    object: boxed(object),
                    property: boxed(property),
                };
            } else {
                self.depth -= links;
                return Ok(object);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        match self.next()? {
            Token::Number(number) => Ok(Expr::Literal(Value::Number(number))),
            Token::Str(text) => Ok(Expr::Literal(Value::String(text))),
            Token::Ident(name) => Ok(match name.as_str() {
                "true" => Expr::Literal(Value::Boolean(true)),
                "false" => Expr::Literal(Value::Boolean(false)),
                "null" => Expr::Literal(Value::Null),
                _ => Expr::Variable(name),
            }),
            Token::Punct("(") => {
                let inner = self.conditional()?;
                self.expect(")")?;
                Ok(inner)
            }
            other => Err(unexpected(&other, "expression")),
        }
    }
}

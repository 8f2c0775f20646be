use super::{BinaryOp, Expr, ExprError, LogicalOp, UnaryOp};
use crate::store::Store;
use crate::value::Value;
use core::cmp::Ordering;

/// Global names that resolve when no store variable shadows them.
fn global(name: &str) -> Option<Value> {
    match name {
        "undefined" => Some(Value::Undefined),
        "NaN" => Some(Value::Number(f64::NAN)),
        "Infinity" => Some(Value::Number(f64::INFINITY)),
        _ => None,
    }
}

fn lookup(name: &str, store: &Store) -> Result<Value, ExprError> {
    store
        .get(name)
        .cloned()
        .or_else(|| global(name))
        .ok_or_else(|| ExprError::NotDefined(name.to_owned()))
}

pub fn eval(expr: &Expr, store: &Store) -> Result<Value, ExprError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Variable(name) => lookup(name, store),
        Expr::Member { object, property } => {
            let base = eval(object, store)?;
            let key = eval(property, store)?.to_js_string();
            base.property(&key).ok_or_else(|| ExprError::NullProperty {
                base: if matches!(base, Value::Null) {
                    "null"
                } else {
                    "undefined"
                },
                property: key,
            })
        }
        Expr::Unary { op, operand } => {
            // `typeof missing` is "undefined", not a reference error.
            if *op == UnaryOp::TypeOf
                && let Expr::Variable(name) = operand.as_ref()
                && lookup(name, store).is_err()
            {
                return Ok(Value::from("undefined"));
            }
            let value = eval(operand, store)?;
            Ok(match op {
                UnaryOp::Not => Value::Boolean(!value.is_truthy()),
                UnaryOp::Negate => Value::Number(-value.to_number()),
                UnaryOp::Plus => Value::Number(value.to_number()),
                UnaryOp::TypeOf => Value::from(value.type_of()),
            })
        }
        Expr::Binary { op, left, right } => {
            let left = eval(left, store)?;
            let right = eval(right, store)?;
            Ok(binary(*op, &left, &right))
        }
        Expr::Logical { op, left, right } => {
            let left = eval(left, store)?;
            let short_circuit = match op {
                LogicalOp::And => !left.is_truthy(),
                LogicalOp::Or => left.is_truthy(),
                LogicalOp::Coalesce => !left.is_nullish(),
            };
            if short_circuit {
                Ok(left)
            } else {
                eval(right, store)
            }
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            if eval(test, store)?.is_truthy() {
                eval(consequent, store)
            } else {
                eval(alternate, store)
            }
        }
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::Add => {
            let left = left.to_primitive();
            let right = right.to_primitive();
            if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
                Value::String(format!("{}{}", left.to_js_string(), right.to_js_string()))
            } else {
                Value::Number(left.to_number() + right.to_number())
            }
        }
        BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::Rem => Value::Number(left.to_number() % right.to_number()),
        BinaryOp::Lt => Value::Boolean(left.compare(right) == Some(Ordering::Less)),
        BinaryOp::Gt => Value::Boolean(left.compare(right) == Some(Ordering::Greater)),
        BinaryOp::LtEq => Value::Boolean(matches!(
            left.compare(right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::GtEq => Value::Boolean(matches!(
            left.compare(right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOp::LooseEq => Value::Boolean(left.loose_eq(right)),
        BinaryOp::LooseNe => Value::Boolean(!left.loose_eq(right)),
        BinaryOp::StrictEq => Value::Boolean(left.strict_eq(right)),
        BinaryOp::StrictNe => Value::Boolean(!left.strict_eq(right)),
    }
}

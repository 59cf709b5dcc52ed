use std::fmt;
use std::str::FromStr;

use crate::builder::BuildError;

/// The primitive types of the language. There are no others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    Integer,
    Float,
    Text,
}

impl Type {
    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Integer | Type::Float)
    }

    /// Source-level spelling, as used in declarations.
    pub fn keyword(self) -> &'static str {
        match self {
            Type::Integer => "int",
            Type::Float => "float",
            Type::Text => "string",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The set of supported binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,   // %
    Eq,    // ==
    NotEq, // !=
    Lt,    // <
    LtE,   // <=
    Gt,    // >
    GtE,   // >=
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::LtE => "<=",
            BinOp::Gt => ">",
            BinOp::GtE => ">=",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::LtE | BinOp::Gt | BinOp::GtE
        )
    }

    /// Division and modulo need a runtime zero check.
    pub fn is_guarded(self) -> bool {
        matches!(self, BinOp::Div | BinOp::Mod)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for BinOp {
    type Err = BuildError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        let op = match symbol {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "%" => BinOp::Mod,
            "==" => BinOp::Eq,
            "!=" => BinOp::NotEq,
            "<" => BinOp::Lt,
            "<=" => BinOp::LtE,
            ">" => BinOp::Gt,
            ">=" => BinOp::GtE,
            _ => {
                return Err(BuildError::UnknownOperator {
                    symbol: symbol.to_string(),
                })
            }
        };
        Ok(op)
    }
}

/// Promotion rule for binary operators.
///
/// Returns the result type, or `None` when the operator cannot be applied to
/// this pair of operand types:
///
/// - comparisons need identical operand types and produce an `Integer` flag;
/// - `+` with any `Text` operand is concatenation and needs both sides `Text`;
/// - arithmetic over numbers yields `Float` if either side is `Float`.
pub fn binary_result_type(op: BinOp, left: Type, right: Type) -> Option<Type> {
    if op.is_comparison() {
        return (left == right).then_some(Type::Integer);
    }
    match (left, right) {
        (Type::Text, Type::Text) if op == BinOp::Add => Some(Type::Text),
        (Type::Text, _) | (_, Type::Text) => None,
        (Type::Float, _) | (_, Type::Float) => Some(Type::Float),
        (Type::Integer, Type::Integer) => Some(Type::Integer),
    }
}

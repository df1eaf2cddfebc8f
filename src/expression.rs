//! Integer expressions built around literals
//!
//! There are no negative literals: `-2147483648` is a unary minus applied
//! to the literal `2147483648`. The literal keeps its own ladder type; the
//! expression narrows after negation.

use crate::literal::{IntegerValue, LiteralToken, LiteralTypeResolver, Suffix};
use crate::node::Node;
use crate::types::{IntegerType, TargetModel};
use crate::{Error, Result};
use num_bigint::BigInt;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOp {
    Minus,
    Plus,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(UnaryOp::Minus),
            '+' => Some(UnaryOp::Plus),
            _ => None,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An integer literal node with its resolved type and exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub node: Node,
    pub suffix: Suffix,
    pub ty: IntegerType,
    pub value: IntegerValue,
}

impl Literal {
    pub fn from_token(text: &str, resolver: &LiteralTypeResolver) -> Result<Self> {
        let text = text.trim();
        let token = LiteralToken::parse(text)?;
        let resolved = resolver.resolve_split(&token)?;
        Ok(Self {
            node: Node::new(text).with_code(text),
            suffix: token.suffix,
            ty: resolved.ty,
            value: resolved.value,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryOperator {
    pub node: Node,
    pub operator: UnaryOp,
    pub input: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Literal(Literal),
    Unary(UnaryOperator),
}

impl Expression {
    /// Build an expression from text such as `-2147483648` or `- +0x10u`.
    ///
    /// Each leading `-`/`+` becomes a unary operator around the rest; what
    /// remains must be a single integer literal token.
    pub fn parse_integer(text: &str, resolver: &LiteralTypeResolver) -> Result<Self> {
        let text = text.trim();
        let mut operators = Vec::new();
        let mut rest = text;

        while let Some(c) = rest.chars().next() {
            if let Some(op) = UnaryOp::from_char(c) {
                operators.push((op, rest));
                rest = rest[c.len_utf8()..].trim_start();
            } else {
                break;
            }
        }

        if rest.is_empty() {
            return Err(Error::MalformedLiteral(format!("no literal in '{}'", text)));
        }

        let mut expression = Expression::Literal(Literal::from_token(rest, resolver)?);
        for (operator, code) in operators.into_iter().rev() {
            expression = Expression::Unary(UnaryOperator {
                node: Node::new(operator.as_str()).with_code(code),
                operator,
                input: Box::new(expression),
            });
        }
        Ok(expression)
    }

    pub fn node(&self) -> &Node {
        match self {
            Expression::Literal(literal) => &literal.node,
            Expression::Unary(unary) => &unary.node,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Expression::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn as_unary(&self) -> Option<&UnaryOperator> {
        match self {
            Expression::Unary(unary) => Some(unary),
            _ => None,
        }
    }

    /// The literal at the bottom of the operator chain
    pub fn innermost_literal(&self) -> &Literal {
        match self {
            Expression::Literal(literal) => literal,
            Expression::Unary(unary) => unary.input.innermost_literal(),
        }
    }

    /// Exact mathematical value, before any unsigned wrap-around
    pub fn value(&self) -> BigInt {
        match self {
            Expression::Literal(literal) => literal.value.to_bigint(),
            Expression::Unary(unary) => match unary.operator {
                UnaryOp::Minus => -unary.input.value(),
                UnaryOp::Plus => unary.input.value(),
            },
        }
    }

    /// Type of the expression.
    ///
    /// A negation is re-checked against the signed ladder up to the rank of
    /// the underlying literal and takes the narrowest type that holds the
    /// value. If none does, the literal's own type is kept. Operands with an
    /// explicit unsigned suffix keep their type.
    pub fn ty(&self, model: TargetModel) -> IntegerType {
        match self {
            Expression::Literal(literal) => literal.ty,
            Expression::Unary(unary) => {
                let operand = unary.input.ty(model);
                let literal = self.innermost_literal();
                if unary.operator == UnaryOp::Plus || literal.suffix.is_unsigned() {
                    return operand;
                }
                let value = self.value();
                IntegerType::signed()
                    .iter()
                    .copied()
                    .filter(|ty| ty.rank() <= literal.ty.rank())
                    .find(|ty| ty.fits(&value, model))
                    .unwrap_or(literal.ty)
            }
        }
    }

    /// Value after conversion to [`Expression::ty`]; unsigned types wrap
    /// negative values modulo 2^width.
    pub fn converted_value(&self, model: TargetModel) -> BigInt {
        let value = self.value();
        let ty = self.ty(model);
        if ty.is_unsigned() && value < BigInt::from(0u8) {
            let modulus = BigInt::from(1u8) << model.width(ty.rank());
            ((value % &modulus) + &modulus) % &modulus
        } else {
            value
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(literal) => write!(f, "{}", literal.node.name),
            Expression::Unary(unary) => write!(f, "{}{}", unary.operator, unary.input),
        }
    }
}

//! Integer literal typing
//!
//! A literal token is split into digits, radix and suffix (`token`), then
//! matched against the promotion ladder of its radix/suffix (`resolver`).
//! Values that overflow every fixed-width type are kept exactly.

pub mod resolver;
pub mod token;

pub use resolver::{LiteralTypeResolver, ResolvedLiteral};
pub use token::{LiteralToken, Radix, Suffix};

use num_bigint::{BigInt, BigUint};
use serde::{Serialize, Serializer};
use std::fmt;

/// Exact value of an integer literal.
///
/// The representation is chosen by magnitude alone, so two values are
/// equal exactly when they are numerically equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IntegerValue {
    /// Fits a 32-bit signed integer
    Int(i32),
    /// Fits a 64-bit signed integer
    Long(i64),
    /// Anything larger
    Big(BigUint),
}

impl IntegerValue {
    pub fn from_magnitude(magnitude: BigUint) -> Self {
        if let Ok(v) = i32::try_from(&magnitude) {
            IntegerValue::Int(v)
        } else if let Ok(v) = i64::try_from(&magnitude) {
            IntegerValue::Long(v)
        } else {
            IntegerValue::Big(magnitude)
        }
    }

    pub fn to_biguint(&self) -> BigUint {
        match self {
            IntegerValue::Int(v) => BigUint::from(*v as u32),
            IntegerValue::Long(v) => BigUint::from(*v as u64),
            IntegerValue::Big(v) => v.clone(),
        }
    }

    pub fn to_bigint(&self) -> BigInt {
        BigInt::from(self.to_biguint())
    }

}

// Literal values are never negative; the native variants only ever hold
// non-negative numbers.
impl From<u32> for IntegerValue {
    fn from(value: u32) -> Self {
        Self::from_magnitude(BigUint::from(value))
    }
}

impl From<u64> for IntegerValue {
    fn from(value: u64) -> Self {
        Self::from_magnitude(BigUint::from(value))
    }
}

impl From<BigUint> for IntegerValue {
    fn from(value: BigUint) -> Self {
        Self::from_magnitude(value)
    }
}

impl fmt::Display for IntegerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegerValue::Int(v) => write!(f, "{}", v),
            IntegerValue::Long(v) => write!(f, "{}", v),
            IntegerValue::Big(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for IntegerValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            IntegerValue::Int(v) => serializer.serialize_i32(*v),
            IntegerValue::Long(v) => serializer.serialize_i64(*v),
            IntegerValue::Big(v) => serializer.serialize_str(&v.to_string()),
        }
    }
}

//! Semantic types assigned to graph nodes
//!
//! Integer types form a fixed ladder ordered by rank. Their widths depend
//! on the [`TargetModel`] the program is compiled for.

use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Integer types, narrowest rank first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegerType {
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
}

/// Integer rank, shared by the signed and unsigned variant of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Int,
    Long,
    LongLong,
}

impl IntegerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegerType::Int => "int",
            IntegerType::UnsignedInt => "unsigned int",
            IntegerType::Long => "long",
            IntegerType::UnsignedLong => "unsigned long",
            IntegerType::LongLong => "long long",
            IntegerType::UnsignedLongLong => "unsigned long long",
        }
    }

    pub fn all() -> &'static [IntegerType] {
        &[
            IntegerType::Int,
            IntegerType::UnsignedInt,
            IntegerType::Long,
            IntegerType::UnsignedLong,
            IntegerType::LongLong,
            IntegerType::UnsignedLongLong,
        ]
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            IntegerType::UnsignedInt | IntegerType::UnsignedLong | IntegerType::UnsignedLongLong
        )
    }

    pub fn rank(&self) -> Rank {
        match self {
            IntegerType::Int | IntegerType::UnsignedInt => Rank::Int,
            IntegerType::Long | IntegerType::UnsignedLong => Rank::Long,
            IntegerType::LongLong | IntegerType::UnsignedLongLong => Rank::LongLong,
        }
    }

    /// Signed types in ladder order
    pub fn signed() -> &'static [IntegerType] {
        &[IntegerType::Int, IntegerType::Long, IntegerType::LongLong]
    }

    /// Smallest representable value under `model`
    pub fn min_value(&self, model: TargetModel) -> BigInt {
        if self.is_unsigned() {
            BigInt::from(0u8)
        } else {
            -(BigInt::from(1u8) << (model.width(self.rank()) - 1))
        }
    }

    /// Largest representable value under `model`
    pub fn max_value(&self, model: TargetModel) -> BigInt {
        let bits = model.width(self.rank());
        let bits = if self.is_unsigned() { bits } else { bits - 1 };
        (BigInt::from(1u8) << bits) - BigInt::from(1u8)
    }

    /// Check whether a non-negative magnitude is representable
    pub fn fits_magnitude(&self, magnitude: &BigUint, model: TargetModel) -> bool {
        self.fits(&BigInt::from(magnitude.clone()), model)
    }

    /// Check whether a signed value is representable
    pub fn fits(&self, value: &BigInt, model: TargetModel) -> bool {
        *value >= self.min_value(model) && *value <= self.max_value(model)
    }
}

impl FromStr for IntegerType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.as_str() {
            "int" | "signed" | "signed int" => Ok(IntegerType::Int),
            "unsigned" | "unsigned int" => Ok(IntegerType::UnsignedInt),
            "long" | "long int" | "signed long" => Ok(IntegerType::Long),
            "unsigned long" | "unsigned long int" => Ok(IntegerType::UnsignedLong),
            "long long" | "long long int" | "signed long long" => Ok(IntegerType::LongLong),
            "unsigned long long" | "unsigned long long int" => Ok(IntegerType::UnsignedLongLong),
            _ => Err(crate::Error::UnknownKind(format!("integer type: {}", s))),
        }
    }
}

impl fmt::Display for IntegerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Data model of the compilation target; fixes the width of each rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetModel {
    /// int 32, long 64, long long 64 (Linux, macOS)
    #[default]
    Lp64,
    /// int 32, long 32, long long 64 (Windows)
    Llp64,
}

impl TargetModel {
    /// Bit width of a rank
    pub fn width(&self, rank: Rank) -> u32 {
        match (self, rank) {
            (_, Rank::Int) => 32,
            (TargetModel::Lp64, Rank::Long) => 64,
            (TargetModel::Llp64, Rank::Long) => 32,
            (_, Rank::LongLong) => 64,
        }
    }
}

impl FromStr for TargetModel {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lp64" | "unix" => Ok(TargetModel::Lp64),
            "llp64" | "windows" | "win64" => Ok(TargetModel::Llp64),
            _ => Err(crate::Error::UnknownKind(format!("target model: {}", s))),
        }
    }
}

impl fmt::Display for TargetModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetModel::Lp64 => write!(f, "lp64"),
            TargetModel::Llp64 => write!(f, "llp64"),
        }
    }
}

/// Type attached to a declaration or expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Type {
    Integer(IntegerType),
    /// Any type the core does not model, by its spelled name
    Named(String),
    /// Not known yet, e.g. `auto` before the initializer is seen
    #[default]
    Unknown,
}

impl Type {
    pub fn as_integer(&self) -> Option<IntegerType> {
        match self {
            Type::Integer(ty) => Some(*ty),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }
}

impl From<IntegerType> for Type {
    fn from(ty: IntegerType) -> Self {
        Type::Integer(ty)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Integer(ty) => write!(f, "{}", ty),
            Type::Named(name) => write!(f, "{}", name),
            Type::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

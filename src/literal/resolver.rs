//! Literal type resolution - the integer promotion ladder
//!
//! Resolution algorithm:
//! 1. Parse the digits into an exact magnitude
//! 2. Pick the candidate ladder for (radix, suffix)
//! 3. First candidate whose range holds the magnitude wins
//! 4. If none does, the literal is `unsigned long long` and keeps its
//!    exact value, however large

use super::token::{normalize_digits, LiteralToken, Radix, Suffix};
use super::IntegerValue;
use crate::types::{IntegerType, TargetModel};
use crate::{Error, Result};
use num_bigint::BigUint;
use serde::Serialize;

use IntegerType::*;

/// Type and exact value of a resolved literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedLiteral {
    pub ty: IntegerType,
    pub value: IntegerValue,
}

impl ResolvedLiteral {
    pub fn new(ty: IntegerType, value: impl Into<IntegerValue>) -> Self {
        Self {
            ty,
            value: value.into(),
        }
    }
}

/// Maps literal tokens to their semantic type and value.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralTypeResolver {
    model: TargetModel,
}

impl LiteralTypeResolver {
    pub fn new(model: TargetModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> TargetModel {
        self.model
    }

    /// Resolve a pre-split literal.
    ///
    /// Only digits that are invalid for `radix` fail; every well-formed
    /// literal resolves.
    pub fn resolve(&self, digits: &str, radix: Radix, suffix: Suffix) -> Result<ResolvedLiteral> {
        let digits = normalize_digits(digits, radix)
            .map_err(|reason| Error::MalformedLiteral(format!("{} in '{}'", reason, digits)))?;
        let magnitude = BigUint::parse_bytes(digits.as_bytes(), radix.value()).ok_or_else(|| {
            Error::MalformedLiteral(format!("cannot parse '{}' in base {}", digits, radix.value()))
        })?;

        let ty = candidates(radix, suffix)
            .iter()
            .copied()
            .find(|ty| ty.fits_magnitude(&magnitude, self.model))
            .unwrap_or(UnsignedLongLong);

        if !ty.fits_magnitude(&magnitude, self.model) {
            tracing::warn!(
                "integer literal {} is too large for {}, keeping its exact value",
                magnitude,
                ty
            );
        }

        Ok(ResolvedLiteral {
            ty,
            value: IntegerValue::from_magnitude(magnitude),
        })
    }

    /// Split a source token and resolve it
    pub fn resolve_token(&self, text: &str) -> Result<ResolvedLiteral> {
        let token = LiteralToken::parse(text)?;
        self.resolve_split(&token)
    }

    pub fn resolve_split(&self, token: &LiteralToken) -> Result<ResolvedLiteral> {
        self.resolve(&token.digits, token.radix, token.suffix)
    }
}

/// Candidate types for a literal, narrowest first.
///
/// Non-decimal literals admit the unsigned variant of each rank before
/// moving to the next rank; decimal literals without `u` stay signed.
pub fn candidates(radix: Radix, suffix: Suffix) -> &'static [IntegerType] {
    match (suffix, radix.is_decimal()) {
        (Suffix::None, true) => &[Int, Long, LongLong],
        (Suffix::None, false) => &[
            Int,
            UnsignedInt,
            Long,
            UnsignedLong,
            LongLong,
            UnsignedLongLong,
        ],
        (Suffix::L, true) => &[Long, LongLong],
        (Suffix::L, false) => &[Long, UnsignedLong, LongLong, UnsignedLongLong],
        (Suffix::LL, true) => &[LongLong],
        (Suffix::LL, false) => &[LongLong, UnsignedLongLong],
        (Suffix::U, _) => &[UnsignedInt, UnsignedLong, UnsignedLongLong],
        (Suffix::UL, _) => &[UnsignedLong, UnsignedLongLong],
        (Suffix::ULL, _) => &[UnsignedLongLong],
    }
}

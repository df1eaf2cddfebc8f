//! Splitting an integer literal token into digits, radix and suffix

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric base of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Radix {
    Decimal,
    Octal,
    Hexadecimal,
    Binary,
}

impl Radix {
    pub fn value(&self) -> u32 {
        match self {
            Radix::Decimal => 10,
            Radix::Octal => 8,
            Radix::Hexadecimal => 16,
            Radix::Binary => 2,
        }
    }

    pub fn is_decimal(&self) -> bool {
        matches!(self, Radix::Decimal)
    }
}

/// Integer suffix category. Letter case and order do not matter in
/// source (`uL`, `LU` and `ul` are all `UL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suffix {
    #[default]
    None,
    L,
    LL,
    U,
    UL,
    ULL,
}

impl Suffix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Suffix::None => "",
            Suffix::L => "l",
            Suffix::LL => "ll",
            Suffix::U => "u",
            Suffix::UL => "ul",
            Suffix::ULL => "ull",
        }
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(self, Suffix::U | Suffix::UL | Suffix::ULL)
    }

    /// Classify the suffix characters of a token
    pub fn parse(text: &str) -> Result<Self> {
        let lower = text.to_ascii_lowercase();
        let unsigned = lower.matches('u').count();
        let longs = lower.matches('l').count();

        let malformed = || Error::MalformedLiteral(format!("invalid integer suffix '{}'", text));

        if unsigned > 1 || longs > 2 || unsigned + longs != lower.len() {
            return Err(malformed());
        }
        // `lul` is not a long long suffix
        if longs == 2 && !lower.contains("ll") {
            return Err(malformed());
        }

        Ok(match (unsigned, longs) {
            (0, 0) => Suffix::None,
            (0, 1) => Suffix::L,
            (0, 2) => Suffix::LL,
            (1, 0) => Suffix::U,
            (1, 1) => Suffix::UL,
            _ => Suffix::ULL,
        })
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A literal token split into its parts. `digits` holds no prefix, no
/// suffix and no digit separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiteralToken {
    pub digits: String,
    pub radix: Radix,
    pub suffix: Suffix,
}

impl LiteralToken {
    pub fn new(digits: impl Into<String>, radix: Radix, suffix: Suffix) -> Self {
        Self {
            digits: digits.into(),
            radix,
            suffix,
        }
    }

    /// Split a source token such as `0x2AuLL` or `1'000'000`.
    ///
    /// Tokens never carry a sign; a leading `-` belongs to a unary operator.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let body = text.trim_end_matches(['u', 'U', 'l', 'L']);
        let suffix = Suffix::parse(&text[body.len()..])?;

        let (radix, digits) = if let Some(rest) = strip_prefix_ci(body, "0x") {
            (Radix::Hexadecimal, rest)
        } else if let Some(rest) = strip_prefix_ci(body, "0b") {
            (Radix::Binary, rest)
        } else if body.len() > 1 && body.starts_with('0') {
            (Radix::Octal, &body[1..])
        } else {
            (Radix::Decimal, body)
        };

        let digits = normalize_digits(digits, radix)
            .map_err(|reason| Error::MalformedLiteral(format!("{} in '{}'", reason, text)))?;

        Ok(Self {
            digits,
            radix,
            suffix,
        })
    }
}

impl fmt::Display for LiteralToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.radix {
            Radix::Decimal => "",
            Radix::Octal => "0",
            Radix::Hexadecimal => "0x",
            Radix::Binary => "0b",
        };
        write!(f, "{}{}{}", prefix, self.digits, self.suffix)
    }
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len()..)
    } else {
        None
    }
}

/// Drop `'` separators and check every digit against the radix
pub(crate) fn normalize_digits(digits: &str, radix: Radix) -> std::result::Result<String, String> {
    let cleaned: String = digits.chars().filter(|c| *c != '\'').collect();
    if cleaned.is_empty() {
        return Err("missing digits".to_string());
    }
    if let Some(bad) = cleaned.chars().find(|c| !c.is_digit(radix.value())) {
        return Err(format!("digit '{}' is not valid in base {}", bad, radix.value()));
    }
    Ok(cleaned)
}

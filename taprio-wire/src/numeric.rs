//! Integer token parsing with the literal rules of the `tc` command line.

use crate::error::{Error, Result};

/// How the digits of an unsigned token are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    /// Plain decimal.
    Decimal,
    /// Hexadecimal, with an optional `0x` prefix.
    Hex,
    /// `0x` prefix for hexadecimal, leading `0` for octal, decimal otherwise.
    Auto,
}

/// Parse an unsigned token that must fit in `T`.
///
/// `field` names the value in the error.
pub fn parse_unsigned<T>(field: &'static str, token: &str, radix: Radix) -> Result<T>
where
    T: TryFrom<u64>,
{
    let malformed = || Error::MalformedNumericToken { field, token: token.to_owned() };

    let hex = strip_hex_prefix(token);
    let (digits, radix) = match radix {
        Radix::Decimal => (token, 10),
        Radix::Hex => (hex.unwrap_or(token), 16),
        Radix::Auto => match hex {
            Some(digits) => (digits, 16),
            None if token.len() > 1 && token.starts_with('0') => (&token[1..], 8),
            None => (token, 10),
        },
    };

    // from_str_radix accepts a leading '+', tc does not.
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(malformed());
    }

    let value = u64::from_str_radix(digits, radix).map_err(|_| malformed())?;
    T::try_from(value).map_err(|_| malformed())
}

/// Parse a signed decimal token.
pub fn parse_signed(field: &'static str, token: &str) -> Result<i64> {
    token.parse().map_err(|_| Error::MalformedNumericToken { field, token: token.to_owned() })
}

fn strip_hex_prefix(token: &str) -> Option<&str> {
    token.strip_prefix("0x").or_else(|| token.strip_prefix("0X"))
}

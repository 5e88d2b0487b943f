//! Exact conversion between human decimal amounts and on-chain base units.
//!
//! Every chain adapter converts user input through this module, so the rules
//! here are the single source of truth for what counts as a valid amount.

use alloy::primitives::U256;
use thiserror::Error;

/// Errors produced while converting amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Input was empty or not a plain decimal number.
    #[error("invalid amount: {0} failed to parse to number")]
    Parse(String),

    /// Input was a negative, non-zero number.
    #[error("amount cannot be negative")]
    Negative,

    /// Input carries more significant fractional digits than the multiplier supports.
    #[error("exceeded maximum denominator precision, amount: {amount}, precision: .{precision}")]
    Precision { amount: String, precision: usize },

    /// Multiplier is not `"1"` followed by zeros.
    #[error("invalid denom multiplier: {0}")]
    Multiplier(String),

    /// Scaled value does not fit in 256 bits.
    #[error("amount exceeds maximum representable value: {0}")]
    Overflow(String),
}

/// A decimal string split into its parts.
///
/// `integer` has no leading zeros (but is never empty) and `fraction` has no
/// trailing zeros, so two inputs with the same numeric value parse equal.
#[derive(Debug, PartialEq, Eq)]
struct Decimal {
    negative: bool,
    integer: String,
    fraction: String,
}

impl Decimal {
    fn parse(input: &str) -> Result<Self, AmountError> {
        let invalid = || AmountError::Parse(input.to_string());

        let (negative, body) = match input.as_bytes().first() {
            Some(b'-') => (true, &input[1..]),
            Some(b'+') => (false, &input[1..]),
            Some(_) => (false, input),
            None => return Err(invalid()),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(invalid());
        }

        let integer = match int_part.trim_start_matches('0') {
            "" => "0".to_string(),
            trimmed => trimmed.to_string(),
        };
        let fraction = frac_part.trim_end_matches('0').to_string();

        Ok(Self {
            negative,
            integer,
            fraction,
        })
    }

    fn is_zero(&self) -> bool {
        self.integer == "0" && self.fraction.is_empty()
    }

    /// Canonical rendering; negative zero renders as `0`.
    fn normalized(&self) -> String {
        let mut out = String::new();
        if self.negative && !self.is_zero() {
            out.push('-');
        }
        out.push_str(&self.integer);
        if !self.fraction.is_empty() {
            out.push('.');
            out.push_str(&self.fraction);
        }
        out
    }
}

/// Number of fractional digits a multiplier supports (`"1000"` → 3).
fn multiplier_decimals(denom_multiplier: &str) -> Result<usize, AmountError> {
    match denom_multiplier.as_bytes().split_first() {
        Some((b'1', zeros)) if zeros.iter().all(|b| *b == b'0') => Ok(zeros.len()),
        _ => Err(AmountError::Multiplier(denom_multiplier.to_string())),
    }
}

/// Convert a human decimal amount into base units.
///
/// # Arguments
/// * `amount` - Decimal string such as `"1.2"`
/// * `denom_multiplier` - `"1"` followed by N zeros, fixed per chain
///
/// # Errors
/// Parse errors first, then the sign check, then the multiplier and
/// precision checks.
pub fn macro_to_denom_amount(amount: &str, denom_multiplier: &str) -> Result<U256, AmountError> {
    let decimal = Decimal::parse(amount)?;
    if decimal.negative && !decimal.is_zero() {
        return Err(AmountError::Negative);
    }

    let decimals = multiplier_decimals(denom_multiplier)?;
    if decimal.fraction.len() > decimals {
        return Err(AmountError::Precision {
            amount: decimal.normalized(),
            precision: decimal.fraction.len(),
        });
    }

    let mut digits = String::with_capacity(decimal.integer.len() + decimals);
    digits.push_str(&decimal.integer);
    digits.push_str(&decimal.fraction);
    digits.extend(std::iter::repeat('0').take(decimals - decimal.fraction.len()));

    U256::from_str_radix(&digits, 10).map_err(|_| AmountError::Overflow(amount.to_string()))
}

/// Convert base units back into a normalized human decimal amount.
///
/// The result never has trailing fractional zeros: `1200000000` with a
/// `1e9` multiplier renders as `"1.2"`.
pub fn denom_to_macro_amount(amount: U256, denom_multiplier: &str) -> Result<String, AmountError> {
    let decimals = multiplier_decimals(denom_multiplier)?;
    let digits = amount.to_string();
    if decimals == 0 {
        return Ok(digits);
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        Ok(integer.to_string())
    } else {
        Ok(format!("{}.{}", integer, fraction))
    }
}

/// Canonical form of a decimal amount, used to compare round trips.
pub fn normalize_amount(amount: &str) -> Result<String, AmountError> {
    Decimal::parse(amount).map(|d| d.normalized())
}

//! Amount conversion subsystem.
//!
//! # Data Flow
//! ```text
//! caller ("1.2", "1000000000")
//!     → converter.rs (parse, sign check, precision check)
//!     → U256 base amount (wei, lamports, planck, ...)
//!     → chain adapter tx builders
//! ```
//!
//! # Design Decisions
//! - Decimal strings are parsed digit by digit; no floating point anywhere
//! - Multipliers are `"1"` followed by N zeros, N = supported fractional digits
//! - Excess fractional digits are only tolerated when they are all zero

pub mod converter;

pub use converter::{
    denom_to_macro_amount, macro_to_denom_amount, normalize_amount, AmountError,
};

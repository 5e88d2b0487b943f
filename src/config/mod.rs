//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SdkConfig (validated, immutable)
//!     → adapters, poll policy, signer accounts
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Secrets (mnemonics) are never part of the file; they come from the environment

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ChainConfig, ChainKind, ConfirmationConfig, ObservabilityConfig, SdkConfig, SignerConfig};

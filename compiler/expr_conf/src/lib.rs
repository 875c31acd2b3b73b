//! Compile configuration.
//!
//! - `Value`: the host values an embedding hands over as an environment
//! - `env`: derives the root Nature the checker resolves identifiers against
//! - `Config`: everything the external checker and compiler are told about a
//!   compilation, starting from that root Nature

mod config;
mod env;
mod error;
mod value;

pub use config::Config;
pub use env::{empty_env, env};
pub use error::ConfigError;
pub use value::{Record, Value};

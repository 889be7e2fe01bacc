//! Demo driver for the Rick and Morty API core.
//!
//! Wires `rickmorty-core` to a real network: environment configuration, a
//! ureq-backed `Transport`, and the concurrent run that produces the single
//! output line.

pub mod config;
pub mod driver;
pub mod transport;

pub use config::{Config, ConfigError};
pub use driver::{run, Report};
pub use transport::UreqTransport;

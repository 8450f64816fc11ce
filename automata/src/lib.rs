//! Loader and simulator for deterministic finite automata over the binary
//! alphabet, configured with a sectioned plain-text format.

pub mod automatan;
pub mod loader;

pub use automatan::{Bit, Limits, State, dfa::Dfa};
pub use loader::{ConfigError, Context};

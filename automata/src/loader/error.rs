use std::{io, path::PathBuf};

use thiserror::Error;

use crate::automatan::Bit;

/// Fatal problems found while loading a configuration. Any of these
/// invalidates the whole load; no partially built automaton is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot open {}: {source}", path.display())]
    CannotOpenSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("too many states (more than {max})")]
    TooManyStates { max: usize },

    #[error("state name {name:?} is longer than {max} bytes")]
    NameTooLong { name: String, max: usize },

    #[error("invalid transition symbol {symbol:?} on line {line}, expected '0' or '1'")]
    InvalidSymbol { symbol: char, line: usize },

    #[error("final state {state:?} was not declared as a state")]
    UndeclaredFinal { state: String },

    #[error("no states defined")]
    NoStates,

    #[error("no initial state defined")]
    NoInitialState,

    #[error("state {state:?} has no transition on '{symbol}'")]
    IncompleteTransitions { state: String, symbol: Bit },
}

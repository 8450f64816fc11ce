use std::path::Path;

use crate::automatan::{Limits, dfa::Dfa};
use crate::loader::log::{LogEntry, LogSink, Logs};

pub mod ast;
pub mod error;
pub mod inputs;
pub mod log;
pub mod parser;

pub use error::ConfigError;

#[macro_export]
macro_rules! maker {
    (arr: $($expr:expr),*) => {
        [$($expr),*]
    };
    (str: $first:literal, $($remainder:literal),+) => {
        concat!($crate::maker!(str: $first), " | ", $crate::maker!(str: $($remainder),*))
    };
    (str: $first:literal) => {
        concat!("'",$first,"'")
    };
}

#[macro_export]
macro_rules! finals_header {
    ($ident: ident) => {
      $crate::maker!($ident: "Estados de aceptación", "acceptance states", "Acceptance states")
    };
}

#[macro_export]
macro_rules! initial_header {
    ($ident: ident) => {
      $crate::maker!($ident: "Estado inicial", "initial state", "Initial state")
    };
}

#[macro_export]
macro_rules! transitions_header {
    ($ident: ident) => {
      $crate::maker!($ident: "Transiciones", "transitions", "Transitions")
    };
}

#[macro_export]
macro_rules! states_header {
    ($ident: ident) => {
      $crate::maker!($ident: "Estados", "states", "States")
    };
}

pub const FINALS_HEADERS: &[&str] = &finals_header!(arr);
pub const INITIAL_HEADERS: &[&str] = &initial_header!(arr);
pub const TRANSITIONS_HEADERS: &[&str] = &transitions_header!(arr);
pub const STATES_HEADERS: &[&str] = &states_header!(arr);

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span(pub usize, pub usize);
impl Span {
    pub fn join(&self, end: Span) -> Span {
        Span(self.0, end.1)
    }
}

#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub struct Spanned<T>(pub T, pub Span);

/// Source text being loaded together with the diagnostics raised against it.
pub struct Context<'a> {
    logs: Logs,
    src: &'a str,
}

impl<'a> LogSink for Context<'a> {
    fn emit(&mut self, entry: LogEntry) -> &mut LogEntry {
        self.logs.emit(entry)
    }
}

impl<'a> Context<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            logs: Logs::new(),
            src,
        }
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    pub fn logs(&self) -> &Logs {
        &self.logs
    }

    /// 1-based line number containing the start of `span`.
    pub fn line_number(&self, span: Span) -> usize {
        self.src
            .get(..span.0)
            .map(|s| s.matches('\n').count())
            .unwrap_or(0)
            + 1
    }

    pub fn contains_errors(&self) -> bool {
        self.logs.contains_errors()
    }

    pub fn into_logs(self) -> Logs {
        self.logs
    }
}

pub fn read_source(path: impl AsRef<Path>) -> Result<String, ConfigError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| ConfigError::CannotOpenSource {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a configuration from its full text, returning the automaton and
/// the diagnostics raised while reading it.
pub fn load(src: &str, limits: Limits) -> Result<(Dfa, Logs), (ConfigError, Logs)> {
    let mut ctx = Context::new(src);
    match Dfa::load(&mut ctx, limits) {
        Ok(dfa) => Ok((dfa, ctx.into_logs())),
        Err(err) => Err((err, ctx.into_logs())),
    }
}

/// Builds an automaton from already split configuration lines.
pub fn parse_lines<I>(lines: I) -> Result<Dfa, ConfigError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let src = lines.into_iter().fold(String::new(), |mut src, line| {
        src.push_str(line.as_ref());
        src.push('\n');
        src
    });
    Dfa::load(&mut Context::new(&src), Limits::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_vocabulary() {
        assert!(FINALS_HEADERS.contains(&"Estados de aceptación"));
        assert_eq!(STATES_HEADERS[0], "Estados");
        assert_eq!(
            transitions_header!(str),
            "'Transiciones' | 'transitions' | 'Transitions'"
        );
    }

    #[test]
    fn line_numbers() {
        let ctx = Context::new("a\nbb\n\nc");
        assert_eq!(ctx.line_number(Span(0, 1)), 1);
        assert_eq!(ctx.line_number(Span(2, 4)), 2);
        assert_eq!(ctx.line_number(Span(6, 7)), 4);
        assert_eq!(ctx.line_number(Span(7, 7)), 4);
    }

    #[test]
    fn missing_source_file() {
        let err = read_source("/definitely/not/here/Conf.txt").unwrap_err();
        assert!(matches!(err, ConfigError::CannotOpenSource { .. }));
        assert!(err.to_string().starts_with("cannot open /definitely/not/here/Conf.txt"));
    }
}

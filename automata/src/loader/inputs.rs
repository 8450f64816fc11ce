use std::fmt::Display;

use crate::automatan::dfa::Dfa;

/// Line content standing for the empty string.
pub const EMPTY_TOKEN: &str = "E";
/// How the empty string is printed back.
pub const EMPTY_DISPLAY: &str = "ε";

/// One string to evaluate, taken from a line of the strings file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Case<'a> {
    /// 1-based line number in the strings file.
    pub line: usize,
    pub input: &'a str,
}

impl<'a> Case<'a> {
    pub fn display(&self) -> &'a str {
        if self.input.is_empty() {
            EMPTY_DISPLAY
        } else {
            self.input
        }
    }
}

/// Non-blank lines of `src`, trimmed, with `E` mapped to the empty string.
/// Internal whitespace is kept and evaluated literally.
pub fn cases(src: &str) -> impl Iterator<Item = Case<'_>> {
    src.lines().enumerate().filter_map(|(i, line)| {
        let line = line.trim();
        match line {
            "" => None,
            EMPTY_TOKEN => Some(Case {
                line: i + 1,
                input: "",
            }),
            input => Some(Case { line: i + 1, input }),
        }
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict<'a> {
    pub case: Case<'a>,
    pub accepted: bool,
}

impl Display for Verdict<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = if self.accepted { "Acepta" } else { "NO acepta" };
        write!(f, "{} -> {result}", self.case.display())
    }
}

pub fn evaluate<'a>(dfa: &'a Dfa, src: &'a str) -> impl Iterator<Item = Verdict<'a>> {
    cases(src).map(move |case| Verdict {
        case,
        accepted: dfa.run(case.input),
    })
}

use super::Spanned;

/// Section selected by the most recent `#` header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    None,
    States,
    Initial,
    Finals,
    Transitions,
}

/// A meaningful configuration line, already classified by its section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line<'a> {
    States(Vec<Spanned<&'a str>>),
    /// The initial state name followed by any extra tokens on the line.
    Initial(Spanned<&'a str>, Vec<Spanned<&'a str>>),
    Finals(Vec<Spanned<&'a str>>),
    Transition {
        from: Spanned<&'a str>,
        symbol: Spanned<char>,
        to: Spanned<&'a str>,
    },
}

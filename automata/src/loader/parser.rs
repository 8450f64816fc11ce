use crate::loader::log::LogSink;
use crate::loader::{
    Context, FINALS_HEADERS, INITIAL_HEADERS, STATES_HEADERS, Span, TRANSITIONS_HEADERS,
};
use crate::{finals_header, initial_header, states_header, transitions_header};

use super::Spanned as S;
use super::ast::*;

/// Splits the configuration into section-classified lines. Blank lines,
/// headers and lines that carry nothing for the current section are consumed
/// here; ignorable noise is reported as warnings.
pub struct Parser<'a, 'b> {
    src: &'a str,
    offset: usize,
    section: Section,
    ctx: &'b mut Context<'a>,
}

impl<'a, 'b> Iterator for Parser<'a, 'b> {
    type Item = S<Line<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_element()
    }
}

/// Picks the section for a header line. The acceptance keywords must be
/// tested before the generic states keyword since they contain it.
pub fn section_of(header: &str) -> Section {
    let has = |keys: &[&str]| keys.iter().any(|key| header.contains(key));
    if has(FINALS_HEADERS) {
        Section::Finals
    } else if has(INITIAL_HEADERS) {
        Section::Initial
    } else if has(TRANSITIONS_HEADERS) {
        Section::Transitions
    } else if has(STATES_HEADERS) {
        Section::States
    } else {
        Section::None
    }
}

/// Whitespace separated tokens of `line`, with spans offset by `base`.
pub fn tokens(line: &str, base: usize) -> Vec<S<&str>> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in line.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                out.push(S(&line[s..i], Span(base + s, base + i)));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push(S(&line[s..], Span(base + s, base + line.len())));
    }
    out
}

impl<'a, 'b> Parser<'a, 'b> {
    pub fn new(ctx: &'b mut Context<'a>) -> Self {
        Parser {
            src: ctx.src(),
            offset: 0,
            section: Section::None,
            ctx,
        }
    }

    /// Next raw line, trimmed, with the span it covers in the source.
    fn next_line(&mut self) -> Option<(&'a str, Span)> {
        let rest = self.src.get(self.offset..).filter(|r| !r.is_empty())?;
        let len = rest.find('\n').map(|i| i + 1).unwrap_or(rest.len());
        let raw = &rest[..len];
        let start = self.offset + (raw.len() - raw.trim_start().len());
        self.offset += len;

        let line = raw.trim();
        Some((line, Span(start, start + line.len())))
    }

    fn header(&mut self, line: &'a str, span: Span) {
        self.section = section_of(line);
        if self.section == Section::None {
            self.ctx
                .emit_info("unknown section header, following lines are ignored", span)
                .emit_help_locless(concat!(
                    "section headers contain one of ",
                    finals_header!(str),
                    " | ",
                    initial_header!(str),
                    " | ",
                    transitions_header!(str),
                    " | ",
                    states_header!(str)
                ));
        }
    }

    fn transition(&mut self, line: &'a str, span: Span) -> Option<Line<'a>> {
        match &tokens(line, span.0)[..] {
            [from, S(symbol, symbol_span), to] if symbol.chars().count() == 1 => {
                let symbol = symbol.chars().next()?;
                Some(Line::Transition {
                    from: *from,
                    symbol: S(symbol, *symbol_span),
                    to: *to,
                })
            }
            _ => {
                self.ctx
                    .emit_warning("not a transition, ignoring line", span)
                    .emit_help_locless("transitions are written as: <from> <0|1> <to>");
                None
            }
        }
    }

    pub fn next_element(&mut self) -> Option<S<Line<'a>>> {
        loop {
            let (line, span) = self.next_line()?;
            if line.is_empty() {
                continue;
            }
            if line.starts_with('#') {
                self.header(line, span);
                continue;
            }

            let element = match self.section {
                Section::None => {
                    self.ctx.emit_warning("line outside of any section, ignoring", span);
                    None
                }
                Section::States => Some(Line::States(tokens(line, span.0))),
                Section::Initial => {
                    let mut tokens = tokens(line, span.0).into_iter();
                    tokens
                        .next()
                        .map(|name| Line::Initial(name, tokens.collect()))
                }
                Section::Finals => Some(Line::Finals(tokens(line, span.0))),
                Section::Transitions => self.transition(line, span),
            };

            if let Some(element) = element {
                return Some(S(element, span));
            }
        }
    }
}

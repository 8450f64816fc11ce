use std::fmt::Display;

use crate::loader::Span;

#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Logs {
    logs: Vec<LogEntry>,
    has_error: bool,
}

pub trait LogSink {
    fn emit(&mut self, entry: LogEntry) -> &mut LogEntry;

    fn emit_error_locless(&mut self, msg: impl Into<String>) -> &mut LogEntry {
        self.emit(LogEntry::new(LogLevel::Error, msg, None))
    }

    fn emit_error(&mut self, msg: impl Into<String>, span: Span) -> &mut LogEntry {
        self.emit(LogEntry::new(LogLevel::Error, msg, Some(span)))
    }

    fn emit_warning(&mut self, msg: impl Into<String>, span: Span) -> &mut LogEntry {
        self.emit(LogEntry::new(LogLevel::Warning, msg, Some(span)))
    }

    fn emit_info(&mut self, msg: impl Into<String>, span: Span) -> &mut LogEntry {
        self.emit(LogEntry::new(LogLevel::Info, msg, Some(span)))
    }

    fn emit_help_locless(&mut self, msg: impl Into<String>) -> &mut LogEntry {
        self.emit(LogEntry::new(LogLevel::Help, msg, None))
    }
}

impl LogSink for Logs {
    fn emit(&mut self, entry: LogEntry) -> &mut LogEntry {
        self.has_error |= entry.level == LogLevel::Error;
        self.logs.push(entry);
        let last = self.logs.len() - 1;
        &mut self.logs[last]
    }
}

impl Logs {
    pub fn new() -> Self {
        Self {
            logs: Vec::new(),
            has_error: false,
        }
    }

    pub fn contains_errors(&self) -> bool {
        self.has_error
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.logs.iter().filter(|e| e.level == level).count()
    }

    pub fn displayable_with<'a>(
        &'a self,
        src: &'a str,
    ) -> impl Iterator<Item = LogEntryDisplay<'a>> {
        self.logs.iter().map(|entry| LogEntryDisplay {
            src,
            entry,
            color: true,
        })
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn into_entries(self) -> impl Iterator<Item = LogEntry> {
        self.logs.into_iter()
    }
}

impl Default for Logs {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Help,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Help => "help",
        }
    }
}

#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LogEntry {
    pub message: String,
    pub span: Option<Span>,
    pub level: LogLevel,
    pub child: Option<Box<LogEntry>>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            message: message.into(),
            span,
            level,
            child: None,
        }
    }

    /// This entry followed by its attached notes.
    pub fn chain(&self) -> impl Iterator<Item = &LogEntry> {
        std::iter::successors(Some(self), |entry| entry.child.as_deref())
    }
}

impl LogSink for LogEntry {
    fn emit(&mut self, entry: LogEntry) -> &mut LogEntry {
        self.child.insert(Box::new(entry))
    }
}

pub struct LogEntryDisplay<'a> {
    src: &'a str,
    entry: &'a LogEntry,
    color: bool,
}

impl<'a> LogEntryDisplay<'a> {
    /// Renders without ANSI escapes.
    pub fn plain(self) -> Self {
        Self {
            color: false,
            ..self
        }
    }
}

impl<'a> Display for LogEntryDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const RESET: &str = "\x1b[0;22m";
        const BOLD: &str = "\x1b[1m";
        const RED: &str = "\x1b[31m";
        const GREEN: &str = "\x1b[32m";
        const YELLOW: &str = "\x1b[33m";
        const CYAN: &str = "\x1b[36m";

        let paint = |code: &'static str| if self.color { code } else { "" };
        let (reset, bold, cyan) = (paint(RESET), paint(BOLD), paint(CYAN));

        for entry in self.entry.chain() {
            let color = match entry.level {
                LogLevel::Help => paint(GREEN),
                LogLevel::Info => cyan,
                LogLevel::Warning => paint(YELLOW),
                LogLevel::Error => paint(RED),
            };
            writeln!(
                f,
                "{bold}{color}{}{reset}{bold}: {}{reset}",
                entry.level.as_str(),
                entry.message
            )?;

            let Some(span) = entry.span else {
                continue;
            };

            // configuration spans never cross a line, so one excerpt is enough
            let start = self
                .src
                .get(..span.0)
                .and_then(|s| s.rfind('\n'))
                .map(|v| v + 1)
                .unwrap_or(0);
            let end = self
                .src
                .get(span.0..)
                .and_then(|s| s.find('\n'))
                .map(|v| v + span.0)
                .unwrap_or(self.src.len());
            let line = self.src.get(start..end).unwrap_or("").trim_end_matches('\r');
            let number = self.src.get(..start).unwrap_or("").matches('\n').count() + 1;
            let padding = number.to_string().len();

            writeln!(f, "{bold}{cyan}{number:>padding$} | {reset}{line}")?;
            write!(f, "{bold}{cyan}{:>padding$} | ", "")?;
            let mut index = start;
            for c in line.chars() {
                if index >= span.1 {
                    break;
                }
                let mark = if index >= span.0 { '^' } else { ' ' };
                let mark = if c == '\t' && mark == ' ' { '\t' } else { mark };
                write!(f, "{mark}")?;
                index += c.len_utf8();
            }
            writeln!(f, "{reset}")?;
        }

        Ok(())
    }
}

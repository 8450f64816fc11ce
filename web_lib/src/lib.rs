use automata::{
    Limits,
    loader::{self, inputs, log},
};

use wasm_bindgen::prelude::wasm_bindgen;

#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info = "info",
    Warning = "warning",
    Error = "error",
    Help = "help",
}

#[wasm_bindgen(getter_with_clone)]
#[derive(Clone, Debug)]
pub struct CompileLog {
    pub level: LogLevel,
    pub message: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

#[wasm_bindgen(getter_with_clone)]
pub struct CompileResult {
    pub log: Vec<CompileLog>,
    pub ansi_log: String,
    pub machine: Option<String>,
    pub table: Option<String>,
}

fn utf16_offset(input: &str, byte: usize) -> usize {
    input
        .get(..byte)
        .unwrap_or(input)
        .chars()
        .map(char::len_utf16)
        .sum()
}

/// Loads `input` as a configuration, returning diagnostics with UTF-16
/// offsets for the editor and the automaton as JSON on success.
#[wasm_bindgen]
pub fn compile(input: &str) -> CompileResult {
    let (dfa, logs) = match loader::load(input, Limits::default()) {
        Ok((dfa, logs)) => (Some(dfa), logs),
        Err((_, logs)) => (None, logs),
    };

    use std::fmt::Write;
    let ansi_log = logs.displayable_with(input).fold(String::new(), |mut s, e| {
        _ = write!(&mut s, "{e}");
        s
    });

    let log = logs
        .into_entries()
        .map(|e| CompileLog {
            level: match e.level {
                log::LogLevel::Info => LogLevel::Info,
                log::LogLevel::Warning => LogLevel::Warning,
                log::LogLevel::Error => LogLevel::Error,
                log::LogLevel::Help => LogLevel::Help,
            },
            message: e.message,
            start: e.span.map(|span| utf16_offset(input, span.0)),
            end: e.span.map(|span| utf16_offset(input, span.1)),
        })
        .collect();

    CompileResult {
        log,
        ansi_log,
        machine: dfa.as_ref().and_then(|dfa| serde_json::to_string(dfa).ok()),
        table: dfa.as_ref().map(|dfa| dfa.table().to_string()),
    }
}

/// Verdict lines for every string in `strings`, or nothing when the
/// configuration does not load.
#[wasm_bindgen]
pub fn evaluate(config: &str, strings: &str) -> Vec<String> {
    let Ok((dfa, _)) = loader::load(config, Limits::default()) else {
        return Vec::new();
    };
    inputs::evaluate(&dfa, strings)
        .map(|verdict| verdict.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONF: &str = "# Estados\nq0\n# Estado inicial\nq0\n# Estados de aceptación\nq0\n# Transiciones\nq0 0 q0\nq0 1 q0\n";

    #[test]
    fn compile_reports_machine() {
        let result = compile(CONF);
        assert!(result.log.is_empty());
        assert!(result.machine.unwrap().contains("\"initial\":\"q0\""));
        assert!(result.table.unwrap().contains("[q0+"));
    }

    #[test]
    fn compile_reports_utf16_spans() {
        let result = compile("# Estado inicial\nñ\n# Transiciones\nñ x ñ\n");
        assert!(result.machine.is_none());
        let error = &result.log[0];
        assert_eq!(error.level, LogLevel::Error);
        // "ñ" is two bytes but one UTF-16 unit
        assert_eq!(error.start, Some(36));
        assert_eq!(error.end, Some(37));
    }

    #[test]
    fn evaluate_lines() {
        assert_eq!(
            evaluate(CONF, "E\n01\n0a\n"),
            ["ε -> Acepta", "01 -> Acepta", "0a -> NO acepta"]
        );
        assert!(evaluate("# Estados\n", "0\n").is_empty());
    }
}

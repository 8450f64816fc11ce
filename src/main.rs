use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use automata::{
    Dfa, Limits,
    loader::{self, inputs},
};
use clap::Parser;

/// Loads a DFA over {0,1} and reports which strings it accepts.
#[derive(Parser, Debug)]
#[command(name = "afd", version, about)]
struct Cli {
    /// Automaton configuration.
    #[arg(long, short, default_value = "Conf.txt")]
    config: PathBuf,

    /// Strings to evaluate, one per line. `E` stands for the empty string.
    #[arg(long, short, default_value = "Cadenas.txt")]
    strings: PathBuf,

    /// Do not print the transition table.
    #[arg(long)]
    no_table: bool,

    /// Print the loaded automaton as JSON instead of the table.
    #[arg(long, conflicts_with = "no_table")]
    json: bool,

    /// Largest number of states a configuration may declare.
    #[arg(long, default_value_t = Limits::DEFAULT.max_states)]
    max_states: usize,

    /// Longest accepted state name, in bytes.
    #[arg(long, default_value_t = Limits::DEFAULT.max_name_len)]
    max_name_len: usize,

    /// Reject acceptance states that were not declared before.
    #[arg(long)]
    strict_finals: bool,
}

impl Cli {
    fn limits(&self) -> Limits {
        Limits {
            max_states: self.max_states,
            max_name_len: self.max_name_len,
            strict_finals: self.strict_finals,
        }
    }
}

fn report(out: &mut impl Write, dfa: &Dfa, strings: &str) -> std::io::Result<()> {
    for verdict in inputs::evaluate(dfa, strings) {
        tracing::debug!(line = verdict.case.line, accepted = verdict.accepted, "evaluated");
        writeln!(out, "{verdict}")?;
    }
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let src = match loader::read_source(&cli.config) {
        Ok(src) => src,
        Err(err) => {
            tracing::error!("{err}");
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::debug!(path = %cli.config.display(), bytes = src.len(), "configuration read");

    let dfa = match loader::load(&src, cli.limits()) {
        Ok((dfa, logs)) => {
            for log in logs.displayable_with(&src) {
                eprint!("{log}")
            }
            dfa
        }
        Err((err, logs)) => {
            for log in logs.displayable_with(&src) {
                eprint!("{log}")
            }
            tracing::error!("{}: {err}", cli.config.display());
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::info!(states = dfa.len(), initial = dfa.name(dfa.initial()), "automaton loaded");

    let mut out = std::io::stdout().lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &dfa)?;
        writeln!(out)?;
    } else if !cli.no_table {
        write!(out, "{}", dfa.table())?;
    }

    let strings = match loader::read_source(&cli.strings) {
        Ok(strings) => strings,
        Err(err) => {
            tracing::error!("{err}");
            return Ok(ExitCode::FAILURE);
        }
    };
    report(&mut out, &dfa, &strings)?;

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["afd"]);
        assert_eq!(cli.config, PathBuf::from("Conf.txt"));
        assert_eq!(cli.strings, PathBuf::from("Cadenas.txt"));
        assert_eq!(cli.limits(), Limits::default());
    }

    #[test]
    fn cli_limits() {
        let cli = Cli::parse_from(["afd", "--max-states", "8", "--strict-finals", "-c", "x.txt"]);
        assert_eq!(cli.limits().max_states, 8);
        assert!(cli.limits().strict_finals);
        assert_eq!(cli.config, PathBuf::from("x.txt"));
    }

    #[test]
    fn verdicts_one_per_line() {
        let (dfa, _) = loader::load(
            "# Estados\nq0 q1 q2\n# Estado inicial\nq0\n# Estados de aceptación\nq2\n# Transiciones\nq0 0 q1\nq0 1 q0\nq1 0 q2\nq1 1 q0\nq2 0 q2\nq2 1 q2\n",
            Limits::default(),
        )
        .unwrap();
        let mut out = Vec::new();
        report(&mut out, &dfa, "01\n0100\n\nE\n2\n00 1\n").unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "01 -> NO acepta\n0100 -> Acepta\nε -> NO acepta\n2 -> NO acepta\n00 1 -> NO acepta\n"
        );
    }
}

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use super::*;

use crate::loader::{
    ConfigError, Context, Span, Spanned,
    ast::Line,
    log::{LogEntry, LogSink},
    parser::Parser,
};

/// A validated, total DFA over `{0,1}`. Built once by [`Dfa::load`] and never
/// mutated afterwards.
#[derive(Clone, Debug)]
pub struct Dfa {
    initial: State,
    names: StateMap<String>,
    finals: StateMap<bool>,
    transitions: StateMap<BitMap<State>>,
    lookup: HashMap<String, State>,
}

impl Dfa {
    pub fn initial(&self) -> State {
        self.initial
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// States in declaration order.
    pub fn states(&self) -> impl Iterator<Item = State> + '_ {
        self.names.entries().map(|(state, _)| state)
    }

    pub fn state(&self, name: &str) -> Option<State> {
        self.lookup.get(name).copied()
    }

    pub fn name(&self, state: State) -> &str {
        &self.names[state]
    }

    pub fn is_final(&self, state: State) -> bool {
        self.finals[state]
    }

    pub fn delta(&self, state: State, bit: Bit) -> State {
        self.transitions[state][bit]
    }

    /// Accepts `input` iff every character is `0`/`1` and the run ends in a
    /// final state.
    pub fn run(&self, input: &str) -> bool {
        let mut simulator = Simulator::begin(self, input);
        loop {
            match simulator.step() {
                SimulatorResult::Pending => {}
                SimulatorResult::Reject => return false,
                SimulatorResult::Accept => return true,
            }
        }
    }

    /// Every state visited while reading `input`, starting with the initial
    /// state. `None` if `input` contains a character outside the alphabet.
    pub fn trace(&self, input: &str) -> Option<Vec<State>> {
        let mut path = vec![self.initial];
        let mut state = self.initial;
        for c in input.chars() {
            state = self.delta(state, Bit::from_char(c)?);
            path.push(state);
        }
        Some(path)
    }

    pub fn table(&self) -> TableDisplay<'_> {
        TableDisplay { dfa: self }
    }

    /// Compiles the configuration held by `ctx`. Every failure is also
    /// reported to `ctx` as an error diagnostic.
    pub fn load(ctx: &mut Context<'_>, limits: Limits) -> Result<Dfa, ConfigError> {
        let items = Parser::new(ctx).collect::<Vec<_>>();
        Self::compile(items, ctx, limits)
    }

    pub fn compile<'a>(
        items: impl IntoIterator<Item = Spanned<Line<'a>>>,
        ctx: &mut Context<'a>,
        limits: Limits,
    ) -> Result<Dfa, ConfigError> {
        let mut builder = Builder::new(limits);
        let result = items
            .into_iter()
            .try_for_each(|item| builder.line(item, ctx))
            .and_then(|()| builder.finish(ctx));

        if let Err(err) = &result {
            report(ctx, err, builder.failed_at);
        }
        result
    }
}

fn report(ctx: &mut Context<'_>, err: &ConfigError, span: Option<Span>) {
    let entry: &mut LogEntry = match span {
        Some(span) => ctx.emit_error(err.to_string(), span),
        None => ctx.emit_error_locless(err.to_string()),
    };
    match err {
        ConfigError::InvalidSymbol { .. } => {
            entry.emit_help_locless("transition symbols must be '0' or '1'");
        }
        ConfigError::IncompleteTransitions { state, symbol } => {
            entry.emit_help_locless(format!("add: {state} {symbol} <state>"));
        }
        ConfigError::NoInitialState => {
            entry.emit_help_locless("add an '# Estado inicial' section naming one state");
        }
        _ => {}
    }
}

/// Working tables for one load. Discarded on failure.
struct Builder {
    limits: Limits,
    initial: Option<State>,
    names: StateMap<String>,
    definitions: StateMap<Span>,
    finals: StateMap<bool>,
    transitions: StateMap<BitMap<Option<State>>>,
    lookup: HashMap<String, State>,
    failed_at: Option<Span>,
}

impl Builder {
    fn new(limits: Limits) -> Self {
        Self {
            limits,
            initial: None,
            names: StateMap::new(),
            definitions: StateMap::new(),
            finals: StateMap::new(),
            transitions: StateMap::new(),
            lookup: HashMap::new(),
            failed_at: None,
        }
    }

    fn fail<T>(&mut self, span: Span, err: ConfigError) -> Result<T, ConfigError> {
        self.failed_at = Some(span);
        Err(err)
    }

    /// Registers `name` if it is new. Re-registering leaves flags untouched.
    fn register(&mut self, Spanned(name, span): Spanned<&str>) -> Result<State, ConfigError> {
        if let Some(state) = self.lookup.get(name) {
            return Ok(*state);
        }
        if name.len() > self.limits.max_name_len {
            return self.fail(
                span,
                ConfigError::NameTooLong {
                    name: name.to_string(),
                    max: self.limits.max_name_len,
                },
            );
        }
        let max = self.limits.max_states.min(State::MAX_COUNT);
        if self.names.len() >= max {
            return self.fail(span, ConfigError::TooManyStates { max });
        }

        let state = self.names.push(name.to_string());
        self.definitions.push(span);
        self.finals.push(false);
        self.transitions.push(BitMap([None, None]));
        self.lookup.insert(name.to_string(), state);
        Ok(state)
    }

    fn line(
        &mut self,
        Spanned(line, span): Spanned<Line<'_>>,
        ctx: &mut Context<'_>,
    ) -> Result<(), ConfigError> {
        match line {
            Line::States(names) => {
                for name in names {
                    self.register(name)?;
                }
            }
            Line::Initial(name, extra) => {
                let state = self.register(name)?;
                if let Some(previous) = self.initial.replace(state) {
                    ctx.emit_warning(
                        format!(
                            "initial state redefined, '{}' replaces '{}'",
                            name.0, self.names[previous]
                        ),
                        name.1,
                    );
                }
                if let (Some(first), Some(last)) = (extra.first(), extra.last()) {
                    ctx.emit_warning(
                        "only the first name is used as the initial state",
                        first.1.join(last.1),
                    );
                }
            }
            Line::Finals(names) => {
                for name in names {
                    let declared = self.lookup.contains_key(name.0);
                    self.register(name)?;
                    let undeclared = || ConfigError::UndeclaredFinal {
                        state: name.0.to_string(),
                    };
                    let Some(state) = self.lookup.get(name.0).copied() else {
                        return self.fail(name.1, undeclared());
                    };
                    if self.limits.strict_finals && !declared {
                        return self.fail(name.1, undeclared());
                    }
                    self.finals[state] = true;
                }
            }
            Line::Transition { from, symbol, to } => {
                let Some(bit) = Bit::from_char(symbol.0) else {
                    let line = ctx.line_number(symbol.1);
                    return self.fail(
                        symbol.1,
                        ConfigError::InvalidSymbol {
                            symbol: symbol.0,
                            line,
                        },
                    );
                };
                let source = self.register(from)?;
                let target = self.register(to)?;
                if let Some(previous) = self.transitions[source][bit].replace(target) {
                    if previous != target {
                        ctx.emit_warning(
                            format!(
                                "transition ({}, {bit}) redefined, '{}' replaces '{}'",
                                from.0, to.0, self.names[previous]
                            ),
                            span,
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self, ctx: &mut Context<'_>) -> Result<Dfa, ConfigError> {
        if self.names.is_empty() {
            return Err(ConfigError::NoStates);
        }
        let Some(initial) = self.initial else {
            return Err(ConfigError::NoInitialState);
        };

        let mut transitions = StateMap::new();
        let mut missing = None;
        for (state, targets) in self.transitions.entries() {
            match targets.0 {
                [Some(zero), Some(one)] => _ = transitions.push(BitMap([zero, one])),
                [zero, _] => {
                    let bit = if zero.is_none() { Bit::Zero } else { Bit::One };
                    missing = Some((state, bit));
                    break;
                }
            }
        }
        if let Some((state, symbol)) = missing {
            self.failed_at = Some(self.definitions[state]);
            return Err(ConfigError::IncompleteTransitions {
                state: self.names[state].clone(),
                symbol,
            });
        }

        if !self.finals.0.iter().any(|f| *f) {
            ctx.emit_warning(
                "no acceptance states, every string will be rejected",
                self.definitions[initial],
            );
        }

        Ok(Dfa {
            initial,
            names: std::mem::take(&mut self.names),
            finals: std::mem::take(&mut self.finals),
            transitions,
            lookup: std::mem::take(&mut self.lookup),
        })
    }
}

/// Step-wise evaluation of one input string.
pub struct Simulator<'d, 'i> {
    dfa: &'d Dfa,
    input: &'i str,
    state: State,
    position: usize,
    halted: Option<SimulatorResult>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulatorResult {
    Pending,
    Reject,
    Accept,
}

impl<'d, 'i> Simulator<'d, 'i> {
    pub fn begin(dfa: &'d Dfa, input: &'i str) -> Self {
        Self {
            dfa,
            input,
            state: dfa.initial,
            position: 0,
            halted: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Byte offset of the next character to read.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn step(&mut self) -> SimulatorResult {
        if let Some(result) = self.halted {
            return result;
        }
        let result = match self.input[self.position..].chars().next() {
            None if self.dfa.is_final(self.state) => SimulatorResult::Accept,
            None => SimulatorResult::Reject,
            Some(c) => match Bit::from_char(c) {
                Some(bit) => {
                    self.state = self.dfa.delta(self.state, bit);
                    self.position += c.len_utf8();
                    return SimulatorResult::Pending;
                }
                None => SimulatorResult::Reject,
            },
        };
        self.halted = Some(result);
        result
    }
}

pub fn run(dfa: &Dfa, input: &str) -> bool {
    dfa.run(input)
}

pub fn format(dfa: &Dfa) -> String {
    dfa.table().to_string()
}

pub struct TableDisplay<'a> {
    dfa: &'a Dfa,
}

impl Display for TableDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dfa = self.dfa;
        writeln!(f)?;
        writeln!(f, "== AFD cargado ==")?;
        write!(f, "Estados: ")?;
        for state in dfa.states() {
            let open = if state == dfa.initial { "[" } else { "" };
            let close = if dfa.is_final(state) { "+" } else { "]" };
            write!(f, "{open}{}{close} ", dfa.name(state))?;
        }
        writeln!(f)?;
        writeln!(f, "Transiciones (q,0)-> | (q,1)->")?;
        for state in dfa.states() {
            writeln!(
                f,
                "{:<8}  {:<8} | {:<8}",
                dfa.name(state),
                dfa.name(dfa.delta(state, Bit::Zero)),
                dfa.name(dfa.delta(state, Bit::One)),
            )?;
        }
        writeln!(f)
    }
}

/// A shareable handle on the automaton currently in service.
#[derive(Clone, Debug)]
pub struct Engine {
    current: Arc<Dfa>,
}

impl Engine {
    pub fn new(dfa: Dfa) -> Self {
        Self {
            current: Arc::new(dfa),
        }
    }

    pub fn snapshot(&self) -> Arc<Dfa> {
        Arc::clone(&self.current)
    }

    pub fn run(&self, input: &str) -> bool {
        self.current.run(input)
    }

    /// Replaces the automaton with a freshly loaded one. On error the
    /// previous automaton stays in service.
    pub fn reload(&mut self, ctx: &mut Context<'_>, limits: Limits) -> Result<(), ConfigError> {
        self.current = Arc::new(Dfa::load(ctx, limits)?);
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use serde::{Serialize, Serializer, ser::SerializeStruct};

    use super::*;

    #[derive(Serialize)]
    struct StateView<'a> {
        name: &'a str,
        #[serde(rename = "final")]
        is_final: bool,
        on_0: &'a str,
        on_1: &'a str,
    }

    impl Serialize for Dfa {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let states: Vec<_> = self
                .states()
                .map(|state| StateView {
                    name: self.name(state),
                    is_final: self.is_final(state),
                    on_0: self.name(self.delta(state, Bit::Zero)),
                    on_1: self.name(self.delta(state, Bit::One)),
                })
                .collect();
            let mut s = serializer.serialize_struct("Dfa", 2)?;
            s.serialize_field("initial", self.name(self.initial))?;
            s.serialize_field("states", &states)?;
            s.end()
        }
    }
}

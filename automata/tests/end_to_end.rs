use automata::{
    Bit, ConfigError, Context, Dfa, Limits,
    automatan::dfa::{format, run},
    loader::{self, inputs, log::LogLevel, parse_lines},
};

const CONF: &str = "\
# Estados
q0 q1 q2

# Estado inicial
q0

# Estados de aceptación
q2

# Transiciones
q0 0 q1
q0 1 q0
q1 0 q2
q1 1 q0
q2 0 q2
q2 1 q2
";

fn example() -> Dfa {
    parse_lines(CONF.lines()).unwrap()
}

#[test]
fn example_strings() {
    let dfa = example();
    assert!(!run(&dfa, "01"));
    assert!(run(&dfa, "0100"));
    assert!(run(&dfa, "00"));
    assert!(run(&dfa, "1100111"));
    assert!(!run(&dfa, "0101"));
}

#[test]
fn invalid_symbols_always_reject() {
    let dfa = example();
    for input in ["2", "002", "00 ", " 00", "0a0", "00\t1", "ε", "E"] {
        assert!(!run(&dfa, input), "{input:?}");
    }

    let accept_all = parse_lines([
        "# Estado inicial",
        "s",
        "# Estados de aceptación",
        "s",
        "# Transiciones",
        "s 0 s",
        "s 1 s",
    ])
    .unwrap();
    assert!(run(&accept_all, "0101"));
    assert!(!run(&accept_all, "2"));
    assert!(!run(&accept_all, "01012"));
}

#[test]
fn empty_string_checks_initial() {
    let dfa = example();
    assert_eq!(run(&dfa, ""), dfa.is_final(dfa.initial()));

    let verdicts: Vec<_> = inputs::evaluate(&dfa, "E\n").map(|v| v.to_string()).collect();
    assert_eq!(verdicts, ["ε -> NO acepta"]);
}

#[test]
fn runs_are_deterministic() {
    let dfa = example();
    for input in ["", "0", "0100", "111000", "01x"] {
        let first = run(&dfa, input);
        for _ in 0..3 {
            assert_eq!(run(&dfa, input), first);
        }
    }
}

#[test]
fn every_state_is_total() {
    let dfa = example();
    for state in dfa.states() {
        for bit in Bit::ALL {
            assert!(dfa.delta(state, bit).index() < dfa.len());
        }
    }
}

#[test]
fn missing_transition_fails_load() {
    let src = CONF.replace("q1 1 q0\n", "");
    let mut ctx = Context::new(&src);
    let err = Dfa::load(&mut ctx, Limits::default()).unwrap_err();
    match err {
        ConfigError::IncompleteTransitions { state, symbol } => {
            assert_eq!(state, "q1");
            assert_eq!(symbol, Bit::One);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(ctx.contains_errors());
}

#[test]
fn validation_order() {
    assert!(matches!(parse_lines([""; 0]), Err(ConfigError::NoStates)));
    assert!(matches!(
        parse_lines(["# Estados", "q0", "q1"]),
        Err(ConfigError::NoInitialState)
    ));
    // initial is checked before totality
    assert!(matches!(
        parse_lines(["# Estados", "q0", "# Transiciones", "q0 0 q0"]),
        Err(ConfigError::NoInitialState)
    ));
    assert!(matches!(
        parse_lines(["# Estado inicial", "q0", "# Transiciones", "q0 1 q0"]),
        Err(ConfigError::IncompleteTransitions { symbol: Bit::Zero, .. })
    ));
}

#[test]
fn invalid_transition_symbol_is_fatal() {
    let err = parse_lines(["# Estado inicial", "q0", "# Transiciones", "q0 0 q0", "q0 a q0"])
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSymbol { symbol: 'a', line: 5 }));
}

#[test]
fn idempotent_registration() {
    let dfa = parse_lines([
        "# Estados",
        "q0 q1 q0",
        "# Estado inicial",
        "q0",
        "# Estados de aceptación",
        "q1 q1",
        "# Estados",
        "q1 q0",
        "# Transiciones",
        "q0 0 q1",
        "q0 1 q0",
        "q1 0 q1",
        "q1 1 q0",
    ])
    .unwrap();
    assert_eq!(dfa.len(), 2);
    assert!(dfa.is_final(dfa.state("q1").unwrap()));
    assert_eq!(dfa.name(dfa.initial()), "q0");
}

#[test]
fn last_write_wins() {
    let dfa = parse_lines([
        "# Estado inicial",
        "a",
        "# Estado inicial",
        "b",
        "# Estados de aceptación",
        "a",
        "# Transiciones",
        "a 0 a",
        "a 1 a",
        "b 0 a",
        "b 1 b",
        "b 0 b",
    ])
    .unwrap();
    assert_eq!(dfa.name(dfa.initial()), "b");
    let b = dfa.state("b").unwrap();
    assert_eq!(dfa.delta(b, Bit::Zero), b);
    assert!(!run(&dfa, "0"));
    assert!(!run(&dfa, ""));
}

#[test]
fn sections_can_be_interleaved_and_noisy() {
    let src = "\
# Autómata de ejemplo
esto se ignora
# Transiciones
q0 0 q1
q0 1 q0
q0 0
  q1 0 q1  \r
q1 1 q0
# Estado inicial
q0
# Acceptance states
q1
";
    let (dfa, logs) = loader::load(src, Limits::default()).unwrap();
    assert!(run(&dfa, "10"));
    assert!(!run(&dfa, "01"));
    assert_eq!(logs.count(LogLevel::Warning), 2);
    assert_eq!(logs.count(LogLevel::Info), 1);
}

#[test]
fn final_states_header_lists_plain_states() {
    let dfa = parse_lines([
        "# states",
        "q0",
        "# initial state",
        "q0",
        "# final states",
        "q0",
        "# transitions",
        "q0 0 q0",
        "q0 1 q0",
    ])
    .unwrap();
    assert_eq!(dfa.len(), 1);
    assert!(!dfa.is_final(dfa.initial()));
    assert!(!run(&dfa, ""));
    assert!(!run(&dfa, "0110"));
}

#[test]
fn failed_load_returns_logs() {
    let (err, logs) = loader::load("# Estados\n", Limits::default()).unwrap_err();
    assert!(matches!(err, ConfigError::NoStates));
    let rendered: Vec<_> = logs
        .displayable_with("# Estados\n")
        .map(|d| d.plain().to_string())
        .collect();
    assert_eq!(rendered, ["error: no states defined\n"]);
}

#[test]
fn reporter_golden() {
    let dfa = parse_lines([
        "# Estados",
        "inicio medio fin",
        "# Estado inicial",
        "medio",
        "# Estados de aceptación",
        "medio fin",
        "# Transiciones",
        "inicio 0 medio",
        "inicio 1 fin",
        "medio 0 medio",
        "medio 1 inicio",
        "fin 0 fin",
        "fin 1 fin",
    ])
    .unwrap();
    let expected = [
        "",
        "== AFD cargado ==",
        "Estados: inicio] [medio+ fin+ ",
        "Transiciones (q,0)-> | (q,1)->",
        "inicio    medio    | fin     ",
        "medio     medio    | inicio  ",
        "fin       fin      | fin     ",
        "",
        "",
    ]
    .join("\n");
    assert_eq!(format(&dfa), expected);
}

// not every test binary uses every helper
#![allow(dead_code)]

use prosa::{Compilation, Value, Variables};

pub fn compile(source: &str) -> Compilation {
    let unit = prosa::parse(source).unwrap();
    Compilation::new(&unit)
}

pub fn evaluate(source: &str) -> (Option<Value>, Vec<String>) {
    let compilation = compile(source);
    let mut variables = Variables::new();
    let result = compilation.evaluate(&mut variables).unwrap();
    let diagnostics = result
        .diagnostics
        .iter()
        .map(ToString::to_string)
        .collect();
    (result.value, diagnostics)
}

pub fn assert_value(source: &str, expected: impl Into<Value>) {
    let (value, diagnostics) = evaluate(source);
    assert_eq!(
        diagnostics,
        Vec::<String>::new(),
        "unexpected diagnostics for {source:?}"
    );
    assert_eq!(value, Some(expected.into()), "wrong value for {source:?}");
}

pub fn assert_diagnostics(source: &str, expected: &[&str]) {
    let (_, diagnostics) = evaluate(source);
    assert_eq!(diagnostics, expected, "wrong diagnostics for {source:?}");
}

mod common;

use common::compile;
use prosa::Variables;

fn run_demo(source: &str) {
    let compilation = compile(source);
    assert_eq!(
        compilation
            .diagnostics()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        Vec::<String>::new()
    );

    let mut variables = Variables::new();
    compilation.evaluate(&mut variables).unwrap();
}

#[test]
fn sum() {
    run_demo(include_str!("../demos/sum.prosa"));
}

#[test]
fn fizzbuzz() {
    run_demo(include_str!("../demos/fizzbuzz.prosa"));
}

#[test]
fn fib() {
    run_demo(include_str!("../demos/fib.prosa"));
}

#[test]
fn language_tour() {
    run_demo(include_str!("../demos/language-tour.prosa"));
}

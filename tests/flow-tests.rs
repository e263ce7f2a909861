mod common;

use common::compile;
use prosa::flow::{all_paths_return, ControlFlowGraph, END};
use prosa::{BoundBlockStatement, Compilation};

fn function_body(compilation: &Compilation) -> &BoundBlockStatement {
    &compilation.program().submitted_functions[0].body
}

#[test]
fn returns_on_every_path() {
    let compilation = compile(
        "function test(n as integer) as integer
         :
             if n is greater than 10
                 return 1
             return 2
         .",
    );
    assert!(compilation.diagnostics().is_empty());
    assert!(all_paths_return(function_body(&compilation)));
}

#[test]
fn returns_on_both_branches() {
    let compilation = compile(
        "function test(n as integer) as integer
         :
             if n is greater than 10
                 return 1
             else
                 return 2
         .",
    );
    assert!(compilation.diagnostics().is_empty());
    assert!(all_paths_return(function_body(&compilation)));
}

#[test]
fn missing_return_on_one_path() {
    let compilation = compile(
        "function test(n as integer) as boolean
         :
             if n is greater than 10
                 return true
         .",
    );
    assert!(!all_paths_return(function_body(&compilation)));
    assert_eq!(
        compilation
            .diagnostics()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec!["Not all code paths return a value"]
    );
}

#[test]
fn empty_body_does_not_return() {
    let compilation = compile(
        "function test() as integer
         :
         .",
    );
    assert!(!all_paths_return(function_body(&compilation)));
}

#[test]
fn infinite_loop_never_reaches_the_end() {
    let compilation = compile(
        "function test() as integer
         :
             while true
                 output(\"spinning\")
         .",
    );
    // no path falls off the end, so the check passes vacuously
    assert!(all_paths_return(function_body(&compilation)));
    assert!(compilation.diagnostics().is_empty());
}

#[test]
fn conditional_edges_are_mutually_exclusive() {
    let compilation = compile(
        "function test(n as integer) as integer
         :
             if n is greater than 0
                 return 1
             return 2
         .",
    );
    let body = function_body(&compilation);
    let graph = ControlFlowGraph::new(body);

    let guarded: Vec<_> = graph
        .branches()
        .filter_map(|branch| branch.condition)
        .collect();
    assert_eq!(guarded.len(), 2);

    // one edge under the condition, the other under its negation
    assert_eq!(
        guarded.iter().filter(|condition| condition.negated).count(),
        1
    );
    assert_eq!(
        guarded.iter().filter(|condition| !condition.negated).count(),
        1
    );
}

#[test]
fn constant_conditions_collapse_their_edges() {
    let compilation = compile(
        "function test() as integer
         :
             while true
                 return 1
         .",
    );
    let body = function_body(&compilation);
    let graph = ControlFlowGraph::new(body);

    // the loop's exit edge is gone and the remaining guard disappeared
    assert!(graph.branches().all(|branch| branch.condition.is_none()));
    assert!(all_paths_return(body));
}

#[test]
fn unreachable_code_is_pruned() {
    let compilation = compile(
        "function test() as integer
         :
             return 1
         .",
    );
    let body = function_body(&compilation);
    let graph = ControlFlowGraph::new(body);

    // start, the single return block and end survive
    assert_eq!(graph.blocks().count(), 3);
    assert_eq!(graph.incoming(END).count(), 1);
}

#[test]
fn dead_code_after_a_jump_does_not_break_the_check() {
    let compilation = compile(
        "function test() as integer
         :
             return 1
             output(\"never\")
         .",
    );
    // the trailing statement is unreachable and pruned, so the function
    // still returns on every path
    assert!(all_paths_return(function_body(&compilation)));
    assert!(compilation.diagnostics().is_empty());
}

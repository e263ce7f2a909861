mod common;

use common::compile;
use prosa::{BoundBlockStatement, BoundStatement};

fn assert_flat(block: &BoundBlockStatement) {
    for statement in &block.statements {
        assert!(
            !matches!(
                statement,
                BoundStatement::Block(_)
                    | BoundStatement::If { .. }
                    | BoundStatement::While { .. }
                    | BoundStatement::For { .. }
            ),
            "structured statement survived lowering: {statement}"
        );
    }
}

fn count<F: Fn(&BoundStatement) -> bool>(block: &BoundBlockStatement, predicate: F) -> usize {
    block
        .statements
        .iter()
        .filter(|statement| predicate(statement))
        .count()
}

#[test]
fn lowered_bodies_are_flat() {
    let compilation = compile(
        ":
            variable a represents 0
            if a is equal to 0
                a represents 10
            else
                a represents 5
            while a is greater than 0
                a represents a minus 1
            for i represents 1 to 3
                a represents a plus i
        .",
    );
    assert!(compilation.diagnostics().is_empty());
    assert_flat(&compilation.program().statement);
}

#[test]
fn if_without_else_jumps_past_the_branch() {
    let compilation = compile(
        ":
            variable a represents 0
            if a is equal to 0
                a represents 10
        .",
    );
    let block = &compilation.program().statement;

    assert_eq!(
        count(block, |s| matches!(
            s,
            BoundStatement::ConditionalGoto {
                jump_if_true: false,
                ..
            }
        )),
        1
    );
    assert_eq!(count(block, |s| matches!(s, BoundStatement::Label(_))), 1);
    assert_eq!(count(block, |s| matches!(s, BoundStatement::Goto(_))), 0);
}

#[test]
fn if_with_else_has_two_labels_and_a_goto() {
    let compilation = compile(
        ":
            variable a represents 0
            if a is equal to 0
                a represents 10
            else
                a represents 5
        .",
    );
    let block = &compilation.program().statement;

    assert_eq!(
        count(block, |s| matches!(s, BoundStatement::ConditionalGoto { .. })),
        1
    );
    assert_eq!(count(block, |s| matches!(s, BoundStatement::Goto(_))), 1);
    assert_eq!(count(block, |s| matches!(s, BoundStatement::Label(_))), 2);
}

#[test]
fn while_checks_at_the_head_and_jumps_back() {
    let compilation = compile(
        ":
            variable i represents 3
            while i is greater than 0
                i represents i minus 1
        .",
    );
    let block = &compilation.program().statement;

    // loop-start label, jump out when the condition is false, body,
    // jump back, loop-end label
    assert_eq!(
        count(block, |s| matches!(
            s,
            BoundStatement::ConditionalGoto {
                jump_if_true: false,
                ..
            }
        )),
        1
    );
    assert_eq!(count(block, |s| matches!(s, BoundStatement::Goto(_))), 1);
    assert_eq!(count(block, |s| matches!(s, BoundStatement::Label(_))), 2);
}

#[test]
fn for_desugars_to_a_while_over_a_fresh_upper_bound() {
    let compilation = compile(
        ":
            variable result represents 0
            for i represents 1 to 10
                result represents result plus i
        .",
    );
    let block = &compilation.program().statement;

    // `result`, the loop variable and the one-shot upper bound
    assert_eq!(
        count(block, |s| matches!(
            s,
            BoundStatement::VariableDeclaration { .. }
        )),
        3
    );
    assert!(block.statements.iter().any(|s| matches!(
        s,
        BoundStatement::VariableDeclaration { variable, .. } if variable.name == "upperBound"
    )));
    assert_eq!(
        count(block, |s| matches!(s, BoundStatement::ConditionalGoto { .. })),
        1
    );
}

#[test]
fn break_and_continue_become_gotos() {
    let compilation = compile(
        ":
            variable i represents 0
            while true
            :
                i represents i plus 1
                if i is equal to 3
                    break
                if i is equal to 2
                    continue
            .
        .",
    );
    assert!(compilation.diagnostics().is_empty());

    let block = &compilation.program().statement;
    assert_flat(&compilation.program().statement);

    // the loop's back-edge plus the lowered break and continue
    assert_eq!(count(block, |s| matches!(s, BoundStatement::Goto(_))), 3);
}

#[test]
fn function_bodies_are_lowered_too() {
    let compilation = compile(
        "function test(n as integer) as integer
         :
             if n is greater than 10
                 return 1
             return 2
         .",
    );
    assert!(compilation.diagnostics().is_empty());

    let body = &compilation.program().submitted_functions[0].body;
    assert_flat(body);
    assert_eq!(count(body, |s| matches!(s, BoundStatement::Return(_))), 2);
}

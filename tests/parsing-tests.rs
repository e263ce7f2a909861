use prosa::ast::{
    BinaryOperator, ExpressionKind, Member, Statement, StatementKind, UnaryOperator,
};
use prosa::Diagnostic;

fn statements(source: &str) -> Vec<Statement> {
    let unit = prosa::parse(source).unwrap();
    unit.members
        .into_iter()
        .map(|member| match member {
            Member::Statement(statement) => statement,
            Member::Function(function) => {
                panic!("expected a statement, got function '{}'", function.name)
            }
        })
        .collect()
}

#[test]
fn precedence_ladder() {
    let parsed = statements("1 plus 2 multiplied by 3 is equal to 7 and true");
    assert_eq!(parsed.len(), 1);

    // and < comparison < plus < multiplied by
    let StatementKind::Expression(expression) = &parsed[0].kind else {
        panic!("expected an expression statement");
    };
    let ExpressionKind::Binary { operator, lhs, .. } = &expression.kind else {
        panic!("expected a binary expression");
    };
    assert_eq!(*operator, BinaryOperator::LogicalAnd);

    let ExpressionKind::Binary { operator, lhs, .. } = &lhs.kind else {
        panic!("expected a comparison under the conjunction");
    };
    assert_eq!(*operator, BinaryOperator::Equality);

    let ExpressionKind::Binary { operator, .. } = &lhs.kind else {
        panic!("expected an addition under the comparison");
    };
    assert_eq!(*operator, BinaryOperator::Addition);
}

#[test]
fn unary_operators_chain() {
    let parsed = statements("not not true");
    let StatementKind::Expression(expression) = &parsed[0].kind else {
        panic!("expected an expression statement");
    };
    let ExpressionKind::Unary {
        operator, operand, ..
    } = &expression.kind
    else {
        panic!("expected a unary expression");
    };
    assert_eq!(*operator, UnaryOperator::LogicalNot);
    assert!(matches!(
        operand.kind,
        ExpressionKind::Unary {
            operator: UnaryOperator::LogicalNot,
            ..
        }
    ));
}

#[test]
fn statement_forms() {
    let parsed = statements(
        ":
            variable i represents 10
            while i is greater than 0
                i represents i minus 1
            for j represents 1 to 3
                output(\"hi\")
            if i is equal to 0
                break
            else
                continue
        .",
    );
    assert_eq!(parsed.len(), 1);

    let StatementKind::Block(inner) = &parsed[0].kind else {
        panic!("expected a block");
    };
    assert_eq!(inner.len(), 4);
    assert!(matches!(
        inner[0].kind,
        StatementKind::VariableDeclaration {
            readonly: false,
            ..
        }
    ));
    assert!(matches!(inner[1].kind, StatementKind::While { .. }));
    assert!(matches!(inner[2].kind, StatementKind::For { .. }));
    assert!(matches!(inner[3].kind, StatementKind::If { .. }));
}

#[test]
fn else_binds_to_the_innermost_if() {
    let parsed = statements(
        ":
            if true
                if false
                    output(\"a\")
                else
                    output(\"b\")
        .",
    );

    let StatementKind::Block(inner) = &parsed[0].kind else {
        panic!("expected a block");
    };
    let StatementKind::If {
        then_branch,
        else_branch,
        ..
    } = &inner[0].kind
    else {
        panic!("expected an if statement");
    };
    assert!(else_branch.is_none());
    assert!(matches!(
        then_branch.kind,
        StatementKind::If {
            else_branch: Some(_),
            ..
        }
    ));
}

#[test]
fn assignments_nest_to_the_right() {
    let parsed = statements(": variable a represents 0 variable b represents 0 a represents b represents 5 .");
    let StatementKind::Block(inner) = &parsed[0].kind else {
        panic!("expected a block");
    };
    let StatementKind::Expression(expression) = &inner[2].kind else {
        panic!("expected an expression statement");
    };
    let ExpressionKind::Assignment { name, value, .. } = &expression.kind else {
        panic!("expected an assignment");
    };
    assert_eq!(name, "a");
    assert!(matches!(value.kind, ExpressionKind::Assignment { .. }));
}

#[test]
fn multi_word_operators_win_over_identifiers() {
    // "is" starts several operators but is also a legal identifier prefix
    let parsed = statements(": variable island represents 1 island is greater than 0 .");
    let StatementKind::Block(inner) = &parsed[0].kind else {
        panic!("expected a block");
    };
    let StatementKind::Expression(expression) = &inner[1].kind else {
        panic!("expected an expression statement");
    };
    assert!(matches!(
        expression.kind,
        ExpressionKind::Binary {
            operator: BinaryOperator::Greater,
            ..
        }
    ));
}

#[test]
fn unexpected_token_is_reported() {
    let diagnostics = prosa::parse("variable represents 10").unwrap_err();
    assert!(diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::UnexpectedToken { .. })));
}

#[test]
fn out_of_range_number_is_reported() {
    let diagnostics = prosa::parse("99999999999999999999").unwrap_err();
    assert!(diagnostics.iter().any(|d| matches!(
        d,
        Diagnostic::InvalidNumber { text, .. } if text == "99999999999999999999"
    )));
}

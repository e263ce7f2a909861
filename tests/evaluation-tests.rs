mod common;

use common::{assert_value, compile, evaluate};
use prosa::{Value, Variables};

#[test]
fn literals_and_unary_operators() {
    assert_value("1", 1);
    assert_value("+1", 1);
    assert_value("-1", -1);
    assert_value("~1", -2);
    assert_value("(10)", 10);
    assert_value("true", true);
    assert_value("false", false);
    assert_value("not true", false);
    assert_value("not false", true);
}

#[test]
fn arithmetic() {
    assert_value("14 plus 12", 26);
    assert_value("12 minus 3", 9);
    assert_value("4 multiplied by 2", 8);
    assert_value("9 divided by 3", 3);
    assert_value("9 modulo 2", 1);
    assert_value("1 plus 2 multiplied by 3", 7);
    assert_value("-4 plus 6", 2);
}

#[test]
fn comparisons() {
    assert_value("4 is greater than 3", true);
    assert_value("4 is greater than 5", false);
    assert_value("4 is greater than or equal to 4", true);
    assert_value("5 is greater than or equal to 4", true);
    assert_value("4 is greater than or equal to 5", false);
    assert_value("3 is less than 4", true);
    assert_value("5 is less than 4", false);
    assert_value("4 is less than or equal to 4", true);
    assert_value("4 is less than or equal to 5", true);
    assert_value("5 is less than or equal to 4", false);
}

#[test]
fn equality() {
    assert_value("12 is equal to 3", false);
    assert_value("3 is equal to 3", true);
    assert_value("12 is not equal to 3", true);
    assert_value("3 is not equal to 3", false);
    assert_value("false is equal to false", true);
    assert_value("true is equal to false", false);
    assert_value("false is not equal to false", false);
    assert_value("true is not equal to false", true);
}

#[test]
fn bitwise_integers() {
    assert_value("1 | 2", 3);
    assert_value("1 | 0", 1);
    assert_value("1 & 2", 0);
    assert_value("1 & 0", 0);
    assert_value("1 ^ 0", 1);
    assert_value("0 ^ 1", 1);
    assert_value("1 ^ 3", 2);
}

#[test]
fn bitwise_booleans() {
    assert_value("false | false", false);
    assert_value("false | true", true);
    assert_value("true | false", true);
    assert_value("true | true", true);
    assert_value("false & false", false);
    assert_value("false & true", false);
    assert_value("true & false", false);
    assert_value("true & true", true);
    assert_value("false ^ false", false);
    assert_value("true ^ false", true);
    assert_value("false ^ true", true);
    assert_value("true ^ true", false);
}

#[test]
fn logic() {
    assert_value("true and true", true);
    assert_value("false or false", false);
    assert_value("true and false or true", true);
}

#[test]
fn strings() {
    assert_value("\"test\"", "test");
    assert_value("\"te\"\"st\"", "te\"st");
    assert_value("\"test\" is equal to \"test\"", true);
    assert_value("\"test\" is not equal to \"test\"", false);
    assert_value("\"test\" is equal to \"abc\"", false);
    assert_value("\"test\" is not equal to \"abc\"", true);
    assert_value("\"test\" plus \"abc\"", "testabc");
}

#[test]
fn explicit_conversions() {
    assert_value("string(10)", "10");
    assert_value("string(true)", "true");
    assert_value("integer(\"42\") plus 1", 43);
    assert_value("boolean(\"true\")", true);
}

#[test]
fn variables_and_assignment() {
    assert_value("variable a represents 10", 10);
    assert_value(":variable a represents 10 (a multiplied by a).", 100);
    assert_value(":variable a represents 0 (a represents 10) multiplied by a.", 100);
}

#[test]
fn if_statements() {
    assert_value(":variable a represents 0 if a is equal to 0 a represents 10 a.", 10);
    assert_value(":variable a represents 0 if a is equal to 4 a represents 10 a.", 0);
    assert_value(
        ":variable a represents 0 if a is equal to 0 a represents 10 else a represents 5 a.",
        10,
    );
    assert_value(
        ":variable a represents 0 if a is equal to 4 a represents 10 else a represents 5 a.",
        5,
    );
}

#[test]
fn while_loops() {
    assert_value(
        ":variable i represents 10 variable result represents 0 \
         while i is greater than 0: result represents result plus i i represents i minus 1. \
         result.",
        55,
    );
}

#[test]
fn for_loops() {
    assert_value(
        ":variable result represents 0 for i represents 1 to 10: result represents result plus i. result.",
        55,
    );

    // the upper bound is evaluated exactly once
    assert_value(
        ":variable a represents 10 for i represents 1 to (a represents a minus 1): . a.",
        9,
    );
}

#[test]
fn break_and_continue() {
    assert_value(
        ":variable i represents 0 while i is less than 5: i represents i plus 1 if i is equal to 5 continue. i.",
        5,
    );
    assert_value(
        ":variable i represents 0 while true: i represents i plus 1 if i is equal to 3 break. i.",
        3,
    );
    assert_value(
        ":variable result represents 0 \
         for i represents 1 to 10: if i is greater than 4 break result represents result plus i. \
         result.",
        10,
    );
}

#[test]
fn function_calls() {
    assert_value(
        "function double(x as integer) as integer : return x multiplied by 2 . double(21)",
        42,
    );
    assert_value(
        "function fact(n as integer) as integer \
         : if n is less than or equal to 1 return 1 return n multiplied by fact(n minus 1) . \
         fact(5)",
        120,
    );
    assert_value(
        "function greet(name as string) as string : return \"Hi \" plus name . greet(\"prosa\")",
        "Hi prosa",
    );
}

#[test]
fn void_call_has_no_value() {
    let (value, diagnostics) = evaluate("function noop() : . noop()");
    assert_eq!(diagnostics, Vec::<String>::new());
    assert_eq!(value, None);
}

#[test]
fn evaluation_is_deterministic() {
    let source = ":variable result represents 0 for i represents 1 to 10: result represents result plus i. result.";
    assert_eq!(evaluate(source), evaluate(source));
}

#[test]
fn integer_arithmetic_wraps() {
    assert_value("9223372036854775807 plus 1", i64::MIN);
}

#[test]
fn division_by_zero_is_fatal() {
    let compilation = compile("1 divided by 0");
    assert!(compilation.diagnostics().is_empty());

    let mut variables = Variables::new();
    let fault = compilation.evaluate(&mut variables).unwrap_err();
    assert_eq!(fault.to_string(), "Division by zero");
}

#[test]
fn modulo_by_zero_is_fatal() {
    let compilation = compile("1 modulo 0");
    let mut variables = Variables::new();
    assert!(compilation.evaluate(&mut variables).is_err());
}

#[test]
fn failed_cast_is_fatal() {
    let compilation = compile("integer(\"oops\")");
    assert!(compilation.diagnostics().is_empty());

    let mut variables = Variables::new();
    assert!(compilation.evaluate(&mut variables).is_err());
}

#[test]
fn erroneous_program_returns_diagnostics_instead_of_running() {
    let compilation = compile(": variable x represents 10 variable x represents 5 .");
    let mut variables = Variables::new();
    let result = compilation.evaluate(&mut variables).unwrap();

    assert_eq!(result.value, None);
    assert_eq!(result.diagnostics.len(), 1);
    assert!(variables.is_empty());
}

#[test]
fn continuation_persists_globals() {
    let mut variables = Variables::new();

    let first = compile("variable x represents 10");
    let result = first.evaluate(&mut variables).unwrap();
    assert!(result.diagnostics.is_empty());

    let unit = prosa::parse("x plus 5").unwrap();
    let second = first.continue_with(&unit);
    let result = second.evaluate(&mut variables).unwrap();
    assert_eq!(result.value, Some(Value::Integer(15)));
}

#[test]
fn continuation_keeps_functions_callable() {
    let mut variables = Variables::new();

    let first = compile("function double(x as integer) as integer : return x multiplied by 2 .");
    assert!(first.diagnostics().is_empty());
    first.evaluate(&mut variables).unwrap();

    let unit = prosa::parse("double(21)").unwrap();
    let second = first.continue_with(&unit);
    let result = second.evaluate(&mut variables).unwrap();
    assert_eq!(result.value, Some(Value::Integer(42)));
}

#[test]
fn continuation_allows_shadowing_previous_submissions() {
    let mut variables = Variables::new();

    let first = compile("variable x represents 10");
    first.evaluate(&mut variables).unwrap();

    // re-declaring a name from an earlier submission is legal shadowing
    let unit = prosa::parse("variable x represents \"hello\"").unwrap();
    let second = first.continue_with(&unit);
    let result = second.evaluate(&mut variables).unwrap();
    assert!(result.diagnostics.is_empty());

    let unit = prosa::parse("x plus \"!\"").unwrap();
    let third = second.continue_with(&unit);
    let result = third.evaluate(&mut variables).unwrap();
    assert_eq!(result.value, Some(Value::String(String::from("hello!"))));
}

#[test]
fn continuation_discards_erroneous_submissions() {
    let mut variables = Variables::new();

    let first = compile("variable x represents 10");
    first.evaluate(&mut variables).unwrap();

    // the erroneous submission is simply not chained from
    let unit = prosa::parse("y plus 1").unwrap();
    let broken = first.continue_with(&unit);
    assert!(!broken.diagnostics().is_empty());

    let unit = prosa::parse("x plus 1").unwrap();
    let second = first.continue_with(&unit);
    let result = second.evaluate(&mut variables).unwrap();
    assert_eq!(result.value, Some(Value::Integer(11)));
}

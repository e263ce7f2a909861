mod common;

use common::assert_diagnostics;

#[test]
fn redeclaration_in_same_scope() {
    assert_diagnostics(
        ":
            variable x represents 10
            variable y represents 100
            :
                variable x represents 10
            .
            variable x represents 5
        .",
        &["'x' has already been declared"],
    );
}

#[test]
fn shadowing_in_nested_scope_is_legal() {
    assert_diagnostics(
        ":
            variable x represents 10
            :
                variable x represents 20
            .
        .",
        &[],
    );
}

#[test]
fn undefined_variable() {
    assert_diagnostics("x multiplied by 10", &["Variable 'x' does not exist"]);
}

#[test]
fn undefined_assignment_target() {
    assert_diagnostics("x represents 10", &["Variable 'x' does not exist"]);
    assert_diagnostics(
        ": print represents 42 .",
        &["Variable 'print' does not exist"],
    );
}

#[test]
fn assignment_to_constant() {
    assert_diagnostics(
        ":
            constant x represents 10
            x represents 0
        .",
        &["Variable 'x' is a constant and cannot be assigned to"],
    );
}

#[test]
fn assignment_type_mismatch() {
    assert_diagnostics(
        ":
            variable x represents 10
            x represents true
        .",
        &["Cannot convert from type 'boolean' to 'integer'"],
    );
}

#[test]
fn implicit_conversion_requires_cast() {
    assert_diagnostics(
        ":
            variable x represents \"10\"
            x represents 5
        .",
        &["Cannot convert implicitly from type 'integer' to 'string' (are you missing a cast?)"],
    );
}

#[test]
fn undefined_function() {
    assert_diagnostics("foo(42)", &["Function 'foo' does not exist"]);
}

#[test]
fn variables_can_shadow_functions() {
    assert_diagnostics(
        ":
            constant output represents 42
            output(\"test\")
        .",
        &["'output' is not a function"],
    );
}

#[test]
fn function_names_are_not_variables() {
    assert_diagnostics("output plus 1", &["'output' is not a variable"]);
}

#[test]
fn wrong_argument_count() {
    assert_diagnostics(
        "output()",
        &["Function 'output' expects 1 arguments, but received 0"],
    );
    assert_diagnostics(
        "output(\"Hello\", \" \", \" world!\")",
        &["Function 'output' expects 1 arguments, but received 3"],
    );
}

#[test]
fn wrong_argument_type() {
    assert_diagnostics(
        "function test(n as integer) as boolean
         :
             return n is greater than 10
         .

         constant testValue represents \"string\"
         test(testValue)",
        &["Parameter 'n' expects a value of type 'integer' but was provided a value of type 'string'"],
    );
}

#[test]
fn parameter_already_declared() {
    assert_diagnostics(
        "function sum(a as integer, b as integer, a as integer) as integer
         :
             return a plus b
         .",
        &["A parameter with the name 'a' has already been declared"],
    );
}

#[test]
fn undefined_parameter_type() {
    assert_diagnostics(
        "function test(n as invalidtype)
         :
         .",
        &["Type 'invalidtype' does not exist"],
    );
}

#[test]
fn void_function_must_not_return_a_value() {
    assert_diagnostics(
        "function test()
         :
             return 1
         .",
        &["Function 'test' does not have a return value and hence cannot be followed by an expression"],
    );
}

#[test]
fn non_void_function_must_return_a_value() {
    assert_diagnostics(
        "function test() as integer
         :
             return
         .",
        &["An expression of type 'integer' was expected"],
    );
}

#[test]
fn not_all_code_paths_return() {
    assert_diagnostics(
        "function test(n as integer) as boolean
         :
             if n is greater than 10
                 return true
         .",
        &["Not all code paths return a value"],
    );
}

#[test]
fn empty_non_void_function_body() {
    assert_diagnostics(
        "function add(a as integer, b as integer) as integer
         :
         .",
        &["Not all code paths return a value"],
    );
}

#[test]
fn expression_must_have_a_value() {
    assert_diagnostics(
        "function test(n as integer)
         :
             return
         .

         constant value represents test(100)",
        &["Expression must have a value"],
    );
}

#[test]
fn break_and_continue_outside_loops() {
    assert_diagnostics("break", &["'break' can only be used within a loop"]);
    assert_diagnostics("continue", &["'continue' can only be used within a loop"]);
}

#[test]
fn return_outside_functions() {
    assert_diagnostics(
        "return",
        &["The 'return' keyword can only be used within a function"],
    );
}

#[test]
fn condition_type_mismatches() {
    assert_diagnostics(
        ":
            variable x represents 0
            if 10
                x represents 10
        .",
        &["Cannot convert from type 'integer' to 'boolean'"],
    );
    assert_diagnostics(
        ":
            variable x represents 0
            while 10
                x represents 10
        .",
        &["Cannot convert from type 'integer' to 'boolean'"],
    );
}

#[test]
fn for_bound_type_mismatches() {
    assert_diagnostics(
        ":
            variable result represents 0
            for i represents false to 10
                result represents result plus i
        .",
        &["Cannot convert from type 'boolean' to 'integer'"],
    );
    assert_diagnostics(
        ":
            variable result represents 0
            for i represents 1 to true
                result represents result plus i
        .",
        &["Cannot convert from type 'boolean' to 'integer'"],
    );
}

#[test]
fn undefined_unary_operator() {
    assert_diagnostics(
        "+true",
        &["Unary operator '+' is not defined for type 'boolean'"],
    );
}

#[test]
fn undefined_binary_operator() {
    assert_diagnostics(
        "10 multiplied by false",
        &["Binary operator 'multiplied by' is not defined for types 'integer' and 'boolean'"],
    );
}

#[test]
fn error_recovery_reports_each_problem_once() {
    // the undefined name poisons the surrounding expressions without
    // producing cascading operator diagnostics
    assert_diagnostics(
        "x plus 1 multiplied by 2",
        &["Variable 'x' does not exist"],
    );
}

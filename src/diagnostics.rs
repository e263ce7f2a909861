//! Diagnostics
//!
//! Every problem the pipeline can report, as plain data: a message plus a
//! span into the originating source text. Diagnostics are accumulated in
//! order during one pass and never used for control flow.

use thiserror::Error;

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::common::Span;
use crate::symbols::Type;

#[derive(Debug, Clone, PartialEq, Error, miette::Diagnostic)]
pub enum Diagnostic {
    // lexical and syntactic
    #[error("Bad character input: '{character}'")]
    BadCharacter {
        character: char,

        #[label("here")]
        span: Span,
    },

    #[error("Unterminated string literal")]
    UnterminatedString {
        #[label("starts here")]
        span: Span,
    },

    #[error("The number {text} is not a valid integer")]
    InvalidNumber {
        text: String,

        #[label("this literal")]
        span: Span,
    },

    #[error("Unexpected token '{found}'")]
    UnexpectedToken {
        found: String,

        #[help]
        expected: Option<String>,

        #[label("here")]
        span: Span,
    },

    #[error("Found an unclosed delimiter: {delimiter}")]
    #[diagnostic(help("Must be closed before: {must_close_before}"))]
    UnclosedDelimiter {
        delimiter: String,
        must_close_before: String,

        #[label("unclosed delimiter")]
        span: Span,
    },

    // semantic
    #[error("Variable '{name}' does not exist")]
    UndefinedVariable {
        name: String,

        #[label("unknown name")]
        span: Span,
    },

    #[error("'{name}' is not a variable")]
    NotAVariable {
        name: String,

        #[label("this name")]
        span: Span,
    },

    #[error("Function '{name}' does not exist")]
    UndefinedFunction {
        name: String,

        #[label("unknown name")]
        span: Span,
    },

    #[error("'{name}' is not a function")]
    NotAFunction {
        name: String,

        #[label("this name")]
        span: Span,
    },

    #[error("Type '{name}' does not exist")]
    UndefinedType {
        name: String,

        #[label("unknown type")]
        span: Span,
    },

    #[error("'{name}' has already been declared")]
    AlreadyDeclared {
        name: String,

        #[label("redeclared here")]
        span: Span,
    },

    #[error("A parameter with the name '{name}' has already been declared")]
    ParameterAlreadyDeclared {
        name: String,

        #[label("redeclared here")]
        span: Span,
    },

    #[error("Variable '{name}' is a constant and cannot be assigned to")]
    CannotAssign {
        name: String,

        #[label("assignment target")]
        span: Span,
    },

    #[error("Cannot convert from type '{from}' to '{to}'")]
    CannotConvert {
        from: Type,
        to: Type,

        #[label("this expression")]
        span: Span,
    },

    #[error("Cannot convert implicitly from type '{from}' to '{to}' (are you missing a cast?)")]
    CannotConvertImplicitly {
        from: Type,
        to: Type,

        #[label("this expression")]
        span: Span,
    },

    #[error("Unary operator '{operator}' is not defined for type '{operand}'")]
    UndefinedUnaryOperator {
        operator: UnaryOperator,
        operand: Type,

        #[label("this operator")]
        span: Span,
    },

    #[error("Binary operator '{operator}' is not defined for types '{left}' and '{right}'")]
    UndefinedBinaryOperator {
        operator: BinaryOperator,
        left: Type,
        right: Type,

        #[label("this operator")]
        span: Span,
    },

    #[error("Function '{name}' expects {expected} arguments, but received {actual}")]
    WrongArgumentCount {
        name: String,
        expected: usize,
        actual: usize,

        #[label("this call")]
        span: Span,
    },

    #[error("Parameter '{name}' expects a value of type '{expected}' but was provided a value of type '{actual}'")]
    WrongArgumentType {
        name: String,
        expected: Type,
        actual: Type,

        #[label("this argument")]
        span: Span,
    },

    #[error("'{keyword}' can only be used within a loop")]
    InvalidBreakOrContinue {
        keyword: &'static str,

        #[label("outside any loop")]
        span: Span,
    },

    #[error("The 'return' keyword can only be used within a function")]
    InvalidReturn {
        #[label("here")]
        span: Span,
    },

    #[error("An expression of type '{return_type}' was expected")]
    MissingReturnExpression {
        return_type: Type,

        #[label("missing expression")]
        span: Span,
    },

    #[error("Function '{name}' does not have a return value and hence cannot be followed by an expression")]
    InvalidReturnExpression {
        name: String,

        #[label("unexpected expression")]
        span: Span,
    },

    #[error("Not all code paths return a value")]
    AllPathsMustReturn {
        #[label("this function")]
        span: Span,
    },

    #[error("Expression must have a value")]
    ExpressionMustHaveValue {
        #[label("this expression")]
        span: Span,
    },
}

impl Diagnostic {
    /// The source range this diagnostic is anchored to
    pub fn span(&self) -> Span {
        match self {
            Diagnostic::BadCharacter { span, .. }
            | Diagnostic::UnterminatedString { span }
            | Diagnostic::InvalidNumber { span, .. }
            | Diagnostic::UnexpectedToken { span, .. }
            | Diagnostic::UnclosedDelimiter { span, .. }
            | Diagnostic::UndefinedVariable { span, .. }
            | Diagnostic::NotAVariable { span, .. }
            | Diagnostic::UndefinedFunction { span, .. }
            | Diagnostic::NotAFunction { span, .. }
            | Diagnostic::UndefinedType { span, .. }
            | Diagnostic::AlreadyDeclared { span, .. }
            | Diagnostic::ParameterAlreadyDeclared { span, .. }
            | Diagnostic::CannotAssign { span, .. }
            | Diagnostic::CannotConvert { span, .. }
            | Diagnostic::CannotConvertImplicitly { span, .. }
            | Diagnostic::UndefinedUnaryOperator { span, .. }
            | Diagnostic::UndefinedBinaryOperator { span, .. }
            | Diagnostic::WrongArgumentCount { span, .. }
            | Diagnostic::WrongArgumentType { span, .. }
            | Diagnostic::InvalidBreakOrContinue { span, .. }
            | Diagnostic::InvalidReturn { span }
            | Diagnostic::MissingReturnExpression { span, .. }
            | Diagnostic::InvalidReturnExpression { span, .. }
            | Diagnostic::AllPathsMustReturn { span }
            | Diagnostic::ExpressionMustHaveValue { span } => *span,
        }
    }
}

/// A batch of diagnostics tied to the source text they came from, for
/// rendering with miette
#[derive(Debug, Error, miette::Diagnostic)]
#[error("Problems were found in the submitted code")]
pub struct DiagnosticReport {
    #[related]
    diagnostics: Vec<Diagnostic>,

    #[source_code]
    src_code: String,
}

impl DiagnosticReport {
    pub fn new(diagnostics: Vec<Diagnostic>, source: impl Into<String>) -> Self {
        Self {
            diagnostics,
            src_code: source.into(),
        }
    }
}

/// Derive the 1-based line and column of a byte offset
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (position, character) in source.char_indices() {
        if position >= offset {
            break;
        }
        if character == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_column_derivation() {
        let source = "one\ntwo\nthree";
        assert_eq!(line_column(source, 0), (1, 1));
        assert_eq!(line_column(source, 2), (1, 3));
        assert_eq!(line_column(source, 4), (2, 1));
        assert_eq!(line_column(source, 9), (3, 2));
    }
}

//! Parsing
//!
//! This module is responsible for turning the source code from its string
//! form into a syntax tree. The main interface is [parse] which takes a
//! string and produces an [ast::CompilationUnit].
//!
//! Internally, parsing works in two phases:
//! - the [lexer] scans the source text and turns it into a stream of tokens
//! - the [parser] builds the syntax tree from these tokens
//!
//! The module relies heavily on the [chumsky] crate for lexing and parsing.
//! Problems are reported as ordinary [Diagnostic]s, never as errors of the
//! pipeline itself.

use chumsky::error::SimpleReason;
use chumsky::{prelude::*, Stream};

use crate::ast;
use crate::common::Span;
use crate::diagnostics::Diagnostic;

mod lexer;
mod parser;

pub(crate) type Spanned<T> = (T, Span);

type ParseErr<T> = Simple<T, Span>;

/// Parse source code into a syntax tree
pub fn parse(source: &str) -> Result<ast::CompilationUnit, Vec<Diagnostic>> {
    let end_of_input = Span::marker(source.chars().count());

    let char_iter = source
        .chars()
        .enumerate()
        .map(|(i, c)| (c, Span::single(i)));

    let (tokens, lex_errs) =
        lexer::lex().parse_recovery(Stream::from_iter(end_of_input, char_iter));

    let parse_errs = if let Some(tokens) = tokens {
        let (unit, parse_errs) =
            parser::parser().parse_recovery(Stream::from_iter(end_of_input, tokens.into_iter()));

        if let Some(unit) = unit.filter(|_| lex_errs.len() + parse_errs.len() == 0) {
            return Ok(unit);
        }

        parse_errs
    } else {
        Vec::new()
    };

    let diagnostics = lex_errs
        .into_iter()
        .map(lex_diagnostic)
        .chain(parse_errs.into_iter().map(parse_diagnostic))
        .collect();

    Err(diagnostics)
}

/// Turn a chumsky lexing error into a diagnostic
fn lex_diagnostic(err: ParseErr<char>) -> Diagnostic {
    match err.reason() {
        SimpleReason::Custom(text) => Diagnostic::InvalidNumber {
            text: text.clone(),
            span: err.span(),
        },
        _ => match err.found() {
            Some(&character) if !matches!(character, '\n' | '\r') => Diagnostic::BadCharacter {
                character,
                span: err.span(),
            },
            _ if err.expected().any(|c| *c == Some('"')) => Diagnostic::UnterminatedString {
                span: err.span(),
            },
            Some(&character) => Diagnostic::BadCharacter {
                character,
                span: err.span(),
            },
            None => Diagnostic::UnexpectedToken {
                found: String::from("end of file"),
                expected: None,
                span: err.span(),
            },
        },
    }
}

/// Turn a chumsky parsing error into a diagnostic
fn parse_diagnostic(err: ParseErr<lexer::Token>) -> Diagnostic {
    let found = match err.found() {
        Some(token) => token.to_string(),
        None => String::from("end of file"),
    };

    match err.reason() {
        SimpleReason::Unclosed { span, delimiter } => Diagnostic::UnclosedDelimiter {
            delimiter: delimiter.to_string(),
            must_close_before: found,
            span: *span,
        },
        SimpleReason::Custom(msg) => Diagnostic::UnexpectedToken {
            found: msg.clone(),
            expected: None,
            span: err.span(),
        },
        SimpleReason::Unexpected => {
            let expected = if err.expected().len() == 0 {
                None
            } else {
                let toks: Vec<_> = err
                    .expected()
                    .map(|tok| match tok {
                        Some(tok) => tok.to_string(),
                        None => String::from("end of file"),
                    })
                    .collect();

                let mut help_string = toks.join(", ");
                help_string.insert_str(0, "Expected one of: ");

                Some(help_string)
            };

            Diagnostic::UnexpectedToken {
                found,
                expected,
                span: err.span(),
            }
        }
    }
}

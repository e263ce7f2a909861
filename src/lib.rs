//! prosa
//!
//! An interpreter for a small imperative scripting language whose
//! operators are spelled out in words (`4 multiplied by 2`,
//! `x represents 10`, `a is greater than b`), with `:` and `.` as block
//! delimiters.
//!
//! The pipeline runs in four stages: [parse] turns source text into a
//! syntax tree, the binder resolves names and types into a bound tree
//! while collecting [Diagnostic]s, lowering flattens structured control
//! flow into labels and gotos, and the evaluator walks the lowered
//! program. [Compilation] ties the stages together and supports REPL
//! continuation via [Compilation::continue_with].

pub mod ast;
mod binding;
mod common;
mod compilation;
mod diagnostics;
mod eval;
pub mod flow;
mod lowering;
mod parsing;
pub mod repl;
mod symbols;
mod value;

pub use binding::{
    bind_binary, bind_unary, BinaryOperatorKind, BinarySignature, BoundBlockStatement,
    BoundExpression, BoundProgram, BoundStatement, FunctionBody, Label, UnaryOperatorKind,
    UnarySignature,
};
pub use common::Span;
pub use compilation::{Compilation, EvaluationResult};
pub use diagnostics::{line_column, Diagnostic, DiagnosticReport};
pub use eval::{RuntimeError, Variables};
pub use parsing::parse;
pub use symbols::{
    FunctionSymbol, SymbolCounter, SymbolId, Type, VariableKind, VariableSymbol,
};
pub use value::Value;

//! Compilation
//!
//! The pipeline object tying binding, lowering and evaluation together. A
//! [Compilation] is immutable once constructed; the REPL chains runs with
//! [Compilation::continue_with], which hands the previous program's
//! globals, functions and symbol counter into the next binder pass.

use std::io::{self, Write};

use tracing::debug;

use crate::ast;
use crate::binding::{self, BoundBlockStatement, BoundProgram, BoundStatement};
use crate::diagnostics::Diagnostic;
use crate::eval::{Evaluator, RuntimeError, Variables};
use crate::flow::ControlFlowGraph;
use crate::symbols::Type;
use crate::value::Value;

/// What one run produced: a value (if the submission had one) or the
/// diagnostics that prevented it from running
#[derive(Debug)]
pub struct EvaluationResult {
    pub value: Option<Value>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Compilation {
    program: BoundProgram,
}

impl Compilation {
    pub fn new(unit: &ast::CompilationUnit) -> Self {
        Self::bind(None, unit)
    }

    /// Bind a new submission on top of this one (REPL continuation)
    pub fn continue_with(&self, unit: &ast::CompilationUnit) -> Self {
        Self::bind(Some(&self.program), unit)
    }

    fn bind(previous: Option<&BoundProgram>, unit: &ast::CompilationUnit) -> Self {
        let program = binding::bind_program(previous, unit);
        debug!(
            functions = program.submitted_functions.len(),
            diagnostics = program.diagnostics.len(),
            "binding finished"
        );
        Compilation { program }
    }

    pub fn program(&self) -> &BoundProgram {
        &self.program
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.program.diagnostics
    }

    /// Execute the program against a variable store
    ///
    /// A program that carries diagnostics is never executed; its
    /// diagnostics come back unchanged and the value stays absent.
    pub fn evaluate(&self, variables: &mut Variables) -> Result<EvaluationResult, RuntimeError> {
        if !self.program.diagnostics.is_empty() {
            return Ok(EvaluationResult {
                value: None,
                diagnostics: self.program.diagnostics.clone(),
            });
        }

        let value = Evaluator::new(&self.program, variables).evaluate()?;
        let value = value.filter(|value| !matches!(value, Value::Unit));

        Ok(EvaluationResult {
            value,
            diagnostics: Vec::new(),
        })
    }

    /// Write the lowered bound program, one statement per line
    pub fn emit_program(&self, out: &mut dyn io::Write) -> io::Result<()> {
        for function in &self.program.submitted_functions {
            let symbol = &function.function;
            write!(out, "function {}(", symbol.name)?;
            for (i, parameter) in symbol.parameters.iter().enumerate() {
                if i > 0 {
                    write!(out, ", ")?;
                }
                write!(out, "{} as {}", parameter.name, parameter.ty)?;
            }
            write!(out, ")")?;
            if symbol.return_type != Type::Void {
                write!(out, " as {}", symbol.return_type)?;
            }
            writeln!(out)?;
            emit_block(out, &function.body)?;
        }

        emit_block(out, &self.program.statement)
    }

    /// Write the control-flow graphs in Graphviz dot form
    pub fn emit_graphs(&self, out: &mut dyn io::Write) -> io::Result<()> {
        for function in &self.program.submitted_functions {
            ControlFlowGraph::new(&function.body).write_dot(out)?;
        }
        if !self.program.statement.statements.is_empty() {
            ControlFlowGraph::new(&self.program.statement).write_dot(out)?;
        }
        Ok(())
    }
}

fn emit_block(out: &mut dyn io::Write, block: &BoundBlockStatement) -> io::Result<()> {
    for statement in &block.statements {
        match statement {
            BoundStatement::Label(_) => writeln!(out, "{statement}")?,
            _ => writeln!(out, "    {statement}")?,
        }
    }
    Ok(())
}

//! Interactive REPL
//!
//! Submissions accumulate line by line until they parse, then run against
//! the persisted variable store. A submission that evaluates cleanly
//! becomes the "previous" compilation, so later submissions see its
//! globals and functions; one with diagnostics is discarded, preserving
//! the illusion of a still-valid prior state.

use miette::{IntoDiagnostic, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::compilation::Compilation;
use crate::diagnostics::DiagnosticReport;
use crate::eval::Variables;
use crate::parsing;

pub fn run() -> Result<()> {
    let mut editor = DefaultEditor::new().into_diagnostic()?;
    let mut variables = Variables::new();
    let mut previous: Option<Compilation> = None;
    let mut buffer = String::new();
    let mut show_tree = false;
    let mut show_program = false;

    loop {
        let prompt = if buffer.is_empty() { "> " } else { "· " };
        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).into_diagnostic(),
        };

        let is_blank = line.trim().is_empty();

        if buffer.is_empty() {
            match line.trim() {
                "" => break,
                "/showtree" => {
                    show_tree = !show_tree;
                    println!(
                        "{}",
                        if show_tree {
                            "Now showing parse trees"
                        } else {
                            "No longer showing parse trees"
                        }
                    );
                    continue;
                }
                "/showprogram" => {
                    show_program = !show_program;
                    println!(
                        "{}",
                        if show_program {
                            "Now showing bound tree"
                        } else {
                            "No longer showing bound tree"
                        }
                    );
                    continue;
                }
                "/cls" => {
                    print!("\x1b[2J\x1b[H");
                    continue;
                }
                "/reset" => {
                    previous = None;
                    variables.clear();
                    continue;
                }
                _ => {}
            }
        }

        buffer.push_str(&line);
        buffer.push('\n');

        let unit = match parsing::parse(&buffer) {
            Ok(unit) => unit,
            Err(diagnostics) => {
                // an incomplete submission keeps accumulating; a blank
                // line forces the problems out
                if !is_blank {
                    continue;
                }
                let report = DiagnosticReport::new(diagnostics, buffer.clone());
                eprintln!("{:?}", miette::Report::new(report));
                buffer.clear();
                continue;
            }
        };

        let source = std::mem::take(&mut buffer);
        let _ = editor.add_history_entry(source.trim());

        if show_tree {
            unit.pretty_print().into_diagnostic()?;
        }

        let compilation = match &previous {
            Some(previous) => previous.continue_with(&unit),
            None => Compilation::new(&unit),
        };

        if show_program {
            compilation
                .emit_program(&mut std::io::stdout())
                .into_diagnostic()?;
        }

        match compilation.evaluate(&mut variables) {
            Ok(result) => {
                if result.diagnostics.is_empty() {
                    if let Some(value) = result.value {
                        println!("{value}");
                    }
                    previous = Some(compilation);
                } else {
                    let report = DiagnosticReport::new(result.diagnostics, source);
                    eprintln!("{:?}", miette::Report::new(report));
                }
            }
            Err(fault) => eprintln!("{:?}", miette::Report::new(fault)),
        }
    }

    Ok(())
}

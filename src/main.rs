use std::fs;
use std::path::PathBuf;

use miette::{bail, IntoDiagnostic, Result};

use clap::{Parser, ValueEnum};

use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use prosa::{parse, repl, Compilation, DiagnosticReport, Variables};

#[derive(Debug, Parser)]
#[command(version, about = None, long_about = None)]
#[command(propagate_version = true)]
struct CliArgs {
    /// Path to the source code file; starts the REPL when omitted
    input_file: Option<PathBuf>,

    /// Execution mode
    #[arg(value_enum)]
    #[arg(short, long)]
    #[arg(default_value_t = ExecutionMode::Run)]
    mode: ExecutionMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExecutionMode {
    /// Run the program
    Run,

    /// Inspect the AST of the parsed source code
    Parse,

    /// Inspect the lowered bound program
    Program,

    /// Inspect the control-flow graphs in Graphviz dot form
    Graph,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().without_time())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let args = CliArgs::parse();

    let Some(input_file) = args.input_file else {
        return repl::run();
    };

    if !input_file.is_file() {
        bail!("No proper input file: {:?}", input_file);
    }

    let source = fs::read_to_string(&input_file).into_diagnostic()?;
    let unit = match parse(&source) {
        Ok(unit) => {
            info!("Parsing successful");
            unit
        }
        Err(diagnostics) => return Err(DiagnosticReport::new(diagnostics, source).into()),
    };

    if args.mode == ExecutionMode::Parse {
        unit.pretty_print().into_diagnostic()?;
        return Ok(());
    }

    let compilation = Compilation::new(&unit);

    match args.mode {
        ExecutionMode::Program => {
            compilation
                .emit_program(&mut std::io::stdout())
                .into_diagnostic()?;
            return Ok(());
        }
        ExecutionMode::Graph => {
            compilation
                .emit_graphs(&mut std::io::stdout())
                .into_diagnostic()?;
            return Ok(());
        }
        ExecutionMode::Run | ExecutionMode::Parse => {}
    }

    if !compilation.diagnostics().is_empty() {
        return Err(DiagnosticReport::new(compilation.diagnostics().to_vec(), source).into());
    }

    let mut variables = Variables::new();
    let result = compilation
        .evaluate(&mut variables)
        .map_err(miette::Report::new)?;

    if let Some(value) = result.value {
        println!("{value}");
    }

    Ok(())
}

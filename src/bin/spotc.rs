// src/bin/spotc.rs

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use spot::{CompileError, EmitOptions, LineIndex};
use tracing_subscriber::EnvFilter;

/// Compile class-extended Pawn into plain Pawn
#[derive(Parser)]
#[command(name = "spotc")]
#[command(about = "SPOT to Pawn compiler", long_about = None)]
#[command(version)]
struct Cli {
    /// Input source file
    input: PathBuf,

    /// Write output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Do not prefix generated functions with `stock`
    #[arg(long)]
    no_stock: bool,

    /// Indent with N spaces instead of a tab
    #[arg(long, value_name = "N")]
    indent_spaces: Option<usize>,

    /// Start the output with a generated-by comment
    #[arg(long)]
    banner: bool,
}

impl Cli {
    fn emit_options(&self) -> EmitOptions {
        let options = EmitOptions {
            stock: !self.no_stock,
            banner: self.banner,
            ..EmitOptions::default()
        };
        match self.indent_spaces {
            Some(width) => options.with_indent_spaces(width),
            None => options,
        }
    }
}

fn main() -> ExitCode {
    // Initialize tracing if SPOTC_LOG is set
    if let Ok(filter) = EnvFilter::try_from_env("SPOTC_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let source = spot::read_source(&cli.input)?;

    let output = spot::compile(&source, &cli.emit_options())
        .map_err(|err| located(&cli.input, &source, err))?;

    match &cli.output {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write '{}'", path.display()))?,
        None => print!("{output}"),
    }
    Ok(())
}

/// Prefix a compile error with `file:line:column` when it has a location.
fn located(path: &Path, source: &str, err: CompileError) -> anyhow::Error {
    let Some(range) = err.range() else {
        return err.into();
    };
    let position = LineIndex::new(source).line_col(range.start());
    anyhow::Error::new(err).context(format!(
        "{}:{}:{}",
        path.display(),
        position.line + 1,
        position.col + 1
    ))
}

//! Component Compiler CLI
//!
//! Usage:
//!   component-compiler [OPTIONS] [TEMPLATE]
//!
//! Options:
//!   -c, --components <FILE>  Component source file (repeatable)
//!       --config <FILE>      Compiler configuration (TOML format)
//!       --diagnostics-only   Report diagnostics without printing generated code
//!   -v, --verbose            Enable debug logging
//!   -h, --help               Print help

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use component_compiler::{compile_with_config, CompileError, CompilerConfig, SourceOrigin};

#[derive(Parser)]
#[command(name = "component-compiler")]
#[command(about = "Compile component templates and report generic type inference diagnostics")]
struct Cli {
    /// Template file (reads from stdin if not provided)
    template: Option<PathBuf>,

    /// Component source files whose declarations the template can use
    #[arg(short, long = "components", value_name = "FILE")]
    components: Vec<PathBuf>,

    /// Compiler configuration file (TOML format)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report diagnostics without printing generated code
    #[arg(long)]
    diagnostics_only: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

/// A named input file and its contents
struct Input {
    name: String,
    text: String,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_file(path: &Path) -> Result<Input, String> {
    fs::read_to_string(path)
        .map(|text| Input {
            name: path.display().to_string(),
            text,
        })
        .map_err(|e| format!("Error reading file '{}': {}", path.display(), e))
}

fn read_template(path: Option<&Path>) -> Result<Input, String> {
    match path {
        Some(path) => read_file(path),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("Error reading from stdin: {}", e))?;
            Ok(Input {
                name: "<stdin>".to_string(),
                text,
            })
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

/// Compile and report; returns whether compilation was clean
fn run(cli: &Cli) -> Result<bool, String> {
    let config = match &cli.config {
        Some(path) => CompilerConfig::from_file(path)
            .map_err(|e| format!("Error loading config '{}': {}", path.display(), e))?,
        None => CompilerConfig::default(),
    };

    let components = cli
        .components
        .iter()
        .map(|p| read_file(p))
        .collect::<Result<Vec<_>, _>>()?;
    let template = read_template(cli.template.as_deref())?;
    debug!(
        template = %template.name,
        components = components.len(),
        "compiling"
    );

    let component_sources: Vec<&str> = components.iter().map(|c| c.text.as_str()).collect();
    let color = config.diagnostics.color;

    let output = match compile_with_config(&template.text, &component_sources, &config) {
        Ok(output) => output,
        Err(err) => {
            let input = match err.origin() {
                SourceOrigin::Template => &template,
                SourceOrigin::Components(i) => &components[i],
            };
            match &err {
                CompileError::Parse { errors, .. } => {
                    for e in errors {
                        eprint!("{}", e.format_with_color(&input.text, &input.name, color));
                    }
                }
                CompileError::Registry { error, .. } => {
                    eprint!("{}", error.format_with_color(&input.text, &input.name, color));
                }
            }
            return Ok(false);
        }
    };

    for diagnostic in &output.diagnostics {
        eprint!("{}", diagnostic.format(&template.text, &template.name, color));
    }

    if !cli.diagnostics_only {
        print!("{}", output.generated);
    }

    Ok(!output.has_errors())
}

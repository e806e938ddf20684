//! dato compiler - CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dato::backends::{Backend, DoilBackend, JsonBackend, NativeBackend};
use dato::frontend::config::{CompileConfig, OptLevel};
use dato::util::diagnostic::{codes, Diagnostic};
use dato::util::logger::{self, LogLevel};
use dato::vm::Vm;
use dato::{Compilation, Compiler, NAME, VERSION};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Compiler for the segmented DOIL source language
#[derive(Parser, Debug)]
#[command(name = "dato")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a source file and print the requested stage
    Build {
        /// Source file to compile
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// What to print
        #[arg(long, value_enum, default_value_t = Emit::Doil)]
        emit: Emit,

        /// Code generation target
        #[arg(long, value_enum, default_value_t = Target::Doil)]
        target: Target,

        /// Disable optimization
        #[arg(long = "O0")]
        no_opt: bool,

        /// RON configuration file
        #[arg(long, value_name = "CONFIG")]
        config: Option<PathBuf>,
    },

    /// Compile and evaluate a source file
    Run {
        /// Source file to run
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Evaluate code from the command line
    Eval {
        /// Code to evaluate
        #[arg(value_name = "CODE")]
        code: String,
    },

    /// Check a source file for errors and warnings
    Check {
        /// Source file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    Tokens,
    Ast,
    Doil,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Target {
    Doil,
    Native,
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

fn load_config(
    path: Option<&Path>,
    no_opt: bool,
) -> Result<CompileConfig> {
    let mut config = match path {
        Some(path) => CompileConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => CompileConfig::default(),
    };
    if no_opt {
        config = config.with_opt_level(OptLevel::O0);
    }
    Ok(config)
}

fn report(
    diagnostics: &[Diagnostic],
    config: &CompileConfig,
) {
    for diagnostic in diagnostics {
        if diagnostic.severity.is_error() {
            if config.should_show_errors() {
                eprintln!("{}", diagnostic.red().bold());
            }
        } else if config.should_show_warnings() {
            eprintln!("{}", diagnostic.yellow());
        }
    }
}

/// Compile and report diagnostics; a failed compilation is reported as an error
fn compile_reported(
    compiler: &Compiler,
    source: &[u8],
    label: &str,
) -> Result<Compilation> {
    match compiler.compile(source) {
        Ok(compilation) => {
            report(&compilation.warnings, compiler.config());
            Ok(compilation)
        }
        Err(e) => {
            let diagnostic = Diagnostic::error(codes::COMPILE_ERROR, e.to_string(), None);
            report(&[diagnostic], compiler.config());
            bail!("Failed to compile: {}", label)
        }
    }
}

fn build(
    file: &Path,
    emit: Emit,
    target: Target,
    config: CompileConfig,
) -> Result<()> {
    let source = read_source(file)?;
    let compiler = Compiler::with_config(config);

    match emit {
        Emit::Tokens => {
            for token in compiler.lex(&source)? {
                println!("{}", token);
            }
        }
        Emit::Ast => print!("{}", compiler.parse(&source)?),
        Emit::Doil | Emit::Json => {
            let compilation = compile_reported(&compiler, &source, &file.display().to_string())?;
            let backend: Box<dyn Backend> = match (target, emit) {
                (Target::Native, _) => Box::new(NativeBackend),
                (Target::Doil, Emit::Json) => Box::new(JsonBackend { pretty: true }),
                (Target::Doil, _) => Box::new(DoilBackend),
            };
            let output = backend.emit(&compilation.code)?;
            print!("{}", output);
            if emit == Emit::Json {
                println!();
            }
        }
    }
    Ok(())
}

fn execute(
    source: &[u8],
    label: &str,
) -> Result<()> {
    let compiler = Compiler::new();
    let compilation = compile_reported(&compiler, source, label)?;
    match Vm::new().execute(&compilation.code)? {
        Some(value) => println!("{}", value),
        None => println!("(no value)"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // warnings are printed by `report`, so quiet logging stops at errors
    let level = if args.verbose { LogLevel::Debug } else { LogLevel::Error };
    logger::init_with_level(level);

    match args.command {
        Commands::Build {
            file,
            emit,
            target,
            no_opt,
            config,
        } => {
            let config = load_config(config.as_deref(), no_opt)?;
            build(&file, emit, target, config)?;
        }
        Commands::Run { file } => {
            let source = read_source(&file)?;
            execute(&source, &file.display().to_string())?;
        }
        Commands::Eval { code } => {
            execute(code.as_bytes(), "<eval>")?;
        }
        Commands::Check { file } => {
            let source = read_source(&file)?;
            let compiler = Compiler::new();
            let compilation = compile_reported(&compiler, &source, &file.display().to_string())?;
            if compilation.warnings.is_empty() {
                eprintln!("{}", "Check passed!".green());
            } else {
                bail!("{} warning(s) in {}", compilation.warnings.len(), file.display());
            }
        }
    }

    Ok(())
}

//! pseu-drv - the CLI driver.
//!
//! Wires the pipeline (`pseu-par` -> `pseu-bc` -> `pseu-rt`) together,
//! parses command-line flags, configures logging, and implements the
//! `vm_new`/`vm_eval`-equivalent embedding surface described in spec.md
//! §6 as an ordinary Rust API. Grounded in `faxt`'s `clap`-derive CLI
//! shape (`faxt/src/main.rs`) rather than `faxc-drv`'s own driver, since
//! this language has no separate object/link phases to model.

mod disasm;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use pseu_rt::{RuntimeError, Vm, VmConfig};
use pseu_sem::SymbolTable;
use pseu_util::{Handler, SymbolInterner};

#[derive(Parser, Debug)]
#[command(name = "pseu")]
#[command(author = "pseu contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lexer, parser, compiler, and VM for a small uppercase-keyword pseudocode language")]
struct Cli {
    /// Print the parsed AST before compiling.
    #[arg(long, global = true)]
    dump_ast: bool,

    /// Print a disassembly of the compiled bytecode before running.
    #[arg(long, global = true)]
    dump_bytecode: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile and run a source file.
    Run { file: PathBuf },

    /// Parse and compile a source file without running it.
    Check { file: PathBuf },
}

/// Exit codes (spec.md §6): 0 success, 1 compile error, 2 runtime error.
const EXIT_SUCCESS: u8 = 0;
const EXIT_COMPILE_ERROR: u8 = 1;
const EXIT_RUNTIME_ERROR: u8 = 2;

pub fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let (file, run_after_compile) = match &cli.command {
        Commands::Run { file } => (file, true),
        Commands::Check { file } => (file, false),
    };

    let source = match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: could not read {}: {err}", file.display());
            return ExitCode::from(EXIT_COMPILE_ERROR);
        }
    };

    ExitCode::from(run_source(&source, file, &cli, run_after_compile))
}

fn run_source(source: &str, file: &Path, cli: &Cli, run_after_compile: bool) -> u8 {
    let mut interner = SymbolInterner::new();
    let (mut symbols, builtins) = SymbolTable::with_builtins(&mut interner);
    let mut handler = Handler::new();

    log::debug!("parsing {}", file.display());
    let ast = pseu_par::parse(source, &mut handler, &mut interner);

    if cli.dump_ast {
        println!("{ast:#?}");
    }

    log::debug!("compiling {}", file.display());
    let program = pseu_bc::compile(&ast, &mut symbols, &mut interner, &mut handler, builtins);

    if handler.has_errors() {
        for diag in handler.diagnostics() {
            eprintln!("{diag}");
        }
        return EXIT_COMPILE_ERROR;
    }

    if cli.dump_bytecode {
        print!("{}", disasm::disassemble_program(&program));
    }

    if !run_after_compile {
        return EXIT_SUCCESS;
    }

    let config = VmConfig { print: Box::new(|text| print!("{text}")) };
    let mut vm = Vm::new(&symbols, &interner, builtins, config);

    log::debug!("evaluating {}", file.display());
    match vm.eval(&program) {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => {
            eprintln!("runtime error: {}", format_runtime_error(&err));
            EXIT_RUNTIME_ERROR
        }
    }
}

fn format_runtime_error(err: &RuntimeError) -> String {
    err.to_string()
}

use anyhow::{Context, Result};
use brisk::{compile, Compilation, Emit};
use clap::Parser;
use console::style;
use log::LevelFilter;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

/// Lexes and parses Brisk programs.
#[derive(Debug, Parser)]
#[command(name = "brisk", version)]
struct Options {
    /// Source file. Starts an interactive prompt if omitted.
    file: Option<PathBuf>,

    /// What to print once the file is parsed.
    #[arg(long, value_enum, default_value_t = Emit::Tree)]
    emit: Emit,

    /// Log more (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let options = Options::parse();

    let level = match options.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let result = match &options.file {
        Some(path) => run_file(path, options.emit),
        None => repl(options.emit).map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("{} {:#}", style("error:").red().bold().for_stderr(), err);
            process::exit(1);
        }
    }
}

/// Compiles the file at `path`. Returns `false` if it has errors.
fn run_file(path: &Path, emit: Emit) -> Result<bool> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("could not read `{}`", path.display()))?;

    let compilation = compile(&path.display().to_string(), &content);
    report(&compilation, emit);

    if !compilation.is_ok() {
        eprintln!(
            "{} could not compile `{}` due to {} previous error{}",
            style("error:").red().bold().for_stderr(),
            path.display(),
            compilation.error_count(),
            if compilation.error_count() == 1 { "" } else { "s" }
        );
    }
    Ok(compilation.is_ok())
}

/// Reads one program per line until end of input.
fn repl(emit: Emit) -> Result<()> {
    let mut stdout = io::stdout();
    let stdin = io::stdin();
    loop {
        print!("> ");
        stdout.flush().context("could not write prompt")?;

        let mut input = String::new();
        let read = stdin
            .read_line(&mut input)
            .context("could not read from stdin")?;
        if read == 0 {
            println!();
            return Ok(());
        }
        if input.trim().is_empty() {
            continue;
        }

        let compilation = compile("<repl>", &input);
        report(&compilation, emit);
    }
}

/// Prints diagnostics to stderr and the requested output to stdout.
fn report(compilation: &Compilation, emit: Emit) {
    for diagnostic in compilation.diagnostics() {
        eprintln!(
            "{} {}",
            style("error:").red().bold().for_stderr(),
            diagnostic
        );
    }
    print!("{}", compilation.emit(emit));
}

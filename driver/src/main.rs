use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser; // clap crate for CLI argument parsing
use driver::{CompileError, DEFAULT_RUNTIME, compile, parse_only, scan_only};
use model::TargetConfig;
use tracing_subscriber::EnvFilter;

/*
Without an input path the compiler starts a REPL where every line is
compiled as a whole program. `-s` and `-p` stop after the scanner and the
parser and print their traces to stdout instead of writing a module.
*/

#[derive(Parser, Debug)]
#[command(version, about = "Mini-PL to WebAssembly text compiler", long_about = None)]
struct Args {
    /// Path to the Mini-PL source file
    input_path: Option<PathBuf>,

    /// Run scanner only and print the token trace
    #[arg(short, long)]
    scan: bool,

    /// Run scanner and parser only and print the syntax tree
    #[arg(short, long, conflicts_with = "scan")]
    parse: bool,

    /// Where to write the generated module
    #[arg(short, long, default_value = "out.wat")]
    output: PathBuf,

    /// Runtime library text to embed instead of the bundled one
    #[arg(long)]
    runtime: Option<PathBuf>,

    /// Export name of the program's entry function
    #[arg(long, default_value = model::DEFAULT_ENTRY_EXPORT)]
    entry: String,

    /// Heap bytes per string `read`, length header included
    #[arg(long, default_value_t = model::DEFAULT_STRING_SLOT_SIZE)]
    string_slot_size: u32,
}

impl Args {
    fn target_config(&self) -> TargetConfig {
        TargetConfig::default()
            .with_entry_export(self.entry.clone())
            .with_string_slot_size(self.string_slot_size)
    }

    fn runtime_text(&self) -> anyhow::Result<String> {
        match &self.runtime {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read runtime: {}", path.display())),
            None => Ok(DEFAULT_RUNTIME.to_string()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let Some(input_path) = &args.input_path else {
        return repl(&args);
    };

    let source = fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read file: {}", input_path.display()))?;

    if args.scan {
        print!("{}", scan_only(&source));
        return Ok(());
    }
    if args.parse {
        print!("{}", parse_only(&source));
        return Ok(());
    }

    let runtime = args.runtime_text()?;
    match compile(&source, &runtime, &args.target_config()) {
        Ok(module) => {
            fs::write(&args.output, module)
                .with_context(|| format!("Failed to write module: {}", args.output.display()))?;
            tracing::info!(output = %args.output.display(), "module written");
            Ok(())
        }
        Err(err) => {
            report(&err);
            std::process::exit(1);
        }
    }
}

fn report(err: &CompileError) {
    for diagnostic in err.diagnostics() {
        eprintln!("{}", diagnostic);
    }
    if let CompileError::Parse(_) = err {
        println!("{}", err);
    }
}

fn repl(args: &Args) -> anyhow::Result<()> {
    let runtime = args.runtime_text()?;
    let config = args.target_config();
    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        input.clear();
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;
        if stdin.lock().read_line(&mut input).context("Failed to read line")? == 0 {
            println!();
            return Ok(());
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }
        match compile(line, &runtime, &config) {
            Ok(module) => print!("{}", module),
            Err(err) => report(&err),
        }
    }
}

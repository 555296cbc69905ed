use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use std::{
    fs::File,
    io::{BufReader, Write},
    path::PathBuf,
    process::exit,
};
use turtle_host::Canvas;
use turtlescript::{CaptureMode, CaptureState, Interpreter, Level, Options, ScriptError};

/// Exit code for input/output errors, as in sysexits.h.
const EX_IOERR: i32 = 74;

/// Runs a turtle script and prints what it drew.
#[derive(Parser)]
struct Args {
    /// The script to run. Reads from standard input if not given.
    input: Option<PathBuf>,
    /// Log every line, what it resolved to, and what was captured.
    #[arg(short, long)]
    verbose: bool,
    /// Which commands are available: basic or full.
    #[arg(long, default_value = "full")]
    level: Level,
    /// Whether a capture stops after one command (once) or runs until endcapture (continuous).
    #[arg(long, default_value = "once")]
    capture: CaptureMode,
    /// Don't print the drawing.
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn run(args: &Args) -> anyhow::Result<()> {
    let interp = Interpreter::new(Options {
        level: args.level,
        capture: args.capture,
    })?;
    let mut canvas = Canvas::new();
    let mut state = CaptureState::new();

    let summary = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file {}", path.display()))?;
            interp.run_reader(BufReader::new(file), &mut canvas, &mut state)?
        }
        None => interp.run_reader(std::io::stdin().lock(), &mut canvas, &mut state)?,
    };
    log::info!(
        "ran {} of {} lines with {} warnings; drawing covers {:?}",
        summary.executed,
        summary.lines,
        summary.warnings.len(),
        canvas.bounds()
    );
    for (name, val) in state.vars() {
        log::debug!("captured {name} = {val}");
    }

    if !args.quiet {
        let mut out = std::io::stdout().lock();
        for op in canvas.ops() {
            writeln!(out, "{op}")?;
        }
    }
    Ok(())
}

pub fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        let io = e.downcast_ref::<std::io::Error>().is_some()
            || e.downcast_ref::<ScriptError>().is_some();
        exit(if io { EX_IOERR } else { 1 });
    }
}

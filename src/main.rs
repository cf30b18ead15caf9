use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use expr_interpreter::{CharReader, Diagnostic, Lexer, Session};
use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Reads `name = expression ;` statements and prints the value assigned by
/// each one.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Report every token consumed by the parser.
    #[arg(short, long)]
    verbose: bool,

    /// Print all variables, sorted by name, once the input is exhausted.
    #[arg(short, long)]
    summary: bool,

    /// Read statements from this file instead of stdin.
    file: Option<PathBuf>,
}

struct LocalClock;

impl FormatTime for LocalClock {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("error: {}", diagnostic);
    }
}

fn run<I: Iterator<Item = char>>(lexer: Lexer<I>, running: &AtomicBool, summary: bool) {
    let mut session = Session::new(lexer);
    session.run(running, |outcome| {
        report(&outcome.diagnostics);
        println!("{} = {}", outcome.target, outcome.value);
    });

    let (variables, trailing) = session.finish();
    report(&trailing);

    if summary {
        println!("Variables:");
        for (name, value) in variables.sorted() {
            println!("  {} = {}", name, value);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::TRACE } else { Level::WARN })
        .with_target(false)
        .with_timer(LocalClock)
        .with_writer(io::stderr)
        .init();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
        eprintln!("\nInterrupted, stopping after the current statement.");
    })
    .context("failed to install Ctrl+C handler")?;

    match &args.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open '{}'", path.display()))?;
            run(
                Lexer::from_chars(CharReader::new(BufReader::new(file))),
                &running,
                args.summary,
            );
        }
        None => run(
            Lexer::from_chars(CharReader::new(io::stdin().lock())),
            &running,
            args.summary,
        ),
    }

    Ok(())
}

//! CLI for listing, dumping and playing step sequences in a terminal.
//!
//! Usage:
//!   viz-run list
//!   viz-run steps arrays insert --index 2 --value 10
//!   viz-run steps sorting "quick sort" --input 4,1,3 --json
//!   viz-run play tree inorder --speed 100

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::thread;
use stepviz::{
    ManualScheduler, Operation, Params, PlaybackConfig, PlaybackStatus, Step, StepSequence,
    Topic, Visualizer, generate, parse_list,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Step-by-step visualizations of data-structure and algorithm operations.
#[derive(Parser)]
#[command(name = "viz-run")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List topics and their operations
    List,

    /// Print every step of an operation
    Steps {
        #[command(flatten)]
        target: Target,

        /// Emit the sequence as JSON
        #[arg(long)]
        json: bool,
    },

    /// Auto-play an operation in real time
    Play {
        #[command(flatten)]
        target: Target,

        /// Speed dial value (higher is faster)
        #[arg(short, long)]
        speed: Option<u32>,

        /// Playback timing config (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pause after this many steps
        #[arg(long)]
        step_limit: Option<usize>,
    },
}

#[derive(Args)]
struct Target {
    /// Topic, e.g. arrays, stack, tree, sorting
    topic: Topic,

    /// Operation, e.g. insert, "bubble sort", bfs
    operation: Operation,

    /// Position, or start vertex for graphs
    #[arg(long)]
    index: Option<usize>,

    /// Value to insert, push or write
    #[arg(long)]
    value: Option<i64>,

    /// Value to search for
    #[arg(long)]
    target: Option<i64>,

    /// Comma-separated list replacing the demo collection
    #[arg(long)]
    input: Option<String>,
}

impl Target {
    fn params(&self) -> Result<Params, String> {
        let input = match &self.input {
            Some(text) => Some(parse_list(text)?),
            None => None,
        };
        Ok(Params {
            index: self.index,
            value: self.value,
            target: self.target,
            input,
        })
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::List => list(),
        Command::Steps { target, json } => steps(&target, json),
        Command::Play {
            target,
            speed,
            config,
            step_limit,
        } => play(&target, speed, config, step_limit),
    }
}

fn list() {
    for topic in Topic::ALL {
        let ops: Vec<&str> = topic.operations().iter().map(|op| op.name()).collect();
        println!("{:<12} {}", topic.key(), ops.join(", "));
    }
}

fn steps(target: &Target, json: bool) {
    let params = target.params().unwrap_or_else(|e| fail(e));
    let sequence =
        generate(target.topic, target.operation, &params).unwrap_or_else(|e| fail(e));

    if json {
        match serde_json::to_string_pretty(&sequence) {
            Ok(text) => println!("{text}"),
            Err(e) => fail(e),
        }
        return;
    }

    print_header(&sequence);
    for step in sequence.steps() {
        print_step(&sequence, step);
    }
}

fn play(target: &Target, speed: Option<u32>, config: Option<PathBuf>, step_limit: Option<usize>) {
    let params = target.params().unwrap_or_else(|e| fail(e));
    let config = match config {
        Some(path) => PlaybackConfig::from_json_file(&path).unwrap_or_else(|e| fail(e)),
        None => PlaybackConfig::default(),
    };

    let clock = ManualScheduler::new();
    let mut viz = Visualizer::with_config(clock.clone(), config);
    viz.select(target.topic, target.operation, params)
        .unwrap_or_else(|e| fail(e));
    if let Some(speed) = speed {
        viz.set_speed(speed);
    }

    let Some(sequence) = viz.sequence().cloned() else {
        fail("no sequence loaded");
    };
    print_header(&sequence);
    if let Some(step) = viz.current_step() {
        print_step(&sequence, step);
    }

    let mut shown = 1;
    viz.play();
    while viz.status() == PlaybackStatus::Running {
        if step_limit.is_some_and(|limit| shown >= limit) {
            viz.pause();
            eprintln!("Paused after {shown} steps");
            break;
        }
        let Some(wait) = clock.next_due() else {
            break;
        };
        thread::sleep(wait);
        for token in clock.advance(wait) {
            if viz.tick(token)
                && let Some(step) = viz.current_step()
            {
                print_step(&sequence, step);
                shown += 1;
            }
        }
    }
    debug!(status = ?viz.status(), shown, "playback ended");
}

fn print_header(sequence: &StepSequence) {
    println!(
        "{} / {} ({} steps)",
        sequence.topic().title(),
        sequence.operation(),
        sequence.len()
    );
    for (i, line) in sequence.code().iter().enumerate() {
        println!("  {:>2} | {line}", i + 1);
    }
    println!();
}

fn print_step(sequence: &StepSequence, step: &Step) {
    println!(
        "[{}/{}] line {}: {}",
        step.index + 1,
        sequence.len(),
        step.source_line,
        step.description
    );
    let line = (step.source_line as usize).checked_sub(1);
    if let Some(code) = line.and_then(|i| sequence.code().get(i)) {
        println!("    > {code}");
    }
    let vars: Vec<String> = step
        .snapshot
        .iter()
        .map(|(name, value)| format!("{name} = {value}"))
        .collect();
    if !vars.is_empty() {
        println!("    {}", vars.join(", "));
    }
    if let Some(note) = &step.annotation {
        println!(
            "    ({:?} {}, iteration {})",
            note.kind, note.condition, note.iteration
        );
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use crossbeam::channel;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use pagesim::engine::snapshot::EngineSnapshot;
use pagesim::playback::player::DEFAULT_STEP_DELAY;
use pagesim::{
    AddressingMode, EventLog, EventSink, MemoryLayout, PagingEngine, Playback, ReplacementPolicy,
    SimulationConfig, SimulationReport, StepEvent, StepResult,
};

const HISTORY_FILE: &str = ".pagesim_history";

#[derive(Parser)]
#[command(author, version, about = "pagesim - demand paging simulator")]
struct Cli {
    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of physical frames
    #[arg(short, long, conflicts_with = "memory_size")]
    frames: Option<usize>,

    /// Total memory size in bytes (requires --page-size)
    #[arg(long, requires = "page_size")]
    memory_size: Option<usize>,

    /// Page size in bytes (requires --memory-size)
    #[arg(long, requires = "memory_size")]
    page_size: Option<usize>,

    /// Reference interpretation: page or byte
    #[arg(long)]
    addressing: Option<AddressingMode>,

    /// Replacement algorithm: fifo, lru or optimal
    #[arg(short, long)]
    algorithm: Option<ReplacementPolicy>,

    /// TLB capacity (defaults to min(4, frames))
    #[arg(short, long)]
    tlb: Option<usize>,

    /// Number of pages in the process address space
    #[arg(long)]
    process_pages: Option<usize>,

    /// Comma separated reference string
    #[arg(short, long)]
    refs: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive shell
    Shell,

    /// Play the whole reference string
    Run {
        /// Delay between steps in milliseconds (0 = instant)
        #[arg(short, long, default_value_t = 0)]
        delay_ms: u64,

        /// Print events and the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run every replacement algorithm on the same input
    Compare,

    /// Run to completion and write a text report
    Report {
        /// Output file (defaults to a dated file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Build the simulation configuration from an optional file plus flags
fn build_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    if let Some(count) = cli.frames {
        config.layout = MemoryLayout::Frames { count };
    }
    if let (Some(memory_size), Some(page_size)) = (cli.memory_size, cli.page_size) {
        config.layout = MemoryLayout::Sized { memory_size, page_size };
    }
    if let Some(addressing) = cli.addressing {
        config.addressing = addressing;
    }
    if let Some(policy) = cli.algorithm {
        config.policy = policy;
    }
    if let Some(capacity) = cli.tlb {
        config.tlb_capacity = Some(capacity);
    }
    if let Some(pages) = cli.process_pages {
        config.process_page_count = Some(pages);
    }
    if let Some(refs) = &cli.refs {
        config.reference_string = refs.clone();
    }

    Ok(config)
}

/// Engine plus the event log shown to the user
struct Simulator {
    engine: PagingEngine,
    log: EventLog,
}

/// Prints each event as it arrives and keeps the log current
struct ConsoleSink<'a> {
    log: &'a mut EventLog,
}

impl EventSink for ConsoleSink<'_> {
    fn record(&mut self, event: &StepEvent) {
        println!("{}", event);
        self.log.record(event);
    }
}

impl Simulator {
    fn new(config: SimulationConfig) -> Result<Self> {
        let engine =
            PagingEngine::with_config(config).context("Failed to initialize simulation")?;
        let mut sim = Self { engine, log: EventLog::new() };
        sim.start_log();
        Ok(sim)
    }

    /// Fresh log for step zero, warning about any reference tokens that were dropped
    fn start_log(&mut self) {
        self.log = EventLog::new();
        self.log.info(0, "Simulation started");
        if let Some(stream) = self.engine.reference_stream() {
            for token in stream.rejected() {
                self.log.warning(0, format!("Dropped invalid reference token '{}'", token));
            }
        }
    }

    /// Apply a configuration change and restart from step zero
    fn reconfigure(&mut self, change: impl FnOnce(&mut SimulationConfig)) -> Result<()> {
        let mut config = self.engine.config().cloned().unwrap_or_default();
        change(&mut config);
        self.engine.initialize(config)?;
        self.start_log();
        Ok(())
    }

    fn step(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            match self.engine.step()? {
                StepResult::Advanced(event) => {
                    println!("{}", event);
                    self.log.record(&event);
                }
                StepResult::AlreadyCompleted => {
                    println!("Simulation already completed");
                    break;
                }
            }
        }
        if self.engine.is_completed() {
            self.finish();
        }
        Ok(())
    }

    fn play(&mut self, delay: Duration) -> Result<()> {
        let (_control, commands) = channel::unbounded();
        let mut sink = ConsoleSink { log: &mut self.log };
        let summary = Playback::with_delay(delay).run(&mut self.engine, &mut sink, &commands)?;
        println!("Played {} steps", summary.steps);
        self.finish();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.engine.reset()?;
        self.start_log();
        println!("Simulation reset");
        Ok(())
    }

    fn finish(&mut self) {
        let step = self.engine.current_step().saturating_sub(1);
        let already_logged = self
            .log
            .entries()
            .last()
            .is_some_and(|entry| entry.message == "Simulation completed");
        if !already_logged {
            self.log.info(step, "Simulation completed");
        }
    }

    fn write_report(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(SimulationReport::default_file_name(Local::now().date_naive())),
        };
        SimulationReport::new(&self.engine, &self.log)?
            .write_to(&path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        Ok(path)
    }
}

fn run_shell(sim: &mut Simulator) -> Result<()> {
    println!("Welcome to pagesim. Type 'help' for assistance or 'exit' to quit.");

    let mut rl = Editor::<(), DefaultHistory>::new()?;
    if let Err(err) = rl.load_history(HISTORY_FILE) {
        if !err.to_string().contains("No such file or directory") {
            println!("Error loading history: {}", err);
        }
    }

    loop {
        let readline = rl.readline("pagesim> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);

                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                if !dispatch(sim, line) {
                    println!("Goodbye!");
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {}", err);
                break;
            }
        }
    }

    if let Err(err) = rl.save_history(HISTORY_FILE) {
        println!("Error saving history: {}", err);
    }
    Ok(())
}

/// Run one shell command, reporting failures on screen and in the event log.
/// Returns `false` when the shell should exit.
fn dispatch(sim: &mut Simulator, line: &str) -> bool {
    match execute_command(sim, line) {
        Ok(keep_going) => keep_going,
        Err(err) => {
            println!("Error: {:#}", err);
            let step = sim.engine.current_step().saturating_sub(1);
            sim.log.error(step, format!("Error: {:#}", err));
            true
        }
    }
}

/// Run one shell command. Returns `false` when the shell should exit.
fn execute_command(sim: &mut Simulator, line: &str) -> Result<bool> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_lowercase().as_str() {
        "exit" | "quit" => return Ok(false),
        "help" => print_help(),
        "step" => {
            let count = if rest.is_empty() {
                1
            } else {
                rest.parse().context("Invalid step count")?
            };
            sim.step(count)?;
        }
        "run" => {
            let delay = if rest.is_empty() {
                DEFAULT_STEP_DELAY
            } else {
                Duration::from_millis(rest.parse().context("Invalid delay")?)
            };
            sim.play(delay)?;
        }
        "instant" => sim.play(Duration::ZERO)?,
        "reset" => sim.reset()?,
        "show" => {
            display_snapshot(&sim.engine.snapshot());
            match sim.engine.next_page() {
                Some(page) => println!("Next reference: page {}", page),
                None => println!("Next reference: -"),
            }
        }
        "stats" => display_stats(&sim.engine.snapshot()),
        "log" => {
            for line in sim.log.lines() {
                println!("{}", line);
            }
        }
        "clear" => sim.log.clear(sim.engine.current_step()),
        "report" => {
            let path = (!rest.is_empty()).then(|| PathBuf::from(rest));
            let written = sim.write_report(path.as_deref())?;
            println!("Report written to {}", written.display());
        }
        "algorithm" => {
            let policy: ReplacementPolicy = rest.parse()?;
            sim.reconfigure(|config| config.policy = policy)?;
            println!("Algorithm set to {}", policy);
        }
        "refs" => {
            let refs = rest.to_string();
            sim.reconfigure(|config| config.reference_string = refs)?;
            println!("Reference string set ({} references)", sim.engine.total_steps());
        }
        "frames" => {
            let count: usize = rest.parse().context("Invalid frame count")?;
            sim.reconfigure(|config| config.layout = MemoryLayout::Frames { count })?;
            println!("Using {} frames", count);
        }
        other => bail!("Unknown command '{}'. Type 'help' for a list of commands", other),
    }

    Ok(true)
}

fn print_help() {
    println!("Simulation commands:");
    println!("  step [n]                      - Resolve the next n references (default 1)");
    println!("  run [delay_ms]                - Play the remaining references with a delay");
    println!("  instant                       - Play the remaining references without delay");
    println!("  reset                         - Restart the simulation from step zero");
    println!();
    println!("Inspection:");
    println!("  show                          - Display frames, TLB and statistics");
    println!("  stats                         - Display statistics only");
    println!("  log                           - Print the event log");
    println!("  clear                         - Clear the event log");
    println!("  report [file]                 - Write a text report");
    println!();
    println!("Configuration (restarts the simulation):");
    println!("  algorithm <fifo|lru|optimal>  - Change the replacement algorithm");
    println!("  refs <list>                   - Change the reference string");
    println!("  frames <n>                    - Change the number of frames");
    println!();
    println!("Other commands:");
    println!("  help                          - Display this help message");
    println!("  exit                          - Exit the shell");
}

fn display_snapshot(snapshot: &EngineSnapshot) {
    let policy = snapshot.policy.map_or_else(|| "-".to_string(), |p| p.to_string());
    println!(
        "State: {} | Algorithm: {} | Step {}/{}",
        snapshot.state, policy, snapshot.current_step, snapshot.total_steps
    );

    println!("+-------+------+--------+");
    println!("| Frame | Page | Loaded |");
    println!("+-------+------+--------+");
    for frame in &snapshot.frames {
        let page = frame.occupant().map_or_else(|| "Free".to_string(), |p| p.to_string());
        let loaded = frame
            .loaded_at_step()
            .map_or_else(|| "-".to_string(), |s| (s + 1).to_string());
        println!("| {:<5} | {:<4} | {:<6} |", frame.index(), page, loaded);
    }
    println!("+-------+------+--------+");

    let tlb: Vec<String> = snapshot
        .tlb
        .iter()
        .map(|entry| format!("{}->{}", entry.page_id, entry.frame))
        .collect();
    println!("TLB (oldest first): [{}]", tlb.join(", "));

    display_stats(snapshot);
}

fn display_stats(snapshot: &EngineSnapshot) {
    let stats = &snapshot.stats;
    println!(
        "Faults: {} | Hits: {} (TLB {}) | Hit ratio: {:.0}% | Fragmentation: {:.0}%",
        stats.faults,
        stats.hits,
        stats.tlb_hits,
        (stats.hit_ratio() * 100.0).round(),
        (stats.fragmentation * 100.0).round()
    );
}

fn run_playback(config: SimulationConfig, delay_ms: u64, json: bool) -> Result<()> {
    let shared = PagingEngine::with_config(config)
        .context("Failed to initialize simulation")?
        .into_shared();
    let handle = Playback::with_delay(Duration::from_millis(delay_ms)).spawn(shared.clone());

    for event in handle.events().iter() {
        if json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            println!("{}", event);
        }
    }

    let summary = handle.join()?;
    let snapshot = shared.lock().snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("Played {} steps", summary.steps);
        display_snapshot(&snapshot);
    }
    Ok(())
}

fn run_compare(config: &SimulationConfig) -> Result<()> {
    println!("| Algorithm | Faults | Hits | Hit ratio | TLB hits | Final frames");
    println!("+-----------+--------+------+-----------+----------+-------------");
    for policy in ReplacementPolicy::ALL {
        let mut engine = PagingEngine::with_config(SimulationConfig { policy, ..config.clone() })
            .context("Failed to initialize simulation")?;
        engine.run_to_completion()?;

        let snapshot = engine.snapshot();
        let frames: Vec<String> = snapshot
            .occupancy()
            .iter()
            .map(|page| page.map_or_else(|| "-".to_string(), |p| p.to_string()))
            .collect();
        println!(
            "| {:<9} | {:<6} | {:<4} | {:>8.0}% | {:<8} | [{}]",
            policy.name(),
            snapshot.stats.faults,
            snapshot.stats.hits,
            (snapshot.stats.hit_ratio() * 100.0).round(),
            snapshot.stats.tlb_hits,
            frames.join(", ")
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = build_config(&cli).context("Failed to build configuration")?;

    match &cli.command {
        Some(Commands::Run { delay_ms, json }) => run_playback(config, *delay_ms, *json)?,
        Some(Commands::Compare) => run_compare(&config)?,
        Some(Commands::Report { output }) => {
            let mut sim = Simulator::new(config)?;
            sim.play(Duration::ZERO)?;
            let written = sim.write_report(output.as_deref())?;
            println!("Report written to {}", written.display());
        }
        Some(Commands::Shell) | None => {
            let mut sim = Simulator::new(config)?;
            run_shell(&mut sim)?;
        }
    }

    Ok(())
}

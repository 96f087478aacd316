// Thu Jan 29 2026 - Alex

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use event_splitter::{
    config::Config,
    correction::{ChannelCorrection, CorrectionStrategy},
    event::{ChannelInfo, TimeRange},
    partition::PartitionBuilder,
    splitter::{SplitterSource, TimeSplitter, NO_TARGET},
};
use log::LevelFilter;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "0.1.0")]
#[command(about = "Inspect time splitters and channel corrections for event splitting", long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a splitter and print its intervals and destinations
    Inspect {
        #[arg(short, long)]
        splitter: PathBuf,

        #[arg(short, long, default_value = "split")]
        base: String,

        /// Start of the input time range, in nanoseconds
        #[arg(long, requires = "stop")]
        start: Option<i64>,

        /// End of the input time range, in nanoseconds
        #[arg(long, requires = "start")]
        stop: Option<i64>,

        #[arg(long)]
        no_unfiltered: bool,
    },
    /// Print the target each timestamp routes to
    Probe {
        #[arg(short, long)]
        splitter: PathBuf,

        #[arg(required = true, allow_negative_numbers = true)]
        times: Vec<i64>,
    },
    /// Resolve the configured correction for a list of channels
    CheckCorrections {
        #[arg(short, long)]
        config: PathBuf,

        /// JSON array of channels with id, detector_ids and geometry
        #[arg(short, long)]
        geometry: PathBuf,
    },
}

fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(level_from_verbosity(args.verbose))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(args.command) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Inspect {
            splitter,
            base,
            start,
            stop,
            no_unfiltered,
        } => {
            let range = match (start, stop) {
                (Some(start), Some(stop)) if start < stop => Some(TimeRange::new(start, stop)),
                (Some(start), Some(stop)) => bail!("start {} must be before stop {}", start, stop),
                _ => None,
            };
            inspect(&splitter, &base, range, !no_unfiltered)
        }
        Command::Probe { splitter, times } => probe(&splitter, &times),
        Command::CheckCorrections { config, geometry } => check_corrections(&config, &geometry),
    }
}

fn load_splitter(path: &PathBuf) -> Result<TimeSplitter> {
    println!("{} Loading splitter: {}", "[*]".blue(), path.display());
    let source = SplitterSource::load(path).with_context(|| format!("reading {}", path.display()))?;
    let splitter = source.build().context("splitter validation failed")?;
    println!(
        "{} Built {} splitter with {} intervals",
        "[+]".green(),
        source.kind(),
        splitter.interval_count()
    );
    Ok(splitter)
}

fn target_label(target: i32) -> String {
    if target == NO_TARGET {
        "unfiltered".dimmed().to_string()
    } else {
        target.to_string().cyan().to_string()
    }
}

fn inspect(path: &PathBuf, base: &str, range: Option<TimeRange>, include_unfiltered: bool) -> Result<()> {
    let splitter = load_splitter(path)?;
    let span = splitter.time_range();

    println!();
    println!("{}", "Intervals".bold());
    println!("{}", "=".repeat(50).cyan());
    for interval in splitter.intervals() {
        println!(
            "  [{:>20}, {:>20})  {}",
            interval.start,
            interval.stop,
            target_label(interval.target)
        );
    }

    let range = range.unwrap_or(span);
    let destinations = PartitionBuilder::new(&splitter)
        .include_unfiltered(include_unfiltered)
        .base_name(base)
        .build_for(&[], Some(range));

    println!();
    println!("{}", "Destinations".bold());
    println!("{}", "=".repeat(50).cyan());
    for destination in destinations.iter().filter(|d| d.is_materialized()) {
        let live: i64 = destination.validity_region().iter().map(|r| r.stop - r.start).sum();
        println!(
            "  #{:<3} {:<30} {} regions, {} ns live",
            destination.index(),
            destination.name().green(),
            destination.validity_region().len(),
            live
        );
    }
    if !include_unfiltered {
        println!("  {}", "unfiltered events are discarded".yellow());
    }

    Ok(())
}

fn probe(path: &PathBuf, times: &[i64]) -> Result<()> {
    let splitter = load_splitter(path)?;
    println!();
    for &time in times {
        println!("  {:>20} -> {}", time, target_label(splitter.lookup(time)));
    }
    Ok(())
}

fn check_corrections(config_path: &PathBuf, geometry_path: &PathBuf) -> Result<()> {
    println!("{} Loading config: {}", "[*]".blue(), config_path.display());
    let config = Config::load(config_path)?;

    let content = fs::read_to_string(geometry_path)
        .with_context(|| format!("reading {}", geometry_path.display()))?;
    let channels: Vec<ChannelInfo> = serde_json::from_str(&content).context("parsing channel geometry")?;

    let strategy = CorrectionStrategy::build(&config.correction, &channels)?;
    println!(
        "{} Resolved {:?} correction for {} channels",
        "[+]".green(),
        strategy.kind(),
        channels.len()
    );
    println!();

    let mut skipped = 0usize;
    for (index, channel) in channels.iter().enumerate() {
        match strategy.correction(index) {
            ChannelCorrection::Apply(correction) => println!(
                "  channel {:<8} scale {:<10.6} offset {:>12.3} us",
                channel.id, correction.scale, correction.offset
            ),
            ChannelCorrection::Skip(reason) => {
                skipped += 1;
                println!("  channel {:<8} {}", channel.id, format!("skipped ({:?})", reason).yellow());
            }
        }
    }

    if skipped > 0 {
        println!();
        println!("{} {} channels would be skipped", "[!]".yellow(), skipped);
    }
    Ok(())
}

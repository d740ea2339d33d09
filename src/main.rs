mod cache;
mod config;
mod error;
mod logger;
mod replace;
mod report;
mod sim;
mod trace;

use std::{fs, io, path::PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, info, LevelFilter};

use crate::{
    config::Config,
    sim::{Options, Simulator},
    trace::Trace,
};

const USAGE: &str = "\
Replays a trace of hex addresses against several cache organizations.

USAGE:
  cache_sim [-t <trace>] [-p <path> | --config <json>] [OPTIONS]

OPTIONS:
  -t <path>        trace file, plain or .xz [default: traces.txt]
  -p <path>        cache configuration file
  --config <json>  inline cache configuration
  -w <n>           warm-up addresses [default: 0]
  -n <n>           stop after n measured addresses
  -h <n>           log progress every n addresses
  --json <path>    also write the stats as JSON
  --seed <n>       seed for random replacement
  -v, -q           more / less logging
  --help           print this message
";

fn main() -> Result<()> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains("--help") {
        print!("{USAGE}");
        return Ok(());
    }

    let level = if args.contains("-v") {
        LevelFilter::Debug
    } else if args.contains("-q") {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    logger::init(level).context("could not install logger")?;

    let warmup: u64 = args
        .opt_value_from_str("-w")
        .context("-w should be an integer")?
        .unwrap_or(0);
    let limit: Option<u64> = args
        .opt_value_from_str("-n")
        .context("-n should be an integer")?;
    let heartbeat: u64 = args
        .opt_value_from_str("-h")
        .context("-h should be an integer")?
        .unwrap_or(0);
    let seed: Option<u64> = args
        .opt_value_from_str("--seed")
        .context("--seed should be an integer")?;

    let config_str: Option<String> = if let Some(config_str) = args.opt_value_from_str("--config")?
    {
        Some(config_str)
    } else if let Some(config_path) = args.opt_value_from_str::<_, PathBuf>("-p")? {
        let text = fs::read_to_string(&config_path)
            .with_context(|| format!("could not read config {}", config_path.display()))?;
        Some(text)
    } else {
        None
    };
    let mut config = match config_str {
        Some(s) => Config::from_json(&s).context("invalid cache configuration")?,
        None => Config::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }

    let stats_path: Option<PathBuf> = args.opt_value_from_str("--json")?;
    let trace_path: PathBuf = args
        .opt_value_from_str("-t")?
        .unwrap_or_else(|| PathBuf::from("traces.txt"));

    let rest = args.finish();
    if !rest.is_empty() {
        bail!("unexpected arguments: {rest:?}");
    }

    info!(
        "{} caches over {} blocks, trace {}",
        config.caches.len(),
        config.blocks,
        trace_path.display()
    );
    let caches = config.to_caches()?;
    let trace = Trace::open(&trace_path)
        .with_context(|| format!("could not open trace {}", trace_path.display()))?;

    let mut sim = Simulator::new(
        caches,
        Options {
            warmup,
            limit,
            heartbeat,
        },
    );
    sim.run(trace)
        .with_context(|| format!("bad trace {}", trace_path.display()))?;
    for cache in sim.caches() {
        debug!(
            "{}: {} hits in {} accesses",
            cache.name(),
            cache.hits(),
            cache.accesses()
        );
    }

    let stats = sim.stats();
    report::write_summary(&mut io::stdout().lock(), &stats)?;

    if let Some(stats_path) = stats_path {
        let stats_file = fs::File::create(&stats_path)
            .with_context(|| format!("cannot open output file {}", stats_path.display()))?;
        report::write_json(stats_file, &stats)?;
    }
    Ok(())
}

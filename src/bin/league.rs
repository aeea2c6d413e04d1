use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use standings::domain::FallbackPolicy;
use standings::file::{write_json, ReadJsonFile, SeasonFile};
use standings::mc::{Config, Simulator};
use standings::print;
use standings::ranking::Standings;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// file to source the season data from
    file: PathBuf,

    /// number of simulated seasons
    #[clap(short = 't', long)]
    trials: Option<u64>,

    /// master seed of the random number generator
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// number of worker threads
    #[clap(short = 'w', long)]
    workers: Option<usize>,

    /// position whose points distribution is reported (repeatable)
    #[clap(short = 'b', long = "boundary")]
    boundaries: Vec<usize>,

    /// how to price fixtures that cannot be modelled: uniform or reject
    #[clap(long, default_value_t = FallbackPolicy::Uniform)]
    fallback: FallbackPolicy,

    /// print the current table
    #[clap(short = 'c', long = "current")]
    print_current: bool,

    /// file to write the per-trial outcomes to
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.output.as_ref() == Some(&self.file) {
            bail!("the output file must differ from the season file");
        }
        Ok(())
    }

    fn config(&self) -> Config {
        let defaults = Config::default();
        Config {
            trials: self.trials.unwrap_or(defaults.trials),
            seed: self.seed.unwrap_or(defaults.seed),
            workers: self.workers.unwrap_or(defaults.workers),
            boundaries: self.boundaries.clone(),
            fallback: self.fallback,
            retain_trials: self.output.is_some(),
            ..defaults
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let season_file = SeasonFile::read_json_file(&args.file)?;
    let (completed, scheduled) = season_file.into_inputs()?;
    info!(
        "loaded {} completed and {} scheduled fixtures",
        completed.len(),
        scheduled.len()
    );

    let simulator = Simulator::try_from(args.config())?;
    debug!("config: {:?}", simulator.config());
    let season = simulator.prepare(completed, &scheduled)?;

    if args.print_current {
        let table = season.current_table();
        let standings = Standings::interim(&table);
        let table = print::tabulate_standings(season.roster(), &standings);
        info!("current standings:\n{}", Console::default().render(&table));
    }

    let start_time = Instant::now();
    let projection = simulator.run(&season)?;
    let elapsed = start_time.elapsed();
    info!(
        "simulated {} seasons in {:.3}s",
        projection.distribution().trials(),
        elapsed.as_secs_f64()
    );

    let table = print::tabulate_summary(&projection);
    info!("projected standings:\n{}", Console::default().render(&table));
    let table = print::tabulate_positions(&projection);
    info!("position probabilities (%):\n{}", Console::default().render(&table));
    if !projection.boundaries().is_empty() {
        let table = print::tabulate_boundaries(&projection);
        info!("points at boundary positions:\n{}", Console::default().render(&table));
    }

    if let (Some(output), Some(trials)) = (&args.output, projection.trials()) {
        write_json(output, &trials)?;
        info!("wrote {} trial outcomes to {}", trials.len(), output.display());
    }
    Ok(())
}

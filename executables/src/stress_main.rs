#![cfg_attr(feature = "strict", deny(warnings))]
#![cfg_attr(feature = "strict", deny(clippy::all))]
use common::{
    logging,
    util::{path_or_relative_to_project_root, write_serializable_to_json},
    AggResult,
};
use executables::{run_trial, StressConfig, StressSummary, TrialReport};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
struct Cli {
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output_path: Option<PathBuf>,
    #[structopt(long = "config", parse(from_os_str))]
    config_path: Option<PathBuf>,
    #[structopt(
        short = "s",
        long,
        default_value = "0",
        help = "Base seed. Trial i is seeded with seed + i."
    )]
    seed: u64,
    #[structopt(long, help = "Overrides the number of trials in the config")]
    trials: Option<usize>,
}

impl Cli {
    fn output_path(&self) -> AggResult<PathBuf> {
        path_or_relative_to_project_root(
            self.output_path.as_ref(),
            &format!("data/stress/seed_{}.json", self.seed),
        )
    }

    fn read_config(&self) -> AggResult<StressConfig> {
        let mut config = if let Some(path) = self.config_path.as_ref() {
            StressConfig::from_file(path)?
        } else {
            StressConfig::default()
        };
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> AggResult<()> {
    logging::init_logging();

    let args = Cli::from_args();
    log::info!("CLI Arguments: {:?}", args);
    let config = args.read_config()?;
    log::info!("Using config {:#?}", config);

    log::info!("Running {} trials...", config.trials);
    let reports: Vec<TrialReport> = (0..config.trials)
        .into_par_iter()
        .progress_count(config.trials as u64)
        .map(|trial| run_trial(&config, trial, args.seed))
        .collect();
    log::info!("Running {} trials... DONE", config.trials);

    let summary = StressSummary::new(config, args.seed, reports);
    let output_path = args.output_path()?;
    write_serializable_to_json(&summary, &output_path)?;
    log::info!("Wrote summary to {:?}", &output_path);

    if summary.failed > 0 {
        for report in summary.reports.iter().filter(|report| !report.passed()) {
            log::error!("Trial {} with seed {} failed", report.trial, report.seed);
        }
        return Err(format!(
            "{} of {} trials diverged from the naive model",
            summary.failed,
            summary.reports.len()
        )
        .into());
    }

    log::info!("All {} trials passed", summary.reports.len());
    Ok(())
}

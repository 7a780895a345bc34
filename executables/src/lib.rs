#![cfg_attr(feature = "strict", deny(warnings))]
#![cfg_attr(feature = "strict", deny(clippy::all))]
//! This crate contains helper functions that are used exclusively in defining binaries, that is
//! main functions.
//!
//! At the moment this is the differential stress test for the segment trees: random sequences
//! and random calls are run against both trees and a naive model, and every disagreement is
//! reported.
use common::{AggError, AggResult};
use derive_builder::Builder;
use interval_trees::segment_tree::{policies::*, IntervalTree, LazyAggregation, LazyIntervalTree};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};
use std::{ops::RangeInclusive, path::Path};
use test_helpers::NaiveSequence;

/// The built-in policies a stress run can exercise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum PolicyKind {
    /// see [AddSum]
    AddSum,
    /// see [AddMin]
    AddMin,
    /// see [AddMax]
    AddMax,
    /// see [AssignSum]
    AssignSum,
    /// see [AssignMin]
    AssignMin,
    /// see [AssignMax]
    AssignMax,
}

/// Must always match config/stress/types.dhall
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Builder)]
#[builder(pattern = "owned")]
pub struct StressConfig {
    /// How many independent trials to run.
    pub trials: usize,
    /// Sequences have a random length in `1..=max_len`.
    pub max_len: usize,
    /// Number of calls per trial.
    pub operations: usize,
    /// Initial values and update operands are drawn from `-max_abs_value..=max_abs_value`.
    pub max_abs_value: i64,
    /// Probability of a call being a query rather than an update.
    pub query_ratio: f64,
    /// Which policy the trees are built with.
    pub policy: PolicyKind,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            trials: 1000,
            max_len: 100,
            operations: 1000,
            max_abs_value: 1000,
            query_ratio: 0.5,
            policy: PolicyKind::AddSum,
        }
    }
}

impl StressConfig {
    /// Config from dhall file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AggResult<Self> {
        Ok(serde_dhall::from_file(path).parse::<StressConfig>()?)
    }

    /// Checks that a run with this config is well defined.
    /// # Returns
    /// - `Err(ConfigurationError)` if there is nothing to run, the query ratio is not a
    /// probability, or a sum over a whole sequence could overflow `i64`.
    pub fn validate(&self) -> AggResult<()> {
        if self.trials == 0 || self.max_len == 0 {
            return Err(AggError::ConfigurationError(
                "trials and max_len must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.query_ratio) {
            return Err(AggError::ConfigurationError(format!(
                "query_ratio {} is not in [0, 1]",
                self.query_ratio
            )));
        }
        if self.max_abs_value < 0 {
            return Err(AggError::ConfigurationError(format!(
                "max_abs_value {} is negative",
                self.max_abs_value
            )));
        }

        // every element starts at most max_abs_value away from zero and each update moves it
        // by at most max_abs_value more
        let bound = (self.operations as i64)
            .checked_add(1)
            .and_then(|steps| steps.checked_mul(self.max_abs_value))
            .and_then(|element| element.checked_mul(self.max_len as i64));
        match bound {
            Some(_) => Ok(()),
            None => Err(AggError::ConfigurationError(
                "values could overflow i64 with this config".to_string(),
            )),
        }
    }
}

/// Outcome of a single trial.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrialReport {
    /// Index of the trial in its run.
    pub trial: usize,
    /// The seed the trial's generator was created from.
    pub seed: u64,
    /// Length of the generated sequence.
    pub len: usize,
    /// Description of the first disagreement, if any.
    pub mismatch: Option<String>,
}

impl TrialReport {
    /// True if both trees agreed with the model throughout.
    pub fn passed(&self) -> bool {
        self.mismatch.is_none()
    }
}

/// Everything a stress run writes to its output file.
#[derive(Clone, Debug, Serialize)]
pub struct StressSummary {
    /// The config the run used.
    pub config: StressConfig,
    /// Base seed of the run.
    pub seed: u64,
    /// Number of trials in which some tree disagreed with the model.
    pub failed: usize,
    /// Reports of all trials, ordered by trial.
    pub reports: Vec<TrialReport>,
}

impl StressSummary {
    /// Collects `reports` (in any order) into a summary.
    pub fn new(config: StressConfig, seed: u64, mut reports: Vec<TrialReport>) -> Self {
        reports.sort_by_key(|report| report.trial);
        let failed = reports.iter().filter(|report| !report.passed()).count();
        Self {
            config,
            seed,
            failed,
            reports,
        }
    }
}

/// Runs trial number `trial` of a run seeded with `seed`.
/// The trial is fully determined by `config`, `trial` and `seed`.
pub fn run_trial(config: &StressConfig, trial: usize, seed: u64) -> TrialReport {
    let trial_seed = seed.wrapping_add(trial as u64);
    let mut rng = XorShiftRng::seed_from_u64(trial_seed);
    let len = rng.gen_range(1..=config.max_len.max(1));

    let result = match config.policy {
        PolicyKind::AddSum => check_trial(AddSum::new(), config, len, &mut rng),
        PolicyKind::AddMin => check_trial(AddMin::new(), config, len, &mut rng),
        PolicyKind::AddMax => check_trial(AddMax::new(), config, len, &mut rng),
        PolicyKind::AssignSum => check_trial(AssignSum::new(), config, len, &mut rng),
        PolicyKind::AssignMin => check_trial(AssignMin::new(), config, len, &mut rng),
        PolicyKind::AssignMax => check_trial(AssignMax::new(), config, len, &mut rng),
    };

    let mismatch = result.err().map(|err| err.to_string());
    if let Some(mismatch) = mismatch.as_ref() {
        log::warn!("Trial {} (seed {}) failed: {}", trial, trial_seed, mismatch);
    }

    TrialReport {
        trial,
        seed: trial_seed,
        len,
        mismatch,
    }
}

/// Replays one random trial on both trees and the model.
/// The lazy tree receives range updates; the eager tree receives the resulting point updates.
fn check_trial<A>(
    policy: A,
    config: &StressConfig,
    len: usize,
    rng: &mut XorShiftRng,
) -> AggResult<()>
where
    A: LazyAggregation<Value = i64, Pending = i64> + Copy,
{
    let max = config.max_abs_value;
    let values: Vec<i64> = (0..len).map(|_| rng.gen_range(-max..=max)).collect();

    let mut lazy = LazyIntervalTree::new(values.clone(), policy)?;
    let mut eager = IntervalTree::new(values.clone(), policy)?;
    let mut naive = NaiveSequence::new(values);

    for step in 0..config.operations {
        let range = random_range(rng, len);

        if rng.gen_bool(config.query_ratio) {
            let expected = naive.fold(range.clone(), |a, b| policy.combine(a, b));
            ensure_agrees("lazy query", step, expected, lazy.query(range.clone())?)?;
            ensure_agrees("eager query", step, expected, eager.query(range)?)?;
        } else {
            let x = rng.gen_range(-max..=max);
            lazy.update(range.clone(), x)?;
            naive.update(range.clone(), |value| policy.apply(&x, value, 1));
            for index in range {
                eager.update(index, naive.values()[index])?;
            }
        }
    }

    if lazy.query(0..=len).is_ok() || eager.get(len).is_ok() {
        return Err(format!("out of bounds call on length {} was accepted", len).into());
    }
    if lazy.to_vec() != naive.values() || eager.to_vec() != naive.values() {
        return Err("final elements diverged".into());
    }
    Ok(())
}

fn random_range(rng: &mut XorShiftRng, len: usize) -> RangeInclusive<usize> {
    let a = rng.gen_range(0..len);
    let b = rng.gen_range(0..len);
    a.min(b)..=a.max(b)
}

fn ensure_agrees(what: &str, step: usize, expected: i64, actual: i64) -> AggResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(format!(
            "{} diverged at step {}: expected {}, got {}",
            what, step, expected, actual
        )
        .into())
    }
}

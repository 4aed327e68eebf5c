// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Settings for one benchmark session.

extern crate num_cpus;

use std::path::PathBuf;

use errors::{MandelError, Result};
use grid::pixel_count;
use partition::{Planner, Strategy, MAX_THREADS};
use planes::View;

/// Default image width, in pixels.
pub const DEFAULT_WIDTH: usize = 1280;
/// Default image height, in pixels.
pub const DEFAULT_HEIGHT: usize = 960;
/// Default iteration cap.
pub const DEFAULT_ITERATIONS: u32 = 256;
/// Default number of timed serial runs.
pub const SERIAL_RUNS: usize = 5;
/// Default number of timed runs per parallel strategy.
pub const PARALLEL_RUNS: usize = 3;

/// Everything the benchmark harness needs to know.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Iteration cap for the escape-time function.
    pub max_iterations: u32,
    /// Which region of the plane to render.
    pub view: View,
    /// Worker threads per parallel render, the calling thread included.
    pub threads: usize,
    /// Ceiling on `threads`.
    pub max_threads: usize,
    /// The partitioning strategies to race against the serial render.
    pub strategies: Vec<Strategy>,
    /// Timed serial runs; the fastest counts.
    pub serial_runs: usize,
    /// Timed runs per strategy; the fastest counts.
    pub parallel_runs: usize,
    /// Where to write images, if anywhere.
    pub output_dir: Option<PathBuf>,
}

/// One thread per logical CPU, held under the default ceiling, and
/// brought down to the nearest count that divides `height` so that
/// interleaving works without further flags.
pub fn default_threads(height: usize) -> usize {
    let cpus = num_cpus::get().max(1).min(MAX_THREADS);
    (1..=cpus)
        .rev()
        .find(|t| height % t == 0)
        .unwrap_or(1)
}

impl Default for Config {
    fn default() -> Config {
        Config {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_iterations: DEFAULT_ITERATIONS,
            view: View::Full,
            threads: default_threads(DEFAULT_HEIGHT),
            max_threads: MAX_THREADS,
            strategies: Strategy::ALL.to_vec(),
            serial_runs: SERIAL_RUNS,
            parallel_runs: PARALLEL_RUNS,
            output_dir: None,
        }
    }
}

impl Config {
    /// The planner this configuration renders with.
    pub fn planner(&self) -> Planner {
        Planner::with_max_threads(self.max_threads)
    }

    /// Catches, up front, everything that would otherwise stop the
    /// session halfway through.
    pub fn validate(&self) -> Result<()> {
        if self.serial_runs == 0 || self.parallel_runs == 0 {
            return Err(MandelError::NoRuns);
        }
        pixel_count(self.width, self.height)?;
        let planner = self.planner();
        for &strategy in &self.strategies {
            planner.plan(self.width, self.height, self.threads, strategy)?;
        }
        Ok(())
    }
}

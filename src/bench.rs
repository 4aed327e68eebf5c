// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Timing and verification.
//!
//! Every render is timed several times and only the fastest run is
//! kept: the scheduler can only ever make a run slower, so the minimum
//! is the best estimate of what the code itself costs.  Every parallel
//! image is then compared pixel for pixel against the serial one.

use std::fmt;
use std::time::{Duration, Instant};

use config::Config;
use errors::{MandelError, Result};
use grid::ImageGrid;
use partition::Strategy;
use ppm::write_image;
use serial;
use threaded::ParallelRenderer;

/// Runs `f` `runs` times (at least once) and returns the fastest
/// wall-clock time.  The first failure ends the timing.
pub fn min_time<F>(runs: usize, mut f: F) -> Result<Duration>
where
    F: FnMut() -> Result<()>,
{
    let mut best: Option<Duration> = None;
    for _ in 0..runs.max(1) {
        let started = Instant::now();
        f()?;
        let elapsed = started.elapsed();
        best = Some(match best {
            Some(b) if b <= elapsed => b,
            _ => elapsed,
        });
    }
    Ok(best.unwrap_or_else(|| Duration::from_secs(0)))
}

/// Compares `candidate` against `gold`, row by row.  Reports the
/// first pixel that differs.
pub fn verify(gold: &ImageGrid, candidate: &ImageGrid) -> Result<()> {
    if gold.width() != candidate.width() || gold.height() != candidate.height() {
        return Err(MandelError::DimensionMismatch(
            gold.width(),
            gold.height(),
            candidate.width(),
            candidate.height(),
        ));
    }
    let first = iproduct!(0..gold.height(), 0..gold.width())
        .find(|&(row, col)| gold.get(row, col) != candidate.get(row, col));
    match first {
        None => Ok(()),
        Some((row, col)) => Err(MandelError::Mismatch {
            row,
            col,
            expected: gold.get(row, col).unwrap_or(0),
            actual: candidate.get(row, col).unwrap_or(0),
        }),
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs() as f64 * 1000.0 + f64::from(d.subsec_nanos()) / 1_000_000.0
}

/// One timed render.
#[derive(Clone, Debug, PartialEq)]
pub struct Timing {
    /// `None` for the serial render.
    pub strategy: Option<Strategy>,
    /// Worker threads used.
    pub threads: usize,
    /// Fastest of the timed runs.
    pub elapsed: Duration,
}

impl Timing {
    /// The fastest run, in seconds.
    pub fn seconds(&self) -> f64 {
        millis(self.elapsed) / 1000.0
    }

    fn label(&self) -> String {
        match self.strategy {
            None => "mandelbrot serial".to_string(),
            Some(s) => format!("mandelbrot thread {}", s),
        }
    }
}

/// The outcome of a benchmark session.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    /// The serial baseline.
    pub serial: Timing,
    /// One entry per strategy, in the order they ran.
    pub parallel: Vec<Timing>,
}

impl Report {
    /// How many times faster than serial the given strategy ran.
    pub fn speedup(&self, strategy: Strategy) -> Option<f64> {
        self.parallel
            .iter()
            .find(|t| t.strategy == Some(strategy))
            .map(|t| self.serial.seconds() / t.seconds())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for timing in Some(&self.serial).into_iter().chain(self.parallel.iter()) {
            writeln!(
                f,
                "[{}]:\t\t[{:.3}] ms",
                timing.label(),
                millis(timing.elapsed)
            )?;
        }
        for timing in &self.parallel {
            if let Some(strategy) = timing.strategy {
                writeln!(
                    f,
                    "\t\t\t\t({:.2}x speedup from {} threads, {})",
                    self.speedup(strategy).unwrap_or(0.0),
                    timing.threads,
                    strategy
                )?;
            }
        }
        Ok(())
    }
}

/// Renders the configured view serially, then once per strategy in
/// parallel, verifying each parallel image against the serial one.
pub struct Harness {
    config: Config,
    renderer: ParallelRenderer,
}

impl Harness {
    /// Validates the configuration; nothing is rendered if it is bad.
    pub fn new(config: Config) -> Result<Harness> {
        config.validate()?;
        let renderer = ParallelRenderer::new(config.planner());
        Ok(Harness { config, renderer })
    }

    /// The configuration in force.
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn save(&self, grid: &ImageGrid, name: &str) -> Result<()> {
        if let Some(ref dir) = self.config.output_dir {
            write_image(
                grid.pixels(),
                grid.width(),
                grid.height(),
                dir.join(name),
                self.config.max_iterations,
            )?;
        }
        Ok(())
    }

    /// Runs the whole session.  Stops at the first error, including
    /// the first parallel image that disagrees with the serial one.
    pub fn run(&self) -> Result<Report> {
        let config = &self.config;
        let viewport = config.view.viewport();
        let limit = config.max_iterations;

        let mut gold = ImageGrid::new(config.width, config.height)?;
        let elapsed = min_time(config.serial_runs, || {
            serial::render(&mut gold, &viewport, limit)
        })?;
        let serial = Timing {
            strategy: None,
            threads: 1,
            elapsed,
        };
        info!("serial render: {:.3} ms", millis(elapsed));
        self.save(&gold, "mandelbrot-serial.ppm")?;

        let mut parallel = Vec::with_capacity(config.strategies.len());
        let mut candidate = ImageGrid::new(config.width, config.height)?;
        for &strategy in &config.strategies {
            candidate.clear();
            let elapsed = min_time(config.parallel_runs, || {
                self.renderer
                    .render(&mut candidate, &viewport, limit, config.threads, strategy)
            })?;
            info!(
                "{} render over {} threads: {:.3} ms",
                strategy,
                config.threads,
                millis(elapsed)
            );
            self.save(&candidate, &format!("mandelbrot-thread-{}.ppm", strategy))?;
            if let Err(e) = verify(&gold, &candidate) {
                error!("{} output differs from serial output: {}", strategy, e);
                return Err(e);
            }
            parallel.push(Timing {
                strategy: Some(strategy),
                threads: config.threads,
                elapsed,
            });
        }

        Ok(Report { serial, parallel })
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Deciding which worker renders which rows.
//!
//! Mandelbrot rows are not equally expensive: rows that cross the
//! boundary of the set run to the iteration cap over and over, while
//! rows far outside escape almost at once.  Cutting the image into
//! contiguous bands (`Strategy::Block`) keeps each worker's memory
//! together but can hand one worker nearly all of the expensive rows.
//! Dealing rows out like cards (`Strategy::Interleaved`) spreads the
//! cost evenly at the price of locality.  Both are here so that they
//! can be raced against each other.
//!
//! Whatever the strategy, a plan is a partition: every row of the
//! image belongs to exactly one worker.

use itertools::Either;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use errors::{MandelError, Result};

/// The default ceiling on worker threads.
pub const MAX_THREADS: usize = 48;

/// How rows are dealt out to workers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Contiguous bands of rows; the last band absorbs the remainder.
    Block,
    /// Row `r` goes to worker `r % threads`.
    Interleaved,
}

impl Strategy {
    /// Both strategies, in reporting order.
    pub const ALL: [Strategy; 2] = [Strategy::Block, Strategy::Interleaved];

    /// The name used on the command line and in reports.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Block => "block",
            Strategy::Interleaved => "interleaved",
        }
    }
}

impl FromStr for Strategy {
    type Err = MandelError;

    fn from_str(s: &str) -> Result<Strategy> {
        match s.trim().to_lowercase().as_str() {
            "block" => Ok(Strategy::Block),
            "interleaved" | "striped" => Ok(Strategy::Interleaved),
            _ => Err(MandelError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of rows one worker owns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rows {
    /// A single band.
    Contiguous(Range<usize>),
    /// `count` rows starting at `first`, `step` apart.  A `step` of
    /// zero names `first` alone.
    Strided {
        /// The first row.
        first: usize,
        /// Distance between consecutive rows.
        step: usize,
        /// How many rows.
        count: usize,
    },
}

impl Rows {
    /// Number of rows owned.
    pub fn len(&self) -> usize {
        match *self {
            Rows::Contiguous(ref range) => range.end - range.start,
            Rows::Strided { step: 0, count, .. } => count.min(1),
            Rows::Strided { count, .. } => count,
        }
    }

    /// True when the worker has nothing to do.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The owned rows, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        match *self {
            Rows::Contiguous(ref range) => Either::Left(range.clone()),
            Rows::Strided { first, step, .. } => {
                Either::Right((0..self.len()).map(move |k| first + k * step))
            }
        }
    }

    /// Whether `row` is one of ours.
    pub fn contains(&self, row: usize) -> bool {
        match *self {
            Rows::Contiguous(ref range) => range.start <= row && row < range.end,
            Rows::Strided { first, step: 0, count } => row == first && count > 0,
            Rows::Strided { first, step, count } => {
                row >= first && (row - first) % step == 0 && (row - first) / step < count
            }
        }
    }
}

/// What one worker has to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkAssignment {
    /// Worker number, `0..threads`.  Worker 0 is the calling thread.
    pub thread_id: usize,
    /// The rows this worker renders.
    pub rows: Rows,
}

/// Produces partition plans, refusing thread counts above its ceiling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Planner {
    max_threads: usize,
}

impl Default for Planner {
    fn default() -> Planner {
        Planner {
            max_threads: MAX_THREADS,
        }
    }
}

impl Planner {
    /// A planner with the default ceiling.
    pub fn new() -> Planner {
        Planner::default()
    }

    /// A planner with a different ceiling on worker threads.
    pub fn with_max_threads(max_threads: usize) -> Planner {
        Planner { max_threads }
    }

    /// The ceiling in force.
    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    /// One assignment per worker, ordered by `thread_id`.
    pub fn plan(
        &self,
        width: usize,
        height: usize,
        threads: usize,
        strategy: Strategy,
    ) -> Result<Vec<WorkAssignment>> {
        if threads == 0 {
            return Err(MandelError::NoThreads);
        }
        if threads > self.max_threads {
            return Err(MandelError::TooManyThreads {
                requested: threads,
                max: self.max_threads,
            });
        }
        if width == 0 || height == 0 {
            return Err(MandelError::EmptyImage { width, height });
        }

        let plan = match strategy {
            Strategy::Block => block(height, threads),
            Strategy::Interleaved => interleaved(height, threads)?,
        };
        debug!(
            "{} plan for {}x{} over {} threads: {:?}",
            strategy, width, height, threads, plan
        );
        Ok(plan)
    }
}

/// Plan with the default ceiling.
pub fn plan(
    width: usize,
    height: usize,
    threads: usize,
    strategy: Strategy,
) -> Result<Vec<WorkAssignment>> {
    Planner::default().plan(width, height, threads, strategy)
}

fn block(height: usize, threads: usize) -> Vec<WorkAssignment> {
    let dh = height / threads;
    (0..threads)
        .map(|i| {
            let start = i * dh;
            let end = if i == threads - 1 { height } else { start + dh };
            WorkAssignment {
                thread_id: i,
                rows: Rows::Contiguous(start..end),
            }
        })
        .collect()
}

fn interleaved(height: usize, threads: usize) -> Result<Vec<WorkAssignment>> {
    if height % threads != 0 {
        return Err(MandelError::UnevenInterleave { height, threads });
    }
    let count = height / threads;
    Ok((0..threads)
        .map(|t| WorkAssignment {
            thread_id: t,
            rows: Rows::Strided {
                first: t,
                step: threads,
                count,
            },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_of(plan: &[WorkAssignment]) -> Vec<Vec<usize>> {
        plan.iter().map(|a| a.rows.iter().collect()).collect()
    }

    fn assert_partition(plan: &[WorkAssignment], height: usize) {
        let mut seen = vec![0; height];
        for a in plan {
            for row in a.rows.iter() {
                assert!(a.rows.contains(row));
                seen[row] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1), "not a partition: {:?}", seen);
    }

    #[test]
    fn block_bands_of_the_small_image() {
        let plan = plan(16, 8, 4, Strategy::Block).unwrap();
        assert_eq!(
            rows_of(&plan),
            vec![vec![0, 1], vec![2, 3], vec![4, 5], vec![6, 7]]
        );
    }

    #[test]
    fn interleaved_stripes_of_the_small_image() {
        let plan = plan(16, 8, 4, Strategy::Interleaved).unwrap();
        assert_eq!(
            rows_of(&plan),
            vec![vec![0, 4], vec![1, 5], vec![2, 6], vec![3, 7]]
        );
    }

    #[test]
    fn last_band_takes_the_remainder() {
        let plan = plan(10, 10, 3, Strategy::Block).unwrap();
        assert_eq!(plan[0].rows, Rows::Contiguous(0..3));
        assert_eq!(plan[1].rows, Rows::Contiguous(3..6));
        assert_eq!(plan[2].rows, Rows::Contiguous(6..10));
    }

    #[test]
    fn every_shape_is_a_partition() {
        for height in 1..40 {
            for threads in 1..=height.min(MAX_THREADS) {
                let plan = plan(5, height, threads, Strategy::Block).unwrap();
                assert_eq!(plan.len(), threads);
                assert_partition(&plan, height);
                if height % threads == 0 {
                    let plan = plan_interleaved(height, threads);
                    assert_partition(&plan, height);
                    assert!(plan.iter().all(|a| a.rows.len() == height / threads));
                }
            }
        }
    }

    fn plan_interleaved(height: usize, threads: usize) -> Vec<WorkAssignment> {
        plan(5, height, threads, Strategy::Interleaved).unwrap()
    }

    #[test]
    fn one_row_per_thread() {
        for &strategy in Strategy::ALL.iter() {
            let plan = plan(3, 16, 16, strategy).unwrap();
            assert!(plan.iter().all(|a| a.rows.len() == 1));
            assert_partition(&plan, 16);
        }
    }

    #[test]
    fn more_threads_than_rows_still_partitions_in_blocks() {
        let plan = plan(3, 4, 6, Strategy::Block).unwrap();
        assert_eq!(plan.len(), 6);
        assert!(plan[..5].iter().all(|a| a.rows.is_empty()));
        assert_partition(&plan, 4);
    }

    #[test]
    fn uneven_interleave_is_refused() {
        match plan(16, 10, 4, Strategy::Interleaved) {
            Err(MandelError::UnevenInterleave { height, threads }) => {
                assert_eq!((height, threads), (10, 4))
            }
            other => panic!("expected UnevenInterleave, got {:?}", other),
        }
    }

    #[test]
    fn ceiling_and_zero_are_refused() {
        assert!(plan(16, 96, 48, Strategy::Block).is_ok());
        match plan(16, 96, 49, Strategy::Block) {
            Err(MandelError::TooManyThreads { requested, max }) => {
                assert_eq!((requested, max), (49, 48))
            }
            other => panic!("expected TooManyThreads, got {:?}", other),
        }
        assert!(Planner::with_max_threads(64)
            .plan(16, 96, 49, Strategy::Block)
            .is_ok());
        assert!(plan(16, 8, 0, Strategy::Block).is_err());
        assert!(plan(0, 8, 2, Strategy::Block).is_err());
        assert!(plan(16, 0, 2, Strategy::Interleaved).is_err());
    }

    #[test]
    fn strategies_parse_and_print() {
        assert_eq!("block".parse::<Strategy>().unwrap(), Strategy::Block);
        assert_eq!("Striped".parse::<Strategy>().unwrap(), Strategy::Interleaved);
        assert!("spiral".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Interleaved.to_string(), "interleaved");
    }

    #[test]
    fn strided_membership() {
        let rows = Rows::Strided {
            first: 1,
            step: 4,
            count: 2,
        };
        assert!(rows.contains(1));
        assert!(rows.contains(5));
        assert!(!rows.contains(9));
        assert!(!rows.contains(0));
        assert!(!rows.contains(3));
    }

    #[test]
    fn zero_step_names_one_row() {
        let rows = Rows::Strided {
            first: 3,
            step: 0,
            count: 5,
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.iter().collect::<Vec<_>>(), vec![3]);
        assert!(rows.contains(3));
        assert!(!rows.contains(4));
        let none = Rows::Strided {
            first: 3,
            step: 0,
            count: 0,
        };
        assert!(none.is_empty());
        assert!(!none.contains(3));
        assert_eq!(none.iter().count(), 0);
    }
}

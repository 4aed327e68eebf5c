// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The parallel renderer.
//!
//! The image buffer is cut into one mutable slice per row, and each
//! worker is handed exactly the rows its WorkAssignment names.  The
//! slices are disjoint borrows of the same buffer, so the workers
//! never need a lock: the borrow checker has already proven that no
//! two of them can touch the same pixel.  The workers run inside a
//! crossbeam scope, which joins every one of them before the borrow
//! of the grid ends, whether the render succeeded or not.

extern crate crossbeam;

use std::time::Instant;

use errors::{MandelError, Result};
use grid::ImageGrid;
use partition::{Planner, Strategy, WorkAssignment};
use planes::{PlaneMapper, Viewport};
use serial::render_row;

// The rows one worker writes, paired with their absolute row index.
struct Share<'a> {
    thread_id: usize,
    rows: Vec<(usize, &'a mut [u32])>,
}

impl<'a> Share<'a> {
    fn render(self, plane: &PlaneMapper, max_iterations: u32) {
        let started = Instant::now();
        let count = self.rows.len();
        for (row, out) in self.rows {
            render_row(plane, row, max_iterations, out);
        }
        debug!(
            "worker {} rendered {} rows in {:?}",
            self.thread_id,
            count,
            started.elapsed()
        );
    }
}

/// Hands the rows of `pixels` out according to `plan`.  Fails if the
/// plan names a row twice, names a row outside the image, or leaves a
/// row out.
fn deal<'a>(pixels: &'a mut [u32], width: usize, plan: &[WorkAssignment]) -> Result<Vec<Share<'a>>> {
    let mut slots: Vec<Option<&'a mut [u32]>> = pixels.chunks_mut(width).map(Some).collect();
    let mut shares = Vec::with_capacity(plan.len());
    for assignment in plan {
        let mut rows = Vec::with_capacity(assignment.rows.len());
        for row in assignment.rows.iter() {
            match slots.get_mut(row).and_then(Option::take) {
                Some(slice) => rows.push((row, slice)),
                None => return Err(MandelError::BadPartition { row }),
            }
        }
        shares.push(Share {
            thread_id: assignment.thread_id,
            rows,
        });
    }
    if let Some(row) = slots.iter().position(Option::is_some) {
        return Err(MandelError::BadPartition { row });
    }
    Ok(shares)
}

/// Renders a grid with a fixed number of freshly spawned threads.
#[derive(Copy, Clone, Debug, Default)]
pub struct ParallelRenderer {
    planner: Planner,
}

impl ParallelRenderer {
    /// A renderer whose thread ceiling is set by `planner`.
    pub fn new(planner: Planner) -> ParallelRenderer {
        ParallelRenderer { planner }
    }

    /// The planner deciding who renders what.
    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Fill `grid` with the escape times of `viewport`, using
    /// `threads` workers: `threads - 1` spawned threads plus the
    /// calling thread.  Returns only once every worker has finished.
    ///
    /// Configuration errors are reported before any thread is started.
    /// If a thread cannot be spawned, or a worker panics, the render
    /// fails and the contents of `grid` are not to be trusted.
    pub fn render(
        &self,
        grid: &mut ImageGrid,
        viewport: &Viewport,
        max_iterations: u32,
        threads: usize,
        strategy: Strategy,
    ) -> Result<()> {
        let plan = self
            .planner
            .plan(grid.width(), grid.height(), threads, strategy)?;
        let plane = PlaneMapper::new(grid.width(), grid.height(), *viewport)?;
        let width = grid.width();
        let shares = deal(grid.pixels_mut(), width, &plan)?;

        let plane = &plane;
        let started = Instant::now();
        run_shares(shares, |share| share.render(plane, max_iterations))?;
        debug!(
            "{} render over {} threads took {:?}",
            strategy,
            threads,
            started.elapsed()
        );
        Ok(())
    }
}

// Runs `work` on every share: the first on the calling thread, the rest
// on threads of their own.  Returns once all of them have been joined.
fn run_shares<'a, F>(shares: Vec<Share<'a>>, work: F) -> Result<()>
where
    F: Fn(Share<'a>) + Sync,
{
    let mut shares = shares.into_iter();
    let local = shares.next();
    let work = &work;

    let outcome = crossbeam::scope(|spawner| -> Result<()> {
        for share in shares {
            spawner
                .builder()
                .name(format!("mandel-worker-{}", share.thread_id))
                .spawn(move |_| work(share))
                .map_err(MandelError::Spawn)?;
        }
        if let Some(share) = local {
            work(share);
        }
        Ok(())
    });

    match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!("render abandoned: {}", e);
            Err(e)
        }
        Err(_) => {
            error!("render abandoned: a worker panicked");
            Err(MandelError::WorkerPanicked)
        }
    }
}

/// Render with the default thread ceiling.
pub fn render(
    grid: &mut ImageGrid,
    viewport: &Viewport,
    max_iterations: u32,
    threads: usize,
    strategy: Strategy,
) -> Result<()> {
    ParallelRenderer::default().render(grid, viewport, max_iterations, threads, strategy)
}

#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Thread-partitioned Mandelbrot renderer
//!
//! The Mandelbrot set takes a point on the complex plane and
//! repeatedly squares it and adds the original point back, counting
//! how many steps it takes for the result to leave the circle of
//! radius two.  That count, computed for every pixel of an image, is
//! what this crate produces.
//!
//! The interesting part is doing it on several threads at once.  The
//! count is expensive near the boundary of the set and cheap far from
//! it, so how the rows of the image are divided between threads
//! decides how evenly the threads are loaded.  Two divisions are
//! offered, contiguous bands and interleaved stripes (see
//! [`partition`]), and a small benchmark harness (see [`bench`]) times
//! each against a single-threaded render and insists that the images
//! agree to the last pixel.

#[macro_use]
extern crate failure;
#[macro_use]
extern crate itertools;
#[macro_use]
extern crate log;
extern crate crossbeam;
extern crate image;
extern crate num;
extern crate num_cpus;

pub mod bench;
pub mod config;
pub mod errors;
pub mod escape;
pub mod grid;
pub mod partition;
pub mod planes;
pub mod ppm;
pub mod serial;
pub mod threaded;

pub use bench::{min_time, verify, Harness, Report, Timing};
pub use config::Config;
pub use errors::{MandelError, Result};
pub use grid::ImageGrid;
pub use partition::{plan, Planner, Rows, Strategy, WorkAssignment, MAX_THREADS};
pub use planes::{PlaneMapper, View, Viewport};
pub use threaded::ParallelRenderer;

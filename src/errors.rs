// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can stop a render.  Configuration problems are
//! caught before a single thread is started; mismatches and resource
//! failures end the run that hit them.  Nothing is ever retried.

use std::io;
use std::result;

/// The crate-wide error type.
#[derive(Debug, Fail)]
pub enum MandelError {
    /// Asked for zero worker threads.
    #[fail(display = "thread count must be at least 1")]
    NoThreads,

    /// Asked for more threads than the configured ceiling.
    #[fail(display = "max allowed threads is {}, {} requested", max, requested)]
    TooManyThreads {
        /// The thread count asked for.
        requested: usize,
        /// The ceiling in force.
        max: usize,
    },

    /// Interleaved rows only divide evenly when the height is a multiple
    /// of the thread count.
    #[fail(
        display = "interleaved partitioning needs height % threads == 0 (height {}, threads {})",
        height, threads
    )]
    UnevenInterleave {
        /// Image height in rows.
        height: usize,
        /// Worker thread count.
        threads: usize,
    },

    /// One of the image dimensions is zero.
    #[fail(display = "image must not be empty ({}x{})", width, height)]
    EmptyImage {
        /// Image width in pixels.
        width: usize,
        /// Image height in pixels.
        height: usize,
    },

    /// The image has more pixels than a buffer can hold.
    #[fail(display = "image is too large ({}x{})", width, height)]
    ImageTooLarge {
        /// Image width in pixels.
        width: usize,
        /// Image height in pixels.
        height: usize,
    },

    /// The viewport is inverted, flat, or not a number.
    #[fail(display = "bad viewport ({}, {}) - ({}, {})", x0, y0, x1, y1)]
    BadViewport {
        /// Real part of the first corner.
        x0: f32,
        /// Imaginary part of the first corner.
        y0: f32,
        /// Real part of the far corner.
        x1: f32,
        /// Imaginary part of the far corner.
        y1: f32,
    },

    /// Not one of the partitioning strategies.
    #[fail(display = "unknown partitioning strategy '{}'", _0)]
    UnknownStrategy(String),

    /// Not one of the preset views.
    #[fail(display = "invalid view index '{}'", _0)]
    UnknownView(String),

    /// A benchmark was asked to run zero times.
    #[fail(display = "run count must be at least 1")]
    NoRuns,

    /// A pixel buffer is not the size its image calls for.
    #[fail(display = "buffer holds {} pixels, expected {}", actual, expected)]
    BufferSize {
        /// Pixels the image needs.
        expected: usize,
        /// Pixels the buffer has.
        actual: usize,
    },

    /// A band of rows runs past the bottom of the image.
    #[fail(
        display = "rows {} to {} are outside an image {} rows high",
        start, end, height
    )]
    RowsOutOfRange {
        /// First row of the band.
        start: usize,
        /// One past the last row of the band.
        end: usize,
        /// Image height in rows.
        height: usize,
    },

    /// A partition plan handed a row to two workers, or to none.
    #[fail(display = "row {} is not owned by exactly one worker", row)]
    BadPartition {
        /// The offending row.
        row: usize,
    },

    /// The candidate image differs from the gold image.
    #[fail(
        display = "mismatch at [{}][{}], expected {}, actual {}",
        row, col, expected, actual
    )]
    Mismatch {
        /// Row of the first differing pixel.
        row: usize,
        /// Column of the first differing pixel.
        col: usize,
        /// Gold value.
        expected: u32,
        /// Candidate value.
        actual: u32,
    },

    /// The candidate image is not even the same shape as the gold one.
    #[fail(
        display = "dimension mismatch, expected {}x{}, actual {}x{}",
        _0, _1, _2, _3
    )]
    DimensionMismatch(usize, usize, usize, usize),

    /// The operating system would not give us a thread.
    #[fail(display = "could not start worker thread: {}", _0)]
    Spawn(#[cause] io::Error),

    /// A worker died before finishing its rows.
    #[fail(display = "a worker thread panicked; the image is incomplete")]
    WorkerPanicked,

    /// Writing an image failed.
    #[fail(display = "could not write image: {}", _0)]
    Io(#[cause] io::Error),
}

impl MandelError {
    /// True for the errors that are detected before any rendering starts.
    pub fn is_configuration(&self) -> bool {
        match *self {
            MandelError::NoThreads
            | MandelError::TooManyThreads { .. }
            | MandelError::UnevenInterleave { .. }
            | MandelError::EmptyImage { .. }
            | MandelError::ImageTooLarge { .. }
            | MandelError::BadViewport { .. }
            | MandelError::UnknownStrategy(_)
            | MandelError::UnknownView(_)
            | MandelError::NoRuns => true,
            _ => false,
        }
    }

    /// True when a parallel image disagreed with the serial one.
    pub fn is_mismatch(&self) -> bool {
        match *self {
            MandelError::Mismatch { .. } | MandelError::DimensionMismatch(..) => true,
            _ => false,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = result::Result<T, MandelError>;

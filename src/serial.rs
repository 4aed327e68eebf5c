// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single-threaded reference renderer.  Its output is the gold
//! image every parallel render is checked against.

use escape::escape_time;
use grid::ImageGrid;
use planes::{PlaneMapper, Pixel, Viewport};

use errors::{MandelError, Result};

/// Render one row of the image into `out`, which must be exactly one
/// row wide.  `row` is the absolute row index in the full image.
#[inline]
pub fn render_row(plane: &PlaneMapper, row: usize, max_iterations: u32, out: &mut [u32]) {
    debug_assert!(out.len() == plane.width());
    for (column, pixel) in out.iter_mut().enumerate() {
        *pixel = escape_time(plane.pixel_to_point(&Pixel(column, row)), max_iterations);
    }
}

/// Fills `out[start_row * width .. (start_row + num_rows) * width]`,
/// where `out` is the buffer of the whole image.  Nothing is written
/// if the band runs past the bottom or `out` is the wrong size.
pub fn render_rows(
    plane: &PlaneMapper,
    start_row: usize,
    num_rows: usize,
    max_iterations: u32,
    out: &mut [u32],
) -> Result<()> {
    let width = plane.width();
    let height = plane.height();
    let end_row = match start_row.checked_add(num_rows) {
        Some(end) if end <= height => end,
        _ => {
            return Err(MandelError::RowsOutOfRange {
                start: start_row,
                end: start_row.saturating_add(num_rows),
                height,
            })
        }
    };
    if out.len() != plane.len() {
        return Err(MandelError::BufferSize {
            expected: plane.len(),
            actual: out.len(),
        });
    }
    let band = &mut out[start_row * width..end_row * width];
    for (offset, row) in band.chunks_mut(width).enumerate() {
        render_row(plane, start_row + offset, max_iterations, row);
    }
    Ok(())
}

/// Render the whole grid on the calling thread.
pub fn render(grid: &mut ImageGrid, viewport: &Viewport, max_iterations: u32) -> Result<()> {
    let plane = PlaneMapper::new(grid.width(), grid.height(), *viewport)?;
    let height = plane.height();
    render_rows(&plane, 0, height, max_iterations, grid.pixels_mut())
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The ImageGrid: one iteration count per pixel, row-major.

use std::mem;
use std::slice::{Chunks, ChunksMut};

use errors::{MandelError, Result};

/// The number of pixels in a `width` by `height` image, refusing
/// empty images and images too large for one `u32` buffer.
pub fn pixel_count(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(MandelError::EmptyImage { width, height });
    }
    let limit = isize::max_value() as usize / mem::size_of::<u32>();
    match width.checked_mul(height) {
        Some(n) if n <= limit => Ok(n),
        _ => Err(MandelError::ImageTooLarge { width, height }),
    }
}

/// A `width` by `height` buffer of iteration counts, indexed as
/// `row * width + col`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageGrid {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl ImageGrid {
    /// A zeroed grid.  Empty and oversized grids are refused.
    pub fn new(width: usize, height: usize) -> Result<ImageGrid> {
        let len = pixel_count(width, height)?;
        Ok(ImageGrid {
            width,
            height,
            pixels: vec![0 as u32; len],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Never true for a constructed grid.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The whole buffer.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// The whole buffer, mutably.
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// The value at `(row, col)`, if inside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if row < self.height && col < self.width {
            Some(self.pixels[row * self.width + col])
        } else {
            None
        }
    }

    /// Rows, top to bottom.
    pub fn rows(&self) -> Chunks<u32> {
        self.pixels.chunks(self.width)
    }

    /// Rows, top to bottom, each one a disjoint mutable slice.
    pub fn rows_mut(&mut self) -> ChunksMut<u32> {
        self.pixels.chunks_mut(self.width)
    }

    /// Zero every pixel, so nothing from a previous render survives.
    pub fn clear(&mut self) {
        for p in self.pixels.iter_mut() {
            *p = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grids_must_have_area() {
        assert!(ImageGrid::new(0, 3).is_err());
        assert!(ImageGrid::new(3, 0).is_err());
        assert_eq!(ImageGrid::new(3, 2).unwrap().len(), 6);
    }

    #[test]
    fn oversized_grids_are_refused() {
        match ImageGrid::new(usize::max_value(), 2) {
            Err(MandelError::ImageTooLarge { width, height }) => {
                assert_eq!((width, height), (usize::max_value(), 2))
            }
            other => panic!("expected ImageTooLarge, got {:?}", other),
        }
        let half = usize::max_value() / 2;
        assert!(ImageGrid::new(half, 4).unwrap_err().is_configuration());
        // No overflow, but still more bytes than an allocation may span.
        assert!(pixel_count(isize::max_value() as usize / 2, 1).is_err());
        assert_eq!(pixel_count(1280, 960).unwrap(), 1_228_800);
    }

    #[test]
    fn layout_is_row_major() {
        let mut grid = ImageGrid::new(3, 2).unwrap();
        grid.pixels_mut()[4] = 9;
        assert_eq!(grid.get(1, 1), Some(9));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 3), None);
        assert_eq!(grid.rows().nth(1).unwrap(), &[0, 9, 0]);
    }

    #[test]
    fn clear_zeroes_everything() {
        let mut grid = ImageGrid::new(4, 4).unwrap();
        for row in grid.rows_mut() {
            row[0] = 1;
        }
        grid.clear();
        assert!(grid.pixels().iter().all(|&p| p == 0));
    }
}

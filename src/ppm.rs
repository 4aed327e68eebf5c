// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes an iteration grid out as a grey PPM so that renders can be
//! looked at, not just compared.

use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use num::clamp;
use std::fs::File;
use std::path::Path;

use errors::{MandelError, Result};
use grid::pixel_count;

/// Brightness of a pixel.  The square root lifts the many low counts
/// near the edge of the image out of the black.
pub fn shade(count: u32, max_iterations: u32) -> u8 {
    let mapped = (count.min(max_iterations) as f32 / 256.0).sqrt();
    clamp(255.0 * mapped, 0.0, 255.0) as u8
}

/// Writes `pixels`, a `width` by `height` grid of iteration counts, to
/// `path` as a binary PPM.
pub fn write_image<P: AsRef<Path>>(
    pixels: &[u32],
    width: usize,
    height: usize,
    path: P,
    max_iterations: u32,
) -> Result<()> {
    let expected = pixel_count(width, height)?;
    if pixels.len() != expected {
        return Err(MandelError::BufferSize {
            expected,
            actual: pixels.len(),
        });
    }
    let rgb: Vec<u8> = pixels
        .iter()
        .flat_map(|&count| {
            let v = shade(count, max_iterations);
            vec![v, v, v]
        })
        .collect();

    let output = File::create(path.as_ref()).map_err(MandelError::Io)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    encoder
        .encode(&rgb[..], width as u32, height as u32, ColorType::RGB(8))
        .map_err(MandelError::Io)?;
    info!("wrote {}", path.as_ref().display());
    Ok(())
}

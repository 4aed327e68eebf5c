// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time function: how many times can we square-and-add
//! before the orbit leaves the circle of radius two?

use num::Complex;

/// Squared radius of the escape circle.
pub const ESCAPE_NORM_SQR: f32 = 4.0;

/// This is our classic iterator function.  The orbit starts at the
/// point itself and is tested before each step, so a point already
/// outside the circle scores zero and one that never leaves scores
/// `max_iterations`.
#[inline]
pub fn escape_time(point: Complex<f32>, max_iterations: u32) -> u32 {
    let mut z = point;
    let mut i = 0;
    while i < max_iterations {
        if z.norm_sqr() > ESCAPE_NORM_SQR {
            break;
        }
        z = z * z + point;
        i += 1;
    }
    i
}

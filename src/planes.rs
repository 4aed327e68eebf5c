// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport, a rectangle on the complex plane, and the
//! PlaneMapper, which describes a relationship between a rectangle on
//! the integral plane with an origin at 0,0 and a Viewport.  Also
//! carries the named views the command line can select.
use num::Complex;
use std::fmt;
use std::str::FromStr;

use errors::{MandelError, Result};
use grid::pixel_count;

/// Describes the x, y of a pixel: column first, then row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The rectangle of the complex plane that gets mapped onto the
/// image.  `(x0, y0)` is the corner at pixel 0,0; `(x1, y1)` is the
/// far corner.  The real part is the x-component and the imaginary
/// part the y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Real part of the first corner.
    pub x0: f32,
    /// Imaginary part of the first corner.
    pub y0: f32,
    /// Real part of the far corner.
    pub x1: f32,
    /// Imaginary part of the far corner.
    pub y1: f32,
}

impl Viewport {
    /// Builds a viewport, rejecting degenerate or inverted rectangles.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Result<Viewport> {
        // Written as negations so that NaN bounds are refused too.
        if !(x1 > x0) || !(y1 > y0) {
            return Err(MandelError::BadViewport { x0, y0, x1, y1 });
        }
        Ok(Viewport { x0, y0, x1, y1 })
    }

    /// Scale every bound about the origin, then translate.
    pub fn scale_and_shift(&self, scale: f32, shift_x: f32, shift_y: f32) -> Viewport {
        Viewport {
            x0: self.x0 * scale + shift_x,
            y0: self.y0 * scale + shift_y,
            x1: self.x1 * scale + shift_x,
            y1: self.y1 * scale + shift_y,
        }
    }
}

impl Default for Viewport {
    fn default() -> Viewport {
        Viewport {
            x0: -2.0,
            y0: -1.0,
            x1: 1.0,
            y1: 1.0,
        }
    }
}

/// The two preset windows onto the set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum View {
    /// The whole set, `(-2,-1)` to `(1,1)`.
    Full,
    /// A zoom into the seahorse valley, heavy on boundary pixels.
    Detail,
}

impl View {
    /// Look a view up by its command-line number.
    pub fn from_index(index: u32) -> Result<View> {
        match index {
            1 => Ok(View::Full),
            2 => Ok(View::Detail),
            _ => Err(MandelError::UnknownView(index.to_string())),
        }
    }

    /// The command-line number of this view.
    pub fn index(self) -> u32 {
        match self {
            View::Full => 1,
            View::Detail => 2,
        }
    }

    /// The region of the complex plane this view renders.
    pub fn viewport(self) -> Viewport {
        match self {
            View::Full => Viewport::default(),
            View::Detail => Viewport::default().scale_and_shift(0.015, -0.986, 0.30),
        }
    }
}

impl FromStr for View {
    type Err = MandelError;

    fn from_str(s: &str) -> Result<View> {
        match u32::from_str(s.trim()) {
            Ok(index) => View::from_index(index),
            Err(_) => Err(MandelError::UnknownView(s.to_string())),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Contains the definitions of two planes: an integral cartesian
/// plane of `width` by `height` pixels, and a Viewport on the complex
/// plane.  Maps pixels from one to the other.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    width: usize,
    height: usize,
    len: usize,
    viewport: Viewport,
    // The size, on the complex plane, of one pixel along each axis.
    steps: (f32, f32),
}

impl PlaneMapper {
    /// Constructor.  Takes the pixel dimensions of the integral plane
    /// and the viewport it is mapped onto.
    pub fn new(width: usize, height: usize, viewport: Viewport) -> Result<PlaneMapper> {
        let len = pixel_count(width, height)?;
        let viewport = Viewport::new(viewport.x0, viewport.y0, viewport.x1, viewport.y1)?;

        let steps = (
            (viewport.x1 - viewport.x0) / (width as f32),
            (viewport.y1 - viewport.y0) / (height as f32),
        );

        Ok(PlaneMapper {
            width,
            height,
            len,
            viewport,
            steps,
        })
    }

    /// Width of the integral plane, in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the integral plane, in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.len
    }

    /// A mapper is never built over an empty plane.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The viewport this mapper projects onto.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The real coordinate of a pixel column.
    #[inline]
    pub fn column_to_re(&self, column: usize) -> f32 {
        self.viewport.x0 + (column as f32) * self.steps.0
    }

    /// The imaginary coordinate of a pixel row.  Every renderer goes
    /// through here with the absolute row index, whatever slice of the
    /// image it was handed, so all of them agree to the last bit.
    #[inline]
    pub fn row_to_im(&self, row: usize) -> f32 {
        self.viewport.y0 + (row as f32) * self.steps.1
    }

    /// Given a pixel on the integral cartesian plane, map it to the
    /// corresponding point on the complex cartesian plane.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f32> {
        Complex::new(self.column_to_re(pixel.0), self.row_to_im(pixel.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_fails_on_bad_shape() {
        assert!(Viewport::new(1.0, -1.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(-1.0, 1.0, 1.0, -1.0).is_err());
        assert!(Viewport::new(-1.0, 0.0, 1.0, 0.0).is_err());
        assert!(Viewport::new(::std::f32::NAN, -1.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn viewport_passes_on_good_shape() {
        assert!(Viewport::new(-1.0, -1.0, 1.0, 1.0).is_ok());
    }

    #[test]
    fn planemapper_refuses_empty_planes() {
        assert!(PlaneMapper::new(0, 4, Viewport::default()).is_err());
        assert!(PlaneMapper::new(4, 0, Viewport::default()).is_err());
        assert!(PlaneMapper::new(usize::max_value(), 3, Viewport::default())
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn pixel_to_point_on_positive_planes() {
        let vp = Viewport::new(0.0, 0.0, 5.0, 5.0).unwrap();
        let pm = PlaneMapper::new(5, 5, vp).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 3)), Complex::new(4.0, 3.0));
    }

    #[test]
    fn pixel_to_points_on_mixed_planes() {
        let vp = Viewport::new(-2.0, -2.0, 2.0, 2.0).unwrap();
        let pm = PlaneMapper::new(4, 4, vp).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 4)), Complex::new(2.0, 2.0));
    }

    #[test]
    fn rows_map_independently_of_columns() {
        let pm = PlaneMapper::new(16, 8, Viewport::default()).unwrap();
        assert_eq!(pm.row_to_im(0), -1.0);
        assert_eq!(pm.row_to_im(4), 0.0);
        assert_eq!(pm.column_to_re(0), -2.0);
        assert_eq!(pm.pixel_to_point(&Pixel(8, 6)).im, pm.row_to_im(6));
    }

    #[test]
    fn detail_view_is_scaled_and_shifted() {
        let vp = View::Detail.viewport();
        assert!((vp.x0 - (-2.0 * 0.015 - 0.986)).abs() < 1e-6);
        assert!((vp.y1 - (0.015 + 0.30)).abs() < 1e-6);
        assert!(vp.x1 > vp.x0 && vp.y1 > vp.y0);
    }

    #[test]
    fn views_parse_by_number() {
        assert_eq!("1".parse::<View>().unwrap(), View::Full);
        assert_eq!(" 2".parse::<View>().unwrap(), View::Detail);
        assert!("3".parse::<View>().is_err());
        assert!("two".parse::<View>().is_err());
        assert_eq!(View::Detail.to_string(), "2");
    }
}

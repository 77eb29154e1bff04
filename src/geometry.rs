//! The parallel-beam acquisition geometry shared by forward and back
//! projection, and the set of projection angles derived from a maximum angle
//! and an angular step.

use crate::error::{Error, Result};
use crate::types::{Anglef32, PI};

/// Size and granularity of the detector relative to one square image.
///
/// Both projection directions must be handed the *same* `Geometry` value:
/// the adjoint relationship between splat and gather (and with it the
/// correctness of FBP and SART) holds only if pixel-to-bin mapping is
/// identical on both sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Image side length in pixels
    pub n: usize,
    /// Number of detector bins in one projection
    pub bins: usize,
}

impl Geometry {
    /// Detector sized to cover the image diagonal at any rotation, with one
    /// guard bin on each end so that linear splatting never falls off the
    /// detector, rounded to an even count.
    pub fn for_image_side(n: usize) -> Self {
        let mut bins = (n as f32 * std::f32::consts::SQRT_2).ceil() as usize;
        bins += 2;
        if bins % 2 == 1 { bins += 1 }
        Self { n, bins }
    }

    /// Centre of rotation, in pixel coordinates
    #[inline]
    pub fn image_centre(&self) -> f32 { (self.n as f32 - 1.0) / 2.0 }

    /// Detector coordinate onto which the centre of rotation projects
    #[inline]
    pub fn detector_centre(&self) -> f32 { (self.bins / 2) as f32 }

    /// Continuous detector coordinate of pixel `(row, col)` for a ray normal
    /// given by `(sin, cos)` of the projection angle.
    #[inline]
    pub fn detector_position(&self, row: usize, col: usize, (sin, cos): (f32, f32)) -> f32 {
        let c = self.image_centre();
        let x = col as f32 - c;
        let y = row as f32 - c;
        self.detector_centre() + x * cos + y * sin
    }

    /// The two detector bins a pixel couples to, with the weight of the
    /// second one. The first bin gets `1 - weight`, so each pixel deposits
    /// (or gathers) unit total weight per angle.
    #[inline]
    pub fn splat(&self, row: usize, col: usize, sincos: (f32, f32)) -> (usize, usize, f32) {
        let p = self.detector_position(row, col, sincos);
        let lo = p.floor();
        let w = p - lo;
        let lo = lo as usize;
        debug_assert!(lo + 1 < self.bins, "detector too narrow for pixel ({row}, {col})");
        (lo, lo + 1, w)
    }
}

/// Ordered, strictly increasing projection angles in degrees:
/// `0, step, 2·step, …`, ending below `max_angle`. The sequence length is
/// the number of sinogram rows.
#[derive(Clone, Debug, PartialEq)]
pub struct AngleSet {
    degrees: Vec<u32>,
}

impl AngleSet {
    pub fn new(max_angle: u32, step: u32) -> Result<Self> {
        if max_angle == 0 || step == 0 {
            return Err(Error::InvalidAngle { max_angle, step });
        }
        Ok(Self { degrees: (0..max_angle).step_by(step as usize).collect() })
    }

    pub fn len(&self) -> usize { self.degrees.len() }

    pub fn is_empty(&self) -> bool { self.degrees.is_empty() }

    pub fn degrees(&self) -> impl Iterator<Item = u32> + '_ {
        self.degrees.iter().copied()
    }

    pub fn radians(&self) -> impl Iterator<Item = Anglef32> + '_ {
        self.degrees.iter().map(|&d| d as Anglef32 * PI / 180.0)
    }

    /// `(sin θ, cos θ)` per angle, the only trigonometric values projection
    /// ever needs.
    pub fn sincos(&self) -> Vec<(f32, f32)> {
        self.radians().map(|r| r.sin_cos()).collect()
    }
}

#[cfg(test)]
mod test_angle_set {
    use super::*;
    use rstest::rstest;

    #[rstest(/**/ max_angle, step, expected_len, first, last,
             case(      180,    1,          180,     0,  179),
             case(      180,   10,           18,     0,  170),
             case(       90,    1,           90,     0,   89),
             case(        1,    1,            1,     0,    0),
             case(      180,    7,           26,     0,  175),
    )]
    fn angle_sequence(max_angle: u32, step: u32, expected_len: usize, first: u32, last: u32) {
        let angles = AngleSet::new(max_angle, step).unwrap();
        assert_eq!(angles.len(), expected_len);
        assert_eq!(angles.degrees().next(), Some(first));
        assert_eq!(angles.degrees().last(), Some(last));
    }

    #[rstest(/**/ max_angle, step,
             case(        0,    1),
             case(      180,    0),
             case(        0,    0),
    )]
    fn rejects_degenerate_sampling(max_angle: u32, step: u32) {
        assert!(matches!(AngleSet::new(max_angle, step),
                         Err(Error::InvalidAngle { .. })));
    }

    #[test]
    fn angles_strictly_increasing() {
        let angles = AngleSet::new(180, 10).unwrap();
        let degrees: Vec<_> = angles.degrees().collect();
        assert!(degrees.windows(2).all(|w| w[0] < w[1]));
    }
}

#[cfg(test)]
mod test_geometry {
    use super::*;
    use rstest::rstest;
    use float_eq::assert_float_eq;

    #[rstest(/**/  n, min_bins,
             case( 1,        4),
             case(63,       92),
             case(64,       94),
             case(65,       94),
    )]
    fn detector_covers_diagonal(n: usize, min_bins: usize) {
        let g = Geometry::for_image_side(n);
        assert_eq!(g.bins, min_bins);
        assert_eq!(g.bins % 2, 0);
        assert!(g.bins as f32 >= n as f32 * std::f32::consts::SQRT_2 + 2.0);
    }

    #[test]
    fn centre_pixel_projects_onto_centre_bin_at_every_angle() {
        // Odd side, so the centre of rotation coincides with a pixel centre
        let g = Geometry::for_image_side(63);
        let c = g.image_centre() as usize;
        for sincos in AngleSet::new(180, 1).unwrap().sincos() {
            let p = g.detector_position(c, c, sincos);
            assert_float_eq!(p, g.detector_centre(), abs <= 1e-6);
        }
    }

    #[test]
    fn splat_stays_on_detector_in_worst_case() {
        for n in [1, 2, 16, 63, 64, 100] {
            let g = Geometry::for_image_side(n);
            for sincos in AngleSet::new(180, 1).unwrap().sincos() {
                for &row in &[0, n - 1] {
                    for &col in &[0, n - 1] {
                        let (lo, hi, w) = g.splat(row, col, sincos);
                        assert!(hi < g.bins);
                        assert!(lo < hi);
                        assert!((0.0..=1.0).contains(&w));
                    }
                }
            }
        }
    }
}

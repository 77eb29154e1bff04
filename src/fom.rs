//! Figures of merit for comparing a reconstruction against a reference.

use crate::error::{Error, Result};
use crate::image::{Image, ImageData};
use crate::types::Intensityf32;

/// Root-mean-square difference between two images of equal dimensions.
pub fn rms_error(a: &Image, b: &Image) -> Result<Intensityf32> {
    check_same_side(a, b)?;
    let sum_sq: f32 = a.data.iter().zip(b.data.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum();
    Ok((sum_sq / a.data.len() as f32).sqrt())
}

/// Largest absolute pixel difference between two images of equal dimensions.
pub fn peak_error(a: &Image, b: &Image) -> Result<Intensityf32> {
    check_same_side(a, b)?;
    Ok(a.data.iter().zip(b.data.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max))
}

fn check_same_side(a: &Image, b: &Image) -> Result<()> {
    if a.n != b.n {
        return Err(Error::InvalidImage { rows: a.n, cols: b.n });
    }
    Ok(())
}

/// Region of interest in pixel coordinates.
#[derive(Clone, Copy)]
pub enum Roi {
    /// Disk given by centre and radius
    Disk((f32, f32), f32),
}

impl Image {

    pub fn values_inside_roi(&self, roi: Roi) -> ImageData {
        let Roi::Disk((cx, cy), radius) = roi;
        let mut out = vec![];
        for (i, value) in self.data.iter().copied().enumerate() {
            let row = (i / self.n) as f32;
            let col = (i % self.n) as f32;
            let (x, y) = (col - cx, row - cy);
            if x * x + y * y < radius * radius { out.push(value) }
        }
        out
    }

    /// Mean intensity inside the ROI; `None` when the ROI covers no pixel.
    pub fn mean_inside_roi(&self, roi: Roi) -> Option<Intensityf32> {
        mean(&self.values_inside_roi(roi))
    }
}

fn mean(data: &ImageData) -> Option<Intensityf32> {
    data.iter().copied().reduce(|a, b| a + b).map(|s| s / data.len() as f32)
}

#[cfg(test)]
mod test_fom {
    use super::*;
    use float_eq::assert_float_eq;
    use rstest::rstest;

    #[test]
    fn rms_of_identical_images_is_zero() {
        let image = Image::disk_phantom(16, 5.0, 1.0);
        assert_float_eq!(rms_error(&image, &image).unwrap(), 0.0, abs <= 0.0);
    }

    #[test]
    fn rms_of_unit_offset_is_one() {
        let a = Image::zeros(8);
        let b = Image::ones(8);
        assert_float_eq!(rms_error(&a, &b).unwrap(), 1.0, abs <= 1e-6);
        assert_float_eq!(peak_error(&a, &b).unwrap(), 1.0, abs <= 1e-6);
    }

    #[test]
    fn mismatched_sides_are_rejected() {
        let a = Image::zeros(8);
        let b = Image::zeros(9);
        assert!(matches!(rms_error(&a, &b), Err(Error::InvalidImage { .. })));
    }

    // Centre of a 10x10 grid is at 4.5; radii straddling the distance to the
    // nearest / diagonal pixel centres select predictable pixel counts.
    #[rstest(/**/ radius, expected_len,
             case(  0.5,  0), // no pixel centre within half a pixel of 4.5
             case(  0.8,  4), // the 4 centre-adjacent pixels
             case( 10.0, 100), // everything
    )]
    fn roi_membership_counts(radius: f32, expected_len: usize) {
        let image = Image::ones(10);
        let inside = image.values_inside_roi(Roi::Disk((4.5, 4.5), radius));
        assert_eq!(inside.len(), expected_len);
    }

    #[test]
    fn disk_phantom_means_separate_inside_from_outside() {
        let image = Image::disk_phantom(32, 8.0, 2.0);
        let inside  = image.mean_inside_roi(Roi::Disk((15.5, 15.5), 5.0)).unwrap();
        let outside = image.mean_inside_roi(Roi::Disk((3.0, 3.0), 2.0)).unwrap();
        assert_float_eq!(inside, 2.0, abs <= 1e-6);
        assert_float_eq!(outside, 0.0, abs <= 1e-6);
    }
}

use crate::error::{Error, Result};
use crate::types::{Intensityf32, Index1, Index2};

pub type ImageData = Vec<Intensityf32>;

/// A square grid of non-negative intensities, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    /// Side length in pixels
    pub n: usize,
    pub data: ImageData,
}

impl Image {

    /// Wrap existing data; fails unless `data` is a non-empty `n` x `n` grid.
    pub fn new(n: usize, data: ImageData) -> Result<Self> {
        if n == 0 || data.len() != n * n {
            let rows = if n == 0 { 0 } else { data.len() / n };
            return Err(Error::InvalidImage { rows, cols: n });
        }
        Ok(Self { n, data })
    }

    /// Build from explicit rows; rejects ragged and non-square grids.
    pub fn from_rows(rows: Vec<Vec<Intensityf32>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 || rows.iter().any(|r| r.len() != n) {
            let cols = rows.first().map_or(0, Vec::len);
            return Err(Error::InvalidImage { rows: n, cols });
        }
        Ok(Self { n, data: rows.into_iter().flatten().collect() })
    }

    pub fn zeros(n: usize) -> Self { Self { n, data: vec![0.0; n * n] } }

    pub fn ones(n: usize) -> Self { Self { n, data: vec![1.0; n * n] } }

    /// Sum of all intensities; the quantity each forward-projected row
    /// conserves.
    pub fn total(&self) -> Intensityf32 { self.data.iter().sum() }

    /// Back-projection and iterative correction can undershoot slightly;
    /// clamp those artifacts to the valid range.
    pub fn clip_negative(&mut self) {
        for v in self.data.iter_mut() {
            if *v < 0.0 { *v = 0.0 }
        }
    }

    /// Centred disk of the given radius and intensity on a dark background.
    pub fn disk_phantom(n: usize, radius: f32, intensity: Intensityf32) -> Self {
        let c = (n as f32 - 1.0) / 2.0;
        let mut image = Self::zeros(n);
        for (row, col) in itertools::iproduct!(0..n, 0..n) {
            let (y, x) = (row as f32 - c, col as f32 - c);
            if x * x + y * y <= radius * radius {
                image[[row, col]] = intensity;
            }
        }
        image
    }

    /// Single bright pixel at the centre of rotation. Only meaningful for
    /// odd `n`, where the centre of rotation is a pixel centre.
    pub fn point_phantom(n: usize, intensity: Intensityf32) -> Self {
        let mut image = Self::zeros(n);
        let c = n / 2;
        image[[c, c]] = intensity;
        image
    }
}

impl core::ops::Index<Index1> for Image {
    type Output = Intensityf32;
    #[inline]
    fn index(&self, i: Index1) -> &Self::Output { &self.data[i] }
}

impl core::ops::IndexMut<Index1> for Image {
    #[inline]
    fn index_mut(&mut self, i: Index1) -> &mut Self::Output { &mut self.data[i] }
}

impl core::ops::Index<Index2> for Image {
    type Output = Intensityf32;
    #[inline]
    fn index(&self, i2: Index2) -> &Self::Output { &self.data[index2_to_1(i2, self.n)] }
}

impl core::ops::IndexMut<Index2> for Image {
    #[inline]
    fn index_mut(&mut self, i2: Index2) -> &mut Self::Output {
        let i1 = index2_to_1(i2, self.n);
        &mut self.data[i1]
    }
}

// --------------------------------------------------------------------------------
//                  Conversion between 1d and 2d indices

#[inline]
pub fn index2_to_1([row, col]: Index2, n: usize) -> Index1 { row * n + col }

#[inline]
pub fn index1_to_2(i: Index1, n: usize) -> Index2 { [i / n, i % n] }



#[cfg(test)]
mod test_image {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn rejects_non_square_grid() {
        let rows = vec![vec![0.0; 60]; 50];
        assert!(matches!(Image::from_rows(rows),
                         Err(Error::InvalidImage { rows: 50, cols: 60 })));
    }

    #[test]
    fn rejects_empty_grid() {
        assert!(matches!(Image::new(0, vec![]), Err(Error::InvalidImage { .. })));
        assert!(matches!(Image::from_rows(vec![]), Err(Error::InvalidImage { .. })));
    }

    #[test]
    fn rejects_mismatched_data_length() {
        assert!(matches!(Image::new(4, vec![0.0; 15]), Err(Error::InvalidImage { .. })));
    }

    #[test]
    fn clip_negative_only_touches_negative_pixels() {
        let mut image = Image::new(2, vec![-0.5, 0.0, 1.5, -0.001]).unwrap();
        image.clip_negative();
        assert_eq!(image.data, vec![0.0, 0.0, 1.5, 0.0]);
    }

    #[test]
    fn disk_phantom_is_symmetric_under_quarter_turn() {
        let n = 33;
        let disk = Image::disk_phantom(n, 10.0, 1.0);
        for (row, col) in itertools::iproduct!(0..n, 0..n) {
            assert_float_eq!(disk[[row, col]], disk[[col, n - 1 - row]], abs <= 0.0);
        }
    }

    #[test]
    fn point_phantom_total_is_its_intensity() {
        let point = Image::point_phantom(63, 1.0);
        assert_float_eq!(point.total(), 1.0, abs <= 0.0);
        assert_float_eq!(point[[31, 31]], 1.0, abs <= 0.0);
    }
}

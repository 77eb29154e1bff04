use ndarray::{Array2, ArrayView1, ArrayViewMut1};

use crate::types::Intensityf32;

/// The stack of all projections of one image: one row per angle, one column
/// per detector bin, in angle-set order.
#[derive(Clone, Debug, PartialEq)]
pub struct Sinogram {
    data: Array2<Intensityf32>,
}

impl Sinogram {

    pub fn zeros(n_angles: usize, bins: usize) -> Self {
        Self { data: Array2::zeros((n_angles, bins)) }
    }

    /// Assemble from per-angle rows, in angle-set order.
    pub fn from_rows(rows: Vec<Vec<Intensityf32>>, bins: usize) -> Self {
        let n_angles = rows.len();
        let mut data = Array2::zeros((n_angles, bins));
        for (mut target, source) in data.rows_mut().into_iter().zip(rows) {
            debug_assert_eq!(source.len(), bins);
            for (t, s) in target.iter_mut().zip(source) { *t = s }
        }
        Self { data }
    }

    pub fn n_angles(&self) -> usize { self.data.nrows() }

    pub fn bins(&self) -> usize { self.data.ncols() }

    pub fn row(&self, angle_index: usize) -> ArrayView1<'_, Intensityf32> {
        self.data.row(angle_index)
    }

    pub fn row_mut(&mut self, angle_index: usize) -> ArrayViewMut1<'_, Intensityf32> {
        self.data.row_mut(angle_index)
    }

    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, Intensityf32>> {
        self.data.rows().into_iter()
    }

    /// Per-row sums; forward projection conserves the image total in each.
    pub fn row_sums(&self) -> Vec<Intensityf32> {
        self.rows().map(|r| r.sum()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intensityf32> { self.data.iter() }
}

impl std::ops::Add<&Sinogram> for &Sinogram {
    type Output = Sinogram;
    fn add(self, other: &Sinogram) -> Sinogram {
        Sinogram { data: &self.data + &other.data }
    }
}

#[cfg(test)]
mod test_sinogram {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn rows_land_in_angle_order() {
        let s = Sinogram::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]], 2);
        assert_eq!(s.n_angles(), 2);
        assert_eq!(s.bins(), 2);
        assert_float_eq!(s.row(0)[1], 2.0, abs <= 0.0);
        assert_float_eq!(s.row(1)[0], 3.0, abs <= 0.0);
    }

    #[test]
    fn row_sums_match_rows() {
        let s = Sinogram::from_rows(vec![vec![1.0, 2.0, 3.0], vec![0.5, 0.25, 0.0]], 3);
        let sums = s.row_sums();
        assert_float_eq!(sums[0], 6.0, abs <= 1e-6);
        assert_float_eq!(sums[1], 0.75, abs <= 1e-6);
    }
}

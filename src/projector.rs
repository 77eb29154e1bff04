//! Forward (Radon) and back projection over one shared `Geometry`.
//!
//! The forward direction splats each pixel's intensity into the two detector
//! bins bracketing its projected position; the backward direction gathers
//! from exactly the same bins with the same weights. Keeping both sides on
//! one `Geometry::splat` makes back projection the exact adjoint of forward
//! projection, which FBP and SART both rely on.

use rayon::prelude::*;

use crate::geometry::{AngleSet, Geometry};
use crate::image::{Image, ImageData};
use crate::sinogram::Sinogram;
use crate::types::{Intensityf32, Weightf32, PI};

/// Radon transform: one sinogram row per angle.
///
/// Rows are independent, so they are computed in parallel and assembled in
/// angle-set order.
pub fn project(image: &Image, angles: &AngleSet, geometry: Geometry) -> Sinogram {
    debug_assert_eq!(image.n, geometry.n);
    let rows: Vec<_> = angles.sincos()
        .into_par_iter()
        .map(|sincos| project_row(image, sincos, geometry))
        .collect();
    Sinogram::from_rows(rows, geometry.bins)
}

/// Line-integral profile of `image` at a single angle.
pub fn project_row(image: &Image, sincos: (f32, f32), geometry: Geometry) -> Vec<Intensityf32> {
    let mut row = vec![0.0; geometry.bins];
    for pixel_row in 0..geometry.n {
        for pixel_col in 0..geometry.n {
            let v = image[[pixel_row, pixel_col]];
            if v == 0.0 { continue }
            let (lo, hi, w) = geometry.splat(pixel_row, pixel_col, sincos);
            row[lo] += v * (1.0 - w);
            row[hi] += v * w;
        }
    }
    row
}

/// Adjoint of `project`, accumulated over all angles and normalized by
/// `π / (2 · n_angles)`: with a ramp-filtered sinogram this recovers
/// absolute intensities, matching the classical inverse-Radon scaling.
///
/// Parallelized across angles into private image buffers which are then
/// summed in fixed angle order, so results are reproducible across runs.
pub fn back_project(sinogram: &Sinogram, angles: &AngleSet, geometry: Geometry) -> Image {
    debug_assert_eq!(sinogram.n_angles(), angles.len());
    debug_assert_eq!(sinogram.bins(), geometry.bins);

    let buffers: Vec<ImageData> = angles.sincos()
        .into_par_iter()
        .enumerate()
        .map(|(i, sincos)| {
            let row = sinogram.row(i);
            back_project_row(row.as_slice().expect("sinogram rows are contiguous"),
                             sincos, geometry)
        })
        .collect();

    let accumulated = buffers.into_iter()
        .fold(Image::zeros(geometry.n).data, elementwise_add);

    let scale = PI / (2.0 * angles.len() as f32);
    let data = accumulated.into_iter().map(|v| v * scale).collect();
    Image { n: geometry.n, data }
}

/// Smear a single projection row back across the image grid. Not normalized
/// by the angle count: SART owns its own normalization.
pub fn back_project_row(row: &[Intensityf32], sincos: (f32, f32), geometry: Geometry) -> ImageData {
    let mut image = vec![0.0; geometry.n * geometry.n];
    let mut i = 0;
    for pixel_row in 0..geometry.n {
        for pixel_col in 0..geometry.n {
            let (lo, hi, w) = geometry.splat(pixel_row, pixel_col, sincos);
            image[i] += row[lo] * (1.0 - w) + row[hi] * w;
            i += 1;
        }
    }
    image
}

/// Per-bin total splat weight of an all-ones image: how much pixel mass each
/// ray (detector bin) sees at this angle. SART divides residuals by these
/// weights; bins no pixel couples to stay zero and are skipped there.
pub fn ray_weights(sincos: (f32, f32), geometry: Geometry) -> Vec<Weightf32> {
    let ones = Image::ones(geometry.n);
    project_row(&ones, sincos, geometry)
}

pub fn elementwise_add(a: ImageData, b: ImageData) -> ImageData {
    a.iter().zip(b.iter()).map(|(l, r)| l + r).collect()
}

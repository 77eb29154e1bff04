//! Simultaneous Algebraic Reconstruction Technique.
//!
//! One iteration sweeps the angle set in order. For each angle the current
//! estimate is forward-projected, the residual against the measured row is
//! normalized by each ray's total splat weight, back-projected, and applied
//! scaled by the relaxation factor. The sweep is strictly sequential: each
//! angle's correction is in place before the next angle is projected, which
//! is what gives SART its convergence behaviour. (A batched variant that
//! averages all angles' corrections converges differently and is
//! deliberately not offered.)

use crate::geometry::{AngleSet, Geometry};
use crate::image::Image;
use crate::projector::{project_row, back_project_row, ray_weights};
use crate::sinogram::Sinogram;
use crate::types::Weightf32;

/// Generate the infinite sequence of SART estimates for a measured
/// sinogram, starting from a zero image; the caller `take`s its iteration
/// budget. Parameter validation happens upstream in
/// [`crate::Scanner::reconstruct_sart`].
pub fn estimates<'a>(
    measured  : &'a Sinogram,
    angles    : &'a AngleSet,
    geometry  :     Geometry,
    relaxation:     f32,
) -> impl Iterator<Item = Image> + 'a {
    debug_assert_eq!(measured.n_angles(), angles.len());

    let sincos = angles.sincos();

    // Splat weights per ray depend only on the geometry and angle, not on
    // the estimate, so compute them once for all iterations.
    let weights: Vec<Vec<Weightf32>> = sincos.iter()
        .map(|&sc| ray_weights(sc, geometry))
        .collect();

    let mut estimate = Image::zeros(geometry.n);

    std::iter::from_fn(move || {
        for (i, &sc) in sincos.iter().enumerate() {
            let projected = project_row(&estimate, sc, geometry);

            // Residual per ray, normalized by how much pixel mass the ray
            // sees; rays that see none are skipped entirely.
            let measured_row = measured.row(i);
            let residual: Vec<f32> = projected.iter()
                .zip(measured_row.iter())
                .zip(weights[i].iter())
                .map(|((est, meas), w)| if *w > 0.0 { (meas - est) / w } else { 0.0 })
                .collect();

            let correction = back_project_row(&residual, sc, geometry);
            for (pixel, delta) in estimate.data.iter_mut().zip(correction) {
                *pixel += relaxation * delta;
                if *pixel < 0.0 { *pixel = 0.0 }
            }
        }
        Some(estimate.clone())
    })
}

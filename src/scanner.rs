//! The engine surface consumed by presentation code: one `Scanner` bound to
//! one validated image, re-invoked freely with different angles, filters and
//! algorithms. Filter and algorithm are per-call parameters, never state on
//! the scanner, so an animation loop can sweep `max_angle` or swap kernels
//! between calls without touching the image again.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::geometry::{AngleSet, Geometry};
use crate::image::Image;
use crate::projector::{project, back_project};
use crate::sart;
use crate::sinogram::Sinogram;

/// Reconstruction method selection, as offered to the user: the five filter
/// names select FBP with that kernel, `SART` selects the iterative method.
/// `FBP` on its own means FBP with the ramp kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Fbp(Filter),
    Sart,
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "SART" => Ok(Algorithm::Sart),
            "FBP"  => Ok(Algorithm::Fbp(Filter::Ramp)),
            other  => other.parse::<Filter>().map(Algorithm::Fbp),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Fbp(filter) => write!(f, "FBP/{filter}"),
            Algorithm::Sart        => write!(f, "SART"),
        }
    }
}

pub struct Scanner {
    image: Image,
    geometry: Geometry,
}

impl Scanner {

    /// Validate the image once; all later calls reuse it as-is.
    pub fn new(image: Image) -> Result<Self> {
        // Image invariants are established by its constructors, but an Image
        // built by hand could have been resized since; re-check cheaply.
        let image = Image::new(image.n, image.data)?;
        let geometry = Geometry::for_image_side(image.n);
        Ok(Self { image, geometry })
    }

    pub fn image(&self) -> &Image { &self.image }

    pub fn geometry(&self) -> Geometry { self.geometry }

    /// Radon transform only.
    pub fn project(&self, max_angle: u32, step: u32) -> Result<Sinogram> {
        let angles = AngleSet::new(max_angle, step)?;
        Ok(project(&self.image, &angles, self.geometry))
    }

    /// Filtered back-projection. Returns the sinogram alongside the
    /// reconstruction; both are first-class outputs.
    pub fn reconstruct_fbp(&self, max_angle: u32, step: u32, filter: Filter)
                           -> Result<(Sinogram, Image)>
    {
        let angles = AngleSet::new(max_angle, step)?;
        let sinogram = project(&self.image, &angles, self.geometry);
        let filtered = filter.apply(&sinogram);
        let mut reconstruction = back_project(&filtered, &angles, self.geometry);
        reconstruction.clip_negative();
        Ok((sinogram, reconstruction))
    }

    /// Iterative SART reconstruction over a fixed iteration budget.
    ///
    /// Relaxation factors above 1 are accepted up to (but excluding) 2:
    /// they can speed convergence but risk divergence, which is the
    /// caller's tuning responsibility.
    pub fn reconstruct_sart(&self, max_angle: u32, step: u32,
                            iterations: usize, relaxation: f32) -> Result<Image>
    {
        if iterations == 0 || !(relaxation > 0.0 && relaxation < 2.0) {
            return Err(Error::InvalidIterationParameters { iterations, relaxation });
        }
        let angles = AngleSet::new(max_angle, step)?;
        let sinogram = project(&self.image, &angles, self.geometry);
        let image = sart::estimates(&sinogram, &angles, self.geometry, relaxation)
            .take(iterations)
            .last()
            .expect("iteration budget is non-zero");
        Ok(image)
    }
}

pub use crate::types::{Intensityf32, Weightf32, Anglef32, Index1, Index2};

pub use crate::error::{Error, Result};
pub use crate::geometry::{Geometry, AngleSet};
pub use crate::image::Image;
pub use crate::sinogram::Sinogram;
pub use crate::filter::Filter;
pub use crate::scanner::{Scanner, Algorithm};

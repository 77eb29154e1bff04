mod exports;
pub use exports::*;

pub mod config;
pub mod error;
pub mod filter;
pub mod fom;
pub mod geometry;
pub mod image;
pub mod io;
pub mod projector;
pub mod sart;
pub mod scanner;
pub mod sinogram;
pub mod types;
pub mod utils;

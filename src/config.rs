//! Configuration file parser for the reconstruction CLI

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};

use crate::error::Result;
use crate::scanner::Algorithm;

/// Parse a field through the type's `FromStr` impl, so the config file uses
/// the same spellings the CLI accepts (`ramp`, `shepp-logan`, ..., `SART`).
fn deserialize_from_str<'d, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'d>,
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    <&str>::deserialize(deserializer)?
        .parse::<T>()
        .map_err(de::Error::custom)
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Config {

    /// Upper bound (exclusive) of the projection angles, in degrees
    #[serde(default = "default_max_angle")]
    pub max_angle: u32,

    /// Angular step in degrees for full reconstruction
    #[serde(default = "default_step")]
    pub step: u32,

    /// Reconstruction method: a filter name, `FBP`, or `SART`
    #[serde(default = "default_algorithm")]
    #[serde(deserialize_with = "deserialize_from_str")]
    pub algorithm: Algorithm,

    /// Number of SART iterations
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// SART relaxation factor, in (0, 2)
    #[serde(default = "default_relaxation")]
    pub relaxation: f32,
}

fn default_max_angle()  -> u32       { 180 }
fn default_step()       -> u32       { 1 }
fn default_algorithm()  -> Algorithm { Algorithm::Fbp(crate::filter::Filter::Ramp) }
fn default_iterations() -> usize     { 10 }
fn default_relaxation() -> f32       { 0.25 }

impl Default for Config {
    fn default() -> Self {
        Self {
            max_angle:  default_max_angle(),
            step:       default_step(),
            algorithm:  default_algorithm(),
            iterations: default_iterations(),
            relaxation: default_relaxation(),
        }
    }
}

pub fn read_config_file(path: &Path) -> Result<Config> {
    let config = fs::read_to_string(path)?;
    toml::from_str(&config).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e).into()
    })
}

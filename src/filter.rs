//! Frequency-domain filter bank for filtered back-projection.
//!
//! Every kernel is the ramp `2|nu|` (nu in cycles per sample, zero at DC,
//! maximal at Nyquist) tapered by a named window. Responses are purely real
//! and even-symmetric, so filtering is zero-phase and shifts nothing in
//! detector space.

use std::str::FromStr;

use num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::{Error, Result};
use crate::sinogram::Sinogram;
use crate::types::{Intensityf32, PI};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    Ramp,
    SheppLogan,
    Cosine,
    Hamming,
    Hann,
}

impl FromStr for Filter {
    type Err = Error;

    // Exact, case-sensitive names, matching the user-facing filter list
    fn from_str(name: &str) -> Result<Self> {
        match name {
            "ramp"        => Ok(Filter::Ramp),
            "shepp-logan" => Ok(Filter::SheppLogan),
            "cosine"      => Ok(Filter::Cosine),
            "hamming"     => Ok(Filter::Hamming),
            "hann"        => Ok(Filter::Hann),
            other => Err(Error::UnsupportedFilter(other.to_string())),
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Filter::Ramp       => "ramp",
            Filter::SheppLogan => "shepp-logan",
            Filter::Cosine     => "cosine",
            Filter::Hamming    => "hamming",
            Filter::Hann       => "hann",
        };
        write!(f, "{name}")
    }
}

impl Filter {

    /// Frequency response over an FFT of length `len`, indexed in the usual
    /// FFT bin order (DC, positive frequencies, negative frequencies).
    pub fn response(&self, len: usize) -> Vec<Intensityf32> {
        (0..len).map(|k| {
            // Signed normalized frequency in (-0.5, 0.5]
            let nu = if k <= len / 2 { k as f32 / len as f32 }
                     else            { k as f32 / len as f32 - 1.0 };
            let ramp = 2.0 * nu.abs();
            ramp * self.window(nu)
        }).collect()
    }

    fn window(&self, nu: f32) -> f32 {
        match self {
            Filter::Ramp => 1.0,
            Filter::SheppLogan => {
                if nu == 0.0 { 1.0 } else { (PI * nu).sin() / (PI * nu) }
            }
            Filter::Cosine  => (PI * nu).cos(),
            Filter::Hamming => 0.54 + 0.46 * (2.0 * PI * nu).cos(),
            Filter::Hann    => 0.5 + 0.5 * (2.0 * PI * nu).cos(),
        }
    }

    /// FFT length used when filtering rows of `bins` detector bins: next
    /// power of two with room for the filter's spatial support.
    pub fn padded_len(bins: usize) -> usize {
        usize::max(64, 2 * bins).next_power_of_two()
    }

    /// Filter every sinogram row: pad, transform, multiply by the response,
    /// transform back, truncate. Dimensions are preserved exactly.
    pub fn apply(&self, sinogram: &Sinogram) -> Sinogram {
        let bins = sinogram.bins();
        let len = Self::padded_len(bins);
        let response = self.response(len);

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(len);
        let inverse = planner.plan_fft_inverse(len);

        let mut filtered = Sinogram::zeros(sinogram.n_angles(), bins);
        let mut buffer = vec![Complex::new(0.0_f32, 0.0); len];

        for i in 0..sinogram.n_angles() {
            buffer.fill(Complex::new(0.0, 0.0));
            for (b, v) in buffer.iter_mut().zip(sinogram.row(i).iter()) {
                b.re = *v;
            }

            forward.process(&mut buffer);
            for (b, r) in buffer.iter_mut().zip(response.iter()) {
                *b *= *r;
            }
            inverse.process(&mut buffer);

            // rustfft leaves transforms unnormalized
            let scale = 1.0 / len as f32;
            for (out, b) in filtered.row_mut(i).iter_mut().zip(buffer.iter()) {
                *out = b.re * scale;
            }
        }
        filtered
    }
}

#[cfg(test)]
mod test_filter {
    use super::*;
    use float_eq::assert_float_eq;
    use rstest::rstest;

    #[rstest(/**/ name, expected,
             case("ramp",        Filter::Ramp),
             case("shepp-logan", Filter::SheppLogan),
             case("cosine",      Filter::Cosine),
             case("hamming",     Filter::Hamming),
             case("hann",        Filter::Hann),
    )]
    fn recognized_names(name: &str, expected: Filter) {
        assert_eq!(name.parse::<Filter>().unwrap(), expected);
        assert_eq!(expected.to_string(), name);
    }

    #[rstest(/**/ name,
             case("blackman"),
             case("Ramp"),        // case-sensitive
             case("shepp_logan"),
             case(""),
    )]
    fn unrecognized_names(name: &str) {
        assert!(matches!(name.parse::<Filter>(),
                         Err(Error::UnsupportedFilter(_))));
    }

    #[rstest(/**/ filter,
             case(Filter::Ramp),
             case(Filter::SheppLogan),
             case(Filter::Cosine),
             case(Filter::Hamming),
             case(Filter::Hann),
    )]
    fn response_is_even_symmetric_and_zero_at_dc(filter: Filter) {
        let len = 256;
        let response = filter.response(len);
        assert_float_eq!(response[0], 0.0, abs <= 0.0);
        for k in 1..len {
            assert_float_eq!(response[k], response[len - k], abs <= 1e-6);
        }
    }

    #[test]
    fn ramp_grows_linearly_to_nyquist() {
        let len = 128;
        let response = Filter::Ramp.response(len);
        for k in 1..=len / 2 {
            assert_float_eq!(response[k], 2.0 * k as f32 / len as f32, abs <= 1e-6);
        }
        assert_float_eq!(response[len / 2], 1.0, abs <= 1e-6);
    }

    #[test]
    fn windows_taper_the_ramp_below_unity() {
        let len = 128;
        let ramp = Filter::Ramp.response(len);
        for filter in [Filter::SheppLogan, Filter::Cosine, Filter::Hamming, Filter::Hann] {
            let windowed = filter.response(len);
            for k in 1..len {
                assert!(windowed[k] <= ramp[k] + 1e-6,
                        "{filter} exceeds ramp at bin {k}");
            }
        }
    }

    #[test]
    fn identical_inputs_give_identical_responses() {
        assert_eq!(Filter::Hamming.response(512), Filter::Hamming.response(512));
    }

    #[test]
    fn filtering_preserves_dimensions() {
        let sinogram = Sinogram::from_rows(vec![vec![1.0; 47]; 13], 47);
        let filtered = Filter::Hann.apply(&sinogram);
        assert_eq!(filtered.n_angles(), 13);
        assert_eq!(filtered.bins(), 47);
    }

    #[test]
    fn filtering_is_linear() {
        let a = Sinogram::from_rows(
            (0..4).map(|i| (0..31).map(|j| ((i + j) % 7) as f32).collect()).collect(), 31);
        let b = Sinogram::from_rows(
            (0..4).map(|i| (0..31).map(|j| ((i * j) % 5) as f32 * 0.25).collect()).collect(), 31);

        let filtered_sum = Filter::Ramp.apply(&(&a + &b));
        let sum_filtered = &Filter::Ramp.apply(&a) + &Filter::Ramp.apply(&b);

        for (x, y) in filtered_sum.iter().zip(sum_filtered.iter()) {
            assert_float_eq!(*x, *y, abs <= 1e-3);
        }
    }
}

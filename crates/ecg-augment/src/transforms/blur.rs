//! Smoothing transforms

use crate::functional as F;
use crate::transform::{Augmentation, Gate, ParamValue, Params};
use crate::validate::{require_odd_bounds, require_positive, size_range, RangeInput};
use ecg_core::{AugResult, Signal};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Draw an odd kernel size between the odd bounds
fn sample_kernel_size(range: (usize, usize), rng: &mut dyn RngCore) -> usize {
    2 * rng.gen_range(range.0 / 2..=range.1 / 2) + 1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    pub kernel_size_range: RangeInput<i64>,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            kernel_size_range: RangeInput::from((3, 5)),
            always_apply: false,
            p: 0.5,
        }
    }
}

/// Moving average with a random odd window
#[derive(Debug, Clone)]
pub struct Blur {
    kernel_size_range: (usize, usize),
    gate: Gate,
}

impl Blur {
    pub fn new(config: BlurConfig) -> AugResult<Self> {
        let range = size_range(&config.kernel_size_range, 0, "kernel_size_range")?;
        Ok(Blur {
            kernel_size_range: require_odd_bounds(range, "kernel_size_range")?,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }
}

impl Augmentation for Blur {
    fn name(&self) -> &'static str {
        "Blur"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn sample_params(&self, rng: &mut dyn RngCore) -> AugResult<Params> {
        let size = sample_kernel_size(self.kernel_size_range, rng);
        let kernel = vec![1.0 / size as f32; size];
        Ok(Params::new().with("kernel", kernel))
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
        Ok(F::correlate_same(signal, params.get_floats("kernel")?))
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![("kernel_size_range", self.kernel_size_range.into())]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussBlurConfig {
    pub variance: f32,
    pub kernel_size_range: RangeInput<i64>,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for GaussBlurConfig {
    fn default() -> Self {
        Self {
            variance: 1.0,
            kernel_size_range: RangeInput::from((5, 5)),
            always_apply: false,
            p: 0.5,
        }
    }
}

/// Gaussian weighted smoothing with a random odd window
#[derive(Debug, Clone)]
pub struct GaussBlur {
    variance: f32,
    kernel_size_range: (usize, usize),
    gate: Gate,
}

impl GaussBlur {
    pub fn new(config: GaussBlurConfig) -> AugResult<Self> {
        let range = size_range(&config.kernel_size_range, 0, "kernel_size_range")?;
        Ok(GaussBlur {
            variance: require_positive(config.variance, "variance")?,
            kernel_size_range: require_odd_bounds(range, "kernel_size_range")?,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }

    /// Normalized gaussian weights over `size` taps centred on zero
    pub fn kernel(&self, size: usize) -> Vec<f32> {
        let half = (size / 2) as i64;
        let weights: Vec<f32> = (-half..=half)
            .map(|offset| (-0.5 * (offset * offset) as f32 / self.variance).exp())
            .collect();
        let total: f32 = weights.iter().sum();
        weights.into_iter().map(|w| w / total).collect()
    }
}

impl Augmentation for GaussBlur {
    fn name(&self) -> &'static str {
        "GaussBlur"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn sample_params(&self, rng: &mut dyn RngCore) -> AugResult<Params> {
        let size = sample_kernel_size(self.kernel_size_range, rng);
        Ok(Params::new().with("kernel", self.kernel(size)))
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
        Ok(F::correlate_same(signal, params.get_floats("kernel")?))
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![
            ("variance", self.variance.into()),
            ("kernel_size_range", self.kernel_size_range.into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_even_bounds_rejected() {
        let config = BlurConfig { kernel_size_range: RangeInput::from((2, 4)), ..BlurConfig::default() };
        assert!(Blur::new(config).unwrap_err().is_config());

        let config = GaussBlurConfig { kernel_size_range: RangeInput::Scalar(4), ..GaussBlurConfig::default() };
        assert!(GaussBlur::new(config).is_err());
    }

    #[test]
    fn test_blur_kernel_sizes() {
        let blur = Blur::new(BlurConfig::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        for _ in 0..50 {
            let params = blur.sample_params(&mut rng).unwrap();
            let kernel = params.get_floats("kernel").unwrap();
            assert!(kernel.len() == 3 || kernel.len() == 5);
            assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_gauss_kernel_shape() {
        let blur = GaussBlur::new(GaussBlurConfig::default()).unwrap();
        let kernel = blur.kernel(5);

        assert_eq!(kernel.len(), 5);
        assert!((kernel.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!((kernel[0] - kernel[4]).abs() < 1e-7);
        assert!(kernel[2] > kernel[1] && kernel[1] > kernel[0]);
        assert!((kernel[2] - 0.4026).abs() < 1e-3);
    }

    #[test]
    fn test_gauss_variance_must_be_positive() {
        let config = GaussBlurConfig { variance: 0.0, ..GaussBlurConfig::default() };
        assert!(GaussBlur::new(config).is_err());
    }
}

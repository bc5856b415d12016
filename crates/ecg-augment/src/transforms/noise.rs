//! Additive gaussian noise

use crate::functional as F;
use crate::transform::{Augmentation, Gate, Inspection, ParamValue, Params, INSPECTS_SIGNAL};
use crate::validate::require_non_negative;
use ecg_core::{config_error, AugResult, Signal, Target};
use rand::RngCore;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussNoiseConfig {
    pub mean: f32,
    pub variance: f32,
    /// Draw independent noise for every channel instead of one shared trace
    pub per_channel: bool,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for GaussNoiseConfig {
    fn default() -> Self {
        Self {
            mean: 0.0,
            variance: 0.01,
            per_channel: true,
            always_apply: false,
            p: 0.5,
        }
    }
}

/// Add normally distributed noise sized to the signal
#[derive(Debug, Clone)]
pub struct GaussNoise {
    mean: f32,
    variance: f32,
    per_channel: bool,
    normal: Normal<f32>,
    gate: Gate,
}

impl GaussNoise {
    pub fn new(config: GaussNoiseConfig) -> AugResult<Self> {
        let variance = require_non_negative(config.variance, "variance")?;
        if !config.mean.is_finite() {
            return Err(config_error!("mean", "must be finite, got {}", config.mean));
        }

        let normal = Normal::new(config.mean, variance.sqrt())
            .map_err(|e| config_error!("variance", "{}", e))?;

        Ok(GaussNoise {
            mean: config.mean,
            variance,
            per_channel: config.per_channel,
            normal,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }
}

impl Augmentation for GaussNoise {
    fn name(&self) -> &'static str {
        "GaussNoise"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn inspected_targets(&self) -> &'static [Target] {
        INSPECTS_SIGNAL
    }

    fn sample_params_from_targets(&self, targets: &Inspection<'_>, rng: &mut dyn RngCore) -> AugResult<Params> {
        let signal = targets.signal()?;
        let count = if self.per_channel {
            signal.len() * signal.channel_count()
        } else {
            signal.len()
        };

        let gauss: Vec<f32> = (0..count).map(|_| self.normal.sample(&mut *rng)).collect();
        Ok(Params::new().with("gauss", gauss))
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
        F::add_noise(signal, params.get_floats("gauss")?)
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![
            ("mean", self.mean.into()),
            ("variance", self.variance.into()),
            ("per_channel", self.per_channel.into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;
    use ecg_core::Bundle;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_negative_variance_rejected() {
        let config = GaussNoiseConfig { variance: -1.0, ..GaussNoiseConfig::default() };
        assert!(GaussNoise::new(config).unwrap_err().is_config());
    }

    #[test]
    fn test_shared_noise_across_channels() {
        let noise = GaussNoise::new(GaussNoiseConfig {
            per_channel: false,
            always_apply: true,
            ..GaussNoiseConfig::default()
        })
        .unwrap();
        let signal = Signal::from_channels(vec![vec![0.0; 50], vec![0.0; 50], vec![0.0; 50]]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let output = noise.invoke(Bundle::with_signal(signal), false, &mut rng).unwrap();
        let output = output.signal().unwrap();
        for t in 0..50 {
            let row = output.row(t);
            assert_eq!(row[0], row[1]);
            assert_eq!(row[1], row[2]);
        }
    }

    #[test]
    fn test_noise_statistics() {
        let noise = GaussNoise::new(GaussNoiseConfig {
            mean: 1.0,
            variance: 0.25,
            always_apply: true,
            ..GaussNoiseConfig::default()
        })
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let output = noise
            .invoke(Bundle::with_signal(Signal::mono(vec![0.0; 20_000])), false, &mut rng)
            .unwrap();
        let stats = output.signal().unwrap().channel_stats(0).unwrap();
        assert!((stats.mean - 1.0).abs() < 0.02);
        assert!((stats.std_dev - 0.5).abs() < 0.02);
    }
}

//! Identity and amplitude transforms

use crate::functional as F;
use crate::transform::{Augmentation, Capability, Gate, ParamValue, Params};
use crate::validate::{symmetric_range, RangeInput};
use ecg_core::{AugResult, Signal};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Gate settings for transforms without parameters of their own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub always_apply: bool,
    pub p: f32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { always_apply: false, p: 0.5 }
    }
}

impl GateConfig {
    pub fn always() -> Self {
        Self { always_apply: true, p: 1.0 }
    }

    pub fn with_probability(p: f32) -> Self {
        Self { always_apply: false, p }
    }

    pub fn gate(&self) -> AugResult<Gate> {
        Gate::new(self.always_apply, self.p)
    }
}

/// Returns every target unchanged
#[derive(Debug, Clone)]
pub struct Identity {
    gate: Gate,
}

impl Identity {
    pub fn new(config: GateConfig) -> AugResult<Self> {
        Ok(Identity { gate: config.gate()? })
    }
}

impl Augmentation for Identity {
    fn name(&self) -> &'static str {
        "Identity"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn capability(&self) -> Capability {
        Capability::Dual
    }

    fn apply(&self, signal: Signal, _params: &Params) -> AugResult<Signal> {
        Ok(signal)
    }
}

/// Negate the signal
#[derive(Debug, Clone)]
pub struct AmplitudeInvert {
    gate: Gate,
}

impl AmplitudeInvert {
    pub fn new(config: GateConfig) -> AugResult<Self> {
        Ok(AmplitudeInvert { gate: config.gate()? })
    }
}

impl Augmentation for AmplitudeInvert {
    fn name(&self) -> &'static str {
        "AmplitudeInvert"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn apply(&self, signal: Signal, _params: &Params) -> AugResult<Signal> {
        Ok(F::invert(signal))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmplitudeScaleConfig {
    /// Scaling factor is `1 + U(range)`
    pub scaling_range: RangeInput<f32>,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for AmplitudeScaleConfig {
    fn default() -> Self {
        Self {
            scaling_range: RangeInput::from((-0.05, 0.05)),
            always_apply: false,
            p: 0.5,
        }
    }
}

/// Multiply the signal by a random factor around one
#[derive(Debug, Clone)]
pub struct AmplitudeScale {
    scaling_range: (f32, f32),
    gate: Gate,
}

impl AmplitudeScale {
    pub fn new(config: AmplitudeScaleConfig) -> AugResult<Self> {
        Ok(AmplitudeScale {
            scaling_range: symmetric_range(&config.scaling_range, "scaling_range")?,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }
}

impl Augmentation for AmplitudeScale {
    fn name(&self) -> &'static str {
        "AmplitudeScale"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn sample_params(&self, rng: &mut dyn RngCore) -> AugResult<Params> {
        let (low, high) = self.scaling_range;
        let offset = if low < high { rng.gen_range(low..high) } else { low };
        Ok(Params::new().with("scaling_factor", 1.0 + offset))
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
        Ok(F::scale(signal, params.get_float("scaling_factor")?))
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![("scaling_range", self.scaling_range.into())]
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
    fn test_identity_keeps_mask() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let bundle = Bundle::with_signal(Signal::mono(vec![1.0, 2.0])).with_mask(Signal::mono(vec![0.0, 1.0]));

        let output = Identity::new(GateConfig::always()).unwrap().invoke(bundle.clone(), false, &mut rng).unwrap();
        assert_eq!(output, bundle);
    }

    #[test]
    fn test_invert_leaves_mask() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let bundle = Bundle::with_signal(Signal::mono(vec![1.0, -2.0])).with_mask(Signal::mono(vec![1.0, 1.0]));

        let output = AmplitudeInvert::new(GateConfig::always()).unwrap().invoke(bundle, false, &mut rng).unwrap();
        assert_eq!(output.signal().unwrap().data(), &[-1.0, 2.0]);
        assert_eq!(output.mask().unwrap().data(), &[1.0, 1.0]);
    }

    #[test]
    fn test_scale_within_range() {
        let scale = AmplitudeScale::new(AmplitudeScaleConfig {
            scaling_range: RangeInput::Scalar(0.1),
            ..AmplitudeScaleConfig::default()
        })
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..100 {
            let factor = scale.sample_params(&mut rng).unwrap().get_float("scaling_factor").unwrap();
            assert!((0.9..1.1).contains(&factor));
        }
    }

    #[test]
    fn test_scale_describe() {
        let scale = AmplitudeScale::new(AmplitudeScaleConfig::default()).unwrap();
        assert_eq!(
            scale.describe(),
            "AmplitudeScale(scaling_range=(-0.05, 0.05), always_apply=False, p=0.5)"
        );
    }
}

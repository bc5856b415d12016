//! Periodic pulse and interference transforms
//!
//! Sine and square pulses share one [`PulseSampler`]; powerline and
//! respiration noise are sine pulses whose frequency follows a
//! [`FrequencyPolicy`].

use crate::functional::{self as F, Waveform};
use crate::transform::{Augmentation, Gate, ParamValue, Params};
use crate::validate::{asymmetric_range, require_non_negative, require_positive, size_range, RangeInput};
use ecg_core::{AugResult, Signal};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// How the pulse frequency bounds were specified
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrequencyPolicy {
    /// Explicit range in Hz
    Range(f32, f32),
    /// Fixed mains frequency in Hz
    Powerline(f32),
    /// Breathing rate range in breaths per minute
    Breathing(usize, usize),
}

impl FrequencyPolicy {
    /// Frequency bounds in Hz
    pub fn frequency_range(&self) -> (f32, f32) {
        match *self {
            FrequencyPolicy::Range(low, high) => (low, high),
            FrequencyPolicy::Powerline(frequency) => (frequency, frequency),
            FrequencyPolicy::Breathing(low, high) => (low as f32 / 60.0, high as f32 / 60.0),
        }
    }

    fn init_arg(&self) -> (&'static str, ParamValue) {
        match *self {
            FrequencyPolicy::Range(low, high) => ("pulse_frequency_range", (low, high).into()),
            FrequencyPolicy::Powerline(frequency) => ("powerline_frequency", frequency.into()),
            FrequencyPolicy::Breathing(low, high) => ("breathing_rate_range", (low, high).into()),
        }
    }
}

/// Draws amplitude, frequency and phase for a periodic pulse
#[derive(Debug, Clone, PartialEq)]
pub struct PulseSampler {
    sampling_rate: f32,
    policy: FrequencyPolicy,
    amplitude_limit: f32,
}

impl PulseSampler {
    pub fn new(sampling_rate: f32, policy: FrequencyPolicy, amplitude_limit: f32) -> AugResult<Self> {
        Ok(PulseSampler {
            sampling_rate: require_positive(sampling_rate, "sampling_rate")?,
            policy,
            amplitude_limit: require_non_negative(amplitude_limit, "amplitude_limit")?,
        })
    }

    pub fn sample(&self, rng: &mut dyn RngCore) -> Params {
        let (min_frequency, max_frequency) = self.policy.frequency_range();

        let amplitude = rng.gen::<f32>() * self.amplitude_limit;
        let frequency = rng.gen::<f32>() * (max_frequency - min_frequency) + min_frequency;
        let phase = rng.gen::<f32>() * 2.0 * PI;

        Params::new()
            .with("amplitude", amplitude)
            .with("frequency", frequency)
            .with("phase", phase)
    }

    pub fn apply(&self, signal: Signal, params: &Params, waveform: Waveform) -> AugResult<Signal> {
        Ok(F::add_pulse(
            signal,
            self.sampling_rate,
            params.get_float("amplitude")?,
            params.get_float("frequency")?,
            params.get_float("phase")?,
            waveform,
        ))
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![
            ("sampling_rate", self.sampling_rate.into()),
            self.policy.init_arg(),
            ("amplitude_limit", self.amplitude_limit.into()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinePulseConfig {
    pub sampling_rate: f32,
    pub pulse_frequency_range: RangeInput<f32>,
    pub amplitude_limit: f32,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for SinePulseConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 500.0,
            pulse_frequency_range: RangeInput::from((0.0, 1.0)),
            amplitude_limit: 1.0,
            always_apply: false,
            p: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerlineNoiseConfig {
    pub sampling_rate: f32,
    /// 50 Hz in Europe, 60 Hz in the Americas and parts of Asia
    pub powerline_frequency: f32,
    pub amplitude_limit: f32,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for PowerlineNoiseConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 500.0,
            powerline_frequency: 50.0,
            amplitude_limit: 0.3,
            always_apply: false,
            p: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespirationNoiseConfig {
    pub sampling_rate: f32,
    /// Breaths per minute
    pub breathing_rate_range: RangeInput<i64>,
    pub amplitude_limit: f32,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for RespirationNoiseConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 500.0,
            breathing_rate_range: RangeInput::from((12, 18)),
            amplitude_limit: 1.0,
            always_apply: false,
            p: 0.5,
        }
    }
}

/// Add a sinusoid with random amplitude, frequency and phase
#[derive(Debug, Clone)]
pub struct SinePulse {
    sampler: PulseSampler,
    gate: Gate,
}

impl SinePulse {
    pub fn new(config: SinePulseConfig) -> AugResult<Self> {
        let (low, high) = asymmetric_range(&config.pulse_frequency_range, 0.0, "pulse_frequency_range")?;
        Ok(SinePulse {
            sampler: PulseSampler::new(config.sampling_rate, FrequencyPolicy::Range(low, high), config.amplitude_limit)?,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }

    /// Mains interference at a fixed frequency
    pub fn powerline(config: PowerlineNoiseConfig) -> AugResult<Self> {
        let frequency = require_non_negative(config.powerline_frequency, "powerline_frequency")?;
        Ok(SinePulse {
            sampler: PulseSampler::new(config.sampling_rate, FrequencyPolicy::Powerline(frequency), config.amplitude_limit)?,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }

    /// Slow baseline oscillation at a breathing rate
    pub fn respiration(config: RespirationNoiseConfig) -> AugResult<Self> {
        let (low, high) = size_range(&config.breathing_rate_range, 0, "breathing_rate_range")?;
        Ok(SinePulse {
            sampler: PulseSampler::new(config.sampling_rate, FrequencyPolicy::Breathing(low, high), config.amplitude_limit)?,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }
}

impl Augmentation for SinePulse {
    fn name(&self) -> &'static str {
        match self.sampler.policy {
            FrequencyPolicy::Range(..) => "SinePulse",
            FrequencyPolicy::Powerline(_) => "PowerlineNoise",
            FrequencyPolicy::Breathing(..) => "RespirationNoise",
        }
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn sample_params(&self, rng: &mut dyn RngCore) -> AugResult<Params> {
        Ok(self.sampler.sample(rng))
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
        self.sampler.apply(signal, params, Waveform::Sine)
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        self.sampler.init_args()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquarePulseConfig {
    pub sampling_rate: f32,
    pub pulse_frequency_range: RangeInput<f32>,
    pub amplitude_limit: f32,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for SquarePulseConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 500.0,
            pulse_frequency_range: RangeInput::from((0.0, 5.0)),
            amplitude_limit: 0.02,
            always_apply: false,
            p: 0.5,
        }
    }
}

/// Add a square wave with random amplitude, frequency and phase
#[derive(Debug, Clone)]
pub struct SquarePulse {
    sampler: PulseSampler,
    gate: Gate,
}

impl SquarePulse {
    pub fn new(config: SquarePulseConfig) -> AugResult<Self> {
        let (low, high) = asymmetric_range(&config.pulse_frequency_range, 0.0, "pulse_frequency_range")?;
        Ok(SquarePulse {
            sampler: PulseSampler::new(config.sampling_rate, FrequencyPolicy::Range(low, high), config.amplitude_limit)?,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }
}

impl Augmentation for SquarePulse {
    fn name(&self) -> &'static str {
        "SquarePulse"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn sample_params(&self, rng: &mut dyn RngCore) -> AugResult<Params> {
        Ok(self.sampler.sample(rng))
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
        self.sampler.apply(signal, params, Waveform::Square)
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        self.sampler.init_args()
    }
}

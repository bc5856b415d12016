//! Deterministic filtering transforms

use crate::filters::ButterworthFilter;
use crate::functional as F;
use crate::transform::{Augmentation, Gate, ParamValue, Params};
use crate::validate::{asymmetric_range, RangeInput};
use ecg_core::{AugResult, Signal};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowPassFilterConfig {
    pub sampling_rate: f32,
    pub cutoff_frequency: f32,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for LowPassFilterConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 500.0,
            cutoff_frequency: 47.0,
            always_apply: false,
            p: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighPassFilterConfig {
    pub sampling_rate: f32,
    /// Baseline wander sits below 0.5 Hz
    pub cutoff_frequency: f32,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for HighPassFilterConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 500.0,
            cutoff_frequency: 0.5,
            always_apply: false,
            p: 1.0,
        }
    }
}

/// Remove content above the cutoff frequency
#[derive(Debug, Clone)]
pub struct LowPassFilter {
    sampling_rate: f32,
    cutoff_frequency: f32,
    filter: ButterworthFilter,
    gate: Gate,
}

impl LowPassFilter {
    pub fn new(config: LowPassFilterConfig) -> AugResult<Self> {
        Ok(LowPassFilter {
            sampling_rate: config.sampling_rate,
            cutoff_frequency: config.cutoff_frequency,
            filter: ButterworthFilter::lowpass(config.cutoff_frequency, config.sampling_rate)?,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }
}

impl Augmentation for LowPassFilter {
    fn name(&self) -> &'static str {
        "LowPassFilter"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn apply(&self, signal: Signal, _params: &Params) -> AugResult<Signal> {
        Ok(self.filter.apply(signal))
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![
            ("sampling_rate", self.sampling_rate.into()),
            ("cutoff_frequency", self.cutoff_frequency.into()),
        ]
    }
}

/// Remove baseline content below the cutoff frequency
#[derive(Debug, Clone)]
pub struct HighPassFilter {
    sampling_rate: f32,
    cutoff_frequency: f32,
    filter: ButterworthFilter,
    gate: Gate,
}

impl HighPassFilter {
    pub fn new(config: HighPassFilterConfig) -> AugResult<Self> {
        Ok(HighPassFilter {
            sampling_rate: config.sampling_rate,
            cutoff_frequency: config.cutoff_frequency,
            filter: ButterworthFilter::highpass(config.cutoff_frequency, config.sampling_rate)?,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }
}

impl Augmentation for HighPassFilter {
    fn name(&self) -> &'static str {
        "HighPassFilter"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn apply(&self, signal: Signal, _params: &Params) -> AugResult<Signal> {
        Ok(self.filter.apply(signal))
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![
            ("sampling_rate", self.sampling_rate.into()),
            ("cutoff_frequency", self.cutoff_frequency.into()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandPassFilterConfig {
    pub sampling_rate: f32,
    pub cutoff_frequencies: RangeInput<f32>,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for BandPassFilterConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 500.0,
            cutoff_frequencies: RangeInput::from((0.5, 47.0)),
            always_apply: false,
            p: 1.0,
        }
    }
}

/// Keep the band between the two cutoff frequencies
#[derive(Debug, Clone)]
pub struct BandPassFilter {
    sampling_rate: f32,
    cutoff_frequencies: (f32, f32),
    filter: ButterworthFilter,
    gate: Gate,
}

impl BandPassFilter {
    pub fn new(config: BandPassFilterConfig) -> AugResult<Self> {
        let (low, high) = asymmetric_range(&config.cutoff_frequencies, 0.0, "cutoff_frequencies")?;
        Ok(BandPassFilter {
            sampling_rate: config.sampling_rate,
            cutoff_frequencies: (low, high),
            filter: ButterworthFilter::bandpass(low, high, config.sampling_rate)?,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }
}

impl Augmentation for BandPassFilter {
    fn name(&self) -> &'static str {
        "BandPassFilter"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn apply(&self, signal: Signal, _params: &Params) -> AugResult<Signal> {
        Ok(self.filter.apply(signal))
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![
            ("sampling_rate", self.sampling_rate.into()),
            ("cutoff_frequencies", self.cutoff_frequencies.into()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigmoidCompressionConfig {
    pub always_apply: bool,
    pub p: f32,
}

impl Default for SigmoidCompressionConfig {
    fn default() -> Self {
        Self { always_apply: false, p: 1.0 }
    }
}

/// Squash amplitudes into `(0, 1)` with the logistic function
#[derive(Debug, Clone)]
pub struct SigmoidCompression {
    gate: Gate,
}

impl SigmoidCompression {
    pub fn new(config: SigmoidCompressionConfig) -> AugResult<Self> {
        Ok(SigmoidCompression { gate: Gate::new(config.always_apply, config.p)? })
    }
}

impl Augmentation for SigmoidCompression {
    fn name(&self) -> &'static str {
        "SigmoidCompression"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn apply(&self, signal: Signal, _params: &Params) -> AugResult<Signal> {
        Ok(F::sigmoid(signal))
    }
}

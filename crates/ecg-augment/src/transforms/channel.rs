//! Channel level transforms

use crate::functional::{self as F, FillValue};
use crate::transform::{Augmentation, Gate, Inspection, ParamValue, Params, INSPECTS_SIGNAL};
use crate::transforms::amplitude::GateConfig;
use crate::validate::{size_range, RangeInput};
use ecg_core::{unsupported, AugResult, Signal, Target};
use rand::seq::{index, SliceRandom};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Randomly permute the channel columns
#[derive(Debug, Clone)]
pub struct ChannelShuffle {
    gate: Gate,
}

impl ChannelShuffle {
    pub fn new(config: GateConfig) -> AugResult<Self> {
        Ok(ChannelShuffle { gate: config.gate()? })
    }
}

impl Augmentation for ChannelShuffle {
    fn name(&self) -> &'static str {
        "ChannelShuffle"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn inspected_targets(&self) -> &'static [Target] {
        INSPECTS_SIGNAL
    }

    fn sample_params_from_targets(&self, targets: &Inspection<'_>, rng: &mut dyn RngCore) -> AugResult<Params> {
        let mut channel_order: Vec<usize> = (0..targets.signal()?.channel_count()).collect();
        channel_order.shuffle(rng);
        Ok(Params::new().with("channel_order", channel_order))
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
        F::channel_shuffle(signal, params.get_indices("channel_order")?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelDropoutConfig {
    /// Number of channels to drop, lower bound at least one
    pub channel_drop_range: RangeInput<i64>,
    pub fill_value: FillValue,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for ChannelDropoutConfig {
    fn default() -> Self {
        Self {
            channel_drop_range: RangeInput::from((1, 1)),
            fill_value: FillValue::Constant(0.0),
            always_apply: false,
            p: 0.5,
        }
    }
}

/// Replace a random subset of channels with a fill value
#[derive(Debug, Clone)]
pub struct ChannelDropout {
    channel_drop_range: (usize, usize),
    fill_value: FillValue,
    gate: Gate,
}

impl ChannelDropout {
    pub fn new(config: ChannelDropoutConfig) -> AugResult<Self> {
        Ok(ChannelDropout {
            channel_drop_range: size_range(&config.channel_drop_range, 1, "channel_drop_range")?,
            fill_value: config.fill_value,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }
}

impl Augmentation for ChannelDropout {
    fn name(&self) -> &'static str {
        "ChannelDropout"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn inspected_targets(&self) -> &'static [Target] {
        INSPECTS_SIGNAL
    }

    fn sample_params_from_targets(&self, targets: &Inspection<'_>, rng: &mut dyn RngCore) -> AugResult<Params> {
        let signal = targets.signal()?;
        let channels = signal.channel_count();

        if signal.is_mono() || channels == 1 {
            return Err(unsupported!("ChannelDropout", "signal has a single channel"));
        }

        let (min_drop, max_drop) = self.channel_drop_range;
        if max_drop >= channels {
            return Err(unsupported!(
                "ChannelDropout",
                "cannot drop up to {} of {} channels",
                max_drop,
                channels
            ));
        }

        let count = rng.gen_range(min_drop..=max_drop);
        let channels_to_drop = index::sample(rng, channels, count).into_vec();

        Ok(Params::new().with("channels_to_drop", channels_to_drop))
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
        F::channel_dropout(signal, params.get_indices("channels_to_drop")?, self.fill_value)
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![
            ("channel_drop_range", self.channel_drop_range.into()),
            ("fill_value", self.fill_value.into()),
        ]
    }
}

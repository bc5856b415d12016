//! Scoped modifiers restricting a child transform to part of the data

use crate::transform::{render_args, Gate, ParamValue, Transform, REPR_INDENT_STEP};
use ecg_core::{config_error, unsupported, AugError, AugResult, Bundle, Target};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Gate and channel settings of [`ToChannels`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToChannelsConfig {
    pub channels: Vec<usize>,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for ToChannelsConfig {
    fn default() -> Self {
        Self {
            channels: vec![0],
            always_apply: false,
            p: 0.5,
        }
    }
}

/// Apply a child transform to selected signal channels only.
///
/// When the gate fires the child sees a signal narrowed to `channels`;
/// its result is written back at the same positions and every other
/// channel keeps its input values. When the gate does not fire, or the
/// bundle carries no signal tensor, the child still runs on the full bundle.
pub struct ToChannels {
    transform: Box<dyn Transform>,
    channels: Vec<usize>,
    gate: Gate,
}

impl ToChannels {
    pub fn new(transform: Box<dyn Transform>, config: ToChannelsConfig) -> AugResult<Self> {
        if config.channels.is_empty() {
            return Err(config_error!("channels", "at least one channel must be selected"));
        }

        for (position, channel) in config.channels.iter().enumerate() {
            if config.channels[..position].contains(channel) {
                return Err(config_error!(
                    "channels",
                    "entry at position {} repeats channel {}",
                    position,
                    channel
                ));
            }
        }

        Ok(ToChannels {
            transform,
            channels: config.channels,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }

    pub fn channels(&self) -> &[usize] {
        &self.channels
    }

    pub fn transform(&self) -> &dyn Transform {
        self.transform.as_ref()
    }
}

impl Transform for ToChannels {
    fn name(&self) -> &'static str {
        "ToChannels"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn invoke(&self, mut bundle: Bundle, force_apply: bool, rng: &mut dyn RngCore) -> AugResult<Bundle> {
        if !self.gate.fires(force_apply, rng) {
            trace!(transform = "ToChannels", "running child unscoped");
            return self.transform.invoke(bundle, false, rng);
        }

        // Nothing to narrow without a signal
        let mut full = match bundle.take(&Target::Signal) {
            Some(signal) => signal,
            None => return self.transform.invoke(bundle, false, rng),
        };

        let width = full.channel_count();
        if let Some(&channel) = self.channels.iter().find(|&&channel| channel >= width) {
            return Err(unsupported!(
                "ToChannels",
                "channel {} is out of range for a signal with {} channels",
                channel,
                width
            ));
        }

        debug!(channels = ?self.channels, "scoping child to channels");
        let scoped = full.select_channels(&self.channels)?;
        bundle.insert(Target::Signal, Some(scoped));

        let mut output = self.transform.invoke(bundle, false, rng)?;

        let processed = output.take(&Target::Signal).ok_or_else(|| AugError::MissingTarget {
            transform: self.transform.name().to_string(),
            missing: vec![Target::Signal.to_string()],
        })?;

        if processed.len() != full.len() || processed.channel_count() != self.channels.len() {
            return Err(unsupported!(
                "ToChannels",
                "child returned a ({}, {}) signal, expected ({}, {})",
                processed.len(),
                processed.channel_count(),
                full.len(),
                self.channels.len()
            ));
        }

        full.write_channels(&self.channels, &processed)?;
        output.insert(Target::Signal, Some(full));
        Ok(output)
    }

    fn repr(&self, indent: usize) -> String {
        let mut args = vec![("channels", ParamValue::from(self.channels.clone()))];
        args.extend(self.gate.init_args());

        format!(
            "ToChannels(\n{}{},\n{}, {})",
            " ".repeat(indent),
            self.transform.repr(indent + REPR_INDENT_STEP),
            " ".repeat(indent.saturating_sub(REPR_INDENT_STEP)),
            render_args(&args)
        )
    }
}

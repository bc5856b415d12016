//! Multi-lead ECG simulator with aligned segmentation masks

use crate::beat_patterns::BeatPattern;
use ecg_core::{config_error, AugResult, Signal};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Configuration for ECG simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcgConfig {
    /// Sampling rate in Hz
    pub sampling_rate: f32,
    /// Number of leads to simulate
    pub channel_count: usize,
    /// Heart rate in beats per minute
    pub heart_rate_bpm: f32,
    /// Beat morphology
    pub pattern: BeatPattern,
    /// Noise configuration
    pub noise: NoiseConfig,
    /// Power line interference (50/60Hz)
    pub powerline_freq: Option<f32>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

/// Noise configuration for realistic ECG simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Gaussian noise standard deviation (0.0 = no noise)
    pub gaussian_std: f32,
    /// Baseline wander amplitude
    pub baseline_wander: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            gaussian_std: 0.01,
            baseline_wander: 0.05,
        }
    }
}

impl Default for EcgConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 500.0,
            channel_count: 12,
            heart_rate_bpm: 72.0,
            pattern: BeatPattern::normal_sinus(),
            noise: NoiseConfig::default(),
            powerline_freq: None,
            seed: None,
        }
    }
}

impl EcgConfig {
    pub fn validate(&self) -> AugResult<()> {
        if !(self.sampling_rate > 0.0) {
            return Err(config_error!("sampling_rate", "must be positive, got {}", self.sampling_rate));
        }
        if self.channel_count == 0 {
            return Err(config_error!("channel_count", "at least one lead is required"));
        }
        if !(20.0..=300.0).contains(&self.heart_rate_bpm) {
            return Err(config_error!(
                "heart_rate_bpm",
                "must lie in [20, 300], got {}",
                self.heart_rate_bpm
            ));
        }
        Ok(())
    }
}

/// ECG signal simulator
pub struct EcgSimulator {
    config: EcgConfig,
    rng: StdRng,
    normal_dist: Normal<f32>,
    time_offset: f32,
}

impl EcgSimulator {
    /// Create new ECG simulator with configuration
    pub fn new(config: EcgConfig) -> AugResult<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let normal_dist = Normal::new(0.0, config.noise.gaussian_std)
            .map_err(|e| config_error!("gaussian_std", "failed to create normal distribution: {}", e))?;

        Ok(EcgSimulator {
            config,
            rng,
            normal_dist,
            time_offset: 0.0,
        })
    }

    fn sample_count(&self, duration: f32) -> AugResult<usize> {
        if !(duration >= 0.0) {
            return Err(config_error!("duration", "must be non-negative, got {}", duration));
        }
        Ok((duration * self.config.sampling_rate) as usize)
    }

    /// Relative amplitude of each lead; limb and chest leads see the heart axis differently
    fn lead_gain(&self, channel_idx: usize) -> f32 {
        let angle = PI * (channel_idx as f32 + 0.5) / self.config.channel_count as f32;
        0.3 + 0.7 * angle.sin()
    }

    /// Generate a `(length, channels)` record for the given duration in seconds
    pub fn generate(&mut self, duration: f32) -> AugResult<Signal> {
        Ok(self.generate_with_mask(duration)?.0)
    }

    /// Generate a record together with its `(length, 1)` wave label track
    pub fn generate_with_mask(&mut self, duration: f32) -> AugResult<(Signal, Signal)> {
        let samples = self.sample_count(duration)?;
        let channels = self.config.channel_count;
        let dt = 1.0 / self.config.sampling_rate;
        let rr_interval = 60.0 / self.config.heart_rate_bpm;

        let mut data = Vec::with_capacity(samples * channels);
        let mut labels = Vec::with_capacity(samples);

        // Generate interleaved channel data
        for sample_idx in 0..samples {
            let time = self.time_offset + sample_idx as f32 * dt;
            let offset = time % rr_interval;
            let beat = self.config.pattern.value_at(offset, rr_interval);
            labels.push(self.config.pattern.label_at(offset, rr_interval).value());

            let wander = self.config.noise.baseline_wander * (2.0 * PI * 0.25 * time).sin();
            let powerline = self
                .config
                .powerline_freq
                .map_or(0.0, |frequency| 0.05 * (2.0 * PI * frequency * time).sin());

            for channel_idx in 0..channels {
                let noise = self.normal_dist.sample(&mut self.rng);
                data.push(beat * self.lead_gain(channel_idx) + wander + powerline + noise);
            }
        }

        // Update time offset for continuous generation
        self.time_offset += samples as f32 * dt;

        Ok((Signal::new(data, channels)?, Signal::new(labels, 1)?))
    }

    /// Reset time offset (useful for restarting simulation)
    pub fn reset_time(&mut self) {
        self.time_offset = 0.0;
    }

    /// Get current configuration
    pub fn config(&self) -> &EcgConfig {
        &self.config
    }
}

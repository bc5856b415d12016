//! Butterworth filters built from 2nd order biquad sections

use ecg_core::{config_error, AugResult, Signal};

/// Single biquad section (2nd order)
#[derive(Debug, Clone, PartialEq)]
pub struct BiquadSection {
    // Coefficients: y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
    b0: f32, b1: f32, b2: f32,
    a1: f32, a2: f32,
}

/// Per-channel delay line of one section
#[derive(Debug, Clone, Copy, Default)]
struct BiquadState {
    x1: f32, x2: f32,
    y1: f32, y2: f32,
}

impl BiquadSection {
    fn check_cutoff(cutoff: f32, fs: f32) -> AugResult<()> {
        if !(fs > 0.0) {
            return Err(config_error!("sampling_rate", "must be positive, got {}", fs));
        }
        if !(cutoff > 0.0) || cutoff >= fs / 2.0 {
            return Err(config_error!(
                "cutoff_frequency",
                "{} Hz must lie between 0 and the Nyquist frequency {} Hz",
                cutoff,
                fs / 2.0
            ));
        }
        Ok(())
    }

    /// Pre-warped bilinear transform terms shared by both designs
    fn prewarp(cutoff: f32, fs: f32) -> (f32, f32) {
        let omega_c = 2.0 * std::f32::consts::PI * cutoff / fs;
        let k = (omega_c / 2.0).tan();
        let k2 = k * k;
        let norm = k2 + std::f32::consts::SQRT_2 * k + 1.0;
        (k, norm)
    }

    /// 2nd order Butterworth lowpass
    pub fn lowpass(cutoff: f32, fs: f32) -> AugResult<Self> {
        Self::check_cutoff(cutoff, fs)?;
        let (k, norm) = Self::prewarp(cutoff, fs);
        let k2 = k * k;

        let b0 = k2 / norm;
        Ok(BiquadSection {
            b0,
            b1: 2.0 * b0,
            b2: b0,
            a1: (2.0 * (k2 - 1.0)) / norm,
            a2: (k2 - std::f32::consts::SQRT_2 * k + 1.0) / norm,
        })
    }

    /// 2nd order Butterworth highpass
    pub fn highpass(cutoff: f32, fs: f32) -> AugResult<Self> {
        Self::check_cutoff(cutoff, fs)?;
        let (k, norm) = Self::prewarp(cutoff, fs);
        let k2 = k * k;

        let b0 = 1.0 / norm;
        Ok(BiquadSection {
            b0,
            b1: -2.0 * b0,
            b2: b0,
            a1: (2.0 * (k2 - 1.0)) / norm,
            a2: (k2 - std::f32::consts::SQRT_2 * k + 1.0) / norm,
        })
    }

    fn process_sample(&self, state: &mut BiquadState, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * state.x1 + self.b2 * state.x2
            - self.a1 * state.y1 - self.a2 * state.y2;

        state.x2 = state.x1;
        state.x1 = input;
        state.y2 = state.y1;
        state.y1 = output;

        output
    }
}

/// Cascade of biquads applied causally along time, starting from rest
#[derive(Debug, Clone, PartialEq)]
pub struct ButterworthFilter {
    sections: Vec<BiquadSection>,
}

impl ButterworthFilter {
    pub fn lowpass(cutoff: f32, fs: f32) -> AugResult<Self> {
        Ok(ButterworthFilter { sections: vec![BiquadSection::lowpass(cutoff, fs)?] })
    }

    pub fn highpass(cutoff: f32, fs: f32) -> AugResult<Self> {
        Ok(ButterworthFilter { sections: vec![BiquadSection::highpass(cutoff, fs)?] })
    }

    /// Highpass at `low` followed by lowpass at `high`
    pub fn bandpass(low: f32, high: f32, fs: f32) -> AugResult<Self> {
        if low >= high {
            return Err(config_error!(
                "cutoff_frequencies",
                "lower cutoff {} must be below upper cutoff {}",
                low,
                high
            ));
        }
        Ok(ButterworthFilter {
            sections: vec![BiquadSection::highpass(low, fs)?, BiquadSection::lowpass(high, fs)?],
        })
    }

    /// Filter every channel with fresh state
    pub fn apply(&self, mut signal: Signal) -> Signal {
        let channels = signal.channel_count();
        let mut states = vec![BiquadState::default(); channels * self.sections.len()];

        for row in signal.data_mut().chunks_exact_mut(channels) {
            for (channel, sample) in row.iter_mut().enumerate() {
                let mut value = *sample;
                for (index, section) in self.sections.iter().enumerate() {
                    value = section.process_sample(&mut states[index * channels + channel], value);
                }
                *sample = value;
            }
        }

        signal
    }
}

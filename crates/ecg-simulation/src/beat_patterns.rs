//! Pre-defined heartbeat morphologies for synthetic ECG

use serde::{Deserialize, Serialize};

/// Segmentation label of a wave, as written into the mask track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveLabel {
    Background = 0,
    P = 1,
    Qrs = 2,
    T = 3,
}

impl WaveLabel {
    pub fn value(&self) -> f32 {
        *self as u8 as f32
    }
}

/// One gaussian bump of a heartbeat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveComponent {
    /// Peak position as a fraction of the RR interval
    pub center: f32,
    /// Standard deviation in seconds
    pub width: f32,
    /// Peak amplitude in mV
    pub amplitude: f32,
    pub label: WaveLabel,
}

impl WaveComponent {
    /// Contribution of this wave `offset` seconds into a beat
    pub fn value_at(&self, offset: f32, rr_interval: f32) -> f32 {
        let distance = (offset - self.center * rr_interval) / self.width;
        self.amplitude * (-0.5 * distance * distance).exp()
    }

    /// Whether `offset` falls within two widths of the peak
    pub fn covers(&self, offset: f32, rr_interval: f32) -> bool {
        (offset - self.center * rr_interval).abs() <= 2.0 * self.width
    }
}

/// P, Q, R, S and T waves of one heartbeat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatPattern {
    pub waves: Vec<WaveComponent>,
}

impl BeatPattern {
    fn from_waves(p: f32, q: f32, r: f32, s: f32, t: f32, qrs_width: f32) -> Self {
        BeatPattern {
            waves: vec![
                WaveComponent { center: 0.15, width: 0.025, amplitude: p, label: WaveLabel::P },
                WaveComponent { center: 0.27, width: qrs_width * 0.5, amplitude: q, label: WaveLabel::Qrs },
                WaveComponent { center: 0.30, width: qrs_width, amplitude: r, label: WaveLabel::Qrs },
                WaveComponent { center: 0.33, width: qrs_width * 0.5, amplitude: s, label: WaveLabel::Qrs },
                WaveComponent { center: 0.55, width: 0.04, amplitude: t, label: WaveLabel::T },
            ],
        }
    }

    /// Normal sinus rhythm morphology
    pub fn normal_sinus() -> Self {
        Self::from_waves(0.15, -0.1, 1.2, -0.25, 0.3, 0.012)
    }

    /// Narrow complexes with a flattened T wave
    pub fn tachycardia() -> Self {
        Self::from_waves(0.12, -0.08, 1.0, -0.2, 0.2, 0.01)
    }

    /// Every wave scaled down, as seen with effusion or obesity
    pub fn low_voltage() -> Self {
        Self::from_waves(0.05, -0.03, 0.4, -0.08, 0.1, 0.012)
    }

    /// Amplitude `offset` seconds into a beat of length `rr_interval`
    pub fn value_at(&self, offset: f32, rr_interval: f32) -> f32 {
        self.waves.iter().map(|wave| wave.value_at(offset, rr_interval)).sum()
    }

    /// Label of the wave covering `offset`, QRS taking precedence
    pub fn label_at(&self, offset: f32, rr_interval: f32) -> WaveLabel {
        let mut label = WaveLabel::Background;
        for wave in &self.waves {
            if wave.covers(offset, rr_interval) && (label == WaveLabel::Background || wave.label == WaveLabel::Qrs) {
                label = wave.label;
            }
        }
        label
    }

    /// Create common preset patterns
    pub fn presets() -> Vec<(&'static str, BeatPattern)> {
        vec![
            ("Normal Sinus", Self::normal_sinus()),
            ("Tachycardia", Self::tachycardia()),
            ("Low Voltage", Self::low_voltage()),
        ]
    }
}

impl Default for BeatPattern {
    fn default() -> Self {
        Self::normal_sinus()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_r_peak_dominates() {
        let beat = BeatPattern::normal_sinus();
        let r_peak = beat.value_at(0.3, 1.0);

        assert!((r_peak - 1.2).abs() < 0.05);
        assert!(beat.value_at(0.15, 1.0) < r_peak);
        assert!(beat.value_at(0.9, 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_labels() {
        let beat = BeatPattern::normal_sinus();

        assert_eq!(beat.label_at(0.15, 1.0), WaveLabel::P);
        assert_eq!(beat.label_at(0.30, 1.0), WaveLabel::Qrs);
        assert_eq!(beat.label_at(0.55, 1.0), WaveLabel::T);
        assert_eq!(beat.label_at(0.95, 1.0), WaveLabel::Background);
        assert_eq!(WaveLabel::T.value(), 3.0);
    }

    #[test]
    fn test_presets() {
        let presets = BeatPattern::presets();
        assert_eq!(presets.len(), 3);

        let low = BeatPattern::low_voltage().value_at(0.3, 1.0);
        let normal = BeatPattern::normal_sinus().value_at(0.3, 1.0);
        assert!(low < normal);
    }
}

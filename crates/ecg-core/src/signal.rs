//! Signal: Core container for ECG tensor data

use crate::error::{AugError, AugResult};
use crate::modes::ReductionType;
use serde::{Deserialize, Serialize};

/// Layout of a signal tensor. Axis 0 is always time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// Single-channel `(length,)`
    Mono { length: usize },
    /// Multi-channel `(length, channels)`
    Multi { length: usize, channels: usize },
}

impl Shape {
    /// Number of samples along the temporal axis
    pub fn length(&self) -> usize {
        match self {
            Shape::Mono { length } | Shape::Multi { length, .. } => *length,
        }
    }

    /// Number of channel columns (1 for mono)
    pub fn channels(&self) -> usize {
        match self {
            Shape::Mono { .. } => 1,
            Shape::Multi { channels, .. } => *channels,
        }
    }

    /// Same layout kind with a different temporal length
    pub fn with_length(&self, length: usize) -> Shape {
        match self {
            Shape::Mono { .. } => Shape::Mono { length },
            Shape::Multi { channels, .. } => Shape::Multi { length, channels: *channels },
        }
    }
}

/// Time-series tensor stored row-major (interleaved channels)
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    data: Vec<f32>,
    shape: Shape,
}

impl Signal {
    /// Create a single-channel signal `(length,)`
    pub fn mono(data: Vec<f32>) -> Self {
        let length = data.len();
        Signal { data, shape: Shape::Mono { length } }
    }

    /// Create a multi-channel signal from interleaved samples
    pub fn new(data: Vec<f32>, channels: usize) -> AugResult<Self> {
        if channels == 0 {
            return Err(AugError::InvalidSignalData {
                reason: "Channel count must be positive".to_string(),
            });
        }

        if data.len() % channels != 0 {
            return Err(AugError::InvalidSignalData {
                reason: format!(
                    "Data length {} is not a multiple of {} channels",
                    data.len(),
                    channels
                ),
            });
        }

        let length = data.len() / channels;
        Ok(Signal { data, shape: Shape::Multi { length, channels } })
    }

    /// Create a multi-channel signal from one vector per channel
    pub fn from_channels(channels: Vec<Vec<f32>>) -> AugResult<Self> {
        let channel_count = channels.len();
        let length = channels.first().map_or(0, Vec::len);

        if let Some((index, ragged)) = channels.iter().enumerate().find(|(_, c)| c.len() != length) {
            return Err(AugError::InvalidSignalData {
                reason: format!(
                    "Channel {} has {} samples, expected {}",
                    index,
                    ragged.len(),
                    length
                ),
            });
        }

        let mut data = Vec::with_capacity(length * channel_count);
        for sample_idx in 0..length {
            for channel in &channels {
                data.push(channel[sample_idx]);
            }
        }

        Signal::new(data, channel_count)
    }

    /// Rebuild a signal from raw interleaved data and a shape
    pub fn from_shape(data: Vec<f32>, shape: Shape) -> AugResult<Self> {
        if shape.channels() == 0 {
            return Err(AugError::InvalidSignalData {
                reason: "Channel count must be positive".to_string(),
            });
        }

        let expected = shape.length() * shape.channels();
        if data.len() != expected {
            return Err(AugError::InvalidSignalData {
                reason: format!(
                    "Data length {} doesn't match expected {} samples",
                    data.len(),
                    expected
                ),
            });
        }
        Ok(Signal { data, shape })
    }

    /// Tensor layout
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of samples along the temporal axis
    pub fn len(&self) -> usize {
        self.shape.length()
    }

    /// Check if the temporal axis is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of channel columns
    pub fn channel_count(&self) -> usize {
        self.shape.channels()
    }

    /// True for `(length,)` tensors
    pub fn is_mono(&self) -> bool {
        matches!(self.shape, Shape::Mono { .. })
    }

    /// Raw interleaved samples
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw interleaved samples
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume the signal and return its samples
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// All channel values at one time index
    pub fn row(&self, sample_idx: usize) -> &[f32] {
        let channels = self.channel_count();
        &self.data[sample_idx * channels..(sample_idx + 1) * channels]
    }

    /// Value at `(sample_idx, channel)`
    pub fn get(&self, sample_idx: usize, channel: usize) -> Option<f32> {
        if sample_idx >= self.len() || channel >= self.channel_count() {
            return None;
        }
        Some(self.data[sample_idx * self.channel_count() + channel])
    }

    /// Get data for a specific channel
    pub fn channel_data(&self, channel_index: usize) -> AugResult<Vec<f32>> {
        let channels = self.channel_count();
        if channel_index >= channels {
            return Err(AugError::InvalidSignalData {
                reason: format!(
                    "Channel index {} out of bounds for {} channels",
                    channel_index, channels
                ),
            });
        }

        Ok(self.data.iter().skip(channel_index).step_by(channels).copied().collect())
    }

    /// Get all channel data as separate vectors
    pub fn all_channels(&self) -> Vec<Vec<f32>> {
        let channels = self.channel_count();
        let mut columns = vec![Vec::with_capacity(self.len()); channels];
        for row in self.data.chunks_exact(channels.max(1)) {
            for (column, &value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }
        columns
    }

    /// Contiguous copy of the selected channel columns, always `(length, k)`
    pub fn select_channels(&self, channels: &[usize]) -> AugResult<Signal> {
        if channels.is_empty() {
            return Err(AugError::InvalidSignalData {
                reason: "At least one channel must be selected".to_string(),
            });
        }

        let width = self.channel_count();
        if let Some(&bad) = channels.iter().find(|&&c| c >= width) {
            return Err(AugError::InvalidSignalData {
                reason: format!("Channel index {} out of bounds for {} channels", bad, width),
            });
        }

        let mut data = Vec::with_capacity(self.len() * channels.len());
        for row in self.data.chunks_exact(width) {
            data.extend(channels.iter().map(|&c| row[c]));
        }

        Ok(Signal {
            data,
            shape: Shape::Multi { length: self.len(), channels: channels.len() },
        })
    }

    /// Write the columns of `source` into the selected channel positions
    pub fn write_channels(&mut self, channels: &[usize], source: &Signal) -> AugResult<()> {
        if source.len() != self.len() || source.channel_count() != channels.len() {
            return Err(AugError::InvalidSignalData {
                reason: format!(
                    "Cannot write a ({}, {}) block into {} channels of length {}",
                    source.len(),
                    source.channel_count(),
                    channels.len(),
                    self.len()
                ),
            });
        }

        let width = self.channel_count();
        if let Some(&bad) = channels.iter().find(|&&c| c >= width) {
            return Err(AugError::InvalidSignalData {
                reason: format!("Channel index {} out of bounds for {} channels", bad, width),
            });
        }

        if channels.is_empty() {
            return Ok(());
        }

        for (target_row, source_row) in self.data.chunks_exact_mut(width).zip(source.data.chunks_exact(channels.len())) {
            for (&channel, &value) in channels.iter().zip(source_row) {
                target_row[channel] = value;
            }
        }

        Ok(())
    }

    /// Apply `f` to every sample, keeping the shape
    pub fn map(mut self, f: impl Fn(f32) -> f32) -> Signal {
        for value in &mut self.data {
            *value = f(*value);
        }
        self
    }

    /// Calculate basic statistics for a channel
    pub fn channel_stats(&self, channel_index: usize) -> AugResult<ChannelStats> {
        let data = self.channel_data(channel_index)?;
        Ok(ChannelStats::calculate(&data))
    }
}

/// Basic statistics for a signal channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub mean: f32,
    pub rms: f32,
    pub std_dev: f32,
    pub min: f32,
    pub max: f32,
    pub median: f32,
    pub peak_to_peak: f32,
}

impl ChannelStats {
    pub fn calculate(data: &[f32]) -> Self {
        if data.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                median: 0.0,
                peak_to_peak: 0.0,
            };
        }

        let sum: f32 = data.iter().sum();
        let mean = sum / data.len() as f32;

        let sum_sq: f32 = data.iter().map(|x| x * x).sum();
        let rms = (sum_sq / data.len() as f32).sqrt();

        let variance: f32 = data.iter()
            .map(|x| (x - mean).powi(2))
            .sum::<f32>() / data.len() as f32;
        let std_dev = variance.sqrt();

        let min = data.iter().fold(f32::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        let peak_to_peak = max - min;

        let mut sorted = data.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Self {
            mean,
            rms,
            std_dev,
            min,
            max,
            median,
            peak_to_peak,
        }
    }

    /// Collapse the statistics to one value
    pub fn reduce(&self, reduction: ReductionType) -> f32 {
        match reduction {
            ReductionType::Min => self.min,
            ReductionType::Mean => self.mean,
            ReductionType::Max => self.max,
            ReductionType::Median => self.median,
        }
    }
}

//! Pure numeric kernels
//!
//! Every kernel takes an owned [`Signal`], never aliases the caller's data
//! and returns a fresh tensor. Operations run independently per channel
//! along the temporal axis.

use ecg_core::{
    unsupported, AugError, AugResult, BorderType, Interpolation, ReductionType, Shape,
    Signal,
};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Value written into dropped channels or cut out ranges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillValue {
    /// Fixed value
    Constant(f32),
    /// Statistic of each affected channel's input values
    Reduction(ReductionType),
}

impl Default for FillValue {
    fn default() -> Self {
        FillValue::Constant(0.0)
    }
}

impl From<f32> for FillValue {
    fn from(value: f32) -> Self {
        FillValue::Constant(value)
    }
}

impl FillValue {
    /// Resolve to one value per channel of `signal`
    pub fn per_channel(&self, signal: &Signal) -> AugResult<Vec<f32>> {
        match self {
            FillValue::Constant(value) => Ok(vec![*value; signal.channel_count()]),
            FillValue::Reduction(reduction) => (0..signal.channel_count())
                .map(|channel| Ok(signal.channel_stats(channel)?.reduce(*reduction)))
                .collect(),
        }
    }
}

/// Periodic pulse shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
}

impl Waveform {
    fn evaluate(&self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Square => {
                if phase.rem_euclid(2.0 * PI) < PI {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

fn rebuild(data: Vec<f32>, shape: Shape, length: usize) -> AugResult<Signal> {
    Signal::from_shape(data, shape.with_length(length))
}

/// Flip the temporal axis
pub fn reverse(mut signal: Signal) -> Signal {
    let channels = signal.channel_count();
    let data = signal.data_mut();
    data.reverse();
    for row in data.chunks_exact_mut(channels) {
        row.reverse();
    }
    signal
}

pub fn invert(signal: Signal) -> Signal {
    signal.map(|x| -x)
}

pub fn scale(signal: Signal, factor: f32) -> Signal {
    signal.map(|x| x * factor)
}

pub fn sigmoid(signal: Signal) -> Signal {
    signal.map(|x| 1.0 / (1.0 + (-x).exp()))
}

/// Add noise that either covers every sample or one value per time step
pub fn add_noise(mut signal: Signal, noise: &[f32]) -> AugResult<Signal> {
    let channels = signal.channel_count();
    let length = signal.len();

    if noise.len() == length * channels {
        for (value, n) in signal.data_mut().iter_mut().zip(noise) {
            *value += n;
        }
    } else if noise.len() == length {
        for (row, n) in signal.data_mut().chunks_exact_mut(channels).zip(noise) {
            for value in row {
                *value += n;
            }
        }
    } else {
        return Err(AugError::InvalidSignalData {
            reason: format!(
                "Noise of {} samples does not fit a ({}, {}) signal",
                noise.len(),
                length,
                channels
            ),
        });
    }

    Ok(signal)
}

/// Reorder channel columns
pub fn channel_shuffle(signal: Signal, order: &[usize]) -> AugResult<Signal> {
    if order.len() != signal.channel_count() {
        return Err(AugError::InvalidSignalData {
            reason: format!(
                "Channel order of {} entries for {} channels",
                order.len(),
                signal.channel_count()
            ),
        });
    }

    let shuffled = signal.select_channels(order)?;
    Signal::from_shape(shuffled.into_data(), signal.shape())
}

/// Overwrite the listed channels with the fill value
pub fn channel_dropout(mut signal: Signal, channels: &[usize], fill: FillValue) -> AugResult<Signal> {
    let fills = fill.per_channel(&signal)?;
    let width = signal.channel_count();

    if let Some(&bad) = channels.iter().find(|&&c| c >= width) {
        return Err(AugError::InvalidSignalData {
            reason: format!("Channel index {} out of bounds for {} channels", bad, width),
        });
    }

    for row in signal.data_mut().chunks_exact_mut(width) {
        for &channel in channels {
            row[channel] = fills[channel];
        }
    }

    Ok(signal)
}

/// Same-length correlation with zero padding of `kernel.len() / 2` on both sides
pub fn correlate_same(signal: Signal, kernel: &[f32]) -> Signal {
    if kernel.is_empty() {
        return signal;
    }

    let channels = signal.channel_count();
    let length = signal.len() as isize;
    let half = (kernel.len() / 2) as isize;
    let input = signal.data();

    let mut output = vec![0.0; input.len()];
    for t in 0..length {
        for (j, &weight) in kernel.iter().enumerate() {
            let source = t + j as isize - half;
            if source < 0 || source >= length {
                continue;
            }
            let source = source as usize * channels;
            let target = t as usize * channels;
            for c in 0..channels {
                output[target + c] += weight * input[source + c];
            }
        }
    }

    let mut signal = signal;
    signal.data_mut().copy_from_slice(&output);
    signal
}

/// Map an out-of-range position onto the signal for non-constant borders
fn border_index(position: isize, length: usize, border: BorderType) -> usize {
    let n = length as isize;
    match border {
        BorderType::Constant | BorderType::Replicate => position.clamp(0, n - 1) as usize,
        BorderType::Reflect => {
            let m = position.rem_euclid(2 * n);
            (if m < n { m } else { 2 * n - 1 - m }) as usize
        }
        BorderType::Reflect101 => {
            if n == 1 {
                return 0;
            }
            let m = position.rem_euclid(2 * n - 2);
            (if m < n { m } else { 2 * n - 2 - m }) as usize
        }
        BorderType::Wrap => position.rem_euclid(n) as usize,
    }
}

/// Extend the temporal axis by `left` and `right` samples
pub fn pad(signal: Signal, left: usize, right: usize, border: BorderType, fill: f32) -> AugResult<Signal> {
    if left == 0 && right == 0 {
        return Ok(signal);
    }

    let length = signal.len();
    if length == 0 && border != BorderType::Constant {
        return Err(unsupported!(
            "pad",
            "border mode '{}' needs at least one sample",
            border
        ));
    }

    let channels = signal.channel_count();
    let new_length = length + left + right;
    let mut data = Vec::with_capacity(new_length * channels);

    for i in 0..new_length {
        let position = i as isize - left as isize;
        if position >= 0 && (position as usize) < length {
            data.extend_from_slice(signal.row(position as usize));
        } else if border == BorderType::Constant {
            data.extend(std::iter::repeat(fill).take(channels));
        } else {
            data.extend_from_slice(signal.row(border_index(position, length, border)));
        }
    }

    rebuild(data, signal.shape(), new_length)
}

/// Keep `length` samples starting at `floor((L - length) * left_bound)`
pub fn crop(signal: Signal, left_bound: f32, length: usize) -> AugResult<Signal> {
    let total = signal.len();
    if total < length {
        return Err(unsupported!(
            "crop",
            "requested crop length {} is larger than the signal length {}",
            length,
            total
        ));
    }

    let start = (((total - length) as f32) * left_bound) as usize;
    let start = start.min(total - length);
    let channels = signal.channel_count();
    let data = signal.data()[start * channels..(start + length) * channels].to_vec();

    rebuild(data, signal.shape(), length)
}

/// Translate along time by `trunc(L * shift)` samples, keeping the length
pub fn shift(signal: Signal, shift: f32, border: BorderType, fill: f32) -> AugResult<Signal> {
    let length = signal.len();
    let offset = (length as f32 * shift) as isize;
    let channels = signal.channel_count();

    if offset == 0 {
        return Ok(signal);
    }

    let shape = signal.shape();
    let amount = offset.unsigned_abs();
    let data = if offset > 0 {
        let padded = pad(signal, amount, 0, border, fill)?;
        padded.data()[..length * channels].to_vec()
    } else {
        let padded = pad(signal, 0, amount, border, fill)?;
        padded.data()[amount * channels..].to_vec()
    };

    rebuild(data, shape, length)
}

/// Bounds of `count` contiguous segments, the first `L % count` one sample longer
pub fn split_bounds(length: usize, count: usize) -> Vec<(usize, usize)> {
    if count == 0 {
        return Vec::new();
    }

    let base = length / count;
    let extra = length % count;
    (0..count)
        .map(|i| {
            let start = i * base + i.min(extra);
            let size = base + usize::from(i < extra);
            (start, start + size)
        })
        .collect()
}

/// Concatenate the temporal segments in the given order
pub fn segment_swap(signal: Signal, order: &[usize]) -> AugResult<Signal> {
    if order.is_empty() {
        return Ok(signal);
    }

    let mut seen = vec![false; order.len()];
    for &index in order {
        match seen.get_mut(index) {
            Some(slot) if !*slot => *slot = true,
            _ => {
                return Err(AugError::InvalidSignalData {
                    reason: format!("Segment order {:?} is not a permutation", order),
                })
            }
        }
    }

    let segments = split_bounds(signal.len(), order.len());
    let channels = signal.channel_count();
    let mut data = Vec::with_capacity(signal.data().len());

    for &index in order {
        let (start, end) = segments[index];
        data.extend_from_slice(&signal.data()[start * channels..end * channels]);
    }

    rebuild(data, signal.shape(), signal.len())
}

/// Overwrite each `(start, length)` span with the fill value
pub fn cutout(mut signal: Signal, spans: &[(usize, usize)], fill: FillValue) -> AugResult<Signal> {
    let fills = fill.per_channel(&signal)?;
    let channels = signal.channel_count();
    let length = signal.len();

    for &(start, span) in spans {
        let end = (start + span).min(length);
        for row in signal.data_mut()[start.min(length) * channels..end * channels].chunks_exact_mut(channels) {
            row.copy_from_slice(&fills);
        }
    }

    Ok(signal)
}

/// Resample interleaved rows to `target_len` rows over the same support
pub fn resample_segment(rows: &[f32], channels: usize, target_len: usize, interpolation: Interpolation) -> Vec<f32> {
    let source_len = if channels == 0 { 0 } else { rows.len() / channels };
    if source_len == 0 {
        return vec![0.0; target_len * channels];
    }

    let mut output = Vec::with_capacity(target_len * channels);
    for i in 0..target_len {
        let x = if target_len > 1 {
            i as f32 / (target_len - 1) as f32
        } else {
            0.0
        };
        let position = x * (source_len - 1) as f32;

        match interpolation {
            Interpolation::Nearest => {
                let index = (position.round() as usize).min(source_len - 1);
                output.extend_from_slice(&rows[index * channels..(index + 1) * channels]);
            }
            Interpolation::Linear => {
                let lower = (position.floor() as usize).min(source_len - 1);
                let upper = (lower + 1).min(source_len - 1);
                let frac = position - lower as f32;
                for c in 0..channels {
                    let a = rows[lower * channels + c];
                    let b = rows[upper * channels + c];
                    output.push(a + (b - a) * frac);
                }
            }
        }
    }
    output
}

/// Piecewise resample segments between `cells` onto segments between `ncells`
pub fn time_warp(signal: Signal, cells: &[f32], ncells: &[f32], interpolation: Interpolation) -> AugResult<Signal> {
    if cells.len() != ncells.len() {
        return Err(AugError::InvalidSignalData {
            reason: format!("Warp grids differ in size: {} vs {}", cells.len(), ncells.len()),
        });
    }

    let length = signal.len();
    let channels = signal.channel_count();
    let to_bound = |fraction: f32| ((length as f32 * fraction) as usize).min(length);

    let mut output = vec![0.0; length * channels];
    for (source, target) in cells.windows(2).zip(ncells.windows(2)) {
        let (start, end) = (to_bound(source[0]), to_bound(source[1]));
        let (new_start, new_end) = (to_bound(target[0]), to_bound(target[1]));
        if new_end <= new_start {
            continue;
        }

        let rows = &signal.data()[start * channels..end.max(start) * channels];
        let resampled = resample_segment(rows, channels, new_end - new_start, interpolation);
        output[new_start * channels..new_end * channels].copy_from_slice(&resampled);
    }

    rebuild(output, signal.shape(), length)
}

/// Add `amplitude * wave(2π f t + phase)` to every channel, `t` spanning `L / fs` seconds
pub fn add_pulse(
    signal: Signal,
    sampling_rate: f32,
    amplitude: f32,
    frequency: f32,
    phase: f32,
    waveform: Waveform,
) -> Signal {
    let length = signal.len();
    let duration = length as f32 / sampling_rate;
    let step = if length > 1 { duration / (length - 1) as f32 } else { 0.0 };
    let channels = signal.channel_count();

    let mut signal = signal;
    for (i, row) in signal.data_mut().chunks_exact_mut(channels).enumerate() {
        let t = i as f32 * step;
        let value = amplitude * waveform.evaluate(2.0 * PI * frequency * t + phase);
        for sample in row {
            *sample += value;
        }
    }
    signal
}

//! Transforms acting on the temporal axis
//!
//! All of these are dual transforms: the mask receives the same crop,
//! shift or warp as the signal so labels stay aligned with samples.

use crate::functional::{self as F, FillValue};
use crate::transform::{Augmentation, Capability, Gate, Inspection, ParamValue, Params, INSPECTS_SIGNAL};
use crate::transforms::amplitude::GateConfig;
use crate::validate::{require_non_negative, require_size, size_range, symmetric_range, RangeInput};
use ecg_core::{AugResult, BorderType, Interpolation, PositionType, Signal, Target};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Flip the temporal axis
#[derive(Debug, Clone)]
pub struct TimeReverse {
    gate: Gate,
}

impl TimeReverse {
    pub fn new(config: GateConfig) -> AugResult<Self> {
        Ok(TimeReverse { gate: config.gate()? })
    }
}

impl Augmentation for TimeReverse {
    fn name(&self) -> &'static str {
        "TimeReverse"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn capability(&self) -> Capability {
        Capability::Dual
    }

    fn apply(&self, signal: Signal, _params: &Params) -> AugResult<Signal> {
        Ok(F::reverse(signal))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeShiftConfig {
    /// Shift as a fraction of the signal length
    pub shift_range: RangeInput<f32>,
    pub border_mode: BorderType,
    pub fill_value: f32,
    pub mask_fill_value: f32,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for TimeShiftConfig {
    fn default() -> Self {
        Self {
            shift_range: RangeInput::from((-0.1, 0.1)),
            border_mode: BorderType::Constant,
            fill_value: 0.0,
            mask_fill_value: 0.0,
            always_apply: false,
            p: 0.5,
        }
    }
}

/// Translate along time, keeping the length
#[derive(Debug, Clone)]
pub struct TimeShift {
    shift_range: (f32, f32),
    border_mode: BorderType,
    fill_value: f32,
    mask_fill_value: f32,
    gate: Gate,
}

impl TimeShift {
    pub fn new(config: TimeShiftConfig) -> AugResult<Self> {
        Ok(TimeShift {
            shift_range: symmetric_range(&config.shift_range, "shift_range")?,
            border_mode: config.border_mode,
            fill_value: config.fill_value,
            mask_fill_value: config.mask_fill_value,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }
}

impl Augmentation for TimeShift {
    fn name(&self) -> &'static str {
        "TimeShift"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn capability(&self) -> Capability {
        Capability::Dual
    }

    fn sample_params(&self, rng: &mut dyn RngCore) -> AugResult<Params> {
        let (low, high) = self.shift_range;
        let shift = if low < high { rng.gen_range(low..high) } else { low };
        Ok(Params::new().with("shift", shift))
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
        F::shift(signal, params.get_float("shift")?, self.border_mode, self.fill_value)
    }

    fn apply_to_mask(&self, mask: Signal, params: &Params) -> AugResult<Signal> {
        F::shift(mask, params.get_float("shift")?, self.border_mode, self.mask_fill_value)
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![
            ("shift_range", self.shift_range.into()),
            ("border_mode", self.border_mode.into()),
            ("fill_value", self.fill_value.into()),
            ("mask_fill_value", self.mask_fill_value.into()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSegmentShuffleConfig {
    pub num_segments: RangeInput<i64>,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for TimeSegmentShuffleConfig {
    fn default() -> Self {
        Self {
            num_segments: RangeInput::from((2, 5)),
            always_apply: false,
            p: 0.5,
        }
    }
}

/// Split time into contiguous segments and concatenate them in random order
#[derive(Debug, Clone)]
pub struct TimeSegmentShuffle {
    num_segments: (usize, usize),
    gate: Gate,
}

impl TimeSegmentShuffle {
    pub fn new(config: TimeSegmentShuffleConfig) -> AugResult<Self> {
        Ok(TimeSegmentShuffle {
            num_segments: size_range(&config.num_segments, 1, "num_segments")?,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }
}

impl Augmentation for TimeSegmentShuffle {
    fn name(&self) -> &'static str {
        "TimeSegmentShuffle"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn capability(&self) -> Capability {
        Capability::Dual
    }

    fn sample_params(&self, rng: &mut dyn RngCore) -> AugResult<Params> {
        let count = rng.gen_range(self.num_segments.0..=self.num_segments.1);
        let mut segment_order: Vec<usize> = (0..count).collect();
        segment_order.shuffle(rng);
        Ok(Params::new().with("segment_order", segment_order))
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
        F::segment_swap(signal, params.get_indices("segment_order")?)
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![("num_segments", self.num_segments.into())]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomTimeWarpConfig {
    /// Number of grid cells laid over the signal
    pub num_steps: i64,
    /// Limit of stretching or squeezing
    pub warp_limit: f32,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for RandomTimeWarpConfig {
    fn default() -> Self {
        Self {
            num_steps: 5,
            warp_limit: 0.05,
            always_apply: false,
            p: 0.5,
        }
    }
}

/// Randomly stretch and squeeze contiguous cells of the signal
#[derive(Debug, Clone)]
pub struct RandomTimeWarp {
    num_steps: usize,
    warp_limit: f32,
    gate: Gate,
}

impl RandomTimeWarp {
    pub fn new(config: RandomTimeWarpConfig) -> AugResult<Self> {
        Ok(RandomTimeWarp {
            num_steps: require_size(config.num_steps, 0, "num_steps")?,
            warp_limit: require_non_negative(config.warp_limit, "warp_limit")?,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }

    fn grid(steps: usize) -> Vec<f32> {
        (0..=steps).map(|i| i as f32 / steps as f32).collect()
    }
}

impl Augmentation for RandomTimeWarp {
    fn name(&self) -> &'static str {
        "RandomTimeWarp"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn capability(&self) -> Capability {
        Capability::Dual
    }

    fn sample_params(&self, rng: &mut dyn RngCore) -> AugResult<Params> {
        // A zero step grid degenerates to a single cell
        let steps = self.num_steps.max(1);
        let cells = Self::grid(steps);
        let mut ncells = cells.clone();

        if steps > 1 {
            let directions: Vec<f32> = (1..steps)
                .map(|_| if rng.gen::<bool>() { 1.0 } else { -1.0 })
                .collect();
            let shifts: Vec<f32> = (1..steps)
                .map(|_| rng.gen::<f32>() * self.warp_limit * 0.5)
                .collect();

            for (i, (direction, shift)) in directions.iter().zip(&shifts).enumerate() {
                ncells[i + 1] += shift * direction / (steps + 1) as f32;
            }
        }

        Ok(Params::new()
            .with("cells", cells)
            .with("ncells", ncells)
            .with("interpolation", Interpolation::Linear))
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
        F::time_warp(
            signal,
            params.get_floats("cells")?,
            params.get_floats("ncells")?,
            params.get_interpolation("interpolation")?,
        )
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![
            ("num_steps", self.num_steps.into()),
            ("warp_limit", self.warp_limit.into()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeCutoutConfig {
    pub num_ranges: RangeInput<i64>,
    pub length_range: RangeInput<i64>,
    pub fill_value: FillValue,
    /// `None` leaves the mask untouched
    pub mask_fill_value: Option<f32>,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for TimeCutoutConfig {
    fn default() -> Self {
        Self {
            num_ranges: RangeInput::from((1, 5)),
            length_range: RangeInput::from((0, 50)),
            fill_value: FillValue::Constant(0.0),
            mask_fill_value: None,
            always_apply: false,
            p: 0.5,
        }
    }
}

/// Blank out random time ranges
#[derive(Debug, Clone)]
pub struct TimeCutout {
    num_ranges: (usize, usize),
    length_range: (usize, usize),
    fill_value: FillValue,
    mask_fill_value: Option<f32>,
    gate: Gate,
}

impl TimeCutout {
    pub fn new(config: TimeCutoutConfig) -> AugResult<Self> {
        Ok(TimeCutout {
            num_ranges: size_range(&config.num_ranges, 0, "num_ranges")?,
            length_range: size_range(&config.length_range, 0, "length_range")?,
            fill_value: config.fill_value,
            mask_fill_value: config.mask_fill_value,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }
}

impl Augmentation for TimeCutout {
    fn name(&self) -> &'static str {
        "TimeCutout"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn capability(&self) -> Capability {
        Capability::Dual
    }

    fn inspected_targets(&self) -> &'static [Target] {
        INSPECTS_SIGNAL
    }

    fn sample_params_from_targets(&self, targets: &Inspection<'_>, rng: &mut dyn RngCore) -> AugResult<Params> {
        let length = targets.signal()?.len();
        let count = rng.gen_range(self.num_ranges.0..=self.num_ranges.1);

        let cutouts: Vec<(usize, usize)> = (0..count)
            .map(|_| {
                let cutout_length = rng.gen_range(self.length_range.0..=self.length_range.1).min(length);
                let start = rng.gen_range(0..=length - cutout_length);
                (start, cutout_length)
            })
            .collect();

        Ok(Params::new().with("cutouts", cutouts))
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
        F::cutout(signal, params.get_spans("cutouts")?, self.fill_value)
    }

    fn apply_to_mask(&self, mask: Signal, params: &Params) -> AugResult<Signal> {
        match self.mask_fill_value {
            Some(value) => F::cutout(mask, params.get_spans("cutouts")?, FillValue::Constant(value)),
            None => Ok(mask),
        }
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![
            ("num_ranges", self.num_ranges.into()),
            ("length_range", self.length_range.into()),
            ("fill_value", self.fill_value.into()),
            ("mask_fill_value", self.mask_fill_value.into()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeCropConfig {
    pub length: i64,
    pub position: PositionType,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for TimeCropConfig {
    fn default() -> Self {
        Self {
            length: 5000,
            position: PositionType::Random,
            always_apply: false,
            p: 1.0,
        }
    }
}

/// Cut a window of fixed length out of the signal
#[derive(Debug, Clone)]
pub struct TimeCrop {
    length: usize,
    position: PositionType,
    gate: Gate,
}

impl TimeCrop {
    pub fn new(config: TimeCropConfig) -> AugResult<Self> {
        Ok(TimeCrop {
            length: require_size(config.length, 1, "length")?,
            position: config.position,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }

    /// Crop from the middle of the signal
    pub fn center(length: i64) -> AugResult<Self> {
        Self::new(TimeCropConfig { length, position: PositionType::Center, ..TimeCropConfig::default() })
    }

    /// Crop at a uniformly drawn offset
    pub fn random(length: i64) -> AugResult<Self> {
        Self::new(TimeCropConfig { length, position: PositionType::Random, ..TimeCropConfig::default() })
    }
}

impl Augmentation for TimeCrop {
    fn name(&self) -> &'static str {
        "TimeCrop"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn capability(&self) -> Capability {
        Capability::Dual
    }

    fn sample_params(&self, rng: &mut dyn RngCore) -> AugResult<Params> {
        let left_bound = match self.position {
            PositionType::Left => 1.0,
            PositionType::Center => 0.5,
            PositionType::Right => 0.0,
            PositionType::Random => rng.gen::<f32>(),
        };
        Ok(Params::new().with("left_bound", left_bound))
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
        F::crop(signal, params.get_float("left_bound")?, self.length)
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![
            ("length", self.length.into()),
            ("position", self.position.into()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimePadIfNeededConfig {
    pub min_length: i64,
    pub position: PositionType,
    pub border_mode: BorderType,
    pub fill_value: f32,
    pub mask_fill_value: f32,
    pub always_apply: bool,
    pub p: f32,
}

impl Default for TimePadIfNeededConfig {
    fn default() -> Self {
        Self {
            min_length: 5000,
            position: PositionType::Center,
            border_mode: BorderType::Constant,
            fill_value: 0.0,
            mask_fill_value: 0.0,
            always_apply: false,
            p: 1.0,
        }
    }
}

/// Pad the signal up to a minimal length
#[derive(Debug, Clone)]
pub struct TimePadIfNeeded {
    min_length: usize,
    position: PositionType,
    border_mode: BorderType,
    fill_value: f32,
    mask_fill_value: f32,
    gate: Gate,
}

impl TimePadIfNeeded {
    pub fn new(config: TimePadIfNeededConfig) -> AugResult<Self> {
        Ok(TimePadIfNeeded {
            min_length: require_size(config.min_length, 0, "min_length")?,
            position: config.position,
            border_mode: config.border_mode,
            fill_value: config.fill_value,
            mask_fill_value: config.mask_fill_value,
            gate: Gate::new(config.always_apply, config.p)?,
        })
    }
}

impl Augmentation for TimePadIfNeeded {
    fn name(&self) -> &'static str {
        "TimePadIfNeeded"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn capability(&self) -> Capability {
        Capability::Dual
    }

    fn inspected_targets(&self) -> &'static [Target] {
        INSPECTS_SIGNAL
    }

    fn sample_params_from_targets(&self, targets: &Inspection<'_>, rng: &mut dyn RngCore) -> AugResult<Params> {
        let pad = self.min_length.saturating_sub(targets.signal()?.len());

        let left_pad = match self.position {
            PositionType::Left => 0,
            PositionType::Center => pad / 2,
            PositionType::Right => pad,
            PositionType::Random => rng.gen_range(0..=pad),
        };

        Ok(Params::new()
            .with("left_pad", left_pad)
            .with("right_pad", pad - left_pad))
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
        F::pad(
            signal,
            params.get_size("left_pad")?,
            params.get_size("right_pad")?,
            self.border_mode,
            self.fill_value,
        )
    }

    fn apply_to_mask(&self, mask: Signal, params: &Params) -> AugResult<Signal> {
        F::pad(
            mask,
            params.get_size("left_pad")?,
            params.get_size("right_pad")?,
            self.border_mode,
            self.mask_fill_value,
        )
    }

    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        vec![
            ("min_length", self.min_length.into()),
            ("position", self.position.into()),
            ("border_mode", self.border_mode.into()),
            ("fill_value", self.fill_value.into()),
            ("mask_fill_value", self.mask_fill_value.into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;
    use ecg_core::Bundle;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ramp_bundle() -> Bundle {
        Bundle::with_signal(Signal::mono(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]))
            .with_mask(Signal::mono(vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0]))
    }

    #[test]
    fn test_reverse_twice_is_identity() {
        let reverse = TimeReverse::new(GateConfig::always()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let once = reverse.invoke(ramp_bundle(), false, &mut rng).unwrap();
        assert_eq!(once.signal().unwrap().data(), &[6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
        assert_eq!(once.mask().unwrap().data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let twice = reverse.invoke(once, false, &mut rng).unwrap();
        assert_eq!(twice, ramp_bundle());
    }

    #[test]
    fn test_crop_positions() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let left = TimeCrop::new(TimeCropConfig { length: 2, position: PositionType::Left, ..TimeCropConfig::default() }).unwrap();
        let output = left.invoke(ramp_bundle(), false, &mut rng).unwrap();
        assert_eq!(output.signal().unwrap().data(), &[5.0, 6.0]);
        assert_eq!(output.mask().unwrap().data(), &[2.0, 1.0]);

        let center = TimeCrop::center(2).unwrap();
        let output = center.invoke(ramp_bundle(), false, &mut rng).unwrap();
        assert_eq!(output.signal().unwrap().data(), &[3.0, 4.0]);

        let random = TimeCrop::random(7).unwrap();
        assert!(random.invoke(ramp_bundle(), false, &mut rng).unwrap_err().is_unsupported());
        assert!(TimeCrop::center(0).unwrap_err().is_config());
    }

    #[test]
    fn test_pad_positions() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let config = TimePadIfNeededConfig {
            min_length: 9,
            fill_value: -1.0,
            mask_fill_value: 7.0,
            ..TimePadIfNeededConfig::default()
        };

        let center = TimePadIfNeeded::new(config.clone()).unwrap();
        let output = center.invoke(ramp_bundle(), false, &mut rng).unwrap();
        assert_eq!(output.signal().unwrap().data(), &[-1.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, -1.0, -1.0]);
        assert_eq!(output.mask().unwrap().data(), &[7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0, 7.0, 7.0]);

        let left = TimePadIfNeeded::new(TimePadIfNeededConfig { position: PositionType::Left, ..config.clone() }).unwrap();
        let output = left.invoke(ramp_bundle(), false, &mut rng).unwrap();
        assert_eq!(&output.signal().unwrap().data()[..6], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let right = TimePadIfNeeded::new(TimePadIfNeededConfig { position: PositionType::Right, ..config }).unwrap();
        let output = right.invoke(ramp_bundle(), false, &mut rng).unwrap();
        assert_eq!(&output.signal().unwrap().data()[3..], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_pad_not_needed() {
        let pad = TimePadIfNeeded::new(TimePadIfNeededConfig { min_length: 3, ..TimePadIfNeededConfig::default() }).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let output = pad.invoke(ramp_bundle(), false, &mut rng).unwrap();
        assert_eq!(output, ramp_bundle());
    }

    #[test]
    fn test_cutout_mask_untouched_without_fill() {
        let cutout = TimeCutout::new(TimeCutoutConfig {
            num_ranges: RangeInput::from((2, 2)),
            length_range: RangeInput::from((2, 2)),
            always_apply: true,
            ..TimeCutoutConfig::default()
        })
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(12);

        let output = cutout.invoke(ramp_bundle(), false, &mut rng).unwrap();
        assert!(output.signal().unwrap().data().iter().any(|&x| x == 0.0));
        assert_eq!(output.mask(), ramp_bundle().mask());
    }

    #[test]
    fn test_cutout_length_clamped() {
        let cutout = TimeCutout::new(TimeCutoutConfig {
            num_ranges: RangeInput::from((1, 1)),
            length_range: RangeInput::from((100, 100)),
            mask_fill_value: Some(-1.0),
            always_apply: true,
            ..TimeCutoutConfig::default()
        })
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let output = cutout.invoke(ramp_bundle(), false, &mut rng).unwrap();
        assert_eq!(output.signal().unwrap().data(), &[0.0; 6]);
        assert_eq!(output.mask().unwrap().data(), &[-1.0; 6]);
    }

    #[test]
    fn test_segment_shuffle_keeps_alignment() {
        let shuffle = TimeSegmentShuffle::new(TimeSegmentShuffleConfig {
            num_segments: RangeInput::from((3, 3)),
            always_apply: true,
            ..TimeSegmentShuffleConfig::default()
        })
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let output = shuffle.invoke(ramp_bundle(), false, &mut rng).unwrap();
        let signal = output.signal().unwrap().data();
        let mask = output.mask().unwrap().data();
        for (s, m) in signal.iter().zip(mask) {
            assert_eq!(s + m, 7.0);
        }
    }

    #[test]
    fn test_time_warp_mask_uses_nearest() {
        let warp = RandomTimeWarp::new(RandomTimeWarpConfig {
            num_steps: 4,
            warp_limit: 2.0,
            always_apply: true,
            ..RandomTimeWarpConfig::default()
        })
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let labels: Vec<f32> = (0..200).map(|i| (i / 50) as f32).collect();
        let bundle = Bundle::with_signal(Signal::mono(vec![1.0; 200])).with_mask(Signal::mono(labels));

        let output = warp.invoke(bundle, false, &mut rng).unwrap();
        assert_eq!(output.signal().unwrap().len(), 200);
        for label in output.mask().unwrap().data() {
            assert_eq!(label.fract(), 0.0);
        }
    }

    #[test]
    fn test_time_warp_grid() {
        let warp = RandomTimeWarp::new(RandomTimeWarpConfig::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let params = warp.sample_params(&mut rng).unwrap();
        let cells = params.get_floats("cells").unwrap();
        let ncells = params.get_floats("ncells").unwrap();
        assert_eq!(cells.len(), 6);
        assert_eq!(ncells[0], 0.0);
        assert_eq!(ncells[5], 1.0);
        for (cell, ncell) in cells.iter().zip(ncells) {
            assert!((cell - ncell).abs() <= 0.05 * 0.5 / 6.0 + 1e-6);
        }
        assert!(RandomTimeWarp::new(RandomTimeWarpConfig { num_steps: -1, ..RandomTimeWarpConfig::default() }).is_err());
    }

    #[test]
    fn test_shift_uses_mask_fill() {
        let shift = TimeShift::new(TimeShiftConfig {
            shift_range: RangeInput::from((0.5, 0.5)),
            fill_value: -1.0,
            mask_fill_value: 9.0,
            always_apply: true,
            ..TimeShiftConfig::default()
        })
        .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let output = shift.invoke(ramp_bundle(), false, &mut rng).unwrap();
        assert_eq!(output.signal().unwrap().data(), &[-1.0, -1.0, -1.0, 1.0, 2.0, 3.0]);
        assert_eq!(output.mask().unwrap().data(), &[9.0, 9.0, 9.0, 6.0, 5.0, 4.0]);
    }
}

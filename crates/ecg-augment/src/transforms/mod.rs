//! Leaf augmentations grouped by the axis they act on

pub mod amplitude;
pub mod blur;
pub mod channel;
pub mod filter;
pub mod noise;
pub mod pulse;
pub mod time;

pub use amplitude::{AmplitudeInvert, AmplitudeScale, AmplitudeScaleConfig, GateConfig, Identity};
pub use blur::{Blur, BlurConfig, GaussBlur, GaussBlurConfig};
pub use channel::{ChannelDropout, ChannelDropoutConfig, ChannelShuffle};
pub use filter::{
    BandPassFilter, BandPassFilterConfig, HighPassFilter, HighPassFilterConfig, LowPassFilter, LowPassFilterConfig,
    SigmoidCompression, SigmoidCompressionConfig,
};
pub use noise::{GaussNoise, GaussNoiseConfig};
pub use pulse::{
    FrequencyPolicy, PowerlineNoiseConfig, PulseSampler, RespirationNoiseConfig, SinePulse, SinePulseConfig,
    SquarePulse, SquarePulseConfig,
};
pub use time::{
    RandomTimeWarp, RandomTimeWarpConfig, TimeCrop, TimeCropConfig, TimeCutout, TimeCutoutConfig,
    TimePadIfNeeded, TimePadIfNeededConfig, TimeReverse, TimeSegmentShuffle, TimeSegmentShuffleConfig,
    TimeShift, TimeShiftConfig,
};

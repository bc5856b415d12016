//! ECG-Augment: Randomized augmentation pipelines for ECG records
//!
//! Leaf transforms, compositions and scoped modifiers sharing one
//! probabilistic contract, driven by a caller-supplied random source.

pub mod transform;
pub mod validate;
pub mod functional;
pub mod filters;
pub mod transforms;
pub mod compose;
pub mod modify;
pub mod config;

pub use transform::{
    Augmentation, Capability, Gate, Inspection, ParamValue, Params, Transform, REPR_INDENT_STEP,
};
pub use functional::{FillValue, Waveform};
pub use validate::RangeInput;
pub use transforms::*;
pub use compose::{OneOf, RandomOrderSequential, Sequential};
pub use modify::{ToChannels, ToChannelsConfig};
pub use config::{AugmentationConfig, AugmentationProfile, TransformSpec};

pub use ecg_core::{AugError, AugResult, BorderType, Bundle, Interpolation, PositionType, ReductionType, Signal, Target};

//! ECG-Core: Foundation types for ECG augmentation
//!
//! Signal tensors, named data bundles, shared mode enums and the error
//! taxonomy used by every augmentation crate.

pub mod signal;
pub mod bundle;
pub mod modes;
pub mod error;

pub use signal::*;
pub use bundle::{Bundle, Target};
pub use modes::{BorderType, Interpolation, PositionType, ReductionType};
pub use error::{AugError, AugResult};

//! Mode enums shared by kernels, transforms and configuration

use crate::error::AugError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How samples beyond the signal edges are synthesized when padding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderType {
    /// Fill with a constant value
    #[default]
    Constant,
    /// Repeat the edge sample (`aaaa|abcd|dddd`)
    Replicate,
    /// Mirror including the edge sample (`dcba|abcd|dcba`)
    Reflect,
    /// Mirror excluding the edge sample (`dcb|abcd|cba`)
    Reflect101,
    /// Periodic continuation (`abcd|abcd|abcd`)
    Wrap,
}

/// Where a crop window or padding is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionType {
    #[default]
    Center,
    Left,
    Right,
    Random,
}

/// Per-channel statistic used as a fill value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReductionType {
    Min,
    Mean,
    Max,
    Median,
}

/// Resampling method for time warping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    #[default]
    Linear,
}

macro_rules! string_modes {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = AugError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    other => Err(AugError::Config {
                        name: $kind.to_string(),
                        reason: format!("unknown value '{}'", other),
                    }),
                }
            }
        }
    };
}

string_modes!(BorderType, "border_mode", {
    Constant => "constant",
    Replicate => "replicate",
    Reflect => "reflect",
    Reflect101 => "reflect101",
    Wrap => "wrap",
});

string_modes!(PositionType, "position", {
    Center => "center",
    Left => "left",
    Right => "right",
    Random => "random",
});

string_modes!(ReductionType, "reduction", {
    Min => "min",
    Mean => "mean",
    Max => "max",
    Median => "median",
});

string_modes!(Interpolation, "interpolation", {
    Nearest => "nearest",
    Linear => "linear",
});

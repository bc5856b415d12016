//! Error handling for the augmentation workspace
//!
//! Every failure is returned to the caller as an [`AugError`]; nothing is
//! retried, clamped or logged on the way out.

use thiserror::Error;

/// Result type alias for augmentation operations
pub type AugResult<T> = Result<T, AugError>;

/// Error type for all augmentation operations
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AugError {
    /// Invalid constructor argument, raised while building a transform
    #[error("Invalid configuration of {name}: {reason}")]
    Config {
        /// Name of the offending parameter
        name: String,
        /// Description of the configuration error
        reason: String,
    },

    /// The call itself was malformed
    #[error("Usage error: {reason}")]
    Usage {
        /// Description of the misuse
        reason: String,
    },

    /// A transform needs to inspect targets that were not supplied
    #[error("{transform} requires targets {missing:?}")]
    MissingTarget {
        /// Transform that declared the dependency
        transform: String,
        /// Target names absent from the bundle
        missing: Vec<String>,
    },

    /// Contradiction only discoverable once the data is seen
    #[error("{transform} is not defined here: {reason}")]
    UnsupportedConfiguration {
        /// Transform that refused the input
        transform: String,
        /// Description of the contradiction
        reason: String,
    },

    /// Tensor construction received inconsistent data
    #[error("Invalid signal data: {reason}")]
    InvalidSignalData {
        /// Description of the data issue
        reason: String,
    },

    /// A sampled parameter was missing or had the wrong kind
    #[error("Sampled parameter '{name}': {reason}")]
    Parameter {
        /// Parameter name
        name: String,
        /// What went wrong
        reason: String,
    },
}

impl AugError {
    /// True for errors raised while constructing transforms
    pub fn is_config(&self) -> bool {
        matches!(self, AugError::Config { .. })
    }

    /// True for errors caused by how a transform was called
    pub fn is_usage(&self) -> bool {
        matches!(self, AugError::Usage { .. } | AugError::MissingTarget { .. })
    }

    /// True for call-time contradictions between configuration and data
    pub fn is_unsupported(&self) -> bool {
        matches!(self, AugError::UnsupportedConfiguration { .. })
    }
}

/// Convenience macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($name:expr, $($arg:tt)+) => {
        $crate::error::AugError::Config {
            name: ($name).to_string(),
            reason: format!($($arg)+),
        }
    };
}

/// Convenience macro for creating call-time configuration errors
#[macro_export]
macro_rules! unsupported {
    ($transform:expr, $($arg:tt)+) => {
        $crate::error::AugError::UnsupportedConfiguration {
            transform: ($transform).to_string(),
            reason: format!($($arg)+),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AugError::MissingTarget {
            transform: "ChannelDropout".to_string(),
            missing: vec!["signal".to_string()],
        };
        let display = format!("{}", error);
        assert!(display.contains("ChannelDropout"));
        assert!(display.contains("signal"));
    }

    #[test]
    fn test_error_macros() {
        let error = config_error!("kernel_size_range", "bounds must be odd, got ({}, {})", 2, 4);
        assert!(error.is_config());
        assert!(error.to_string().contains("(2, 4)"));

        let error = unsupported!("ChannelDropout", "signal has {} channel", 1);
        assert!(error.is_unsupported());
        assert!(!error.is_usage());
    }

    #[test]
    fn test_error_equality() {
        let error1 = AugError::Usage { reason: "test".to_string() };
        let error2 = AugError::Usage { reason: "test".to_string() };
        assert_eq!(error1, error2);
        assert!(error1.is_usage());
    }
}

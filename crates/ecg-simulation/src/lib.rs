//! ECG-Simulation: Synthetic ECG generation
//!
//! Seeded multi-lead ECG records with aligned wave segmentation masks for
//! tests, demos and benchmarks.

pub mod beat_patterns;
pub mod ecg_simulator;

pub use beat_patterns::*;
pub use ecg_simulator::*;

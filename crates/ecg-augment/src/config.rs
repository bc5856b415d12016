//! Serializable pipeline descriptions and preset augmentation profiles

use crate::compose::{OneOf, RandomOrderSequential, Sequential};
use crate::modify::{ToChannels, ToChannelsConfig};
use crate::transform::Transform;
use crate::transforms::*;
use crate::validate::RangeInput;
use ecg_core::{config_error, AugError, AugResult, PositionType};
use serde::{Deserialize, Serialize};

fn sequential_p() -> f32 {
    1.0
}

fn one_of_p() -> f32 {
    0.5
}

/// Declarative description of one node of an augmentation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransformSpec {
    Identity(GateConfig),
    TimeReverse(GateConfig),
    AmplitudeInvert(GateConfig),
    AmplitudeScale(AmplitudeScaleConfig),
    ChannelShuffle(GateConfig),
    ChannelDropout(ChannelDropoutConfig),
    GaussNoise(GaussNoiseConfig),
    Blur(BlurConfig),
    GaussBlur(GaussBlurConfig),
    SinePulse(SinePulseConfig),
    PowerlineNoise(PowerlineNoiseConfig),
    RespirationNoise(RespirationNoiseConfig),
    SquarePulse(SquarePulseConfig),
    LowPassFilter(LowPassFilterConfig),
    HighPassFilter(HighPassFilterConfig),
    BandPassFilter(BandPassFilterConfig),
    SigmoidCompression(SigmoidCompressionConfig),
    TimeShift(TimeShiftConfig),
    TimeSegmentShuffle(TimeSegmentShuffleConfig),
    RandomTimeWarp(RandomTimeWarpConfig),
    TimeCutout(TimeCutoutConfig),
    TimeCrop(TimeCropConfig),
    TimePadIfNeeded(TimePadIfNeededConfig),
    Sequential {
        transforms: Vec<TransformSpec>,
        #[serde(default)]
        always_apply: bool,
        #[serde(default = "sequential_p")]
        p: f32,
    },
    RandomOrderSequential {
        transforms: Vec<TransformSpec>,
        #[serde(default)]
        always_apply: bool,
        #[serde(default = "sequential_p")]
        p: f32,
    },
    OneOf {
        transforms: Vec<TransformSpec>,
        #[serde(default)]
        always_apply: bool,
        #[serde(default = "one_of_p")]
        p: f32,
    },
    ToChannels {
        transform: Box<TransformSpec>,
        #[serde(flatten)]
        config: ToChannelsConfig,
    },
}

/// Qualify a child's construction error with its location in the parent
fn locate(error: AugError, location: String) -> AugError {
    match error {
        AugError::Config { name, reason } => AugError::Config {
            name: format!("{}.{}", location, name),
            reason,
        },
        other => config_error!(location, "{}", other),
    }
}

fn build_children(transforms: &[TransformSpec]) -> AugResult<Vec<Box<dyn Transform>>> {
    transforms
        .iter()
        .enumerate()
        .map(|(index, spec)| spec.build().map_err(|error| locate(error, format!("transforms[{}]", index))))
        .collect()
}

impl TransformSpec {
    /// Construct the described transform, validating every parameter
    pub fn build(&self) -> AugResult<Box<dyn Transform>> {
        let transform = match self {
            TransformSpec::Identity(config) => Identity::new(config.clone())?.boxed(),
            TransformSpec::TimeReverse(config) => TimeReverse::new(config.clone())?.boxed(),
            TransformSpec::AmplitudeInvert(config) => AmplitudeInvert::new(config.clone())?.boxed(),
            TransformSpec::AmplitudeScale(config) => AmplitudeScale::new(config.clone())?.boxed(),
            TransformSpec::ChannelShuffle(config) => ChannelShuffle::new(config.clone())?.boxed(),
            TransformSpec::ChannelDropout(config) => ChannelDropout::new(config.clone())?.boxed(),
            TransformSpec::GaussNoise(config) => GaussNoise::new(config.clone())?.boxed(),
            TransformSpec::Blur(config) => Blur::new(config.clone())?.boxed(),
            TransformSpec::GaussBlur(config) => GaussBlur::new(config.clone())?.boxed(),
            TransformSpec::SinePulse(config) => SinePulse::new(config.clone())?.boxed(),
            TransformSpec::PowerlineNoise(config) => SinePulse::powerline(config.clone())?.boxed(),
            TransformSpec::RespirationNoise(config) => SinePulse::respiration(config.clone())?.boxed(),
            TransformSpec::SquarePulse(config) => SquarePulse::new(config.clone())?.boxed(),
            TransformSpec::LowPassFilter(config) => LowPassFilter::new(config.clone())?.boxed(),
            TransformSpec::HighPassFilter(config) => HighPassFilter::new(config.clone())?.boxed(),
            TransformSpec::BandPassFilter(config) => BandPassFilter::new(config.clone())?.boxed(),
            TransformSpec::SigmoidCompression(config) => SigmoidCompression::new(config.clone())?.boxed(),
            TransformSpec::TimeShift(config) => TimeShift::new(config.clone())?.boxed(),
            TransformSpec::TimeSegmentShuffle(config) => TimeSegmentShuffle::new(config.clone())?.boxed(),
            TransformSpec::RandomTimeWarp(config) => RandomTimeWarp::new(config.clone())?.boxed(),
            TransformSpec::TimeCutout(config) => TimeCutout::new(config.clone())?.boxed(),
            TransformSpec::TimeCrop(config) => TimeCrop::new(config.clone())?.boxed(),
            TransformSpec::TimePadIfNeeded(config) => TimePadIfNeeded::new(config.clone())?.boxed(),
            TransformSpec::Sequential { transforms, always_apply, p } => {
                Sequential::with_gate(build_children(transforms)?, *always_apply, *p)?.boxed()
            }
            TransformSpec::RandomOrderSequential { transforms, always_apply, p } => {
                RandomOrderSequential::with_gate(build_children(transforms)?, *always_apply, *p)?.boxed()
            }
            TransformSpec::OneOf { transforms, always_apply, p } => {
                OneOf::with_gate(build_children(transforms)?, *always_apply, *p)?.boxed()
            }
            TransformSpec::ToChannels { transform, config } => {
                let child = transform
                    .build()
                    .map_err(|error| locate(error, "transform".to_string()))?;
                ToChannels::new(child, config.clone())?.boxed()
            }
        };

        Ok(transform)
    }

    pub fn sequential(transforms: Vec<TransformSpec>) -> Self {
        TransformSpec::Sequential { transforms, always_apply: false, p: 1.0 }
    }

    pub fn one_of(transforms: Vec<TransformSpec>, always_apply: bool, p: f32) -> Self {
        TransformSpec::OneOf { transforms, always_apply, p }
    }
}

/// Augmentation recipes for common training setups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AugmentationProfile {
    /// Amplitude, noise, blur and masking views for 12-lead contrastive pretraining
    SelfSupervised,
    /// One random interference or geometric distortion per record
    RandEcg,
    /// Band-pass filtering followed by length normalization
    Preprocessing,
    /// Empty pipeline to be filled in by the user
    Custom,
}

/// Named, serializable augmentation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentationConfig {
    /// Configuration name
    pub name: String,
    /// Recipe this configuration started from
    pub profile: AugmentationProfile,
    /// Root of the pipeline
    pub pipeline: TransformSpec,
}

impl AugmentationConfig {
    /// Contrastive pretraining views for 12-lead records
    pub fn self_supervised() -> Self {
        let pipeline = TransformSpec::sequential(vec![
            TransformSpec::AmplitudeScale(AmplitudeScaleConfig {
                scaling_range: RangeInput::Scalar(0.1),
                ..AmplitudeScaleConfig::default()
            }),
            TransformSpec::GaussNoise(GaussNoiseConfig::default()),
            TransformSpec::one_of(
                vec![
                    TransformSpec::Blur(BlurConfig::default()),
                    TransformSpec::GaussBlur(GaussBlurConfig::default()),
                ],
                false,
                0.5,
            ),
            TransformSpec::TimeCutout(TimeCutoutConfig::default()),
            TransformSpec::ChannelDropout(ChannelDropoutConfig {
                channel_drop_range: RangeInput::from((1, 4)),
                ..ChannelDropoutConfig::default()
            }),
        ]);

        AugmentationConfig {
            name: "Self-supervised 12-lead".to_string(),
            profile: AugmentationProfile::SelfSupervised,
            pipeline,
        }
    }

    /// One transform per record drawn from interference and geometric distortions
    pub fn rand_ecg() -> Self {
        let pipeline = TransformSpec::one_of(
            vec![
                TransformSpec::SinePulse(SinePulseConfig::default()),
                TransformSpec::SquarePulse(SquarePulseConfig::default()),
                TransformSpec::PowerlineNoise(PowerlineNoiseConfig::default()),
                TransformSpec::RespirationNoise(RespirationNoiseConfig::default()),
                TransformSpec::GaussNoise(GaussNoiseConfig::default()),
                TransformSpec::AmplitudeInvert(GateConfig::default()),
                TransformSpec::TimeReverse(GateConfig::default()),
                TransformSpec::TimeShift(TimeShiftConfig::default()),
                TransformSpec::RandomTimeWarp(RandomTimeWarpConfig::default()),
            ],
            true,
            1.0,
        );

        AugmentationConfig {
            name: "RandECG".to_string(),
            profile: AugmentationProfile::RandEcg,
            pipeline,
        }
    }

    /// 0.5-47 Hz band-pass then pad and center crop to ten seconds at 500 Hz
    pub fn preprocessing() -> Self {
        let pipeline = TransformSpec::sequential(vec![
            TransformSpec::BandPassFilter(BandPassFilterConfig::default()),
            TransformSpec::TimePadIfNeeded(TimePadIfNeededConfig::default()),
            TransformSpec::TimeCrop(TimeCropConfig {
                position: PositionType::Center,
                ..TimeCropConfig::default()
            }),
        ]);

        AugmentationConfig {
            name: "Preprocessing".to_string(),
            profile: AugmentationProfile::Preprocessing,
            pipeline,
        }
    }

    /// Create configuration suitable for given profile
    pub fn for_profile(profile: AugmentationProfile) -> Self {
        match profile {
            AugmentationProfile::SelfSupervised => Self::self_supervised(),
            AugmentationProfile::RandEcg => Self::rand_ecg(),
            AugmentationProfile::Preprocessing => Self::preprocessing(),
            AugmentationProfile::Custom => AugmentationConfig {
                name: "Custom".to_string(),
                profile: AugmentationProfile::Custom,
                pipeline: TransformSpec::sequential(Vec::new()),
            },
        }
    }

    /// Validate the whole pipeline by constructing it
    pub fn validate(&self) -> AugResult<()> {
        if self.name.trim().is_empty() {
            return Err(config_error!("name", "configuration name must not be empty"));
        }
        self.pipeline.build().map(|_| ())
    }

    pub fn build(&self) -> AugResult<Box<dyn Transform>> {
        self.pipeline.build()
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> AugResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| config_error!("pipeline", "failed to serialize configuration: {}", e))
    }

    /// Import configuration from JSON
    pub fn from_json(json: &str) -> AugResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| config_error!("pipeline", "failed to deserialize configuration: {}", e))
    }
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self::for_profile(AugmentationProfile::Custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functional::FillValue;
    use ecg_core::{Bundle, ReductionType, Signal};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_profiles_validate() {
        for profile in [
            AugmentationProfile::SelfSupervised,
            AugmentationProfile::RandEcg,
            AugmentationProfile::Preprocessing,
            AugmentationProfile::Custom,
        ] {
            let config = AugmentationConfig::for_profile(profile);
            assert_eq!(config.profile, profile);
            assert!(config.validate().is_ok(), "{:?} failed to validate", profile);
        }
    }

    #[test]
    fn test_json_round_trip() {
        let config = AugmentationConfig::self_supervised();

        let json = config.to_json().unwrap();
        assert!(json.contains("\"type\": \"Sequential\""));

        let restored = AugmentationConfig::from_json(&json).unwrap();
        assert_eq!(restored, config);
        assert_eq!(restored.build().unwrap().describe(), config.build().unwrap().describe());
    }

    #[test]
    fn test_spec_defaults_from_json() {
        let json = r#"{
            "name": "minimal",
            "profile": "Custom",
            "pipeline": {
                "type": "OneOf",
                "transforms": [
                    {"type": "HighPassFilter"},
                    {"type": "ChannelDropout", "fill_value": "median"},
                    {"type": "ToChannels", "channels": [1, 2], "transform": {"type": "TimeReverse", "p": 1.0}}
                ]
            }
        }"#;

        let config = AugmentationConfig::from_json(json).unwrap();
        match &config.pipeline {
            TransformSpec::OneOf { transforms, always_apply, p } => {
                assert!(!always_apply);
                assert_eq!(*p, 0.5);
                assert_eq!(transforms[0], TransformSpec::HighPassFilter(HighPassFilterConfig::default()));
                match &transforms[1] {
                    TransformSpec::ChannelDropout(dropout) => {
                        assert_eq!(dropout.fill_value, FillValue::Reduction(ReductionType::Median));
                    }
                    other => panic!("unexpected spec {:?}", other),
                }
            }
            other => panic!("unexpected spec {:?}", other),
        }

        let pipeline = config.build().unwrap();
        assert!(pipeline.describe().starts_with("OneOf([\n  HighPassFilter(sampling_rate=500.0, cutoff_frequency=0.5"));
    }

    #[test]
    fn test_child_errors_name_their_index() {
        let spec = TransformSpec::sequential(vec![
            TransformSpec::Identity(GateConfig::default()),
            TransformSpec::Blur(BlurConfig { kernel_size_range: RangeInput::from((2, 4)), ..BlurConfig::default() }),
        ]);

        match spec.build().err().unwrap() {
            AugError::Config { name, .. } => assert_eq!(name, "transforms[1].kernel_size_range"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(AugmentationConfig::from_json("{\"name\": 3}").unwrap_err().is_config());

        let config = AugmentationConfig { name: " ".to_string(), ..AugmentationConfig::default() };
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_preprocessing_normalizes_length() {
        let pipeline = AugmentationConfig::preprocessing().build().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let short = Bundle::with_signal(Signal::new(vec![0.1; 3000 * 2], 2).unwrap());
        let output = pipeline.invoke(short, false, &mut rng).unwrap();
        assert_eq!(output.signal().unwrap().len(), 5000);
        assert_eq!(output.signal().unwrap().channel_count(), 2);

        let long = Bundle::with_signal(Signal::mono(vec![0.1; 7000]));
        let output = pipeline.invoke(long, false, &mut rng).unwrap();
        assert_eq!(output.signal().unwrap().len(), 5000);
    }
}

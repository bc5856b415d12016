//! Behavioural properties of the augmentation engine across modules

use ecg_augment::*;
use ecg_simulation::{EcgConfig, EcgSimulator};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

const CATALOGUE: &[&str] = &[
    "Identity",
    "TimeReverse",
    "AmplitudeInvert",
    "AmplitudeScale",
    "ChannelShuffle",
    "ChannelDropout",
    "GaussNoise",
    "Blur",
    "GaussBlur",
    "SinePulse",
    "PowerlineNoise",
    "RespirationNoise",
    "SquarePulse",
    "LowPassFilter",
    "HighPassFilter",
    "BandPassFilter",
    "SigmoidCompression",
    "TimeShift",
    "TimeSegmentShuffle",
    "RandomTimeWarp",
    "TimeCutout",
    "TimeCrop",
    "TimePadIfNeeded",
];

fn ascending() -> Signal {
    Signal::mono(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
}

fn descending() -> Signal {
    Signal::mono(vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0])
}

fn twelve_lead_record() -> (Signal, Signal) {
    let mut simulator = EcgSimulator::new(EcgConfig { seed: Some(7), ..EcgConfig::default() }).unwrap();
    simulator.generate_with_mask(2.0).unwrap()
}

fn build(type_name: &str, extra: serde_json::Value) -> Box<dyn Transform> {
    let mut json = serde_json::json!({ "type": type_name });
    if let (Some(target), Some(source)) = (json.as_object_mut(), extra.as_object()) {
        target.extend(source.clone());
    }
    let spec: TransformSpec = serde_json::from_value(json).unwrap();
    spec.build().unwrap()
}

#[test]
fn test_double_reverse_is_identity() {
    let reverse = TimeReverse::new(GateConfig::always()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let once = reverse.invoke(Bundle::with_signal(ascending()), false, &mut rng).unwrap();
    assert_eq!(once.signal(), Some(&descending()));

    let twice = reverse.invoke(once, false, &mut rng).unwrap();
    assert_eq!(twice.signal(), Some(&ascending()));
}

#[test]
fn test_crop_keeps_signal_and_mask_aligned() {
    let crop = TimeCrop::random(2).unwrap();
    let params = Params::new().with("left_bound", 0.25f32);

    let signal = crop.apply(ascending(), &params).unwrap();
    let mask = crop.apply_to_mask(descending(), &params).unwrap();

    assert_eq!(signal.data(), &[2.0, 3.0]);
    assert_eq!(mask.data(), &[5.0, 4.0]);
}

#[test]
fn test_dual_transforms_keep_alignment_when_invoked() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    for name in ["TimeReverse", "TimeShift", "TimeSegmentShuffle", "TimeCrop"] {
        let transform = build(name, serde_json::json!({ "always_apply": true, "length": 4 }));
        let bundle = Bundle::with_signal(ascending()).with_mask(descending());

        let output = transform.invoke(bundle, false, &mut rng).unwrap();
        let signal = output.signal().unwrap();
        let mask = output.mask().unwrap();
        assert_eq!(signal.len(), mask.len(), "{}", name);

        for (s, m) in signal.data().iter().zip(mask.data()) {
            // Padded samples are zero in both tracks
            assert!(*s + *m == 7.0 || (*s == 0.0 && *m == 0.0), "{} broke alignment", name);
        }
    }
}

#[test]
fn test_dropout_of_first_channel() {
    let dropout = ChannelDropout::new(ChannelDropoutConfig::default()).unwrap();
    let signal = Signal::from_channels(vec![
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0],
    ])
    .unwrap();

    let params = Params::new().with("channels_to_drop", vec![0usize]);
    let output = dropout.apply(signal, &params).unwrap();

    assert_eq!(output.channel_data(0).unwrap(), vec![0.0; 6]);
    assert_eq!(output.channel_data(1).unwrap(), vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
}

#[test]
fn test_one_of_selection_frequencies() {
    let one_of = OneOf::with_gate(
        vec![
            AmplitudeInvert::new(GateConfig::with_probability(0.25)).unwrap().boxed(),
            Identity::new(GateConfig::with_probability(0.75)).unwrap().boxed(),
        ],
        true,
        1.0,
    )
    .unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    let trials = 4000;
    let inverted = (0..trials)
        .filter(|_| {
            let output = one_of.invoke(Bundle::with_signal(ascending()), false, &mut rng).unwrap();
            output.signal().unwrap().data()[0] < 0.0
        })
        .count();

    let share = inverted as f32 / trials as f32;
    assert!((0.22..=0.28).contains(&share), "inverted share {}", share);
}

#[test]
fn test_empty_compositions_are_identity() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let bundle = Bundle::with_signal(ascending()).with_mask(descending());

    let compositions: Vec<Box<dyn Transform>> = vec![
        Sequential::new(Vec::new()).boxed(),
        RandomOrderSequential::new(Vec::new()).boxed(),
        OneOf::new(Vec::new()).unwrap().boxed(),
    ];

    for composition in &compositions {
        assert_eq!(composition.invoke(bundle.clone(), false, &mut rng).unwrap(), bundle);
        assert_eq!(composition.invoke(bundle.clone(), true, &mut rng).unwrap(), bundle);
    }
}

#[test]
fn test_to_channels_isolates_other_leads() {
    let (record, mask) = twelve_lead_record();
    let noise = GaussNoise::new(GaussNoiseConfig { variance: 1.0, always_apply: true, ..GaussNoiseConfig::default() }).unwrap();
    let modifier = ToChannels::new(
        noise.boxed(),
        ToChannelsConfig { channels: vec![3, 7], always_apply: true, ..ToChannelsConfig::default() },
    )
    .unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let output = modifier
        .invoke(Bundle::with_signal(record.clone()).with_mask(mask.clone()), false, &mut rng)
        .unwrap();
    let augmented = output.signal().unwrap();

    for channel in 0..12 {
        let before = record.channel_data(channel).unwrap();
        let after = augmented.channel_data(channel).unwrap();
        if channel == 3 || channel == 7 {
            assert_ne!(before, after);
        } else {
            assert_eq!(before, after);
        }
    }
    assert_eq!(output.mask(), Some(&mask));
}

#[test]
fn test_construction_time_validation() {
    let dropout = ChannelDropout::new(ChannelDropoutConfig {
        channel_drop_range: RangeInput::from((0, 1)),
        ..ChannelDropoutConfig::default()
    });
    assert!(dropout.unwrap_err().is_config());

    let blur = Blur::new(BlurConfig { kernel_size_range: RangeInput::from((2, 4)), ..BlurConfig::default() });
    assert!(blur.unwrap_err().is_config());

    assert!(AmplitudeScale::new(AmplitudeScaleConfig { p: 1.5, ..AmplitudeScaleConfig::default() }).is_err());
    assert!(TimeCrop::center(0).is_err());
}

#[test]
fn test_zero_probability_is_identity() {
    let (record, mask) = twelve_lead_record();
    let bundle = Bundle::with_signal(record).with_mask(mask);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    for name in CATALOGUE {
        let transform = build(name, serde_json::json!({ "p": 0.0 }));
        let output = transform.invoke(bundle.clone(), false, &mut rng).unwrap();
        assert_eq!(output, bundle, "{} changed data with p = 0", name);
    }
}

#[test]
fn test_shape_is_preserved() {
    let (record, mask) = twelve_lead_record();
    let shape = record.shape();
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    for name in CATALOGUE {
        let extra = match *name {
            "TimeCrop" => serde_json::json!({ "always_apply": true, "length": 1000 }),
            "TimePadIfNeeded" => serde_json::json!({ "always_apply": true, "min_length": 1000 }),
            _ => serde_json::json!({ "always_apply": true }),
        };
        let transform = build(name, extra);

        let bundle = Bundle::with_signal(record.clone()).with_mask(mask.clone());
        let output = transform.invoke(bundle, false, &mut rng).unwrap();
        assert_eq!(output.signal().unwrap().shape(), shape, "{} changed the signal shape", name);
        assert_eq!(output.mask().unwrap().shape(), mask.shape(), "{} changed the mask shape", name);
    }
}

#[test]
fn test_draw_order_replay() {
    let scale = AmplitudeScale::new(AmplitudeScaleConfig::default()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let mut replay = rng.clone();

    for _ in 0..20 {
        let output = scale.invoke(Bundle::with_signal(ascending()), false, &mut rng).unwrap();

        let expected = if replay.gen::<f32>() < 0.5 {
            1.0 + replay.gen_range(-0.05f32..0.05)
        } else {
            1.0
        };
        for (value, original) in output.signal().unwrap().data().iter().zip(ascending().data()) {
            assert!((value - original * expected).abs() < 1e-6);
        }
    }
    assert_eq!(rng.next_u64(), replay.next_u64());
}

#[test]
fn test_forced_composition_skips_gate_draw() {
    let pipeline = Sequential::with_gate(Vec::new(), false, 0.5).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut reference = rng.clone();

    pipeline.invoke(Bundle::with_signal(ascending()), true, &mut rng).unwrap();
    assert_eq!(rng.next_u64(), reference.next_u64());
}

#[test]
fn test_missing_signal_for_inspecting_transform() {
    let cutout = TimeCutout::new(TimeCutoutConfig { always_apply: true, ..TimeCutoutConfig::default() }).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let error = cutout.invoke(Bundle::new().with_mask(descending()), false, &mut rng).unwrap_err();
    assert!(error.is_usage());
    assert!(error.to_string().contains("TimeCutout"));
}

#[test]
fn test_extra_targets_pass_through() {
    let (record, _) = twelve_lead_record();
    let rpeaks = Signal::mono(vec![150.0, 650.0]);
    let bundle = Bundle::with_signal(record).with("rpeaks", Some(rpeaks.clone()));
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    let pipeline = AugmentationConfig::self_supervised().build().unwrap();
    let output = pipeline.invoke(bundle, true, &mut rng).unwrap();

    assert_eq!(output.get(&Target::from("rpeaks")), Some(&rpeaks));
    assert_eq!(output.signal().unwrap().channel_count(), 12);
}

//! Core transform contract and sampled parameter types

use crate::functional::FillValue;
use ecg_core::{AugError, AugResult, BorderType, Bundle, Interpolation, PositionType, Signal, Target};
use rand::{Rng, RngCore};
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Indentation added per nesting level when rendering compositions
pub const REPR_INDENT_STEP: usize = 2;

/// Inspection declaration for transforms that size their parameters from the signal
pub const INSPECTS_SIGNAL: &[Target] = &[Target::Signal];

/// Uniform interface of leaves, compositions and modifiers
pub trait Transform: Send + Sync {
    /// Display name used in descriptions and log events
    fn name(&self) -> &'static str;

    /// Probability gate of this node
    fn gate(&self) -> Gate;

    /// Decide firing, sample once and dispatch every present target
    fn invoke(&self, bundle: Bundle, force_apply: bool, rng: &mut dyn RngCore) -> AugResult<Bundle>;

    /// Render with nested children indented by `indent`
    fn repr(&self, indent: usize) -> String;

    /// Reproducible description of the configuration
    fn describe(&self) -> String {
        self.repr(REPR_INDENT_STEP)
    }

    fn boxed(self) -> Box<dyn Transform>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// Application probability shared by every transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gate {
    pub always_apply: bool,
    pub p: f32,
}

impl Gate {
    pub fn new(always_apply: bool, p: f32) -> AugResult<Self> {
        Ok(Gate { always_apply, p: crate::validate::probability(p)? })
    }

    /// Draws from `rng` only when neither flag forces the decision
    pub fn fires(&self, force_apply: bool, rng: &mut dyn RngCore) -> bool {
        force_apply || self.always_apply || rng.gen::<f32>() < self.p
    }

    pub fn init_args(&self) -> [(&'static str, ParamValue); 2] {
        [
            ("always_apply", ParamValue::Boolean(self.always_apply)),
            ("p", ParamValue::Float(self.p)),
        ]
    }
}

/// Which targets a transform knows how to handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Only the signal is transformed
    SignalOnly,
    /// Signal and mask are transformed with the same parameters
    Dual,
}

/// Handler selected for one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Apply,
    ApplyToMask,
    PassThrough,
}

impl Capability {
    pub fn route(&self, target: &Target) -> Route {
        match (self, target) {
            (_, Target::Signal) => Route::Apply,
            (Capability::Dual, Target::Mask) => Route::ApplyToMask,
            _ => Route::PassThrough,
        }
    }
}

/// Value of a sampled parameter or a reported init argument
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Size(usize),
    Boolean(bool),
    Text(String),
    FloatPair(f32, f32),
    IntPair(i64, i64),
    FloatArray(Vec<f32>),
    IndexArray(Vec<usize>),
    Spans(Vec<(usize, usize)>),
    Interpolation(Interpolation),
    Border(BorderType),
    Position(PositionType),
    Fill(FillValue),
    Null,
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Float(value)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::Size(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Boolean(value)
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<(f32, f32)> for ParamValue {
    fn from((low, high): (f32, f32)) -> Self {
        ParamValue::FloatPair(low, high)
    }
}

impl From<(usize, usize)> for ParamValue {
    fn from((low, high): (usize, usize)) -> Self {
        ParamValue::IntPair(low as i64, high as i64)
    }
}

impl From<Vec<f32>> for ParamValue {
    fn from(value: Vec<f32>) -> Self {
        ParamValue::FloatArray(value)
    }
}

impl From<Vec<usize>> for ParamValue {
    fn from(value: Vec<usize>) -> Self {
        ParamValue::IndexArray(value)
    }
}

impl From<Vec<(usize, usize)>> for ParamValue {
    fn from(value: Vec<(usize, usize)>) -> Self {
        ParamValue::Spans(value)
    }
}

impl From<Interpolation> for ParamValue {
    fn from(value: Interpolation) -> Self {
        ParamValue::Interpolation(value)
    }
}

impl From<BorderType> for ParamValue {
    fn from(value: BorderType) -> Self {
        ParamValue::Border(value)
    }
}

impl From<PositionType> for ParamValue {
    fn from(value: PositionType) -> Self {
        ParamValue::Position(value)
    }
}

impl From<FillValue> for ParamValue {
    fn from(value: FillValue) -> Self {
        ParamValue::Fill(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

fn write_list<T>(f: &mut fmt::Formatter<'_>, items: &[T], item: impl Fn(&mut fmt::Formatter<'_>, &T) -> fmt::Result) -> fmt::Result {
    f.write_str("[")?;
    for (index, value) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        item(f, value)?;
    }
    f.write_str("]")
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{:?}", v),
            ParamValue::Size(v) => write!(f, "{}", v),
            ParamValue::Boolean(true) => f.write_str("True"),
            ParamValue::Boolean(false) => f.write_str("False"),
            ParamValue::Text(v) => write!(f, "'{}'", v),
            ParamValue::FloatPair(low, high) => write!(f, "({:?}, {:?})", low, high),
            ParamValue::IntPair(low, high) => write!(f, "({}, {})", low, high),
            ParamValue::FloatArray(values) => write_list(f, values.as_slice(), |f, v| write!(f, "{:?}", v)),
            ParamValue::IndexArray(values) => write_list(f, values.as_slice(), |f, v| write!(f, "{}", v)),
            ParamValue::Spans(values) => write_list(f, values.as_slice(), |f, (start, len)| write!(f, "({}, {})", start, len)),
            ParamValue::Interpolation(v) => write!(f, "'{}'", v),
            ParamValue::Border(v) => write!(f, "'{}'", v),
            ParamValue::Position(v) => write!(f, "'{}'", v),
            ParamValue::Fill(FillValue::Constant(v)) => write!(f, "{:?}", v),
            ParamValue::Fill(FillValue::Reduction(r)) => write!(f, "'{}'", r),
            ParamValue::Null => f.write_str("None"),
        }
    }
}

/// Parameters drawn for a single firing call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: HashMap<&'static str, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter value
    pub fn set(&mut self, key: &'static str, value: impl Into<ParamValue>) {
        self.values.insert(key, value.into());
    }

    /// Builder-style set
    pub fn with(mut self, key: &'static str, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Merge `other` into `self`, later values winning
    pub fn merge(&mut self, other: Params) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, key: &str) -> AugResult<&ParamValue> {
        self.values.get(key).ok_or_else(|| AugError::Parameter {
            name: key.to_string(),
            reason: "was not sampled".to_string(),
        })
    }

    fn mismatch(key: &str, expected: &str, found: &ParamValue) -> AugError {
        AugError::Parameter {
            name: key.to_string(),
            reason: format!("expected {}, found {:?}", expected, found),
        }
    }

    pub fn get_float(&self, key: &str) -> AugResult<f32> {
        match self.require(key)? {
            ParamValue::Float(value) => Ok(*value),
            other => Err(Self::mismatch(key, "a float", other)),
        }
    }

    pub fn get_size(&self, key: &str) -> AugResult<usize> {
        match self.require(key)? {
            ParamValue::Size(value) => Ok(*value),
            other => Err(Self::mismatch(key, "a size", other)),
        }
    }

    pub fn get_floats(&self, key: &str) -> AugResult<&[f32]> {
        match self.require(key)? {
            ParamValue::FloatArray(values) => Ok(values),
            other => Err(Self::mismatch(key, "a float array", other)),
        }
    }

    pub fn get_indices(&self, key: &str) -> AugResult<&[usize]> {
        match self.require(key)? {
            ParamValue::IndexArray(values) => Ok(values),
            other => Err(Self::mismatch(key, "an index array", other)),
        }
    }

    pub fn get_spans(&self, key: &str) -> AugResult<&[(usize, usize)]> {
        match self.require(key)? {
            ParamValue::Spans(values) => Ok(values),
            other => Err(Self::mismatch(key, "a span list", other)),
        }
    }

    pub fn get_interpolation(&self, key: &str) -> AugResult<Interpolation> {
        match self.require(key)? {
            ParamValue::Interpolation(value) => Ok(*value),
            other => Err(Self::mismatch(key, "an interpolation", other)),
        }
    }
}

/// Read-only view of the targets a transform declared for inspection
pub struct Inspection<'a> {
    bundle: &'a Bundle,
    transform: &'static str,
}

impl<'a> Inspection<'a> {
    pub fn get(&self, target: &Target) -> AugResult<&'a Signal> {
        self.bundle.get(target).ok_or_else(|| AugError::MissingTarget {
            transform: self.transform.to_string(),
            missing: vec![target.to_string()],
        })
    }

    pub fn signal(&self) -> AugResult<&'a Signal> {
        self.get(&Target::Signal)
    }
}

/// Leaf transform: samples parameters and applies them to each target.
///
/// Every `Augmentation` is a [`Transform`] through the blanket impl below,
/// which owns the gate decision, the inspection check and target dispatch.
pub trait Augmentation: Send + Sync {
    fn name(&self) -> &'static str;

    fn gate(&self) -> Gate;

    fn capability(&self) -> Capability {
        Capability::SignalOnly
    }

    /// Targets that must be present for parameter sampling
    fn inspected_targets(&self) -> &'static [Target] {
        &[]
    }

    /// Parameters that do not depend on the data
    fn sample_params(&self, _rng: &mut dyn RngCore) -> AugResult<Params> {
        Ok(Params::new())
    }

    /// Parameters sized from the inspected targets
    fn sample_params_from_targets(&self, _targets: &Inspection<'_>, _rng: &mut dyn RngCore) -> AugResult<Params> {
        Ok(Params::new())
    }

    fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal>;

    /// Mask path reuses `apply` with nearest-neighbour resampling
    fn apply_to_mask(&self, mask: Signal, params: &Params) -> AugResult<Signal> {
        if params.contains("interpolation") {
            let nearest = params.clone().with("interpolation", Interpolation::Nearest);
            self.apply(mask, &nearest)
        } else {
            self.apply(mask, params)
        }
    }

    /// Ordered constructor arguments, gate excluded
    fn init_args(&self) -> Vec<(&'static str, ParamValue)> {
        Vec::new()
    }
}

pub(crate) fn render_args<'a>(args: impl IntoIterator<Item = &'a (&'static str, ParamValue)>) -> String {
    args.into_iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}

impl<A: Augmentation> Transform for A {
    fn name(&self) -> &'static str {
        Augmentation::name(self)
    }

    fn gate(&self) -> Gate {
        Augmentation::gate(self)
    }

    fn invoke(&self, bundle: Bundle, force_apply: bool, rng: &mut dyn RngCore) -> AugResult<Bundle> {
        let name = Augmentation::name(self);

        if !Augmentation::gate(self).fires(force_apply, rng) {
            trace!(transform = name, "skipped");
            return Ok(bundle);
        }

        let mut params = self.sample_params(rng)?;

        let inspected = self.inspected_targets();
        if !inspected.is_empty() {
            let missing: Vec<String> = inspected
                .iter()
                .filter(|target| bundle.get(target).is_none())
                .map(ToString::to_string)
                .collect();

            if !missing.is_empty() {
                return Err(AugError::MissingTarget {
                    transform: name.to_string(),
                    missing,
                });
            }

            let view = Inspection { bundle: &bundle, transform: name };
            params.merge(self.sample_params_from_targets(&view, rng)?);
        }

        trace!(transform = name, params = params.len(), "applied");

        let capability = self.capability();
        bundle
            .into_iter()
            .map(|(target, value)| -> AugResult<(Target, Option<Signal>)> {
                let value = match value {
                    Some(tensor) => Some(match capability.route(&target) {
                        Route::Apply => self.apply(tensor, &params)?,
                        Route::ApplyToMask => self.apply_to_mask(tensor, &params)?,
                        Route::PassThrough => tensor,
                    }),
                    None => None,
                };
                Ok((target, value))
            })
            .collect()
    }

    fn repr(&self, _indent: usize) -> String {
        let mut args = self.init_args();
        args.extend(Augmentation::gate(self).init_args());
        format!("{}({})", Augmentation::name(self), render_args(&args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Adds a drawn offset to the signal and the mask
    struct Offset {
        gate: Gate,
    }

    impl Augmentation for Offset {
        fn name(&self) -> &'static str {
            "Offset"
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

        fn sample_params(&self, rng: &mut dyn RngCore) -> AugResult<Params> {
            Ok(Params::new().with("offset", rng.gen_range(1.0f32..2.0)))
        }

        fn sample_params_from_targets(&self, targets: &Inspection<'_>, _rng: &mut dyn RngCore) -> AugResult<Params> {
            Ok(Params::new().with("length", targets.signal()?.len()))
        }

        fn apply(&self, signal: Signal, params: &Params) -> AugResult<Signal> {
            let offset = params.get_float("offset")?;
            assert_eq!(params.get_size("length")?, 3);
            Ok(signal.map(|x| x + offset))
        }
    }

    fn offset(always_apply: bool, p: f32) -> Offset {
        Offset { gate: Gate::new(always_apply, p).unwrap() }
    }

    #[test]
    fn test_gate_validation() {
        assert!(Gate::new(false, -0.1).is_err());
        assert!(Gate::new(false, 1.01).is_err());
        assert!(Gate::new(true, 0.0).is_ok());
    }

    #[test]
    fn test_forced_gate_consumes_no_draw() {
        let gate = Gate::new(false, 0.5).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut reference = rng.clone();

        assert!(gate.fires(true, &mut rng));
        assert_eq!(rng.next_u64(), reference.next_u64());
    }

    #[test]
    fn test_dispatch_routes_targets() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let bundle = Bundle::with_signal(Signal::mono(vec![0.0; 3]))
            .with_mask(Signal::mono(vec![0.0; 3]))
            .with("rpeaks", Some(Signal::mono(vec![0.0; 3])))
            .with("labels", None);

        let output = offset(true, 0.0).invoke(bundle, false, &mut rng).unwrap();

        let signal = output.signal().unwrap().data().to_vec();
        assert!(signal[0] >= 1.0 && signal[0] < 2.0);
        assert_eq!(output.mask().unwrap().data(), &signal[..]);
        assert_eq!(output.get(&Target::from("rpeaks")).unwrap().data(), &[0.0; 3]);
        assert!(output.contains(&Target::from("labels")));
        assert!(output.get(&Target::from("labels")).is_none());
    }

    #[test]
    fn test_not_firing_returns_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let bundle = Bundle::new().with(Target::Mask, Some(Signal::mono(vec![1.0])));

        // Inspection is only checked once the gate fires
        let output = offset(false, 0.0).invoke(bundle.clone(), false, &mut rng).unwrap();
        assert_eq!(output, bundle);
    }

    #[test]
    fn test_missing_inspected_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let bundle = Bundle::new().with(Target::Signal, None);

        let error = offset(false, 1.0).invoke(bundle, false, &mut rng).unwrap_err();
        assert_eq!(
            error,
            AugError::MissingTarget {
                transform: "Offset".to_string(),
                missing: vec!["signal".to_string()],
            }
        );
    }

    #[test]
    fn test_param_lookup_errors() {
        let params = Params::new().with("shift", 0.5f32);

        assert_eq!(params.get_float("shift").unwrap(), 0.5);
        assert!(matches!(params.get_size("shift"), Err(AugError::Parameter { .. })));
        assert!(matches!(params.get_float("scale"), Err(AugError::Parameter { .. })));
    }

    #[test]
    fn test_describe() {
        assert_eq!(offset(false, 0.5).describe(), "Offset(always_apply=False, p=0.5)");
        assert_eq!(ParamValue::from(Some(0.25f32)).to_string(), "0.25");
        assert_eq!(ParamValue::from(None::<f32>).to_string(), "None");
        assert_eq!(ParamValue::from((3usize, 5usize)).to_string(), "(3, 5)");
    }
}

//! Compositions chaining transforms into pipelines
//!
//! A composition owns its children as boxed [`Transform`]s and is itself a
//! transform, so compositions nest inside each other and inside
//! [`ToChannels`](crate::modify::ToChannels).

use crate::transform::{render_args, Gate, Transform, REPR_INDENT_STEP};
use ecg_core::{config_error, AugResult, Bundle};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::{debug, trace};

/// Render `Name([children...], gate)` with children indented by `indent`
fn render_composition(name: &str, transforms: &[Box<dyn Transform>], gate: &Gate, indent: usize) -> String {
    let mut repr = format!("{}([", name);

    for transform in transforms {
        repr.push('\n');
        repr.push_str(&" ".repeat(indent));
        repr.push_str(&transform.repr(indent + REPR_INDENT_STEP));
        repr.push(',');
    }

    repr.push('\n');
    repr.push_str(&" ".repeat(indent.saturating_sub(REPR_INDENT_STEP)));
    repr.push_str(&format!("], {})", render_args(&gate.init_args())));
    repr
}

/// Apply children one after another, each output feeding the next
pub struct Sequential {
    transforms: Vec<Box<dyn Transform>>,
    gate: Gate,
}

impl Sequential {
    /// Sequential that always fires
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Self {
        Sequential {
            transforms,
            gate: Gate { always_apply: false, p: 1.0 },
        }
    }

    pub fn with_gate(transforms: Vec<Box<dyn Transform>>, always_apply: bool, p: f32) -> AugResult<Self> {
        Ok(Sequential {
            transforms,
            gate: Gate::new(always_apply, p)?,
        })
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Transform> {
        self.transforms.get(index).map(|transform| transform.as_ref())
    }
}

impl Transform for Sequential {
    fn name(&self) -> &'static str {
        "Sequential"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn invoke(&self, bundle: Bundle, force_apply: bool, rng: &mut dyn RngCore) -> AugResult<Bundle> {
        if !self.gate.fires(force_apply, rng) {
            trace!(transform = "Sequential", "skipped");
            return Ok(bundle);
        }

        self.transforms
            .iter()
            .try_fold(bundle, |data, transform| transform.invoke(data, false, rng))
    }

    fn repr(&self, indent: usize) -> String {
        render_composition("Sequential", &self.transforms, &self.gate, indent)
    }
}

/// Sequential whose children run in a fresh random order on every call
pub struct RandomOrderSequential {
    transforms: Vec<Box<dyn Transform>>,
    gate: Gate,
}

impl RandomOrderSequential {
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Self {
        RandomOrderSequential {
            transforms,
            gate: Gate { always_apply: false, p: 1.0 },
        }
    }

    pub fn with_gate(transforms: Vec<Box<dyn Transform>>, always_apply: bool, p: f32) -> AugResult<Self> {
        Ok(RandomOrderSequential {
            transforms,
            gate: Gate::new(always_apply, p)?,
        })
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Transform> {
        self.transforms.get(index).map(|transform| transform.as_ref())
    }
}

impl Transform for RandomOrderSequential {
    fn name(&self) -> &'static str {
        "RandomOrderSequential"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn invoke(&self, bundle: Bundle, force_apply: bool, rng: &mut dyn RngCore) -> AugResult<Bundle> {
        if !self.gate.fires(force_apply, rng) {
            trace!(transform = "RandomOrderSequential", "skipped");
            return Ok(bundle);
        }

        let mut order: Vec<usize> = (0..self.transforms.len()).collect();
        order.shuffle(rng);
        debug!(?order, "random order drawn");

        order
            .into_iter()
            .try_fold(bundle, |data, index| self.transforms[index].invoke(data, false, rng))
    }

    fn repr(&self, indent: usize) -> String {
        render_composition("RandomOrderSequential", &self.transforms, &self.gate, indent)
    }
}

/// Pick exactly one child, weighted by the children's own probabilities
pub struct OneOf {
    transforms: Vec<Box<dyn Transform>>,
    weights: Vec<f32>,
    selector: Option<WeightedIndex<f32>>,
    gate: Gate,
}

impl OneOf {
    /// OneOf with the default probability of 0.5
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> AugResult<Self> {
        Self::with_gate(transforms, false, 0.5)
    }

    pub fn with_gate(transforms: Vec<Box<dyn Transform>>, always_apply: bool, p: f32) -> AugResult<Self> {
        let gate = Gate::new(always_apply, p)?;

        if transforms.is_empty() {
            return Ok(OneOf { transforms, weights: Vec::new(), selector: None, gate });
        }

        let raw: Vec<f32> = transforms.iter().map(|transform| transform.gate().p).collect();
        let total: f32 = raw.iter().sum();
        if total <= 0.0 {
            return Err(config_error!("transforms", "child probabilities sum to zero, no child can be selected"));
        }

        let weights: Vec<f32> = raw.iter().map(|p| p / total).collect();
        let selector = WeightedIndex::new(&weights)
            .map_err(|error| config_error!("transforms", "invalid selection weights: {}", error))?;

        Ok(OneOf { transforms, weights, selector: Some(selector), gate })
    }

    /// Normalized selection weights, in child order
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Transform> {
        self.transforms.get(index).map(|transform| transform.as_ref())
    }
}

impl Transform for OneOf {
    fn name(&self) -> &'static str {
        "OneOf"
    }

    fn gate(&self) -> Gate {
        self.gate
    }

    fn invoke(&self, bundle: Bundle, force_apply: bool, rng: &mut dyn RngCore) -> AugResult<Bundle> {
        // Empty lists return before any draw
        let selector = match &self.selector {
            Some(selector) => selector,
            None => return Ok(bundle),
        };

        if !self.gate.fires(force_apply, rng) {
            trace!(transform = "OneOf", "skipped");
            return Ok(bundle);
        }

        let index = selector.sample(rng);
        let chosen = &self.transforms[index];
        debug!(index, transform = chosen.name(), "OneOf selected child");

        chosen.invoke(bundle, true, rng)
    }

    fn repr(&self, indent: usize) -> String {
        render_composition("OneOf", &self.transforms, &self.gate, indent)
    }
}

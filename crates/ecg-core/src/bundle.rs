//! Named collections of signals passed through augmentation pipelines

use crate::error::{AugError, AugResult};
use crate::signal::Signal;
use std::collections::BTreeMap;
use std::fmt;

/// Name of an entry in a [`Bundle`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    /// The ECG recording itself
    Signal,
    /// Per-sample annotation aligned with the signal
    Mask,
    /// Any other caller-defined entry, passed through untouched
    Other(String),
}

impl Target {
    pub fn as_str(&self) -> &str {
        match self {
            Target::Signal => "signal",
            Target::Mask => "mask",
            Target::Other(name) => name,
        }
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        match name {
            "signal" => Target::Signal,
            "mask" => Target::Mask,
            other => Target::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping from target name to an optional tensor.
///
/// A target present with `None` counts as absent for inspection but is
/// preserved in the output so callers get back exactly the names they passed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    entries: BTreeMap<Target, Option<Signal>>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle holding only a signal
    pub fn with_signal(signal: Signal) -> Self {
        Self::new().with(Target::Signal, Some(signal))
    }

    /// Add a mask entry
    pub fn with_mask(self, mask: Signal) -> Self {
        self.with(Target::Mask, Some(mask))
    }

    /// Builder-style insert
    pub fn with(mut self, target: impl Into<Target>, value: Option<Signal>) -> Self {
        self.entries.insert(target.into(), value);
        self
    }

    /// Build from name/value pairs, rejecting repeated names
    pub fn from_pairs<I, T>(pairs: I) -> AugResult<Self>
    where
        I: IntoIterator<Item = (T, Option<Signal>)>,
        T: Into<Target>,
    {
        let mut bundle = Bundle::new();
        for (target, value) in pairs {
            let target = target.into();
            if bundle.entries.contains_key(&target) {
                return Err(AugError::Usage {
                    reason: format!("Target '{}' was supplied more than once", target),
                });
            }
            bundle.entries.insert(target, value);
        }
        Ok(bundle)
    }

    /// Insert or replace an entry, returning the previous value
    pub fn insert(&mut self, target: impl Into<Target>, value: Option<Signal>) -> Option<Option<Signal>> {
        self.entries.insert(target.into(), value)
    }

    /// Tensor stored under `target`, if present and not `None`
    pub fn get(&self, target: &Target) -> Option<&Signal> {
        self.entries.get(target).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, target: &Target) -> Option<&mut Signal> {
        self.entries.get_mut(target).and_then(Option::as_mut)
    }

    pub fn signal(&self) -> Option<&Signal> {
        self.get(&Target::Signal)
    }

    pub fn mask(&self) -> Option<&Signal> {
        self.get(&Target::Mask)
    }

    /// Whether the name was supplied at all
    pub fn contains(&self, target: &Target) -> bool {
        self.entries.contains_key(target)
    }

    /// Remove the tensor from its slot, leaving `None` behind when the name was present
    pub fn take(&mut self, target: &Target) -> Option<Signal> {
        self.entries.get_mut(target).and_then(Option::take)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Supplied target names in order
    pub fn names(&self) -> impl Iterator<Item = &Target> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Target, &Option<Signal>)> {
        self.entries.iter()
    }
}

impl IntoIterator for Bundle {
    type Item = (Target, Option<Signal>);
    type IntoIter = std::collections::btree_map::IntoIter<Target, Option<Signal>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(Target, Option<Signal>)> for Bundle {
    fn from_iter<I: IntoIterator<Item = (Target, Option<Signal>)>>(iter: I) -> Self {
        Bundle { entries: iter.into_iter().collect() }
    }
}

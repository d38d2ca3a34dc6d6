use slotmap::SecondaryMap;

use crate::variable::OutputKey;

/// Crisp result per output variable.
#[derive(Clone, Debug, Default)]
pub struct Outputs(pub(crate) SecondaryMap<OutputKey, f64>);

impl Outputs {
    pub(crate) fn new(values: SecondaryMap<OutputKey, f64>) -> Self {
        Self(values)
    }

    pub fn get(&self, var: OutputKey) -> Option<f64> {
        self.0.get(var).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OutputKey, f64)> + '_ {
        self.0.iter().map(|(key, value)| (key, *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

use slotmap::SecondaryMap;

use crate::variable::InputKey;

/// Crisp values for the input variables of one evaluation.
#[derive(Clone, Debug, Default)]
pub struct Inputs(pub(crate) SecondaryMap<InputKey, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(SecondaryMap::new())
    }

    pub fn add(&mut self, var: InputKey, val: f64) -> &mut Self {
        self.0.insert(var, val);
        self
    }

    pub fn get(&self, var: InputKey) -> Option<f64> {
        self.0.get(var).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(InputKey, f64)> for Inputs {
    fn from_iter<T: IntoIterator<Item = (InputKey, f64)>>(iter: T) -> Self {
        Inputs(iter.into_iter().collect())
    }
}

#[test]
fn test_inputs() {
    let mut keys = slotmap::SlotMap::<InputKey, ()>::with_key();
    let (a, b) = (keys.insert(()), keys.insert(()));
    let mut inputs = Inputs::new();

    assert!(inputs.is_empty());

    inputs.add(a, 0.25).add(b, 0.5).add(a, 0.75);

    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs.get(a), Some(0.75));

    let collected: Inputs = [(b, 1.)].into_iter().collect();

    assert_eq!(collected.get(a), None);
    assert_eq!(collected.get(b), Some(1.));
}

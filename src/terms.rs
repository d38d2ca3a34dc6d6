use crate::membership::MembershipFunction;

/// A named fuzzy set over a variable's domain.
#[derive(Clone, Debug, PartialEq)]
pub struct Term {
    name: String,
    mf: MembershipFunction,
}

impl Term {
    pub(crate) fn new(name: String, mf: MembershipFunction) -> Self {
        Self { name, mf }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mf(&self) -> &MembershipFunction {
        &self.mf
    }

    /// Calibration hook: replaces membership parameters in place.
    pub fn mf_mut(&mut self) -> &mut MembershipFunction {
        &mut self.mf
    }
}

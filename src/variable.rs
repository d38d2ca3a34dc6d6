use std::ops::RangeInclusive;

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::error::{Error, Result};
use crate::inputs::Inputs;
use crate::lexeme::validate_name;
use crate::membership::MembershipFunction;
use crate::terms::Term;

new_key_type! {
    /// An input variable key
    pub struct InputKey;
    /// An output variable key
    pub struct OutputKey;
}

/// A linguistic variable: a bounded numeric domain described by terms.
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzyVariable {
    name: String,
    min: f64,
    max: f64,
    terms: Vec<Term>,
}

impl FuzzyVariable {
    pub fn new(name: impl Into<String>, universe_range: RangeInclusive<f64>) -> Result<Self> {
        let name = validate_name(name.into())?;
        let min = *universe_range.start();
        let max = *universe_range.end();

        if !(min < max) {
            return Err(Error::InvalidDomain { min, max });
        }

        Ok(Self {
            name,
            min,
            max,
            terms: Vec::new(),
        })
    }

    pub fn with_term(mut self, name: impl Into<String>, mf: MembershipFunction) -> Result<Self> {
        self.add_term(name, mf)?;
        Ok(self)
    }

    /// Appends a term, returning its index within this variable.
    pub fn add_term(&mut self, name: impl Into<String>, mf: MembershipFunction) -> Result<usize> {
        let name = validate_name(name.into())?;

        if self.term_index(&name).is_some() {
            return Err(Error::DuplicateTerm {
                variable: self.name.clone(),
                term: name,
            });
        }

        self.terms.push(Term::new(name, mf));

        Ok(self.terms.len() - 1)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn term(&self, index: usize) -> Option<&Term> {
        self.terms.get(index)
    }

    pub fn term_mut(&mut self, index: usize) -> Option<&mut Term> {
        self.terms.get_mut(index)
    }

    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|term| term.name() == name)
    }

    pub fn term_by_name(&self, name: &str) -> Option<&Term> {
        self.term_index(name).map(|index| &self.terms[index])
    }
}

/// A Sugeno output value: `constant + sum(coefficient_i * x_i)`.
#[derive(Clone, Debug)]
pub struct SugenoFunction {
    name: String,
    coefficients: SecondaryMap<InputKey, f64>,
    constant: f64,
}

impl SugenoFunction {
    pub fn linear(
        name: impl Into<String>,
        coefficients: impl IntoIterator<Item = (InputKey, f64)>,
        constant: f64,
    ) -> Result<Self> {
        Ok(Self {
            name: validate_name(name.into())?,
            coefficients: coefficients.into_iter().collect(),
            constant,
        })
    }

    /// Zero-order function with no input dependence.
    pub fn constant(name: impl Into<String>, constant: f64) -> Result<Self> {
        Self::linear(name, std::iter::empty(), constant)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coefficient(&self, var: InputKey) -> f64 {
        self.coefficients.get(var).copied().unwrap_or(0.)
    }

    pub fn evaluate(&self, inputs: &Inputs) -> f64 {
        self.coefficients
            .iter()
            .fold(self.constant, |acc, (var, coefficient)| {
                acc + coefficient * inputs.get(var).unwrap_or(0.)
            })
    }
}

/// Output variable of a Sugeno system; its values are functions of the inputs.
#[derive(Clone, Debug)]
pub struct SugenoVariable {
    name: String,
    functions: Vec<SugenoFunction>,
}

impl SugenoVariable {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: validate_name(name.into())?,
            functions: Vec::new(),
        })
    }

    pub fn with_function(mut self, function: SugenoFunction) -> Result<Self> {
        self.add_function(function)?;
        Ok(self)
    }

    pub fn add_function(&mut self, function: SugenoFunction) -> Result<usize> {
        if self.function_index(function.name()).is_some() {
            return Err(Error::DuplicateTerm {
                variable: self.name.clone(),
                term: function.name,
            });
        }

        self.functions.push(function);

        Ok(self.functions.len() - 1)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn functions(&self) -> &[SugenoFunction] {
        &self.functions
    }

    pub fn function_index(&self, name: &str) -> Option<usize> {
        self.functions.iter().position(|function| function.name() == name)
    }

    pub fn function_by_name(&self, name: &str) -> Option<&SugenoFunction> {
        self.function_index(name).map(|index| &self.functions[index])
    }
}

/// The output side of a fuzzy system: something whose values a rule
/// conclusion can name.
pub trait OutputVariable {
    fn name(&self) -> &str;

    /// Names of the values (terms or functions), in index order.
    fn value_names(&self) -> impl Iterator<Item = &str>;

    fn value_count(&self) -> usize {
        self.value_names().count()
    }

    /// Checks references into the input variables of the owning system.
    fn validate(&self, _inputs: &SlotMap<InputKey, FuzzyVariable>) -> Result<()> {
        Ok(())
    }
}

impl OutputVariable for FuzzyVariable {
    fn name(&self) -> &str {
        &self.name
    }

    fn value_names(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(Term::name)
    }

    fn value_count(&self) -> usize {
        self.terms.len()
    }
}

impl OutputVariable for SugenoVariable {
    fn name(&self) -> &str {
        &self.name
    }

    fn value_names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(SugenoFunction::name)
    }

    fn value_count(&self) -> usize {
        self.functions.len()
    }

    fn validate(&self, inputs: &SlotMap<InputKey, FuzzyVariable>) -> Result<()> {
        let dangling = self
            .functions
            .iter()
            .flat_map(|function| function.coefficients.keys())
            .any(|var| !inputs.contains_key(var));

        if dangling {
            return Err(Error::UnknownVariable);
        }

        Ok(())
    }
}

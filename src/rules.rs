use crate::error::{Error, Result};
use crate::hedge::Hedge;
use crate::variable::{InputKey, OutputKey};

/// Connective of a condition group.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OperatorType {
    And,
    Or,
}

/// `variable is [not] term`. Conclusions use this shape directly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SingleCondition<K> {
    pub variable: K,
    /// Index of the term (or Sugeno function) within `variable`
    pub term: usize,
    pub negated: bool,
}

impl<K> SingleCondition<K> {
    pub fn new(variable: K, term: usize) -> Self {
        Self {
            variable,
            term,
            negated: false,
        }
    }
}

/// A premise leaf: a single condition over an input with an optional hedge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuzzyCondition {
    pub condition: SingleCondition<InputKey>,
    pub hedge: Option<Hedge>,
}

impl FuzzyCondition {
    pub fn new(variable: InputKey, term: usize) -> Self {
        Self {
            condition: SingleCondition::new(variable, term),
            hedge: None,
        }
    }
}

/// Internal node: children combined with one operator.
#[derive(Clone, Debug, PartialEq)]
pub struct Conditions {
    pub conditions: Vec<Condition>,
    pub op: OperatorType,
    pub negated: bool,
}

impl Conditions {
    pub fn new(op: OperatorType, conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            op,
            negated: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Leaf(FuzzyCondition),
    Group(Conditions),
}

impl Condition {
    /// Every leaf, left to right.
    pub fn propositions(&self) -> Vec<&FuzzyCondition> {
        let mut props = Vec::new();

        fn collect<'p>(condition: &'p Condition, out: &mut Vec<&'p FuzzyCondition>) {
            match condition {
                Condition::Leaf(leaf) => out.push(leaf),
                Condition::Group(group) => {
                    for condition in &group.conditions {
                        collect(condition, out);
                    }
                },
            }
        }

        collect(self, &mut props);

        props
    }

    /// Depth of the tree; a lone leaf has depth one.
    pub fn depth(&self) -> usize {
        match self {
            Condition::Leaf(_) => 1,
            Condition::Group(group) => 1 + group.conditions.iter().map(Condition::depth).max().unwrap_or(0),
        }
    }

    pub(crate) fn check_non_empty(&self) -> Result<()> {
        match self {
            Condition::Leaf(_) => Ok(()),
            Condition::Group(group) if group.conditions.is_empty() => Err(Error::EmptyConditions),
            Condition::Group(group) => group.conditions.iter().try_for_each(Condition::check_non_empty),
        }
    }
}

impl From<FuzzyCondition> for Condition {
    fn from(leaf: FuzzyCondition) -> Self {
        Condition::Leaf(leaf)
    }
}

impl From<Conditions> for Condition {
    fn from(group: Conditions) -> Self {
        Condition::Group(group)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub(crate) condition: Condition,
    pub(crate) conclusion: SingleCondition<OutputKey>,
    pub(crate) weight: f64,
}

impl Rule {
    pub fn new(condition: impl Into<Condition>, conclusion: SingleCondition<OutputKey>) -> Self {
        Self {
            condition: condition.into(),
            conclusion,
            weight: 1.,
        }
    }

    /// Scales the rule's firing strength. Must lie in `[0, 1]`.
    pub fn with_weight(mut self, weight: f64) -> Result<Self> {
        if !(0. ..=1.).contains(&weight) {
            return Err(Error::invalid_parameter(format!("rule weight {weight} is outside [0, 1]")));
        }

        self.weight = weight;

        Ok(self)
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn conclusion(&self) -> &SingleCondition<OutputKey> {
        &self.conclusion
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

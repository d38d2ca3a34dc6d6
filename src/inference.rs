use slotmap::{SecondaryMap, SlotMap};
use tracing::trace;

use crate::error::{Error, Result};
use crate::inputs::Inputs;
use crate::ops::{AndOp, OrOp};
use crate::parser::RuleParser;
use crate::rules::{Condition, OperatorType, Rule};
use crate::variable::{FuzzyVariable, InputKey, OutputKey, OutputVariable};

/// Membership of every term of every input variable for one set of inputs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FuzzifiedInputs(SecondaryMap<InputKey, Vec<f64>>);

impl FuzzifiedInputs {
    /// Per-term memberships of `var`, in term order.
    pub fn terms(&self, var: InputKey) -> Option<&[f64]> {
        self.0.get(var).map(Vec::as_slice)
    }

    pub fn membership(&self, var: InputKey, term: usize) -> Option<f64> {
        self.terms(var).and_then(|terms| terms.get(term)).copied()
    }
}

/// Variables, rules, and the AND/OR methods shared by the Mamdani and
/// Sugeno systems. `O` is the output variable type.
#[derive(Clone, Debug)]
pub struct FuzzySystem<O> {
    inputs: SlotMap<InputKey, FuzzyVariable>,
    outputs: SlotMap<OutputKey, O>,
    rules: Vec<Rule>,
    and_op: AndOp,
    or_op: OrOp,
}

impl<O: OutputVariable> FuzzySystem<O> {
    pub fn new(and_op: AndOp, or_op: OrOp) -> Self {
        Self {
            inputs: SlotMap::with_key(),
            outputs: SlotMap::with_key(),
            rules: Vec::new(),
            and_op,
            or_op,
        }
    }

    pub fn add_input(&mut self, var: FuzzyVariable) -> Result<InputKey> {
        self.check_unique(var.name())?;

        Ok(self.inputs.insert(var))
    }

    pub fn add_output(&mut self, var: O) -> Result<OutputKey> {
        self.check_unique(var.name())?;
        var.validate(&self.inputs)?;

        Ok(self.outputs.insert(var))
    }

    fn check_unique(&self, name: &str) -> Result<()> {
        if self.input_by_name(name).is_some() || self.output_by_name(name).is_some() {
            return Err(Error::NameConflict { name: name.to_owned() });
        }

        Ok(())
    }

    pub fn input(&self, key: InputKey) -> Option<&FuzzyVariable> {
        self.inputs.get(key)
    }

    /// Terms may be recalibrated in place; rules keep referring to them by index.
    pub fn input_mut(&mut self, key: InputKey) -> Option<&mut FuzzyVariable> {
        self.inputs.get_mut(key)
    }

    pub fn output(&self, key: OutputKey) -> Option<&O> {
        self.outputs.get(key)
    }

    pub fn output_mut(&mut self, key: OutputKey) -> Option<&mut O> {
        self.outputs.get_mut(key)
    }

    pub fn inputs(&self) -> impl Iterator<Item = (InputKey, &FuzzyVariable)> {
        self.inputs.iter()
    }

    pub fn outputs(&self) -> impl Iterator<Item = (OutputKey, &O)> {
        self.outputs.iter()
    }

    pub fn input_by_name(&self, name: &str) -> Option<InputKey> {
        self.inputs.iter().find(|(_, var)| var.name() == name).map(|(key, _)| key)
    }

    pub fn output_by_name(&self, name: &str) -> Option<OutputKey> {
        self.outputs
            .iter()
            .find(|(_, var)| OutputVariable::name(*var) == name)
            .map(|(key, _)| key)
    }

    pub fn and_op(&self) -> AndOp {
        self.and_op
    }

    pub fn or_op(&self) -> OrOp {
        self.or_op
    }

    pub fn set_and_op(&mut self, and_op: AndOp) {
        self.and_op = and_op;
    }

    pub fn set_or_op(&mut self, or_op: OrOp) {
        self.or_op = or_op;
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn clear_rules(&mut self) {
        self.rules.clear();
    }

    /// Parses a rule against the current variables without adding it.
    pub fn parse_rule(&self, text: &str) -> Result<Rule> {
        RuleParser::new(&self.inputs, &self.outputs)?.parse(text)
    }

    /// Parses a rule and appends it. Nothing is added on error.
    pub fn add_rule_text(&mut self, text: &str) -> Result<&Rule> {
        let rule = self.parse_rule(text)?;

        self.rules.push(rule);

        Ok(&self.rules[self.rules.len() - 1])
    }

    /// Appends a rule after checking it only refers to this system's variables.
    pub fn add_rule(&mut self, rule: Rule) -> Result<()> {
        rule.condition.check_non_empty()?;

        for leaf in rule.condition.propositions() {
            let var = self
                .inputs
                .get(leaf.condition.variable)
                .ok_or(Error::UnknownVariable)?;

            if var.term(leaf.condition.term).is_none() {
                return Err(Error::UnknownTerm {
                    variable: var.name().to_owned(),
                    index: leaf.condition.term,
                });
            }
        }

        let conclusion = &rule.conclusion;
        let out = self.outputs.get(conclusion.variable).ok_or(Error::UnknownVariable)?;

        if conclusion.term >= out.value_count() {
            return Err(Error::UnknownTerm {
                variable: out.name().to_owned(),
                index: conclusion.term,
            });
        }

        self.rules.push(rule);

        Ok(())
    }

    /// Checks that every declared input has exactly one value inside its domain.
    pub fn validate_inputs(&self, inputs: &Inputs) -> Result<()> {
        if inputs.len() != self.inputs.len() {
            return Err(Error::InputCount {
                expected: self.inputs.len(),
                actual: inputs.len(),
            });
        }

        for (key, var) in &self.inputs {
            let value = inputs.get(key).ok_or_else(|| Error::MissingInput {
                variable: var.name().to_owned(),
            })?;

            if !var.contains(value) {
                return Err(Error::OutOfRange {
                    variable: var.name().to_owned(),
                    value,
                    min: var.min(),
                    max: var.max(),
                });
            }
        }

        Ok(())
    }

    pub fn fuzzify(&self, inputs: &Inputs) -> Result<FuzzifiedInputs> {
        self.validate_inputs(inputs)?;

        let mut fuzzified = SecondaryMap::with_capacity(self.inputs.len());

        for (key, var) in &self.inputs {
            // Presence checked by validate_inputs
            let value = inputs.get(key).unwrap_or_default();

            fuzzified.insert(key, var.terms().iter().map(|term| term.mf().evaluate(value)).collect());
        }

        Ok(FuzzifiedInputs(fuzzified))
    }

    /// Degree in `[0, 1]` to which `condition` holds.
    pub fn evaluate_condition(&self, condition: &Condition, fi: &FuzzifiedInputs) -> f64 {
        match condition {
            Condition::Leaf(leaf) => {
                let value = fi
                    .membership(leaf.condition.variable, leaf.condition.term)
                    .unwrap_or_default();
                let value = leaf.hedge.map_or(value, |hedge| hedge.apply(value));

                if leaf.condition.negated {
                    1. - value
                } else {
                    value
                }
            },
            Condition::Group(group) => {
                let values = group.conditions.iter().map(|c| self.evaluate_condition(c, fi));
                let result = match group.op {
                    OperatorType::And => values.reduce(|u, v| self.and_op.call(u, v)),
                    OperatorType::Or => values.reduce(|u, v| self.or_op.call(u, v)),
                }
                .unwrap_or_default();

                if group.negated {
                    1. - result
                } else {
                    result
                }
            },
        }
    }

    /// Firing strength of every rule, in rule order.
    pub fn evaluate_all_rules(&self, fi: &FuzzifiedInputs) -> Vec<f64> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                let strength = self.evaluate_condition(&rule.condition, fi) * rule.weight;

                trace!(rule = i, strength, "evaluated rule");

                strength
            })
            .collect()
    }

    pub(crate) fn check_rules(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(Error::NoRules);
        }

        Ok(())
    }
}

use std::ops::{Deref, DerefMut};

use slotmap::SecondaryMap;
use tracing::{debug, trace};

use crate::error::Result;
use crate::inference::FuzzySystem;
use crate::inputs::Inputs;
use crate::ops::{AndOp, OrOp};
use crate::outputs::Outputs;
use crate::variable::{OutputKey, SugenoVariable};

/// Sugeno inference: each rule concludes on a function of the inputs and
/// the outputs are firing-strength weighted averages of those functions.
#[derive(Clone, Debug)]
pub struct SugenoFuzzySystem {
    system: FuzzySystem<SugenoVariable>,
}

impl Default for SugenoFuzzySystem {
    fn default() -> Self {
        Self::new(AndOp::Prod, OrOp::Max)
    }
}

impl SugenoFuzzySystem {
    pub fn new(and_op: AndOp, or_op: OrOp) -> Self {
        Self {
            system: FuzzySystem::new(and_op, or_op),
        }
    }

    pub fn calculate(&self, inputs: &Inputs) -> Result<Outputs> {
        self.system.check_rules()?;

        debug!(rules = self.system.rules().len(), "sugeno calculate");

        let fi = self.system.fuzzify(inputs)?;
        let strengths = self.system.evaluate_all_rules(&fi);
        let function_values = self.evaluate_functions(inputs);

        Ok(self.combine(&strengths, &function_values))
    }

    /// Value of every function of every output, in function order.
    pub fn evaluate_functions(&self, inputs: &Inputs) -> SecondaryMap<OutputKey, Vec<f64>> {
        self.system
            .outputs()
            .map(|(key, var)| (key, var.functions().iter().map(|f| f.evaluate(inputs)).collect()))
            .collect()
    }

    pub fn combine(&self, strengths: &[f64], function_values: &SecondaryMap<OutputKey, Vec<f64>>) -> Outputs {
        let mut sums: SecondaryMap<OutputKey, (f64, f64)> =
            self.system.outputs().map(|(key, _)| (key, (0., 0.))).collect();

        for (rule, strength) in self.system.rules().iter().zip(strengths) {
            let conclusion = rule.conclusion();
            let z = function_values
                .get(conclusion.variable)
                .and_then(|values| values.get(conclusion.term))
                .copied()
                .unwrap_or_default();

            if let Some((numerator, denominator)) = sums.get_mut(conclusion.variable) {
                *numerator += z * strength;
                *denominator += strength;
            }
        }

        let values = sums
            .into_iter()
            .map(|(key, (numerator, denominator))| {
                let value = if denominator == 0. {
                    debug!("no rule fired for output, combined to zero");
                    0.
                } else {
                    numerator / denominator
                };

                trace!(value, "combined");

                (key, value)
            })
            .collect();

        Outputs::new(values)
    }
}

impl Deref for SugenoFuzzySystem {
    type Target = FuzzySystem<SugenoVariable>;

    fn deref(&self) -> &Self::Target {
        &self.system
    }
}

impl DerefMut for SugenoFuzzySystem {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.system
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::Error;
    use crate::membership::MembershipFunction;
    use crate::variable::{FuzzyVariable, InputKey, SugenoFunction};

    fn triangles(name: &str) -> FuzzyVariable {
        FuzzyVariable::new(name, 0. ..=1.)
            .unwrap()
            .with_term("mf1", MembershipFunction::triangular(0., 0., 0.5).unwrap())
            .unwrap()
            .with_term("mf2", MembershipFunction::triangular(0., 0.5, 1.).unwrap())
            .unwrap()
            .with_term("mf3", MembershipFunction::triangular(0.5, 1., 1.).unwrap())
            .unwrap()
    }

    fn demo() -> (SugenoFuzzySystem, InputKey, InputKey, OutputKey) {
        let mut system = SugenoFuzzySystem::default();
        let input1 = system.add_input(triangles("input1")).unwrap();
        let input2 = system.add_input(triangles("input2")).unwrap();
        let output = SugenoVariable::new("output")
            .unwrap()
            .with_function(SugenoFunction::linear("mf1", [(input1, 0.1), (input2, 0.3)], 0.5).unwrap())
            .unwrap()
            .with_function(SugenoFunction::linear("mf2", [(input1, 0.4), (input2, 0.2)], 0.7).unwrap())
            .unwrap();
        let output = system.add_output(output).unwrap();

        system
            .add_rule_text("if (input1 is mf1) and (input2 is mf1) then (output is mf1)")
            .unwrap();
        system
            .add_rule_text("if (input1 is mf2) and (input2 is mf2) then (output is mf2)")
            .unwrap();

        (system, input1, input2, output)
    }

    #[test]
    fn test_combine_equal_strengths() {
        let (system, _, _, output) = demo();
        let mut function_values = SecondaryMap::new();

        function_values.insert(output, vec![0.1, 0.9]);

        let combined = system.combine(&[0.5, 0.5], &function_values);

        assert_relative_eq!(combined.get(output).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_combine_zero_strength() {
        let (system, _, _, output) = demo();
        let mut function_values = SecondaryMap::new();

        function_values.insert(output, vec![0.1, 0.9]);

        assert_eq!(system.combine(&[0., 0.], &function_values).get(output), Some(0.));
    }

    #[test]
    fn test_evaluate_functions() {
        let (system, input1, input2, output) = demo();
        let inputs: Inputs = [(input1, 0.45), (input2, 0.45)].into_iter().collect();
        let values = system.evaluate_functions(&inputs);

        assert_relative_eq!(values[output][0], 0.5 + 0.4 * 0.45, epsilon = 1e-12);
        assert_relative_eq!(values[output][1], 0.7 + 0.6 * 0.45, epsilon = 1e-12);
    }

    #[test]
    fn test_calculate() {
        let (system, input1, input2, output) = demo();
        let inputs: Inputs = [(input1, 0.45), (input2, 0.45)].into_iter().collect();
        let result = system.calculate(&inputs).unwrap().get(output).unwrap();

        // Product AND: rule strengths 0.1 * 0.1 and 0.9 * 0.9
        let (w1, w2) = (0.01, 0.81);
        let (z1, z2) = (0.5 + 0.4 * 0.45, 0.7 + 0.6 * 0.45);

        assert_relative_eq!(result, (w1 * z1 + w2 * z2) / (w1 + w2), epsilon = 1e-9);
    }

    #[test]
    fn test_output_referencing_foreign_input() {
        let (mut system, ..) = demo();
        let mut other = SugenoFuzzySystem::default();

        other.add_input(triangles("a")).unwrap();
        other.add_input(triangles("b")).unwrap();

        let foreign = other.add_input(triangles("c")).unwrap();
        let output = SugenoVariable::new("output2")
            .unwrap()
            .with_function(SugenoFunction::linear("f", [(foreign, 1.)], 0.).unwrap())
            .unwrap();

        assert_eq!(system.add_output(output).unwrap_err(), Error::UnknownVariable);
    }

    #[test]
    fn test_zero_order_function() {
        let mut system = SugenoFuzzySystem::default();
        let input = system.add_input(triangles("x")).unwrap();
        let output = system
            .add_output(
                SugenoVariable::new("y")
                    .unwrap()
                    .with_function(SugenoFunction::constant("low", 2.).unwrap())
                    .unwrap()
                    .with_function(SugenoFunction::constant("high", 8.).unwrap())
                    .unwrap(),
            )
            .unwrap();

        system.add_rule_text("if x is mf1 then y is low").unwrap();
        system.add_rule_text("if x is mf3 then y is high").unwrap();

        let mut inputs = Inputs::new();

        inputs.add(input, 0.5);

        // Neither term fires at 0.5
        assert_eq!(system.calculate(&inputs).unwrap().get(output), Some(0.));

        inputs.add(input, 0.75);

        assert_relative_eq!(system.calculate(&inputs).unwrap().get(output).unwrap(), 8., epsilon = 1e-12);
    }
}

use std::ops::{Deref, DerefMut};

use slotmap::SecondaryMap;
use tracing::{debug, trace};

use crate::error::Result;
use crate::inference::FuzzySystem;
use crate::inputs::Inputs;
use crate::linspace::Linspace;
use crate::membership::MembershipFunction;
use crate::ops::{AggregationOp, AndOp, DefuzzificationOp, ImplicationOp, OrOp};
use crate::outputs::Outputs;
use crate::variable::{FuzzyVariable, OutputKey};

/// Number of equally spaced samples, endpoints included, taken over an
/// output domain during defuzzification.
pub const DEFUZZIFICATION_SAMPLES: usize = 101;

/// Mamdani inference: implication, aggregation, then defuzzification.
#[derive(Clone, Debug)]
pub struct MamdaniFuzzySystem {
    system: FuzzySystem<FuzzyVariable>,
    imp_op: ImplicationOp,
    agg_op: AggregationOp,
    defuzz_op: DefuzzificationOp,
}

impl Default for MamdaniFuzzySystem {
    fn default() -> Self {
        Self::new(
            AndOp::Min,
            OrOp::Max,
            ImplicationOp::Min,
            AggregationOp::Max,
            DefuzzificationOp::Cog,
        )
    }
}

impl MamdaniFuzzySystem {
    pub fn new(
        and_op: AndOp,
        or_op: OrOp,
        imp_op: ImplicationOp,
        agg_op: AggregationOp,
        defuzz_op: DefuzzificationOp,
    ) -> Self {
        Self {
            system: FuzzySystem::new(and_op, or_op),
            imp_op,
            agg_op,
            defuzz_op,
        }
    }

    pub fn implication_op(&self) -> ImplicationOp {
        self.imp_op
    }

    pub fn aggregation_op(&self) -> AggregationOp {
        self.agg_op
    }

    pub fn defuzzification_op(&self) -> DefuzzificationOp {
        self.defuzz_op
    }

    pub fn calculate(&self, inputs: &Inputs) -> Result<Outputs> {
        self.system.check_rules()?;

        debug!(rules = self.system.rules().len(), "mamdani calculate");

        let fi = self.system.fuzzify(inputs)?;
        let strengths = self.system.evaluate_all_rules(&fi);
        let implied = self.implicate(&strengths);
        let aggregated = self.aggregate(implied);

        Ok(self.defuzzify(&aggregated))
    }

    /// Output fuzzy set of each rule, in rule order.
    pub fn implicate(&self, strengths: &[f64]) -> Vec<MembershipFunction> {
        self.system
            .rules()
            .iter()
            .zip(strengths)
            .map(|(rule, strength)| {
                let conclusion = rule.conclusion();
                let term = self
                    .system
                    .output(conclusion.variable)
                    .and_then(|var| var.term(conclusion.term))
                    .map(|term| term.mf().clone())
                    .unwrap_or(MembershipFunction::Constant(0.));

                MembershipFunction::composite(self.imp_op.link(), [
                    MembershipFunction::Constant(strength.clamp(0., 1.)),
                    term,
                ])
            })
            .collect()
    }

    /// One combined set per output variable from the implied sets of the
    /// rules concluding on it. An output no rule concludes on gets an
    /// empty composite, which is zero everywhere.
    pub fn aggregate(&self, implied: Vec<MembershipFunction>) -> SecondaryMap<OutputKey, MembershipFunction> {
        let mut collected: SecondaryMap<OutputKey, Vec<MembershipFunction>> = self
            .system
            .outputs()
            .map(|(key, _)| (key, Vec::new()))
            .collect();

        for (rule, mf) in self.system.rules().iter().zip(implied) {
            if let Some(mfs) = collected.get_mut(rule.conclusion().variable) {
                mfs.push(mf);
            }
        }

        collected
            .into_iter()
            .map(|(key, mfs)| (key, MembershipFunction::composite(self.agg_op.link(), mfs)))
            .collect()
    }

    pub fn defuzzify(&self, aggregated: &SecondaryMap<OutputKey, MembershipFunction>) -> Outputs {
        let values = aggregated
            .iter()
            .filter_map(|(key, mf)| {
                let var = self.system.output(key)?;
                let value = defuzzify(self.defuzz_op, mf, var.min(), var.max());

                trace!(output = var.name(), value, "defuzzified");

                Some((key, value))
            })
            .collect();

        Outputs::new(values)
    }
}

/// Samples `mf` over `[min, max]` and reduces it with `op`. A set that is
/// zero on every sample yields `0.0`.
pub fn defuzzify(op: DefuzzificationOp, mf: &MembershipFunction, min: f64, max: f64) -> f64 {
    let universe: Vec<f64> = Linspace::new(min, max, DEFUZZIFICATION_SAMPLES).collect();
    let membership: Vec<f64> = universe.iter().map(|x| mf.evaluate(*x)).collect();

    if membership.iter().all(|m| *m == 0.) {
        debug!(min, max, "empty output set, defuzzified to zero");
    }

    op.call(&universe, &membership)
}

impl Deref for MamdaniFuzzySystem {
    type Target = FuzzySystem<FuzzyVariable>;

    fn deref(&self) -> &Self::Target {
        &self.system
    }
}

impl DerefMut for MamdaniFuzzySystem {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.system
    }
}

use std::fmt;
use std::str::FromStr;

use num::Float;

use crate::error::Error;

macro_rules! method_names {
    (@first $first:literal $(, $rest:literal)*) => { $first };
    ($ty:ident, $kind:literal, { $($variant:ident => [$($name:literal),+]),+ $(,)? }) => {
        impl $ty {
            /// Canonical lowercase name of this method.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => method_names!(@first $($name),+),)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($($name)|+ => Ok(Self::$variant),)+
                    _ => Err(Error::UnsupportedMethod {
                        kind: $kind,
                        name: s.to_owned(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

/// T-norm folding the children of an `and` group.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AndOp {
    #[default]
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
}

impl AndOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => ProductionLink::Min.call(u, v),
            Self::Prod => ProductionLink::Prod.call(u, v),
            Self::BoundedProd => ProductionLink::BoundedProd.call(u, v),
            Self::DrasticProd => ProductionLink::DrasticProd.call(u, v),
        }
    }
}

method_names!(AndOp, "and", {
    Min => ["min"],
    Prod => ["prod", "product"],
    BoundedProd => ["boundedprod", "bounded_prod"],
    DrasticProd => ["drasticprod", "drastic_prod"],
});

/// T-conorm folding the children of an `or` group.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl OrOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => ProductionLink::Max.call(u, v),
            Self::ProbOr => ProductionLink::ProbOr.call(u, v),
            Self::BoundedSum => ProductionLink::BoundedSum.call(u, v),
            Self::DrasticSum => ProductionLink::DrasticSum.call(u, v),
        }
    }
}

method_names!(OrOp, "or", {
    Max => ["max"],
    ProbOr => ["probor", "prob_or", "prob"],
    BoundedSum => ["boundedsum", "bounded_sum"],
    DrasticSum => ["drasticsum", "drastic_sum"],
});

/// Implication operator method for deriving a rule's output set from its
/// firing strength and the concluded term.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ImplicationOp {
    /// Truncates the concluded term at the firing strength
    #[default]
    Min,
    /// Scales the concluded term by the firing strength
    Prod,
}

impl ImplicationOp {
    pub fn link(self) -> ProductionLink {
        match self {
            Self::Min => ProductionLink::Min,
            Self::Prod => ProductionLink::Prod,
        }
    }
}

method_names!(ImplicationOp, "implication", {
    Min => ["min"],
    Prod => ["prod", "product"],
});

/// Method for aggregating the implied sets of all rules concluding on
/// one output variable.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AggregationOp {
    #[default]
    Max,
    /// Probabilistic sum folded pairwise: `acc + x - acc * x`
    Sum,
}

impl AggregationOp {
    pub fn link(self) -> ProductionLink {
        match self {
            Self::Max => ProductionLink::Max,
            Self::Sum => ProductionLink::ProbOr,
        }
    }
}

method_names!(AggregationOp, "aggregation", {
    Max => ["max"],
    Sum => ["sum", "probor"],
});

/// Pairwise link used to fold membership values, both in composite
/// membership functions and behind the operator selectors above.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ProductionLink {
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl ProductionLink {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
            Self::DrasticSum => {
                if v == F::zero() {
                    u
                } else if u == F::zero() {
                    v
                } else {
                    F::one()
                }
            },
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
            Self::DrasticProd => {
                if v == F::one() {
                    u
                } else if u == F::one() {
                    v
                } else {
                    F::zero()
                }
            },
        }
    }

    /// Folds `values` left to right. An empty sequence folds to zero.
    pub fn fold<F: Float>(self, values: impl IntoIterator<Item = F>) -> F {
        values.into_iter().reduce(|acc, x| self.call(acc, x)).unwrap_or_else(F::zero)
    }
}

method_names!(ProductionLink, "composition", {
    Min => ["min"],
    Prod => ["prod", "product"],
    BoundedProd => ["boundedprod", "bounded_prod"],
    DrasticProd => ["drasticprod", "drastic_prod"],
    Max => ["max"],
    ProbOr => ["probor", "prob_or", "sum"],
    BoundedSum => ["boundedsum", "bounded_sum"],
    DrasticSum => ["drasticsum", "drastic_sum"],
});

/// Reduction of an aggregated output set to one crisp value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DefuzzificationOp {
    /// Centroid
    #[default]
    Cog,
    /// Point splitting the area in half
    Boa,
    /// Mean of the maximizing samples
    Mom,
    /// Largest maximizing sample
    Lom,
    /// Smallest maximizing sample
    Som,
}

impl DefuzzificationOp {
    /// Reduces a sampled membership function to a crisp value. `universe`
    /// and `membership` are parallel sample arrays. A function that is zero
    /// on every sample yields zero.
    pub fn call<F: Float>(self, universe: &[F], membership: &[F]) -> F {
        debug_assert_eq!(universe.len(), membership.len());

        let samples = || universe.iter().copied().zip(membership.iter().copied());
        let total = membership.iter().fold(F::zero(), |acc, m| acc + *m);

        if total == F::zero() {
            return F::zero();
        }

        match self {
            Self::Cog => samples().fold(F::zero(), |acc, (u, m)| acc + u * m) / total,
            Self::Boa => {
                let half = total / (F::one() + F::one());
                let mut cum_area = F::zero();

                for (u, m) in samples() {
                    cum_area = cum_area + m;
                    if cum_area >= half {
                        return u;
                    }
                }

                universe.last().copied().unwrap_or_else(F::zero)
            },
            Self::Mom | Self::Lom | Self::Som => {
                let maximum = membership.iter().copied().fold(F::zero(), F::max);
                let at_max = samples().filter_map(|(u, m)| if m == maximum { Some(u) } else { None });

                match self {
                    Self::Lom => at_max.fold(F::neg_infinity(), F::max),
                    Self::Som => at_max.fold(F::infinity(), F::min),
                    _ => {
                        let (len, sum) = at_max.fold((F::zero(), F::zero()), |(len, sum), u| (len + F::one(), sum + u));
                        sum / len
                    },
                }
            },
        }
    }
}

method_names!(DefuzzificationOp, "defuzzification", {
    Cog => ["cog", "centroid"],
    Boa => ["boa", "bisector"],
    Mom => ["mom"],
    Lom => ["lom"],
    Som => ["som"],
});

use crate::error::{Error, Result};
use crate::math::interp;
use crate::ops::ProductionLink;

/// Maps a domain value to a degree of membership in `[0, 1]`.
///
/// The lowercase constructors validate their parameters. Building a variant
/// directly, or rewriting one through [`Term::mf_mut`](crate::Term::mf_mut),
/// skips that check; `evaluate` still clamps its result to `[0, 1]` and maps
/// NaN to zero.
#[derive(Clone, Debug, PartialEq)]
pub enum MembershipFunction {
    /// Rises from `x1` to a peak at `x2` and falls back to zero at `x3`
    Triangular { x1: f64, x2: f64, x3: f64 },
    /// Rises from `x1`, plateaus on `[x2, x3]` and falls to zero at `x4`
    Trapezoid { x1: f64, x2: f64, x3: f64, x4: f64 },
    /// Gaussian bell: `exp(-(x - b)^2 / (2 sigma^2))`
    Normal { b: f64, sigma: f64 },
    /// Same value everywhere
    Constant(f64),
    /// Pointwise fold of the children with one link
    Composite {
        link: ProductionLink,
        children: Vec<MembershipFunction>,
    },
    /// Piecewise linear through sorted `(x, membership)` points
    PointSet(Vec<(f64, f64)>),
}

impl MembershipFunction {
    pub fn triangular(x1: f64, x2: f64, x3: f64) -> Result<Self> {
        if !(x1 <= x2 && x2 <= x3) {
            return Err(Error::invalid_parameter(format!("{x1} <= {x2} <= {x3} is not true")));
        }

        Ok(Self::Triangular { x1, x2, x3 })
    }

    pub fn trapezoid(x1: f64, x2: f64, x3: f64, x4: f64) -> Result<Self> {
        if !(x1 <= x2 && x2 <= x3 && x3 <= x4) {
            return Err(Error::invalid_parameter(format!(
                "{x1} <= {x2} <= {x3} <= {x4} is not true"
            )));
        }

        Ok(Self::Trapezoid { x1, x2, x3, x4 })
    }

    pub fn normal(b: f64, sigma: f64) -> Result<Self> {
        if !(sigma > 0.) {
            return Err(Error::invalid_parameter(format!("sigma {sigma} must be positive")));
        }

        Ok(Self::Normal { b, sigma })
    }

    pub fn constant(value: f64) -> Result<Self> {
        if !(0. ..=1.).contains(&value) {
            return Err(Error::invalid_parameter(format!("0 <= {value} <= 1 is not true")));
        }

        Ok(Self::Constant(value))
    }

    pub fn composite(link: ProductionLink, children: impl IntoIterator<Item = MembershipFunction>) -> Self {
        Self::Composite {
            link,
            children: children.into_iter().collect(),
        }
    }

    /// Points are sorted by x. Every membership value must lie in `[0, 1]`.
    pub fn point_set(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Self> {
        let mut points: Vec<_> = points.into_iter().collect();

        if let Some((x, y)) = points
            .iter()
            .find(|(x, y)| x.is_nan() || !(0. ..=1.).contains(y))
        {
            return Err(Error::invalid_parameter(format!("invalid point ({x}, {y})")));
        }

        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(Self::PointSet(points))
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let value = self.raw_value(x);

        if value.is_nan() {
            0.
        } else {
            value.clamp(0., 1.)
        }
    }

    fn raw_value(&self, x: f64) -> f64 {
        match *self {
            Self::Triangular { x1, x2, x3 } => {
                if x == x2 {
                    1.
                } else if x1 < x && x < x2 {
                    (x - x1) / (x2 - x1)
                } else if x2 < x && x < x3 {
                    (x3 - x) / (x3 - x2)
                } else {
                    0.
                }
            },
            Self::Trapezoid { x1, x2, x3, x4 } => {
                if x2 <= x && x <= x3 {
                    1.
                } else if x1 < x && x < x2 {
                    (x - x1) / (x2 - x1)
                } else if x3 < x && x < x4 {
                    (x4 - x) / (x4 - x3)
                } else {
                    0.
                }
            },
            Self::Normal { b, .. } if x == b => 1.,
            Self::Normal { b, sigma } => (-(x - b).powi(2) / (2. * sigma.powi(2))).exp(),
            Self::Constant(value) => value,
            Self::Composite { link, ref children } => link.fold(children.iter().map(|mf| mf.evaluate(x))),
            Self::PointSet(ref points) => interp(x, points),
        }
    }

    /// Upper bound of the function over its whole domain.
    pub fn supremum(&self) -> f64 {
        match self {
            Self::Triangular { .. } | Self::Trapezoid { .. } | Self::Normal { .. } => 1.,
            Self::Constant(value) => *value,
            Self::Composite { link, children } => link.fold(children.iter().map(Self::supremum)),
            Self::PointSet(points) => points.iter().map(|(_, y)| *y).fold(0., f64::max),
        }
    }

    /// Gaussian approximation of a triangle, centered on its peak.
    pub fn to_normal(&self) -> Option<Self> {
        match *self {
            Self::Triangular { x1, x2, x3 } if x3 > x1 => Some(Self::Normal {
                b: x2,
                sigma: (x3 - x1) / 5.,
            }),
            _ => None,
        }
    }
}

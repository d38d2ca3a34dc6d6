/// Unary modifier reshaping a membership degree.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Hedge {
    /// `m^(1/3)`
    Slightly,
    /// `m^(1/2)`
    Somewhat,
    /// `m^2`
    Very,
    /// `m^3`
    Extremely,
}

impl Hedge {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "slightly" => Some(Self::Slightly),
            "somewhat" => Some(Self::Somewhat),
            "very" => Some(Self::Very),
            "extremely" => Some(Self::Extremely),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Slightly => "slightly",
            Self::Somewhat => "somewhat",
            Self::Very => "very",
            Self::Extremely => "extremely",
        }
    }

    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Slightly => value.cbrt(),
            Self::Somewhat => value.sqrt(),
            Self::Very => value * value,
            Self::Extremely => value * value * value,
        }
    }
}

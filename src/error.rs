use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Broad category of an [`Error`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Malformed rule text
    Grammar,
    /// A token or identifier that does not resolve against the declared variables
    NameResolution,
    /// Bad input values or invalid variable/membership parameters
    Domain,
    /// An unsupported method selector
    Configuration,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("expected keyword `{keyword}` at token {position}")]
    MissingKeyword { keyword: &'static str, position: usize },

    #[error("unbalanced brackets at token {position}")]
    UnbalancedBrackets { position: usize },

    #[error("brackets nested deeper than {limit} levels at token {position}")]
    NestingTooDeep { position: usize, limit: usize },

    #[error("`and` and `or` mixed at one nesting level at token {position}; group them with brackets")]
    InconsistentOperator { position: usize },

    #[error("invalid conclusion: {reason}")]
    InvalidConclusion { reason: String },

    #[error("incomplete condition at token {position}")]
    IncompleteCondition { position: usize },

    #[error("unexpected token `{token}` at position {position}")]
    UnexpectedToken { token: String, position: usize },

    #[error("unknown identifier `{token}`")]
    UnknownIdentifier { token: String },

    #[error("term `{term}` does not belong to variable `{variable}`")]
    UnresolvedTerm { term: String, variable: String },

    #[error("name `{name}` is already registered")]
    NameConflict { name: String },

    #[error("`{name}` is not a valid variable or term name")]
    InvalidName { name: String },

    #[error("variable `{variable}` already has a term named `{term}`")]
    DuplicateTerm { variable: String, term: String },

    #[error("rule references a variable that is not part of this system")]
    UnknownVariable,

    #[error("variable `{variable}` has no term at index {index}")]
    UnknownTerm { variable: String, index: usize },

    #[error("expected {expected} input values, got {actual}")]
    InputCount { expected: usize, actual: usize },

    #[error("no input value supplied for `{variable}`")]
    MissingInput { variable: String },

    #[error("value {value} for `{variable}` is outside [{min}, {max}]")]
    OutOfRange {
        variable: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid domain: {min} must be less than {max}")]
    InvalidDomain { min: f64, max: f64 },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("the system has no rules")]
    NoRules,

    #[error("condition group has no children")]
    EmptyConditions,

    #[error("unsupported {kind} method `{name}`")]
    UnsupportedMethod { kind: &'static str, name: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingKeyword { .. }
            | Self::UnbalancedBrackets { .. }
            | Self::NestingTooDeep { .. }
            | Self::InconsistentOperator { .. }
            | Self::InvalidConclusion { .. }
            | Self::IncompleteCondition { .. }
            | Self::UnexpectedToken { .. } => ErrorKind::Grammar,
            Self::UnknownIdentifier { .. }
            | Self::UnresolvedTerm { .. }
            | Self::NameConflict { .. }
            | Self::InvalidName { .. }
            | Self::DuplicateTerm { .. }
            | Self::UnknownVariable
            | Self::UnknownTerm { .. } => ErrorKind::NameResolution,
            Self::InputCount { .. }
            | Self::MissingInput { .. }
            | Self::OutOfRange { .. }
            | Self::InvalidDomain { .. }
            | Self::InvalidParameter { .. }
            | Self::NoRules
            | Self::EmptyConditions => ErrorKind::Domain,
            Self::UnsupportedMethod { .. } => ErrorKind::Configuration,
        }
    }

    pub(crate) fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter { reason: reason.into() }
    }
}

#[test]
fn test_error_kinds() {
    assert_eq!(Error::UnbalancedBrackets { position: 3 }.kind(), ErrorKind::Grammar);
    assert_eq!(
        Error::UnknownIdentifier { token: "foo".into() }.kind(),
        ErrorKind::NameResolution
    );
    assert_eq!(Error::NoRules.kind(), ErrorKind::Domain);
    assert_eq!(
        Error::UnsupportedMethod {
            kind: "and",
            name: "lukasiewicz".into()
        }
        .kind(),
        ErrorKind::Configuration
    );
}

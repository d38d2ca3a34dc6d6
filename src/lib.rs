//! Mamdani and Sugeno fuzzy inference systems driven by rules written in
//! a small natural language:
//!
//! ```text
//! if (service is poor) or (food is not very good) then tip is cheap
//! ```
//!
//! Variables and their terms are registered on a system first. Rules are
//! then parsed against those names, and evaluated against crisp inputs.
//!
//! ```
//! use fuzzy_inference::{FuzzyVariable, Inputs, MamdaniFuzzySystem, MembershipFunction};
//!
//! # fn main() -> fuzzy_inference::Result<()> {
//! let mut system = MamdaniFuzzySystem::default();
//! let service = system.add_input(
//!     FuzzyVariable::new("service", 0. ..=10.)?
//!         .with_term("poor", MembershipFunction::triangular(0., 0., 5.)?)?
//!         .with_term("good", MembershipFunction::triangular(5., 10., 10.)?)?,
//! )?;
//! let tip = system.add_output(
//!     FuzzyVariable::new("tip", 0. ..=30.)?
//!         .with_term("cheap", MembershipFunction::triangular(0., 5., 10.)?)?
//!         .with_term("generous", MembershipFunction::triangular(20., 25., 30.)?)?,
//! )?;
//!
//! system.add_rule_text("if service is poor then tip is cheap")?;
//! system.add_rule_text("if service is very good then tip is generous")?;
//!
//! let mut inputs = Inputs::new();
//! inputs.add(service, 2.);
//!
//! let outputs = system.calculate(&inputs)?;
//! assert!((outputs.get(tip).unwrap() - 5.).abs() < 0.01);
//! # Ok(())
//! # }
//! ```

mod error;
mod hedge;
mod inference;
mod inputs;
mod lexeme;
mod linspace;
mod mamdani;
mod math;
mod membership;
mod ops;
mod outputs;
mod parser;
mod rules;
mod sugeno;
mod terms;
mod tokens;
mod variable;

pub mod dsl;

pub use error::{Error, ErrorKind, Result};
pub use hedge::Hedge;
pub use inference::{FuzzifiedInputs, FuzzySystem};
pub use inputs::Inputs;
pub use lexeme::{Keyword, Lexeme, LexemeRegistry, TermOwner, TermRef, KEYWORDS};
pub use mamdani::{defuzzify, MamdaniFuzzySystem, DEFUZZIFICATION_SAMPLES};
pub use membership::MembershipFunction;
pub use ops::{AggregationOp, AndOp, DefuzzificationOp, ImplicationOp, OrOp, ProductionLink};
pub use outputs::Outputs;
pub use parser::{parse_rule, RuleParser, MAX_NESTING_DEPTH};
pub use rules::{Condition, Conditions, FuzzyCondition, OperatorType, Rule, SingleCondition};
pub use sugeno::SugenoFuzzySystem;
pub use terms::Term;
pub use tokens::{tokenize, Tokens};
pub use variable::{FuzzyVariable, InputKey, OutputKey, OutputVariable, SugenoFunction, SugenoVariable};

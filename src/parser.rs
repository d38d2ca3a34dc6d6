use slotmap::SlotMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::lexeme::{Keyword, Lexeme, LexemeRegistry, TermOwner};
use crate::rules::{Condition, Conditions, FuzzyCondition, OperatorType, Rule, SingleCondition};
use crate::tokens::tokenize;
use crate::variable::{FuzzyVariable, InputKey, OutputKey, OutputVariable};

/// Premise item after leaf extraction, stored alongside the index of the
/// token it starts at.
#[derive(Clone, Copy, Debug)]
enum Expression {
    Leaf(FuzzyCondition),
    Open,
    Close,
    Op(OperatorType),
}

/// Parses rule text against a fixed set of variables:
///
/// ```text
/// rule        := "if" condition "then" conclusion
/// condition   := leaf | "(" condition ")" | condition OP condition ...
/// leaf        := VAR "is" ["not"] [hedge] TERM
/// conclusion  := ["("] OUTVAR "is" TERM [")"]
/// ```
///
/// One bracket level uses a single `OP` throughout.
pub struct RuleParser<'s, O> {
    inputs: &'s SlotMap<InputKey, FuzzyVariable>,
    outputs: &'s SlotMap<OutputKey, O>,
    registry: LexemeRegistry,
}

impl<'s, O: OutputVariable> RuleParser<'s, O> {
    pub fn new(inputs: &'s SlotMap<InputKey, FuzzyVariable>, outputs: &'s SlotMap<OutputKey, O>) -> Result<Self> {
        Ok(Self {
            inputs,
            outputs,
            registry: LexemeRegistry::build(inputs, outputs)?,
        })
    }

    pub fn parse(&self, text: &str) -> Result<Rule> {
        let tokens = tokenize(text);
        let lexemes = tokens
            .iter()
            .map(|token| {
                self.registry.get(token).ok_or_else(|| Error::UnknownIdentifier {
                    token: (*token).to_owned(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let cursor = Cursor {
            tokens: &tokens,
            lexemes: &lexemes,
        };

        if lexemes.first() != Some(&&Lexeme::Keyword(Keyword::If)) {
            return Err(Error::MissingKeyword {
                keyword: "if",
                position: 0,
            });
        }

        let then = cursor
            .position(Keyword::Then)
            .ok_or(Error::MissingKeyword {
                keyword: "then",
                position: tokens.len(),
            })?;

        let expressions = self.extract_leaves(&cursor, 1, then)?;
        let condition = build_condition(&cursor, &expressions, then)?;
        let conclusion = self.parse_conclusion(&cursor, then + 1, tokens.len())?;

        debug!(rule = text, tokens = tokens.len(), depth = condition.depth(), "parsed rule");

        Ok(Rule::new(condition, conclusion))
    }

    /// Replaces every `VAR is [not] [hedge] TERM` run in `start..end` with
    /// a leaf, passing brackets and connectives through.
    fn extract_leaves(&self, cursor: &Cursor<'_>, start: usize, end: usize) -> Result<Vec<(usize, Expression)>> {
        let mut expressions = Vec::new();
        let mut i = start;

        while i < end {
            let expression = match cursor.lexemes[i] {
                Lexeme::Keyword(Keyword::OpenBracket) => Expression::Open,
                Lexeme::Keyword(Keyword::CloseBracket) => Expression::Close,
                Lexeme::Keyword(Keyword::And) => Expression::Op(OperatorType::And),
                Lexeme::Keyword(Keyword::Or) => Expression::Op(OperatorType::Or),
                Lexeme::Input(var) => {
                    let (leaf, consumed) = self.parse_leaf(cursor, *var, i, end)?;

                    expressions.push((i, Expression::Leaf(leaf)));
                    i += consumed;
                    continue;
                },
                _ => return Err(cursor.unexpected(i)),
            };

            expressions.push((i, expression));
            i += 1;
        }

        Ok(expressions)
    }

    fn parse_leaf(&self, cursor: &Cursor<'_>, var: InputKey, start: usize, end: usize) -> Result<(FuzzyCondition, usize)> {
        let mut i = start + 1;

        if i >= end {
            return Err(Error::IncompleteCondition { position: start });
        }
        if cursor.lexemes[i] != &Lexeme::Keyword(Keyword::Is) {
            return Err(Error::MissingKeyword {
                keyword: "is",
                position: i,
            });
        }
        i += 1;

        let mut leaf = FuzzyCondition::new(var, 0);

        if i < end && cursor.lexemes[i] == &Lexeme::Keyword(Keyword::Not) {
            leaf.condition.negated = true;
            i += 1;
        }
        if let Some(Lexeme::Keyword(Keyword::Hedge(hedge))) = cursor.lexemes.get(i).filter(|_| i < end) {
            leaf.hedge = Some(*hedge);
            i += 1;
        }
        if i >= end {
            return Err(Error::IncompleteCondition { position: i });
        }

        leaf.condition.term = self.resolve_term(cursor, i, TermOwner::Input(var), self.inputs[var].name())?;

        Ok((leaf, i + 1 - start))
    }

    fn parse_conclusion(&self, cursor: &Cursor<'_>, mut start: usize, mut end: usize) -> Result<SingleCondition<OutputKey>> {
        let mut open = Vec::new();

        for i in start..end {
            match cursor.lexemes[i] {
                Lexeme::Keyword(Keyword::OpenBracket) => open.push(i),
                Lexeme::Keyword(Keyword::CloseBracket) if open.pop().is_none() => {
                    return Err(Error::UnbalancedBrackets { position: i });
                },
                _ => {},
            }
        }

        if let Some(position) = open.pop() {
            return Err(Error::UnbalancedBrackets { position });
        }

        if end >= start + 2
            && cursor.lexemes[start] == &Lexeme::Keyword(Keyword::OpenBracket)
            && cursor.lexemes[end - 1] == &Lexeme::Keyword(Keyword::CloseBracket)
        {
            start += 1;
            end -= 1;
        }

        if end - start != 3 {
            return Err(Error::InvalidConclusion {
                reason: format!("expected `variable is term`, found {} tokens", end - start),
            });
        }

        let var = match cursor.lexemes[start] {
            Lexeme::Output(var) => *var,
            Lexeme::Input(_) => {
                return Err(Error::InvalidConclusion {
                    reason: format!("`{}` is an input variable", cursor.tokens[start]),
                })
            },
            _ => {
                return Err(Error::InvalidConclusion {
                    reason: format!("expected an output variable, found `{}`", cursor.tokens[start]),
                })
            },
        };

        if cursor.lexemes[start + 1] != &Lexeme::Keyword(Keyword::Is) {
            return Err(Error::MissingKeyword {
                keyword: "is",
                position: start + 1,
            });
        }

        let term = self.resolve_term(cursor, start + 2, TermOwner::Output(var), self.outputs[var].name())?;

        Ok(SingleCondition::new(var, term))
    }

    fn resolve_term(&self, cursor: &Cursor<'_>, i: usize, owner: TermOwner, variable: &str) -> Result<usize> {
        let lexeme = cursor.lexemes[i];

        if !matches!(lexeme, Lexeme::Term(_)) {
            return Err(cursor.unexpected(i));
        }

        lexeme.resolve_term(owner).ok_or_else(|| Error::UnresolvedTerm {
            term: cursor.tokens[i].to_owned(),
            variable: variable.to_owned(),
        })
    }
}

struct Cursor<'c> {
    tokens: &'c [&'c str],
    lexemes: &'c [&'c Lexeme],
}

impl Cursor<'_> {
    fn position(&self, keyword: Keyword) -> Option<usize> {
        self.lexemes.iter().position(|lexeme| **lexeme == Lexeme::Keyword(keyword))
    }

    fn unexpected(&self, i: usize) -> Error {
        Error::UnexpectedToken {
            token: self.tokens[i].to_owned(),
            position: i,
        }
    }
}

/// Deepest bracket nesting accepted in a premise.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Turns the leaf/bracket/connective sequence into a condition tree.
/// `end_position` is the token index just past the premise.
fn build_condition(cursor: &Cursor<'_>, expressions: &[(usize, Expression)], end_position: usize) -> Result<Condition> {
    let mut open = Vec::new();
    let mut closes = vec![0; expressions.len()];

    for (i, (position, expression)) in expressions.iter().enumerate() {
        match expression {
            Expression::Open => {
                open.push(i);

                if open.len() > MAX_NESTING_DEPTH {
                    return Err(Error::NestingTooDeep {
                        position: *position,
                        limit: MAX_NESTING_DEPTH,
                    });
                }
            },
            Expression::Close => match open.pop() {
                Some(opened) => closes[opened] = i,
                None => return Err(Error::UnbalancedBrackets { position: *position }),
            },
            _ => {},
        }
    }

    if let Some(&opened) = open.last() {
        return Err(Error::UnbalancedBrackets {
            position: expressions[opened].0,
        });
    }

    TreeBuilder {
        cursor,
        expressions,
        closes,
        end_position,
    }
    .build(0, expressions.len())
}

/// Recursive descent over index ranges of a balanced expression array.
/// Recursion depth is bounded by the bracket nesting.
struct TreeBuilder<'b> {
    cursor: &'b Cursor<'b>,
    expressions: &'b [(usize, Expression)],
    /// For each `Open`, the index of its matching `Close`
    closes: Vec<usize>,
    end_position: usize,
}

impl TreeBuilder<'_> {
    fn position(&self, i: usize) -> usize {
        self.expressions.get(i).map_or(self.end_position, |(position, _)| *position)
    }

    fn is_open(&self, i: usize) -> bool {
        matches!(self.expressions[i].1, Expression::Open)
    }

    fn build(&self, mut start: usize, mut end: usize) -> Result<Condition> {
        while start < end && self.is_open(start) && self.closes[start] == end - 1 {
            start += 1;
            end -= 1;
        }

        if start >= end {
            return Err(Error::IncompleteCondition {
                position: self.position(start),
            });
        }

        if let (1, Expression::Leaf(leaf)) = (end - start, self.expressions[start].1) {
            return Ok(Condition::Leaf(leaf));
        }

        let mut conditions = Vec::new();
        let mut op = None;
        let mut i = start;

        loop {
            match self.expressions[i].1 {
                Expression::Open => {
                    let close = self.closes[i];

                    conditions.push(self.build(i + 1, close)?);
                    i = close + 1;
                },
                Expression::Leaf(leaf) => {
                    conditions.push(Condition::Leaf(leaf));
                    i += 1;
                },
                Expression::Close => {
                    return Err(Error::UnbalancedBrackets {
                        position: self.position(i),
                    })
                },
                Expression::Op(_) => return Err(self.cursor.unexpected(self.position(i))),
            }

            if i >= end {
                break;
            }

            match self.expressions[i].1 {
                Expression::Op(next) => {
                    if op.is_some_and(|op| op != next) {
                        return Err(Error::InconsistentOperator {
                            position: self.position(i),
                        });
                    }

                    op = Some(next);
                    i += 1;

                    if i >= end {
                        return Err(Error::IncompleteCondition {
                            position: self.position(i),
                        });
                    }
                },
                _ => return Err(self.cursor.unexpected(self.position(i))),
            }
        }

        match op {
            Some(op) => Ok(Condition::Group(Conditions::new(op, conditions))),
            None => conditions.pop().ok_or(Error::IncompleteCondition {
                position: self.position(start),
            }),
        }
    }
}

pub fn parse_rule<O: OutputVariable>(
    text: &str,
    inputs: &SlotMap<InputKey, FuzzyVariable>,
    outputs: &SlotMap<OutputKey, O>,
) -> Result<Rule> {
    RuleParser::new(inputs, outputs)?.parse(text)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::dsl::{is, then};
    use crate::error::ErrorKind;
    use crate::hedge::Hedge;
    use crate::membership::MembershipFunction;

    struct Fixture {
        inputs: SlotMap<InputKey, FuzzyVariable>,
        outputs: SlotMap<OutputKey, FuzzyVariable>,
        input1: InputKey,
        input2: InputKey,
        output: OutputKey,
    }

    fn var(name: &str) -> FuzzyVariable {
        FuzzyVariable::new(name, 0. ..=1.)
            .unwrap()
            .with_term("mf1", MembershipFunction::triangular(0., 0., 0.5).unwrap())
            .unwrap()
            .with_term("mf2", MembershipFunction::triangular(0., 0.5, 1.).unwrap())
            .unwrap()
    }

    fn fixture() -> Fixture {
        let mut inputs = SlotMap::with_key();
        let mut outputs = SlotMap::with_key();
        let input1 = inputs.insert(var("input1"));
        let input2 = inputs.insert(
            var("input2")
                .with_term("mf3", MembershipFunction::triangular(0.5, 1., 1.).unwrap())
                .unwrap(),
        );
        let output = outputs.insert(
            FuzzyVariable::new("output", 0. ..=1.)
                .unwrap()
                .with_term("mf2", MembershipFunction::triangular(0., 0.5, 1.).unwrap())
                .unwrap()
                .with_term("mf1", MembershipFunction::triangular(0., 0., 0.5).unwrap())
                .unwrap(),
        );

        Fixture {
            inputs,
            outputs,
            input1,
            input2,
            output,
        }
    }

    impl Fixture {
        fn parse(&self, text: &str) -> Result<Rule> {
            parse_rule(text, &self.inputs, &self.outputs)
        }
    }

    #[test]
    fn test_parse_and_rule() {
        let fx = fixture();
        let rule = fx
            .parse("if (input1 is mf1) and (input2 is mf1) then (output is mf1)")
            .unwrap();

        assert_eq!(rule, Rule::new(is(fx.input1, 0).and(is(fx.input2, 0)), then(fx.output, 1)));
        assert_eq!(rule.weight(), 1.);
    }

    #[test]
    fn test_parse_single_leaf_without_brackets() {
        let fx = fixture();
        let rule = fx.parse("if input2 is mf3 then output is mf2").unwrap();

        assert_eq!(rule.condition(), &Condition::Leaf(is(fx.input2, 2)));
        assert_eq!(rule.conclusion(), &then(fx.output, 0));
    }

    #[test]
    fn test_parse_not_and_hedges() {
        let fx = fixture();
        let rule = fx
            .parse("if ((input1 is not very mf2) or (input2 is somewhat mf1) or input1 is extremely mf1) then output is mf1")
            .unwrap();
        let expected = is(fx.input1, 1)
            .not()
            .very()
            .or(is(fx.input2, 0).somewhat())
            .or(is(fx.input1, 0).extremely());

        assert_eq!(rule.condition(), &expected);

        let leaves = rule.condition().propositions();

        assert!(leaves[0].condition.negated);
        assert_eq!(leaves[0].hedge, Some(Hedge::Very));
        assert_eq!(leaves[2].hedge, Some(Hedge::Extremely));
    }

    #[test]
    fn test_parse_nested_groups() {
        let fx = fixture();
        let rule = fx
            .parse("if (input1 is mf1 and input2 is mf2) or (input1 is mf2 and (input2 is mf3 or input2 is mf1)) then (output is mf2)")
            .unwrap();
        let expected = is(fx.input1, 0)
            .and(is(fx.input2, 1))
            .or(is(fx.input1, 1).and(is(fx.input2, 2).or(is(fx.input2, 0))));

        assert_eq!(rule.condition(), &expected);
        assert_eq!(rule.condition().depth(), 4);
    }

    #[test]
    fn test_mixed_operators_need_brackets() {
        let fx = fixture();
        let err = fx
            .parse("if (input1 is mf1) and (input2 is mf1) or (input2 is mf2) then (output is mf1)")
            .unwrap_err();

        assert_eq!(err, Error::InconsistentOperator { position: 12 });
        assert_eq!(err.kind(), ErrorKind::Grammar);
    }

    #[test]
    fn test_conclusion_on_input() {
        let fx = fixture();
        let err = fx.parse("if (input1 is mf1) then (input1 is mf2)").unwrap_err();

        assert!(matches!(err, Error::InvalidConclusion { .. }));
        assert!(matches!(
            fx.parse("if (input1 is mf1) then (output is mf1 mf2)"),
            Err(Error::InvalidConclusion { .. })
        ));
    }

    #[test]
    fn test_grammar_errors() {
        let fx = fixture();

        assert_eq!(
            fx.parse("(input1 is mf1) then (output is mf1)"),
            Err(Error::MissingKeyword {
                keyword: "if",
                position: 0
            })
        );
        assert_eq!(
            fx.parse("if (input1 is mf1) (output is mf1)"),
            Err(Error::MissingKeyword {
                keyword: "then",
                position: 11
            })
        );
        assert_eq!(
            fx.parse("if (input1 mf1) then (output is mf1)"),
            Err(Error::MissingKeyword {
                keyword: "is",
                position: 3
            })
        );
        assert_eq!(
            fx.parse("if ((input1 is mf1) then (output is mf1)"),
            Err(Error::UnbalancedBrackets { position: 1 })
        );
        assert_eq!(
            fx.parse("if (input1 is mf1)) then (output is mf1)"),
            Err(Error::UnbalancedBrackets { position: 6 })
        );
        assert_eq!(
            fx.parse("if input1 is then output is mf1"),
            Err(Error::IncompleteCondition { position: 3 })
        );
        assert_eq!(
            fx.parse("if input1 then output is mf1"),
            Err(Error::IncompleteCondition { position: 1 })
        );
        assert_eq!(
            fx.parse("if () then output is mf1"),
            Err(Error::IncompleteCondition { position: 2 })
        );
        assert_eq!(
            fx.parse("if input1 is mf1 and then output is mf1"),
            Err(Error::IncompleteCondition { position: 5 })
        );
        assert_eq!(
            fx.parse("if and input1 is mf1 then output is mf1"),
            Err(Error::UnexpectedToken {
                token: "and".into(),
                position: 1
            })
        );
        assert_eq!(
            fx.parse("if input1 is mf1 input2 is mf1 then output is mf1"),
            Err(Error::UnexpectedToken {
                token: "input2".into(),
                position: 4
            })
        );
        assert_eq!(
            fx.parse("if output is mf1 then output is mf1"),
            Err(Error::UnexpectedToken {
                token: "output".into(),
                position: 1
            })
        );
    }

    #[test]
    fn test_unbalanced_conclusion_brackets() {
        let fx = fixture();

        assert_eq!(
            fx.parse("if input1 is mf1 then ( output is mf1"),
            Err(Error::UnbalancedBrackets { position: 5 })
        );
        assert_eq!(
            fx.parse("if input1 is mf1 then (output is mf1))"),
            Err(Error::UnbalancedBrackets { position: 10 })
        );
        assert_eq!(
            fx.parse("if input1 is mf1 then output is mf1 )"),
            Err(Error::UnbalancedBrackets { position: 8 })
        );
        assert!(matches!(
            fx.parse("if input1 is mf1 then ((output is mf1))"),
            Err(Error::InvalidConclusion { .. })
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let fx = fixture();
        let wrapped = |n: usize| format!("if {}input1 is mf1{} then output is mf1", "(".repeat(n), ")".repeat(n));

        let rule = fx.parse(&wrapped(MAX_NESTING_DEPTH)).unwrap();

        assert_eq!(rule.condition(), &Condition::Leaf(is(fx.input1, 0)));

        let too_deep = Error::NestingTooDeep {
            position: MAX_NESTING_DEPTH + 1,
            limit: MAX_NESTING_DEPTH,
        };

        assert_eq!(fx.parse(&wrapped(MAX_NESTING_DEPTH + 1)), Err(too_deep.clone()));
        assert_eq!(fx.parse(&wrapped(5000)), Err(too_deep.clone()));
        assert_eq!(too_deep.kind(), ErrorKind::Grammar);
    }

    #[test]
    fn test_deep_groups_within_limit() {
        let fx = fixture();
        let mut premise = String::from("input2 is mf1");

        for _ in 0..MAX_NESTING_DEPTH {
            premise = format!("(input1 is mf1 and {premise})");
        }

        let rule = fx.parse(&format!("if {premise} then output is mf2")).unwrap();

        assert_eq!(rule.condition().depth(), MAX_NESTING_DEPTH + 1);
        assert_eq!(rule.condition().propositions().len(), MAX_NESTING_DEPTH + 1);
        assert_eq!(rule.condition().propositions()[MAX_NESTING_DEPTH], &is(fx.input2, 0));
    }

    #[test]
    fn test_name_resolution_errors() {
        let fx = fixture();
        let err = fx.parse("if (input1 is mf9) then (output is mf1)").unwrap_err();

        assert_eq!(err, Error::UnknownIdentifier { token: "mf9".into() });
        assert_eq!(err.kind(), ErrorKind::NameResolution);

        // mf3 exists, but only on input2
        assert_eq!(
            fx.parse("if (input1 is mf3) then (output is mf1)"),
            Err(Error::UnresolvedTerm {
                term: "mf3".into(),
                variable: "input1".into()
            })
        );
        assert_eq!(
            fx.parse("if (input1 is mf1) then (output is mf3)"),
            Err(Error::UnresolvedTerm {
                term: "mf3".into(),
                variable: "output".into()
            })
        );
        assert_eq!(
            fx.parse("if (input1 is input2) then (output is mf1)"),
            Err(Error::UnexpectedToken {
                token: "input2".into(),
                position: 4
            })
        );
    }

    #[test]
    fn test_case_sensitive() {
        let fx = fixture();

        assert_eq!(
            fx.parse("IF (input1 is mf1) then (output is mf1)"),
            Err(Error::UnknownIdentifier { token: "IF".into() })
        );
    }

    fn leaf_text() -> impl Strategy<Value = String> {
        (
            prop_oneof![Just("input1"), Just("input2")],
            any::<bool>(),
            prop_oneof![Just(""), Just("slightly "), Just("somewhat "), Just("very "), Just("extremely ")],
            prop_oneof![Just("mf1"), Just("mf2")],
        )
            .prop_map(|(var, not, hedge, term)| {
                format!("({var} is {}{hedge}{term})", if not { "not " } else { "" })
            })
    }

    proptest! {
        #[test]
        fn test_parse_deterministic(
            leaves in prop::collection::vec(leaf_text(), 1..6),
            op in prop_oneof![Just(" and "), Just(" or ")],
            spacing in prop_oneof![Just(" "), Just("   "), Just("\t")],
        ) {
            let fx = fixture();
            let text = format!("if{spacing}{}{spacing}then (output is mf2)", leaves.join(op));
            let first = fx.parse(&text).unwrap();
            let second = fx.parse(&text).unwrap();

            prop_assert_eq!(first.condition().propositions().len(), leaves.len());
            prop_assert_eq!(first, second);
        }
    }
}

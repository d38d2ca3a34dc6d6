use crate::hedge::Hedge;
use crate::rules::{Condition, Conditions, FuzzyCondition, OperatorType, SingleCondition};
use crate::variable::{InputKey, OutputKey};

/// Starts a premise leaf: `is(var, term)` reads `var is term`.
pub fn is(variable: InputKey, term: usize) -> FuzzyCondition {
    FuzzyCondition::new(variable, term)
}

/// A conclusion `var is term`.
pub fn then(variable: OutputKey, term: usize) -> SingleCondition<OutputKey> {
    SingleCondition::new(variable, term)
}

impl FuzzyCondition {
    pub fn not(mut self) -> Self {
        self.condition.negated = !self.condition.negated;
        self
    }

    pub fn hedge(mut self, hedge: Hedge) -> Self {
        self.hedge = Some(hedge);
        self
    }

    pub fn slightly(self) -> Self {
        self.hedge(Hedge::Slightly)
    }

    pub fn somewhat(self) -> Self {
        self.hedge(Hedge::Somewhat)
    }

    pub fn very(self) -> Self {
        self.hedge(Hedge::Very)
    }

    pub fn extremely(self) -> Self {
        self.hedge(Hedge::Extremely)
    }

    pub fn and(self, rhs: impl Into<Condition>) -> Condition {
        Condition::from(self).and(rhs)
    }

    pub fn or(self, rhs: impl Into<Condition>) -> Condition {
        Condition::from(self).or(rhs)
    }
}

impl Condition {
    /// Extends a non-negated group of the same operator, otherwise nests.
    pub fn and(self, rhs: impl Into<Condition>) -> Self {
        self.join(OperatorType::And, rhs.into())
    }

    pub fn or(self, rhs: impl Into<Condition>) -> Self {
        self.join(OperatorType::Or, rhs.into())
    }

    pub fn not(self) -> Self {
        match self {
            Condition::Leaf(leaf) => Condition::Leaf(leaf.not()),
            Condition::Group(mut group) => {
                group.negated = !group.negated;
                Condition::Group(group)
            },
        }
    }

    fn join(self, op: OperatorType, rhs: Condition) -> Self {
        match self {
            Condition::Group(mut group) if group.op == op && !group.negated => {
                group.conditions.push(rhs);
                Condition::Group(group)
            },
            lhs => Condition::Group(Conditions::new(op, vec![lhs, rhs])),
        }
    }
}

#[test]
fn test_builder_flattens_same_operator() {
    use slotmap::SlotMap;

    let mut keys: SlotMap<InputKey, ()> = SlotMap::with_key();
    let a = keys.insert(());
    let b = keys.insert(());

    let condition = is(a, 0).and(is(b, 0)).and(is(a, 1).very());

    match &condition {
        Condition::Group(group) => {
            assert_eq!(group.op, OperatorType::And);
            assert_eq!(group.conditions.len(), 3);
        },
        Condition::Leaf(_) => panic!("expected a group"),
    }

    let mixed = condition.or(is(b, 1).not());

    match &mixed {
        Condition::Group(group) => {
            assert_eq!(group.op, OperatorType::Or);
            assert_eq!(group.conditions.len(), 2);
        },
        Condition::Leaf(_) => panic!("expected a group"),
    }
    assert_eq!(mixed.depth(), 3);
    assert_eq!(mixed.propositions().len(), 4);
    assert!(mixed.propositions()[3].condition.negated);
    assert_eq!(mixed.propositions()[2].hedge, Some(Hedge::Very));
}

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::hedge::Hedge;
use crate::variable::{FuzzyVariable, InputKey, OutputKey, OutputVariable};

/// Reserved words of the rule grammar.
pub const KEYWORDS: [&str; 12] = [
    "if", "then", "is", "and", "or", "not", "(", ")", "slightly", "somewhat", "very", "extremely",
];

/// Rejects empty names, keywords, and anything the tokenizer would split.
pub(crate) fn validate_name(name: String) -> Result<String> {
    let splits = name.chars().any(|c| c.is_whitespace() || c == '(' || c == ')');

    if name.is_empty() || splits || KEYWORDS.contains(&name.as_str()) {
        return Err(Error::InvalidName { name });
    }

    Ok(name)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Keyword {
    If,
    Then,
    Is,
    And,
    Or,
    Not,
    OpenBracket,
    CloseBracket,
    Hedge(Hedge),
}

impl Keyword {
    fn from_text(text: &str) -> Option<Self> {
        let keyword = match text {
            "if" => Self::If,
            "then" => Self::Then,
            "is" => Self::Is,
            "and" => Self::And,
            "or" => Self::Or,
            "not" => Self::Not,
            "(" => Self::OpenBracket,
            ")" => Self::CloseBracket,
            _ => Self::Hedge(Hedge::from_keyword(text)?),
        };

        Some(keyword)
    }
}

/// Variable owning a term candidate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TermOwner {
    Input(InputKey),
    Output(OutputKey),
}

/// One reading of a term identifier: the `index`th value of `owner`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TermRef {
    pub owner: TermOwner,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme {
    Keyword(Keyword),
    Input(InputKey),
    Output(OutputKey),
    /// Every variable that has a term with this text, in registration order
    Term(SmallVec<[TermRef; 2]>),
}

impl Lexeme {
    /// Resolves a term identifier against the variable a leaf or
    /// conclusion is bound to.
    pub fn resolve_term(&self, owner: TermOwner) -> Option<usize> {
        match self {
            Self::Term(candidates) => candidates
                .iter()
                .find(|candidate| candidate.owner == owner)
                .map(|candidate| candidate.index),
            _ => None,
        }
    }
}

/// Symbol table from identifier text to its lexeme. It only holds keys
/// into the caller's variables.
#[derive(Debug, Default)]
pub struct LexemeRegistry(HashMap<String, Lexeme>);

impl LexemeRegistry {
    pub fn build<O: OutputVariable>(
        inputs: &SlotMap<InputKey, FuzzyVariable>,
        outputs: &SlotMap<OutputKey, O>,
    ) -> Result<Self> {
        let mut this = Self(HashMap::new());

        for text in KEYWORDS {
            if let Some(keyword) = Keyword::from_text(text) {
                this.insert(text, Lexeme::Keyword(keyword))?;
            }
        }

        for (key, var) in inputs {
            this.insert(var.name(), Lexeme::Input(key))?;

            for (index, term) in var.terms().iter().enumerate() {
                this.insert_term(term.name(), TermRef {
                    owner: TermOwner::Input(key),
                    index,
                })?;
            }
        }

        for (key, var) in outputs {
            this.insert(var.name(), Lexeme::Output(key))?;

            for (index, value) in var.value_names().enumerate() {
                this.insert_term(value, TermRef {
                    owner: TermOwner::Output(key),
                    index,
                })?;
            }
        }

        Ok(this)
    }

    pub fn get(&self, text: &str) -> Option<&Lexeme> {
        self.0.get(text)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, text: &str, lexeme: Lexeme) -> Result<()> {
        match self.0.entry(text.to_owned()) {
            Entry::Occupied(_) => Err(Error::NameConflict { name: text.to_owned() }),
            Entry::Vacant(entry) => {
                entry.insert(lexeme);
                Ok(())
            },
        }
    }

    fn insert_term(&mut self, text: &str, term: TermRef) -> Result<()> {
        match self.0.entry(text.to_owned()) {
            Entry::Occupied(mut entry) => match entry.get_mut() {
                Lexeme::Term(candidates) => {
                    candidates.push(term);
                    Ok(())
                },
                _ => Err(Error::NameConflict { name: text.to_owned() }),
            },
            Entry::Vacant(entry) => {
                entry.insert(Lexeme::Term(SmallVec::from_elem(term, 1)));
                Ok(())
            },
        }
    }
}

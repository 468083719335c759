//! # Question Bank
//!
//! The domain model for questions and the categories that group them.
//!
//! ```text
//! QuestionBank
//! ├── "Geodesy"   → [Question, Question, ...]
//! ├── "Surveying" → [Question, ...]
//! └── ...
//! ```
//!
//! The serialized shape is the one the import/export screens exchange with the
//! user: `{ "<category>": [ { "q": ..., "a": [...], "c": 0 } ] }`. Category
//! order is kept (insertion order is display order).

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Minimum number of options a question needs to be answerable.
pub const MIN_OPTIONS: usize = 2;

const ONBOARDING_CATEGORY: &str = "Getting Started";

const ONBOARDING_QUESTION: &str = "Welcome to quizdeck! Press `i` on the menu to import a \
    question bank (paste JSON, then Ctrl+S). Your bank is saved on this machine.";

/// A single multiple-choice question.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Question {
    #[serde(rename = "q")]
    pub text: String,
    #[serde(rename = "a")]
    pub options: Vec<String>,
    #[serde(rename = "c")]
    pub correct_index: usize,
}

/// Why a question cannot be rendered or scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionDefect {
    TooFewOptions { found: usize },
    CorrectIndexOutOfRange { index: usize, options: usize },
}

impl fmt::Display for QuestionDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionDefect::TooFewOptions { found } => {
                write!(f, "needs at least {MIN_OPTIONS} options, found {found}")
            }
            QuestionDefect::CorrectIndexOutOfRange { index, options } => {
                write!(f, "correct index {index} is out of range for {options} options")
            }
        }
    }
}

impl Question {
    pub fn new(text: impl Into<String>, options: Vec<String>, correct_index: usize) -> Self {
        Self {
            text: text.into(),
            options,
            correct_index,
        }
    }

    /// Checks that the question can be displayed and scored.
    pub fn validate(&self) -> Result<(), QuestionDefect> {
        if self.options.len() < MIN_OPTIONS {
            return Err(QuestionDefect::TooFewOptions {
                found: self.options.len(),
            });
        }
        if self.correct_index >= self.options.len() {
            return Err(QuestionDefect::CorrectIndexOutOfRange {
                index: self.correct_index,
                options: self.options.len(),
            });
        }
        Ok(())
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_index
    }
}

/// Display label for an option position: 0 → 'A', 1 → 'B', ...
///
/// Positions past 'Z' fall back to '?'; no real question has that many options.
pub fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| (b'A' + i) as char)
        .unwrap_or('?')
}

/// Category name → ordered list of questions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct QuestionBank {
    categories: IndexMap<String, Vec<Question>>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in bank used on first run, after a reset, or when the saved
    /// bank can't be read.
    pub fn builtin() -> Self {
        let mut bank = Self::new();
        bank.insert(
            ONBOARDING_CATEGORY,
            vec![Question::new(
                ONBOARDING_QUESTION,
                vec!["Got it, take me to the menu".to_string(), "OK".to_string()],
                0,
            )],
        );
        bank
    }

    /// Inserts or replaces a whole category. A replaced category keeps its position.
    pub fn insert(&mut self, category: impl Into<String>, questions: Vec<Question>) {
        self.categories.insert(category.into(), questions);
    }

    pub fn get(&self, category: &str) -> Option<&[Question]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Category names in display order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Question])> {
        self.categories
            .iter()
            .map(|(name, questions)| (name.as_str(), questions.as_slice()))
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn question_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// First malformed question, as `(category, index, defect)`.
    pub fn first_defect(&self) -> Option<(&str, usize, QuestionDefect)> {
        self.iter().find_map(|(category, questions)| {
            questions.iter().enumerate().find_map(|(index, question)| {
                question
                    .validate()
                    .err()
                    .map(|defect| (category, index, defect))
            })
        })
    }

    /// Category-level merge: every category in `incoming` replaces the
    /// same-named category here wholesale. Categories only present here are
    /// kept in place; new ones are appended in `incoming` order.
    pub fn merge(&self, incoming: &QuestionBank) -> QuestionBank {
        let mut merged = self.clone();
        for (category, questions) in &incoming.categories {
            merged.categories.insert(category.clone(), questions.clone());
        }
        merged
    }
}

//! # Quiz Session
//!
//! One run through a category's questions.
//!
//! ```text
//! Session
//! ├── category: String
//! ├── questions: Vec<Question>   // private copy, shuffled at most once
//! ├── current_index: usize       // clamped to [0, len-1]
//! └── answers: AnswerSheet       // question index → chosen option, write-once
//! ```
//!
//! The session never reads the bank after `start`, so importing or resetting
//! while a quiz is running can't change the questions under the player.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::bank::{Question, QuestionBank};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The category is missing or has no questions.
    EmptyCategory { category: String },
    /// No question at that index.
    QuestionOutOfRange { index: usize, len: usize },
    /// The option doesn't exist on that question.
    InvalidOption { question: usize, option: usize, options: usize },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::EmptyCategory { category } => {
                write!(f, "category \"{category}\" has no questions")
            }
            SessionError::QuestionOutOfRange { index, len } => {
                write!(f, "question {index} out of range (session has {len})")
            }
            SessionError::InvalidOption {
                question,
                option,
                options,
            } => write!(
                f,
                "option {option} out of range for question {question} ({options} options)"
            ),
        }
    }
}

impl std::error::Error for SessionError {}

/// Result of a successful `submit_answer` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Recorded { correct: bool },
    /// The question already had an answer; nothing changed.
    AlreadyAnswered,
}

/// Recorded answers, keyed by question index. An entry is never overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: BTreeMap<usize, usize>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_index: usize) -> Option<usize> {
        self.answers.get(&question_index).copied()
    }

    pub fn contains(&self, question_index: usize) -> bool {
        self.answers.contains_key(&question_index)
    }

    /// Inserts only when the slot is empty. Returns whether it was recorded.
    pub fn record(&mut self, question_index: usize, option_index: usize) -> bool {
        if self.contains(question_index) {
            return false;
        }
        self.answers.insert(question_index, option_index);
        true
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.answers.iter().map(|(q, o)| (*q, *o))
    }
}

/// Derived score. Recomputed on demand, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreResult {
    pub correct_count: usize,
    pub answered_count: usize,
    pub total_count: usize,
    pub accuracy_percent: u8,
}

/// `round(100 * part / whole)` with halves rounded up, in integer arithmetic.
fn percent_half_up(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = (200 * part + whole) / (2 * whole);
    pct.min(100) as u8
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    category: String,
    questions: Vec<Question>,
    current_index: usize,
    answers: AnswerSheet,
}

impl Session {
    /// Starts a session on `category` using the thread RNG for shuffling.
    pub fn start(category: &str, bank: &QuestionBank, randomize: bool) -> Result<Self, SessionError> {
        Self::start_with_rng(category, bank, randomize, &mut rand::rng())
    }

    /// Starts a session with an explicit RNG. A randomized session is a uniform
    /// permutation of the category (Fisher-Yates).
    pub fn start_with_rng<R: Rng + ?Sized>(
        category: &str,
        bank: &QuestionBank,
        randomize: bool,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let mut questions = match bank.get(category) {
            Some(questions) if !questions.is_empty() => questions.to_vec(),
            _ => {
                return Err(SessionError::EmptyCategory {
                    category: category.to_string(),
                });
            }
        };
        if randomize {
            questions.shuffle(rng);
        }
        Ok(Self {
            category: category.to_string(),
            questions,
            current_index: 0,
            answers: AnswerSheet::new(),
        })
    }

    /// A session with no questions. Every operation on it is a no-op.
    pub fn empty(category: &str) -> Self {
        Self {
            category: category.to_string(),
            questions: Vec::new(),
            current_index: 0,
            answers: AnswerSheet::new(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    pub fn answer_for(&self, question_index: usize) -> Option<usize> {
        self.answers.get(question_index)
    }

    pub fn current_answer(&self) -> Option<usize> {
        self.answers.get(self.current_index)
    }

    /// Records `option_index` for `question_index` unless it's already answered.
    pub fn submit_answer(
        &mut self,
        question_index: usize,
        option_index: usize,
    ) -> Result<AnswerOutcome, SessionError> {
        let question = self
            .questions
            .get(question_index)
            .ok_or(SessionError::QuestionOutOfRange {
                index: question_index,
                len: self.questions.len(),
            })?;
        if option_index >= question.options.len() {
            return Err(SessionError::InvalidOption {
                question: question_index,
                option: option_index,
                options: question.options.len(),
            });
        }
        let correct = question.is_correct(option_index);
        if self.answers.record(question_index, option_index) {
            Ok(AnswerOutcome::Recorded { correct })
        } else {
            Ok(AnswerOutcome::AlreadyAnswered)
        }
    }

    /// Moves to the next question. Stays put on the last one.
    pub fn advance(&mut self) -> bool {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous question. Stays put on the first one.
    pub fn retreat(&mut self) -> bool {
        if self.current_index > 0 {
            self.current_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn is_last(&self) -> bool {
        !self.questions.is_empty() && self.current_index == self.questions.len() - 1
    }

    /// On the last question and it has been answered.
    pub fn is_complete(&self) -> bool {
        self.is_last() && self.answers.contains(self.current_index)
    }

    pub fn score(&self) -> ScoreResult {
        let total_count = self.questions.len();
        let answered_count = self.answers.len();
        if answered_count == 0 {
            return ScoreResult {
                total_count,
                ..ScoreResult::default()
            };
        }
        let correct_count = self
            .answers
            .iter()
            .filter(|(q, o)| self.questions.get(*q).is_some_and(|question| question.is_correct(*o)))
            .count();
        ScoreResult {
            correct_count,
            answered_count,
            total_count,
            accuracy_percent: percent_half_up(correct_count, answered_count),
        }
    }

    /// How far through the session the cursor is, as a percentage.
    pub fn progress_percent(&self) -> u8 {
        if self.questions.is_empty() {
            return 0;
        }
        percent_half_up(self.current_index + 1, self.questions.len())
    }

    /// Clears answers and goes back to the first question, same order.
    pub fn restart(&mut self) {
        self.answers.clear();
        self.current_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn q(text: &str, c: usize) -> Question {
        Question::new(text, vec!["A".into(), "B".into(), "C".into()], c)
    }

    fn single_question_bank() -> QuestionBank {
        let mut bank = QuestionBank::new();
        bank.insert("Cat", vec![Question::new("X?", vec!["A".into(), "B".into()], 1)]);
        bank
    }

    fn numbered_bank(n: usize) -> QuestionBank {
        let mut bank = QuestionBank::new();
        bank.insert("Many", (0..n).map(|i| q(&format!("Q{i}"), i % 3)).collect());
        bank
    }

    #[test]
    fn test_scenario_correct_answer_scores_100() {
        let mut session = Session::start("Cat", &single_question_bank(), false).unwrap();
        assert_eq!(session.len(), 1);
        assert_eq!(
            session.submit_answer(0, 1),
            Ok(AnswerOutcome::Recorded { correct: true })
        );
        assert_eq!(
            session.score(),
            ScoreResult {
                correct_count: 1,
                answered_count: 1,
                total_count: 1,
                accuracy_percent: 100
            }
        );
    }

    #[test]
    fn test_scenario_wrong_answer_scores_0() {
        let mut session = Session::start("Cat", &single_question_bank(), false).unwrap();
        session.submit_answer(0, 0).unwrap();
        assert_eq!(
            session.score(),
            ScoreResult {
                correct_count: 0,
                answered_count: 1,
                total_count: 1,
                accuracy_percent: 0
            }
        );
    }

    #[test]
    fn test_score_with_no_answers_is_zero() {
        let session = Session::start("Many", &numbered_bank(4), false).unwrap();
        assert_eq!(
            session.score(),
            ScoreResult {
                correct_count: 0,
                answered_count: 0,
                total_count: 4,
                accuracy_percent: 0
            }
        );
    }

    #[test]
    fn test_accuracy_rounds_half_up() {
        // 1 of 8 correct = 12.5% → 13
        let mut session = Session::start("Many", &numbered_bank(8), false).unwrap();
        for i in 0..8 {
            let wrong = (session.questions()[i].correct_index + 1) % 3;
            let pick = if i == 0 { session.questions()[i].correct_index } else { wrong };
            session.submit_answer(i, pick).unwrap();
        }
        assert_eq!(session.score().correct_count, 1);
        assert_eq!(session.score().accuracy_percent, 13);
    }

    #[test]
    fn test_accuracy_two_of_three() {
        let mut session = Session::start("Many", &numbered_bank(3), false).unwrap();
        session.submit_answer(0, 0).unwrap(); // correct (c = 0)
        session.submit_answer(1, 1).unwrap(); // correct (c = 1)
        session.submit_answer(2, 0).unwrap(); // wrong (c = 2)
        let score = session.score();
        assert_eq!(score.correct_count, 2);
        assert_eq!(score.accuracy_percent, 67);
    }

    #[test]
    fn test_early_termination_keeps_total() {
        let mut session = Session::start("Many", &numbered_bank(10), false).unwrap();
        session.submit_answer(0, 0).unwrap();
        let score = session.score();
        assert_eq!(score.answered_count, 1);
        assert_eq!(score.total_count, 10);
    }

    #[test]
    fn test_second_submit_keeps_first_answer() {
        let mut session = Session::start("Cat", &single_question_bank(), false).unwrap();
        session.submit_answer(0, 0).unwrap();
        assert_eq!(session.submit_answer(0, 1), Ok(AnswerOutcome::AlreadyAnswered));
        assert_eq!(session.answer_for(0), Some(0));
        assert_eq!(session.score().correct_count, 0);
    }

    #[test]
    fn test_invalid_option_is_not_recorded() {
        let mut session = Session::start("Cat", &single_question_bank(), false).unwrap();
        let err = session.submit_answer(0, 2).unwrap_err();
        assert!(matches!(err, SessionError::InvalidOption { option: 2, .. }));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_out_of_range_question_is_not_recorded() {
        let mut session = Session::start("Cat", &single_question_bank(), false).unwrap();
        let err = session.submit_answer(5, 0).unwrap_err();
        assert_eq!(err, SessionError::QuestionOutOfRange { index: 5, len: 1 });
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut session = Session::start("Many", &numbered_bank(3), false).unwrap();
        assert!(!session.retreat());
        assert_eq!(session.current_index(), 0);
        assert!(session.advance());
        assert!(session.advance());
        assert!(!session.advance());
        assert_eq!(session.current_index(), 2);
        assert!(session.retreat());
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_is_complete_requires_last_answered() {
        let mut session = Session::start("Many", &numbered_bank(2), false).unwrap();
        session.submit_answer(0, 0).unwrap();
        assert!(!session.is_complete());
        session.advance();
        assert!(session.is_last());
        assert!(!session.is_complete());
        session.submit_answer(1, 0).unwrap();
        assert!(session.is_complete());
    }

    #[test]
    fn test_restart_clears_answers_and_keeps_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = Session::start_with_rng("Many", &numbered_bank(12), true, &mut rng).unwrap();
        let order: Vec<Question> = session.questions().to_vec();
        session.submit_answer(0, 0).unwrap();
        session.advance();
        session.advance();

        session.restart();
        assert!(session.answers().is_empty());
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.questions(), order.as_slice());
    }

    #[test]
    fn test_non_random_session_keeps_bank_order() {
        let bank = numbered_bank(6);
        let session = Session::start("Many", &bank, false).unwrap();
        assert_eq!(session.questions(), bank.get("Many").unwrap());
    }

    #[test]
    fn test_random_session_is_a_permutation() {
        let bank = numbered_bank(20);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let session = Session::start_with_rng("Many", &bank, true, &mut rng).unwrap();
            let mut shuffled: Vec<&str> = session.questions().iter().map(|q| q.text.as_str()).collect();
            let mut original: Vec<&str> = bank.get("Many").unwrap().iter().map(|q| q.text.as_str()).collect();
            shuffled.sort();
            original.sort();
            assert_eq!(shuffled, original);
        }
    }

    #[test]
    fn test_shuffle_covers_every_permutation_of_three() {
        let bank = numbered_bank(3);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..600 {
            let session = Session::start_with_rng("Many", &bank, true, &mut rng).unwrap();
            let order: Vec<String> = session.questions().iter().map(|q| q.text.clone()).collect();
            seen.insert(order);
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_missing_or_empty_category_is_an_error() {
        let mut bank = numbered_bank(1);
        bank.insert("Empty", vec![]);
        assert_eq!(
            Session::start("Empty", &bank, false),
            Err(SessionError::EmptyCategory { category: "Empty".to_string() })
        );
        assert!(matches!(
            Session::start("Nope", &bank, true),
            Err(SessionError::EmptyCategory { .. })
        ));
    }

    #[test]
    fn test_empty_session_operations_are_no_ops() {
        let mut session = Session::empty("Empty");
        assert!(!session.advance());
        assert!(!session.retreat());
        assert!(!session.is_complete());
        assert!(session.current_question().is_none());
        assert!(session.submit_answer(0, 0).is_err());
        assert_eq!(session.progress_percent(), 0);
        assert_eq!(
            session.score(),
            ScoreResult::default()
        );
    }

    #[test]
    fn test_session_is_isolated_from_bank_changes() {
        let mut bank = numbered_bank(3);
        let session = Session::start("Many", &bank, false).unwrap();
        bank.insert("Many", vec![q("replaced", 0)]);
        assert_eq!(session.len(), 3);
        assert_eq!(session.questions()[0].text, "Q0");
    }

    #[test]
    fn test_progress_percent() {
        let mut session = Session::start("Many", &numbered_bank(3), false).unwrap();
        assert_eq!(session.progress_percent(), 33);
        session.advance();
        assert_eq!(session.progress_percent(), 67);
        session.advance();
        assert_eq!(session.progress_percent(), 100);
    }

    #[test]
    fn test_answer_sheet_record_is_write_once() {
        let mut sheet = AnswerSheet::new();
        assert!(sheet.record(3, 1));
        assert!(!sheet.record(3, 2));
        assert_eq!(sheet.get(3), Some(1));
        assert!(sheet.contains(3));
        assert!(!sheet.contains(0));
        assert_eq!(sheet.len(), 1);
    }
}

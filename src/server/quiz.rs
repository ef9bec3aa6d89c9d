//! Picking the next quiz question.
//!
//! The quiz has no server-side session: the client sends back the ids it has
//! already seen and gets one random question out of the remaining ones.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::db::Question;

/// Category id meaning "questions from every category".
pub const ALL_CATEGORIES: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizScope<'a> {
    All,
    Category { id: i64, label: &'a str },
}

impl<'a> QuizScope<'a> {
    pub fn new(id: i64, label: &'a str) -> Self {
        if id == ALL_CATEGORIES {
            QuizScope::All
        } else {
            QuizScope::Category { id, label }
        }
    }

    /// Stored form of the category reference to filter on, if any.
    pub fn category_filter(&self) -> Option<String> {
        match self {
            QuizScope::All => None,
            QuizScope::Category { id, .. } => Some(id.to_string()),
        }
    }

    pub fn served_message(&self) -> String {
        match self {
            QuizScope::All => "New random question successfully retrieved".to_owned(),
            QuizScope::Category { label, .. } => {
                format!("New random question successfully retrieved from category {label}")
            }
        }
    }

    // existing clients match on this text, unbalanced parenthesis included
    pub fn exhausted_message(&self) -> String {
        match self {
            QuizScope::All => {
                "No more questions available - Add new (question, answer) pairs to continue"
                    .to_owned()
            }
            QuizScope::Category { label, .. } => format!(
                "No more questions available in the category {label} (Select another category to continue"
            ),
        }
    }
}

/// Uniformly picks one of `candidates` and records it in `previous`.
pub fn pick_next<R: Rng + ?Sized>(
    candidates: Vec<Question>,
    previous: &mut Vec<i64>,
    rng: &mut R,
) -> Option<Question> {
    let question = candidates.choose(rng)?.clone();
    previous.push(question.id);
    Some(question)
}

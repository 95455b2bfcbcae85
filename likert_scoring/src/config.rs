// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// Number of levels on the agreement scale.
pub const LIKERT_POINTS: u8 = 5;

/// The labels shown for each level of the scale, in selection order.
///
/// Selection index `i` corresponds to the raw value `i + 1`.
pub const LIKERT_LEVELS: [&str; 5] = [
    "1 – Not at all like me",
    "2 – Mostly not like me",
    "3 – Partly like me",
    "4 – Mostly like me",
    "5 – Completely like me",
];

/// The fixed competency dimensions. Any other category code passes through
/// without a label.
pub const CATEGORY_LABELS: [(&str, &str); 8] = [
    ("A", "Self-awareness, self-esteem, self-confidence"),
    ("B", "Motivation, optimism, drive to achieve"),
    ("C", "Conscientiousness, perseverance"),
    ("D", "Initiative, creativity"),
    ("E", "Empathy, acceptance of diversity"),
    ("F", "Cooperation"),
    ("G", "Conflict management"),
    ("H", "Communication"),
];

/// One statement of a question bank, as read from the spreadsheet.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct QuestionBankEntry {
    /// Trimmed, never empty.
    pub question: String,
    /// Trimmed, never empty.
    pub category: String,
    pub is_reversed: bool,
}

impl QuestionBankEntry {
    pub fn new(question: &str, category: &str, is_reversed: bool) -> QuestionBankEntry {
        QuestionBankEntry {
            question: question.trim().to_string(),
            category: category.trim().to_string(),
            is_reversed,
        }
    }
}

/// The answers given so far, keyed by question index (0-based, stable for
/// one load of a bank). Values are selection indexes in `0..LIKERT_POINTS`.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ResponseRecord {
    answers: BTreeMap<usize, u8>,
}

impl ResponseRecord {
    pub fn new() -> ResponseRecord {
        ResponseRecord::default()
    }

    /// Records a selection, replacing any previous answer for this question.
    pub fn answer(&mut self, index: usize, choice: u8) -> Result<(), ScoringErrors> {
        if choice >= LIKERT_POINTS {
            return Err(ScoringErrors::InvalidChoice { index, choice });
        }
        self.answers.insert(index, choice);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.answers.get(&index).cloned()
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

    /// Number of questions in `0..question_count` without an answer.
    pub fn remaining(&self, question_count: usize) -> usize {
        (0..question_count)
            .filter(|idx| !self.answers.contains_key(idx))
            .count()
    }
}

// ******** Output data structures *********

/// A question together with its answer on the 1..5 scale and its score after
/// reverse coding.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScoredEntry {
    pub entry: QuestionBankEntry,
    /// Selection index + 1.
    pub raw: u8,
    /// `raw`, or `6 - raw` for reversed items. Always in 1..=5.
    pub score: u8,
}

/// Statistics for one category code.
#[derive(PartialEq, Debug, Clone)]
pub struct CategorySummary {
    pub code: String,
    /// The decorated label, `"A – ..."`, or the bare code when unknown.
    pub label: String,
    pub item_count: usize,
    pub sum_score: u32,
    pub mean_score: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ScoringResult {
    pub entries: Vec<ScoredEntry>,
    /// Ordered by category code.
    pub categories: Vec<CategorySummary>,
    pub total_score: u32,
}

impl ScoringResult {
    /// The single-row pivot: one (category code, mean score) pair per
    /// category, in category order.
    pub fn wide(&self) -> Vec<(String, f64)> {
        self.categories
            .iter()
            .map(|c| (c.code.clone(), c.mean_score))
            .collect()
    }
}

/// Errors that prevent the scores from being computed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ScoringErrors {
    EmptyBank,
    /// Not every question has been answered yet.
    IncompleteResponses {
        remaining: usize,
    },
    InvalidChoice {
        index: usize,
        choice: u8,
    },
    QuestionOutOfRange {
        index: usize,
        count: usize,
    },
    /// The answers were collected for a bank of another size.
    BankSizeMismatch {
        question_count: usize,
        entries: usize,
    },
}

impl Error for ScoringErrors {}

impl Display for ScoringErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringErrors::EmptyBank => write!(f, "the question bank has no questions"),
            ScoringErrors::IncompleteResponses { remaining } => {
                write!(f, "{} question(s) still unanswered", remaining)
            }
            ScoringErrors::InvalidChoice { index, choice } => write!(
                f,
                "question {}: selection {} is outside of the {}-point scale",
                index + 1,
                choice,
                LIKERT_POINTS
            ),
            ScoringErrors::QuestionOutOfRange { index, count } => write!(
                f,
                "question index {} is out of range (the bank has {} questions)",
                index, count
            ),
            ScoringErrors::BankSizeMismatch {
                question_count,
                entries,
            } => write!(
                f,
                "the answers are for {} questions but the bank has {}",
                question_count, entries
            ),
        }
    }
}

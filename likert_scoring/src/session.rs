use log::debug;

pub use crate::config::*;

/// The state of one respondent filling one questionnaire.
///
/// A session is created when the respondent starts, holds the answers while
/// the form is being filled, and is cleared when another bank is selected or
/// on an explicit reset.
///
/// ```
/// use likert_scoring::session::Session;
/// use likert_scoring::{QuestionBankEntry, ScoringErrors};
///
/// let bank = vec![
///     QuestionBankEntry::new("I know my strengths.", "A", false),
///     QuestionBankEntry::new("I often doubt myself.", "A", true),
/// ];
/// let mut session = Session::new().respondent("Anna Kovacs", "7.b");
/// session.select_bank("Personal competencies grades 7-8", bank.len());
///
/// session.answer(0, 4)?;
/// assert_eq!(session.remaining(), 1);
/// session.answer(1, 4)?;
///
/// let result = session.score(&bank)?;
/// assert_eq!(result.total_score, 6);
/// # Ok::<(), ScoringErrors>(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Session {
    name: String,
    class_label: String,
    bank: Option<String>,
    question_count: usize,
    responses: ResponseRecord,
}

impl Session {
    pub fn new() -> Session {
        Session::default()
    }

    pub fn respondent(self, name: &str, class_label: &str) -> Session {
        Session {
            name: name.trim().to_string(),
            class_label: class_label.trim().to_string(),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class_label(&self) -> &str {
        &self.class_label
    }

    pub fn bank(&self) -> Option<&str> {
        self.bank.as_deref()
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    pub fn responses(&self) -> &ResponseRecord {
        &self.responses
    }

    /// Switches to another bank. Previous answers do not carry over.
    pub fn select_bank(&mut self, title: &str, question_count: usize) {
        debug!(
            "select_bank: {:?} ({} questions), dropping {} answers",
            title,
            question_count,
            self.responses.len()
        );
        self.bank = Some(title.to_string());
        self.question_count = question_count;
        self.responses.clear();
    }

    /// Records the selection index (0..=4) for the question at `index`.
    pub fn answer(&mut self, index: usize, choice: u8) -> Result<(), ScoringErrors> {
        if index >= self.question_count {
            return Err(ScoringErrors::QuestionOutOfRange {
                index,
                count: self.question_count,
            });
        }
        self.responses.answer(index, choice)
    }

    pub fn remaining(&self) -> usize {
        self.responses.remaining(self.question_count)
    }

    pub fn is_complete(&self) -> bool {
        self.question_count > 0 && self.remaining() == 0
    }

    /// Forgets the selected bank and every answer. The respondent is kept.
    pub fn reset(&mut self) {
        self.bank = None;
        self.question_count = 0;
        self.responses.clear();
    }

    /// Scores the answers against the bank they were collected for.
    pub fn score(&self, entries: &[QuestionBankEntry]) -> Result<ScoringResult, ScoringErrors> {
        if entries.len() != self.question_count {
            return Err(ScoringErrors::BankSizeMismatch {
                question_count: self.question_count,
                entries: entries.len(),
            });
        }
        crate::run_scoring(entries, &self.responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_a_bank_clears_answers() {
        let mut s = Session::new().respondent("  Bob ", " 5.a");
        assert_eq!(s.name(), "Bob");
        assert_eq!(s.class_label(), "5.a");
        s.select_bank("first", 3);
        s.answer(0, 1).unwrap();
        s.answer(2, 3).unwrap();
        assert_eq!(s.remaining(), 1);

        s.select_bank("second", 2);
        assert_eq!(s.bank(), Some("second"));
        assert!(s.responses().is_empty());
        assert_eq!(s.remaining(), 2);
    }

    #[test]
    fn answers_outside_the_bank_are_rejected() {
        let mut s = Session::new();
        assert_eq!(
            s.answer(0, 0),
            Err(ScoringErrors::QuestionOutOfRange { index: 0, count: 0 })
        );
        s.select_bank("b", 2);
        assert!(s.answer(2, 0).is_err());
        assert!(s.answer(1, 5).is_err());
        assert!(s.answer(1, 4).is_ok());
    }

    #[test]
    fn answering_again_replaces_the_selection() {
        let bank = vec![QuestionBankEntry::new("q", "A", false)];
        let mut s = Session::new();
        s.select_bank("b", 1);
        s.answer(0, 0).unwrap();
        s.answer(0, 4).unwrap();
        assert!(s.is_complete());
        assert_eq!(s.score(&bank).unwrap().total_score, 5);
    }

    #[test]
    fn scoring_needs_the_selected_bank() {
        let bank = vec![
            QuestionBankEntry::new("q1", "A", false),
            QuestionBankEntry::new("q2", "B", false),
        ];
        let mut s = Session::new();
        s.select_bank("b", 1);
        s.answer(0, 3).unwrap();
        assert_eq!(
            s.score(&bank),
            Err(ScoringErrors::BankSizeMismatch {
                question_count: 1,
                entries: 2
            })
        );
        assert!(s.score(&bank[..1]).is_ok());
    }

    #[test]
    fn reset_keeps_respondent() {
        let mut s = Session::new().respondent("Eva", "8.c");
        s.select_bank("b", 1);
        s.answer(0, 2).unwrap();
        s.reset();
        assert_eq!(s.bank(), None);
        assert!(!s.is_complete());
        assert_eq!(s.name(), "Eva");
    }

    #[test]
    fn incomplete_session_does_not_score() {
        let bank = vec![
            QuestionBankEntry::new("q1", "A", false),
            QuestionBankEntry::new("q2", "B", false),
        ];
        let mut s = Session::new();
        s.select_bank("b", bank.len());
        s.answer(1, 2).unwrap();
        assert_eq!(
            s.score(&bank),
            Err(ScoringErrors::IncompleteResponses { remaining: 1 })
        );
    }
}

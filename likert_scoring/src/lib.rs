mod config;
pub mod manual;
pub mod session;

use log::{debug, info};

use std::collections::BTreeMap;

pub use crate::config::*;

/// Returns the human-readable label of a fixed category code, if it has one.
pub fn category_label(code: &str) -> Option<&'static str> {
    let code = code.trim();
    CATEGORY_LABELS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// The display form of a category: `"A – label"` for the fixed codes, the
/// trimmed code itself otherwise.
pub fn decorated_category(code: &str) -> String {
    let code = code.trim();
    match category_label(code) {
        Some(label) => format!("{} – {}", code, label),
        None => code.to_string(),
    }
}

/// Scores a single answer.
///
/// `choice` is the selection index on the scale (0..=4). The raw value is
/// `choice + 1`; reversed items are reflected around the midpoint.
pub fn score_entry(
    entry: &QuestionBankEntry,
    index: usize,
    choice: u8,
) -> Result<ScoredEntry, ScoringErrors> {
    if choice >= LIKERT_POINTS {
        return Err(ScoringErrors::InvalidChoice { index, choice });
    }
    let raw = choice + 1;
    let score = if entry.is_reversed {
        LIKERT_POINTS + 1 - raw
    } else {
        raw
    };
    Ok(ScoredEntry {
        entry: entry.clone(),
        raw,
        score,
    })
}

/// Scores every question of the bank.
///
/// All the questions must have been answered, otherwise nothing is scored and
/// the number of unanswered questions is reported.
pub fn score_responses(
    entries: &[QuestionBankEntry],
    responses: &ResponseRecord,
) -> Result<Vec<ScoredEntry>, ScoringErrors> {
    if entries.is_empty() {
        return Err(ScoringErrors::EmptyBank);
    }
    let remaining = responses.remaining(entries.len());
    if remaining > 0 {
        debug!(
            "score_responses: {} of {} questions unanswered",
            remaining,
            entries.len()
        );
        return Err(ScoringErrors::IncompleteResponses { remaining });
    }

    let mut res: Vec<ScoredEntry> = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let choice = responses
            .get(idx)
            .ok_or(ScoringErrors::IncompleteResponses { remaining: 1 })?;
        res.push(score_entry(entry, idx, choice)?);
    }
    Ok(res)
}

/// Groups the scored entries by category code and computes the count, sum and
/// unweighted mean of each group. The output is ordered by code.
pub fn aggregate_categories(scored: &[ScoredEntry]) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<String, (usize, u32)> = BTreeMap::new();
    for se in scored.iter() {
        let e = groups.entry(se.entry.category.clone()).or_insert((0, 0));
        e.0 += 1;
        e.1 += se.score as u32;
    }

    groups
        .into_iter()
        .map(|(code, (item_count, sum_score))| CategorySummary {
            label: decorated_category(&code),
            code,
            item_count,
            sum_score,
            mean_score: sum_score as f64 / item_count as f64,
        })
        .collect()
}

/// Runs the full scoring pass over a bank and its answers.
///
/// Arguments:
/// * `entries` the questions, in bank order
/// * `responses` the selections made for these questions
pub fn run_scoring(
    entries: &[QuestionBankEntry],
    responses: &ResponseRecord,
) -> Result<ScoringResult, ScoringErrors> {
    info!(
        "run_scoring: processing {} questions, {} answers",
        entries.len(),
        responses.len()
    );
    let scored = score_responses(entries, responses)?;
    let categories = aggregate_categories(&scored);
    for c in categories.iter() {
        info!(
            "Category {}: {} items, total {}, mean {:.2}",
            c.label, c.item_count, c.sum_score, c.mean_score
        );
    }
    let total_score = scored.iter().map(|se| se.score as u32).sum();
    Ok(ScoringResult {
        entries: scored,
        categories,
        total_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> Vec<QuestionBankEntry> {
        vec![
            QuestionBankEntry::new("I know my strengths.", "A", false),
            QuestionBankEntry::new("I often doubt myself.", "A", true),
            QuestionBankEntry::new("I like working in a team.", "F", false),
            QuestionBankEntry::new("I finish what I start.", "C", false),
            QuestionBankEntry::new("I listen to others.", "Z", false),
        ]
    }

    fn answered(choices: &[u8]) -> ResponseRecord {
        let mut rr = ResponseRecord::new();
        for (idx, c) in choices.iter().enumerate() {
            rr.answer(idx, *c).unwrap();
        }
        rr
    }

    #[test]
    fn raw_is_selection_plus_one() {
        let plain = QuestionBankEntry::new("q", "A", false);
        let reversed = QuestionBankEntry::new("q", "A", true);
        for s in 0..LIKERT_POINTS {
            let p = score_entry(&plain, 0, s).unwrap();
            let r = score_entry(&reversed, 0, s).unwrap();
            assert_eq!(p.raw, s + 1);
            assert_eq!(p.score, s + 1);
            assert_eq!(r.raw, s + 1);
            assert_eq!(r.score, 6 - (s + 1));
            assert!((1..=5).contains(&r.score));
        }
    }

    #[test]
    fn reverse_coding_extremes() {
        let plain = QuestionBankEntry::new("q", "A", false);
        let reversed = QuestionBankEntry::new("q", "A", true);
        assert_eq!(score_entry(&plain, 0, 0).unwrap().score, 1);
        assert_eq!(score_entry(&reversed, 0, 0).unwrap().score, 5);
        assert_eq!(score_entry(&reversed, 0, 4).unwrap().score, 1);
    }

    #[test]
    fn selection_outside_scale_is_rejected() {
        let plain = QuestionBankEntry::new("q", "A", false);
        assert_eq!(
            score_entry(&plain, 3, 5),
            Err(ScoringErrors::InvalidChoice { index: 3, choice: 5 })
        );
        let mut rr = ResponseRecord::new();
        assert!(rr.answer(0, 7).is_err());
        assert!(rr.is_empty());
    }

    #[test]
    fn one_missing_answer_blocks_scoring() {
        let b = bank();
        let mut rr = answered(&[0, 1, 2, 3]);
        assert_eq!(
            run_scoring(&b, &rr),
            Err(ScoringErrors::IncompleteResponses { remaining: 1 })
        );
        rr.answer(4, 2).unwrap();
        assert!(run_scoring(&b, &rr).is_ok());
    }

    #[test]
    fn empty_bank_is_an_error() {
        assert_eq!(
            run_scoring(&[], &ResponseRecord::new()),
            Err(ScoringErrors::EmptyBank)
        );
    }

    #[test]
    fn categories_are_sorted_and_aggregated() {
        let b = bank();
        // A: 4 and reversed(raw 2 -> 4); F: 5; C: 3; Z: 1
        let rr = answered(&[3, 1, 4, 2, 0]);
        let res = run_scoring(&b, &rr).unwrap();

        let codes: Vec<&str> = res.categories.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["A", "C", "F", "Z"]);

        let a = &res.categories[0];
        assert_eq!(a.item_count, 2);
        assert_eq!(a.sum_score, 8);
        assert_eq!(a.mean_score, 4.0);
        assert_eq!(a.label, "A – Self-awareness, self-esteem, self-confidence");

        let z = &res.categories[3];
        assert_eq!(z.label, "Z");
        assert_eq!(res.total_score, 8 + 3 + 5 + 1);

        for c in res.categories.iter() {
            assert_eq!(c.mean_score * c.item_count as f64, c.sum_score as f64);
        }
    }

    #[test]
    fn mean_is_unweighted() {
        let b = vec![
            QuestionBankEntry::new("q1", "B", false),
            QuestionBankEntry::new("q2", "B", false),
            QuestionBankEntry::new("q3", "B", false),
        ];
        let res = run_scoring(&b, &answered(&[0, 0, 1])).unwrap();
        assert_eq!(res.categories[0].sum_score, 4);
        assert!((res.categories[0].mean_score - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn wide_row_has_one_mean_per_category() {
        let res = run_scoring(&bank(), &answered(&[3, 1, 4, 2, 0])).unwrap();
        assert_eq!(
            res.wide(),
            vec![
                ("A".to_string(), 4.0),
                ("C".to_string(), 3.0),
                ("F".to_string(), 5.0),
                ("Z".to_string(), 1.0)
            ]
        );
    }

    #[test]
    fn labels_only_for_fixed_codes() {
        assert_eq!(category_label("H"), Some("Communication"));
        assert_eq!(category_label(" E "), Some("Empathy, acceptance of diversity"));
        assert_eq!(category_label("I"), None);
        assert_eq!(decorated_category("G"), "G – Conflict management");
        assert_eq!(decorated_category("custom"), "custom");
    }
}

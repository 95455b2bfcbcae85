// Text normalisation shared by the header lookup and the file resolver.

use std::collections::BTreeSet;
use std::path::Path;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization as _;

/// Replaces accented letters by their base letter (`é` -> `e`, `ő` -> `o`).
pub fn fold_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalises free text for token matching: lowercase, no accents, every run
/// of non-alphanumeric characters becomes a single space, no leading or
/// trailing space.
pub fn normalize_text(s: &str) -> String {
    let folded = fold_accents(&s.trim().to_lowercase());
    let mut res = String::with_capacity(folded.len());
    let mut pending_space = false;
    for c in folded.chars() {
        if c.is_alphanumeric() {
            if pending_space && !res.is_empty() {
                res.push(' ');
            }
            pending_space = false;
            res.push(c);
        } else {
            pending_space = true;
        }
    }
    res
}

pub fn tokenize(s: &str) -> BTreeSet<String> {
    normalize_text(s)
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}

/// The tokens of a file name, without its extension.
pub fn file_tokens(path: &Path) -> BTreeSet<String> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    tokenize(&stem)
}

/// Normalises a column header: lowercase, no accents, whitespace runs
/// replaced by underscores.
pub fn normalize_header(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    let joined = lowered.split_whitespace().collect::<Vec<&str>>().join("_");
    fold_accents(&joined)
}

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accents_are_folded() {
        assert_eq!(fold_accents("Személyes Társas ŐŰ"), "Szemelyes Tarsas OU");
        assert_eq!(fold_accents("kérdés_szöveg"), "kerdes_szoveg");
    }

    #[test]
    fn text_normalisation() {
        assert_eq!(
            normalize_text("  Személyes_kompetenciák 5-6 (oszt.) "),
            "szemelyes kompetenciak 5 6 oszt"
        );
        assert_eq!(normalize_text("--"), "");
        assert_eq!(normalize_text("a__b  c"), "a b c");
    }

    #[test]
    fn tokens_of_titles_and_files() {
        let t = tokenize("Personal competencies grades 5-6");
        let expected: BTreeSet<String> = ["personal", "competencies", "grades", "5", "6"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(t, expected);

        let f = file_tokens(Path::new("/banks/Social_Competencies-7-8_grade.xlsx"));
        assert!(f.contains("social"));
        assert!(f.contains("8"));
        assert!(!f.contains("xlsx"));
        assert_eq!(f.len(), 5);
    }

    #[test]
    fn header_normalisation() {
        assert_eq!(normalize_header(" Question  Text "), "question_text");
        assert_eq!(normalize_header("Kérdés"), "kerdes");
        assert_eq!(normalize_header("IS REVERSED"), "is_reversed");
        assert_eq!(normalize_header("Inverz-e"), "inverz-e");
    }
}

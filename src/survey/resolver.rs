// Locating the spreadsheet of a question bank on disk.

use std::collections::BTreeSet;

use crate::survey::config_reader::ResolverVocabulary;
use crate::survey::io_common::{file_tokens, simplify_file_name, tokenize};
use crate::survey::*;

const SPREADSHEET_EXTENSION: &str = "xlsx";

/// Builds the set of tokens a file name must contain to hold the bank with
/// the given title.
///
/// `grade_marker` is passed separately so that the caller can retry with the
/// full spelling of the marker.
pub fn required_tokens(
    title: &str,
    vocabulary: &ResolverVocabulary,
    grade_marker: &str,
) -> BTreeSet<String> {
    let title_tokens = tokenize(title);
    let mut req: BTreeSet<String> = BTreeSet::new();
    if let Some(topic) = vocabulary
        .topic_tokens
        .iter()
        .find(|t| title_tokens.contains(t.as_str()))
    {
        req.insert(topic.clone());
    }
    req.insert(vocabulary.domain_token.clone());
    for (low, high) in vocabulary.grade_ranges.iter() {
        if title_tokens.contains(low) && title_tokens.contains(high) {
            req.insert(low.clone());
            req.insert(high.clone());
        }
    }
    req.insert(grade_marker.to_string());
    debug!("required_tokens: {:?} -> {:?}", title, req);
    req
}

/// All the spreadsheet files directly inside the given directories, sorted
/// by path. Directories that do not exist are skipped.
pub fn list_spreadsheets(dirs: &[PathBuf]) -> SurveyResult<Vec<PathBuf>> {
    let mut res: Vec<PathBuf> = Vec::new();
    for dir in dirs.iter() {
        if !dir.is_dir() {
            warn!("list_spreadsheets: {:?} is not a directory, skipping", dir);
            continue;
        }
        let read_dir = fs::read_dir(dir).context(ReadingDirectorySnafu {
            path: dir.display().to_string(),
        })?;
        for dir_entry in read_dir {
            let p = dir_entry
                .context(ReadingDirectorySnafu {
                    path: dir.display().to_string(),
                })?
                .path();
            let is_spreadsheet = p
                .extension()
                .map(|e| e.to_string_lossy().eq_ignore_ascii_case(SPREADSHEET_EXTENSION))
                .unwrap_or(false);
            // Excel lock files (~$name.xlsx) are not workbooks.
            let is_lock_file = simplify_file_name(&p).starts_with("~$");
            if p.is_file() && is_spreadsheet && !is_lock_file {
                res.push(p);
            }
        }
    }
    res.sort();
    debug!("list_spreadsheets: {:?}", res);
    Ok(res)
}

/// Among the candidates whose name contains every required token, picks the
/// one with the fewest tokens. Ties go to the first candidate in order.
pub fn best_match(required: &BTreeSet<String>, candidates: &[PathBuf]) -> Option<PathBuf> {
    let mut best: Option<(usize, &PathBuf)> = None;
    for p in candidates.iter() {
        let tokens = file_tokens(p);
        if !tokens.is_superset(required) {
            continue;
        }
        match best {
            Some((n, _)) if n <= tokens.len() => {}
            _ => best = Some((tokens.len(), p)),
        }
    }
    best.map(|(_, p)| p.clone())
}

/// The first candidate whose name contains every required token.
pub fn first_match(required: &BTreeSet<String>, candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|p| file_tokens(p).is_superset(required))
        .cloned()
}

/// Finds the file of a bank from its title, tolerating differences of case,
/// accents, separators and the abbreviation of the grade marker.
pub fn resolve_bank_file(
    title: &str,
    dirs: &[PathBuf],
    vocabulary: &ResolverVocabulary,
) -> SurveyResult<PathBuf> {
    let candidates = list_spreadsheets(dirs)?;

    let required = required_tokens(title, vocabulary, &vocabulary.grade_marker);
    if let Some(p) = best_match(&required, &candidates) {
        info!("resolve_bank_file: {:?} -> {:?}", title, p);
        return Ok(p);
    }

    let required_full = required_tokens(title, vocabulary, &vocabulary.grade_marker_full);
    if let Some(p) = first_match(&required_full, &candidates) {
        info!(
            "resolve_bank_file: {:?} -> {:?} (using {:?})",
            title, p, vocabulary.grade_marker_full
        );
        return Ok(p);
    }

    FileNotFoundSnafu {
        title,
        available: available_names(&candidates),
    }
    .fail()
}

/// Uses the path configured for a bank as is.
pub fn resolve_static(
    title: &str,
    configured: Option<&Path>,
    dirs: &[PathBuf],
) -> SurveyResult<PathBuf> {
    match configured {
        Some(p) if p.is_file() => Ok(p.to_path_buf()),
        _ => {
            warn!(
                "resolve_static: no file for {:?} (configured: {:?})",
                title, configured
            );
            let mut search_dirs = dirs.to_vec();
            if let Some(parent) = configured.and_then(|p| p.parent()) {
                if !search_dirs.iter().any(|d| d == parent) {
                    search_dirs.push(parent.to_path_buf());
                }
            }
            let candidates = list_spreadsheets(&search_dirs)?;
            FileNotFoundSnafu {
                title,
                available: available_names(&candidates),
            }
            .fail()
        }
    }
}

fn available_names(candidates: &[PathBuf]) -> Vec<String> {
    candidates.iter().map(|p| simplify_file_name(p)).collect()
}

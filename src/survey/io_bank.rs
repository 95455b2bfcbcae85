// Reading question banks from Excel files.

use std::collections::HashMap;

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::survey::config_reader::ColumnAliases;
use crate::survey::io_common::normalize_header;
use crate::survey::*;

/// Positions of the logical fields in the header row.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ColumnMap {
    pub question: usize,
    pub category: usize,
    pub reversed: Option<usize>,
}

fn first_col(header: &[String], aliases: &[String]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        let alias = normalize_header(alias);
        header.iter().position(|h| *h == alias)
    })
}

impl ColumnMap {
    /// Resolves the columns once for the whole file. `header` must already be
    /// normalised.
    pub fn resolve(header: &[String], aliases: &ColumnAliases, path: &str) -> SurveyResult<ColumnMap> {
        let question = first_col(header, &aliases.question);
        let category = first_col(header, &aliases.category);
        let reversed = first_col(header, &aliases.reversed);
        debug!(
            "ColumnMap::resolve: {:?}: question: {:?} category: {:?} reversed: {:?}",
            path, question, category, reversed
        );
        match (question, category) {
            (Some(question), Some(category)) => Ok(ColumnMap {
                question,
                category,
                reversed,
            }),
            _ => {
                let mut missing: Vec<&str> = Vec::new();
                if question.is_none() {
                    missing.push("question");
                }
                if category.is_none() {
                    missing.push("category");
                }
                SchemaSnafu {
                    path,
                    missing: missing.join(", "),
                    header: header.join(", "),
                }
                .fail()
            }
        }
    }
}

/// The text of a cell. Whole numbers lose their decimal part so that a flag
/// stored as the number 1 reads as "1".
pub fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => "".to_string(),
        _ => {
            warn!("cell_to_string: unexpected cell {:?}", cell);
            format!("{:?}", cell)
        }
    }
}

pub fn is_affirmative(s: &str, aliases: &ColumnAliases) -> bool {
    let s = s.trim().to_lowercase();
    aliases.affirmative.iter().any(|a| a.trim().to_lowercase() == s)
}

/// Turns the rows below the header into bank entries, in order.
///
/// Rows without question text are skipped. Rows without a category are
/// skipped with a warning.
pub fn parse_rows<I>(
    header: &[String],
    rows: I,
    aliases: &ColumnAliases,
    path: &str,
) -> SurveyResult<Vec<QuestionBankEntry>>
where
    I: Iterator<Item = Vec<String>>,
{
    let normalized: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();
    let cols = ColumnMap::resolve(&normalized, aliases, path)?;

    let mut res: Vec<QuestionBankEntry> = Vec::new();
    for (idx, row) in rows.enumerate() {
        // Excel numbering: the header is line 1.
        let lineno = idx + 2;
        let cell = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or("");
        let question = cell(cols.question);
        if question.is_empty() {
            debug!("parse_rows: {}:{}: no question, skipping", path, lineno);
            continue;
        }
        let category = cell(cols.category);
        if category.is_empty() {
            warn!(
                "parse_rows: {}:{}: question {:?} has no category, skipping",
                path, lineno, question
            );
            continue;
        }
        let is_reversed = cols
            .reversed
            .map(|i| is_affirmative(cell(i), aliases))
            .unwrap_or(false);
        res.push(QuestionBankEntry::new(question, category, is_reversed));
    }
    info!("parse_rows: {}: {} questions", path, res.len());
    Ok(res)
}

/// Reads the first worksheet of a bank file.
pub fn load_bank(path: &Path, aliases: &ColumnAliases) -> SurveyResult<Vec<QuestionBankEntry>> {
    let path_s = path.display().to_string();
    let mut workbook: Xlsx<_> =
        open_workbook(path).context(OpeningExcelSnafu { path: path_s.clone() })?;
    let wrange = workbook
        .worksheet_range_at(0)
        .context(EmptyExcelSnafu { path: path_s.clone() })?
        .context(OpeningExcelSnafu { path: path_s.clone() })?;

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyExcelSnafu { path: path_s.clone() })?
        .iter()
        .map(cell_to_string)
        .collect();
    debug!("load_bank: header: {:?}", header);

    let rows = iter.map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>());
    parse_rows(&header, rows, aliases, &path_s)
}

/// Question banks already read in this session, keyed by file.
///
/// The files are static reference data: an entry is never invalidated.
#[derive(Debug, Default)]
pub struct BankCache {
    banks: HashMap<PathBuf, Vec<QuestionBankEntry>>,
    parse_count: usize,
}

impl BankCache {
    pub fn new() -> BankCache {
        BankCache::default()
    }

    pub fn load(
        &mut self,
        path: &Path,
        aliases: &ColumnAliases,
    ) -> SurveyResult<Vec<QuestionBankEntry>> {
        let key = fs::canonicalize(path).context(OpeningFileSnafu {
            path: path.display().to_string(),
        })?;
        if let Some(entries) = self.banks.get(&key) {
            debug!("BankCache::load: cache hit for {:?}", key);
            return Ok(entries.clone());
        }
        let entries = load_bank(&key, aliases)?;
        self.parse_count += 1;
        self.banks.insert(key, entries.clone());
        Ok(entries)
    }

    /// Number of times a file was actually parsed.
    pub fn parse_count(&self) -> usize {
        self.parse_count
    }
}

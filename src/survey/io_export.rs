//! Excel report of a scored questionnaire.
//!
//! The workbook always has 4 sheets, in this order:
//! - `responses`: one row per question, with readable column names
//! - `transformed`: the same rows with short column names
//! - `categories`: count, total and mean per category
//! - `categories_wide`: a single row with the mean of each category

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::survey::*;

pub const RESPONSES_SHEET_NAME: &str = "responses";
pub const TRANSFORMED_SHEET_NAME: &str = "transformed";
pub const CATEGORIES_SHEET_NAME: &str = "categories";
pub const CATEGORIES_WIDE_SHEET_NAME: &str = "categories_wide";

pub const HEADERS_RESPONSES: [&str; 5] = [
    "Category",
    "Question",
    "Reversed item?",
    "Selected value (1..5)",
    "Score (after reversal)",
];

pub const HEADERS_TRANSFORMED: [&str; 5] = ["category", "question", "reversed", "raw", "score"];

pub const HEADERS_CATEGORIES: [&str; 4] = ["Category", "Item count", "Total score", "Mean"];

/// The name of the report file: spaces in the respondent's name become
/// underscores, and a placeholder is used when no name was given.
pub fn export_file_name(prefix: &str, name: &str, placeholder: &str) -> String {
    let name = name.trim();
    let name = if name.is_empty() { placeholder } else { name };
    format!("{}{}.xlsx", prefix, name.replace(' ', "_"))
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, h) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *h, format)?;
    }
    Ok(())
}

fn write_entries(
    sheet: &mut Worksheet,
    headers: &[&str],
    result: &ScoringResult,
    format: &Format,
) -> Result<(), XlsxError> {
    write_headers(sheet, headers, format)?;
    let mut row: u32 = 1;
    for se in result.entries.iter() {
        sheet.write_string(row, 0, &se.entry.category)?;
        sheet.write_string(row, 1, &se.entry.question)?;
        sheet.write_boolean(row, 2, se.entry.is_reversed)?;
        sheet.write_number(row, 3, f64::from(se.raw))?;
        sheet.write_number(row, 4, f64::from(se.score))?;
        row += 1;
    }
    Ok(())
}

pub fn build_workbook(result: &ScoringResult) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(RESPONSES_SHEET_NAME)?;
        write_entries(sheet, &HEADERS_RESPONSES, result, &header_format)?;
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(TRANSFORMED_SHEET_NAME)?;
        write_entries(sheet, &HEADERS_TRANSFORMED, result, &header_format)?;
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(CATEGORIES_SHEET_NAME)?;
        write_headers(sheet, &HEADERS_CATEGORIES, &header_format)?;
        let mut row: u32 = 1;
        for c in result.categories.iter() {
            sheet.write_string(row, 0, &c.label)?;
            sheet.write_number(row, 1, c.item_count as f64)?;
            sheet.write_number(row, 2, f64::from(c.sum_score))?;
            sheet.write_number(row, 3, c.mean_score)?;
            row += 1;
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(CATEGORIES_WIDE_SHEET_NAME)?;
        for (col, (code, mean)) in result.wide().iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, code, &header_format)?;
            sheet.write_number(1, col as u16, *mean)?;
        }
    }

    Ok(workbook)
}

pub fn write_report(path: &Path, result: &ScoringResult) -> SurveyResult<()> {
    let path_s = path.display().to_string();
    info!("write_report: writing {:?}", path_s);
    let mut workbook = build_workbook(result).context(WritingExportSnafu { path: path_s.clone() })?;
    workbook
        .save(path)
        .context(WritingExportSnafu { path: path_s })
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, DataType, Reader, Xlsx};

    fn result() -> ScoringResult {
        let bank = vec![
            QuestionBankEntry::new("I know my strengths.", "A", false),
            QuestionBankEntry::new("I often doubt myself.", "A", true),
            QuestionBankEntry::new("I talk to new people easily.", "H", false),
        ];
        let mut rr = ResponseRecord::new();
        rr.answer(0, 4).unwrap();
        rr.answer(1, 3).unwrap();
        rr.answer(2, 1).unwrap();
        run_scoring(&bank, &rr).unwrap()
    }

    #[test]
    fn file_names() {
        assert_eq!(
            export_file_name("competency_results_", "Anna Maria Kovacs", "student"),
            "competency_results_Anna_Maria_Kovacs.xlsx"
        );
        assert_eq!(
            export_file_name("competency_results_", "  ", "student"),
            "competency_results_student.xlsx"
        );
    }

    #[test]
    fn report_has_four_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("report.xlsx");
        write_report(&p, &result()).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&p).unwrap();
        assert_eq!(
            workbook.sheet_names().to_vec(),
            vec![
                RESPONSES_SHEET_NAME.to_string(),
                TRANSFORMED_SHEET_NAME.to_string(),
                CATEGORIES_SHEET_NAME.to_string(),
                CATEGORIES_WIDE_SHEET_NAME.to_string()
            ]
        );

        let responses = workbook.worksheet_range(RESPONSES_SHEET_NAME).unwrap().unwrap();
        let rows: Vec<&[DataType]> = responses.rows().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0][3], DataType::String("Selected value (1..5)".to_string()));
        assert_eq!(rows[2][1], DataType::String("I often doubt myself.".to_string()));
        assert_eq!(rows[2][2], DataType::Bool(true));
        assert_eq!(rows[2][3], DataType::Float(4.0));
        assert_eq!(rows[2][4], DataType::Float(2.0));

        let transformed = workbook.worksheet_range(TRANSFORMED_SHEET_NAME).unwrap().unwrap();
        let rows: Vec<&[DataType]> = transformed.rows().collect();
        assert_eq!(rows[0][4], DataType::String("score".to_string()));
        assert_eq!(rows[3][0], DataType::String("H".to_string()));

        let categories = workbook.worksheet_range(CATEGORIES_SHEET_NAME).unwrap().unwrap();
        let rows: Vec<&[DataType]> = categories.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[1][0],
            DataType::String("A – Self-awareness, self-esteem, self-confidence".to_string())
        );
        assert_eq!(rows[1][1], DataType::Float(2.0));
        assert_eq!(rows[1][2], DataType::Float(7.0));
        assert_eq!(rows[1][3], DataType::Float(3.5));

        let wide = workbook.worksheet_range(CATEGORIES_WIDE_SHEET_NAME).unwrap().unwrap();
        let rows: Vec<&[DataType]> = wide.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], DataType::String("A".to_string()));
        assert_eq!(rows[0][1], DataType::String("H".to_string()));
        assert_eq!(rows[1][0], DataType::Float(3.5));
        assert_eq!(rows[1][1], DataType::Float(2.0));
    }
}

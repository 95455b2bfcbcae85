use crate::survey::*;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BANK_TITLES: [&str; 4] = [
    "Personal competencies grades 5-6",
    "Personal competencies grades 7-8",
    "Social competencies grades 5-6",
    "Social competencies grades 7-8",
];

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ResolutionMode {
    /// Each title maps to the `filePath` given in the configuration.
    #[serde(rename = "static")]
    Static,
    /// Titles are matched against the file names found in the bank directories.
    #[serde(rename = "fuzzy")]
    Fuzzy,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BankSource {
    pub title: String,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
}

/// The words used to build the required token set of a bank title.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ResolverVocabulary {
    /// The topical markers. The first one present in the title is required.
    #[serde(rename = "topicTokens")]
    pub topic_tokens: Vec<String>,
    /// Always required.
    #[serde(rename = "domainToken")]
    pub domain_token: String,
    /// Both tokens of a pair are required when both appear in the title.
    #[serde(rename = "gradeRanges")]
    pub grade_ranges: Vec<(String, String)>,
    /// Always required in the first pass.
    #[serde(rename = "gradeMarker")]
    pub grade_marker: String,
    /// Replaces `grade_marker` in the second pass.
    #[serde(rename = "gradeMarkerFull")]
    pub grade_marker_full: String,
}

impl Default for ResolverVocabulary {
    fn default() -> Self {
        ResolverVocabulary {
            topic_tokens: vec!["personal".to_string(), "social".to_string()],
            domain_token: "competencies".to_string(),
            grade_ranges: vec![
                ("5".to_string(), "6".to_string()),
                ("7".to_string(), "8".to_string()),
            ],
            grade_marker: "grade".to_string(),
            grade_marker_full: "grades".to_string(),
        }
    }
}

/// The accepted header names of each logical column, in priority order.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ColumnAliases {
    pub question: Vec<String>,
    pub category: Vec<String>,
    pub reversed: Vec<String>,
    /// Cell contents (trimmed, lowercase) that mark a question as reversed.
    pub affirmative: Vec<String>,
}

fn to_strings(l: &[&str]) -> Vec<String> {
    l.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnAliases {
    fn default() -> Self {
        ColumnAliases {
            question: to_strings(&[
                "question",
                "question_text",
                "statement",
                "item",
                "text",
                "kerdes",
                "kerdes_szoveg",
                "allitas",
                "szoveg",
            ]),
            category: to_strings(&["category", "dimension", "kategoria", "dimenzio"]),
            reversed: to_strings(&[
                "is_reversed",
                "reversed",
                "flipped",
                "inverz_e",
                "inverz",
                "forditott",
                "forditott_e",
            ]),
            affirmative: to_strings(&["yes", "true", "1", "y", "igen"]),
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    pub banks: Vec<BankSource>,
    #[serde(rename = "bankDirectories")]
    pub bank_directories: Vec<String>,
    pub resolution: ResolutionMode,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "exportFilePrefix")]
    pub export_file_prefix: String,
    #[serde(rename = "defaultRespondentName")]
    pub default_respondent_name: String,
    #[serde(rename = "resolverVocabulary")]
    pub resolver_vocabulary: Option<ResolverVocabulary>,
    #[serde(rename = "columnAliases")]
    pub column_aliases: Option<ColumnAliases>,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        SurveyConfig {
            banks: DEFAULT_BANK_TITLES
                .iter()
                .map(|t| BankSource {
                    title: t.to_string(),
                    file_path: None,
                })
                .collect(),
            bank_directories: vec!["question_banks".to_string()],
            resolution: ResolutionMode::Fuzzy,
            output_directory: None,
            export_file_prefix: "competency_results_".to_string(),
            default_respondent_name: "student".to_string(),
            resolver_vocabulary: None,
            column_aliases: None,
        }
    }
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    info!("read_config: {} banks from {:?}", config.banks.len(), path);
    Ok(config)
}

pub fn parse_resolution_mode(s: &str) -> SurveyResult<ResolutionMode> {
    match s.trim().to_lowercase().as_str() {
        "static" => Ok(ResolutionMode::Static),
        "fuzzy" => Ok(ResolutionMode::Fuzzy),
        x => whatever!("unknown resolution mode {:?} (expected static or fuzzy)", x),
    }
}

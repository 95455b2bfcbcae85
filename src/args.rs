use clap::Parser;

/// This program runs a Likert-scale competency questionnaire and scores it by category.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the question banks, where to find them
    /// and how to name the reports. Without it, the four standard banks are searched in the
    /// `question_banks` directory.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (bank title) The questionnaire to fill, for example 'Personal competencies grades 5-6'.
    #[clap(short, long, value_parser)]
    pub bank: Option<String>,

    /// (directory, repeatable) Where to look for the question bank files, relative to the
    /// current directory. Overrides the directories of the configuration file.
    #[clap(long, value_parser)]
    pub bank_dir: Vec<String>,

    /// (static or fuzzy, default fuzzy) How a bank title is turned into a file: the path given
    /// in the configuration, or the best match among the file names.
    #[clap(long, value_parser)]
    pub resolution: Option<String>,

    /// The name of the respondent. It is also used to name the report.
    #[clap(short, long, value_parser)]
    pub name: Option<String>,

    /// The class of the respondent.
    #[clap(long = "class", value_parser)]
    pub class_label: Option<String>,

    /// (list of comma-separated values from 1 to 5) The answers, in question order. An empty value
    /// leaves a question unanswered. Without this option (or --answers-file), the questions are
    /// asked one by one.
    #[clap(short, long, value_parser)]
    pub answers: Option<String>,

    /// (file path) A file with one answer (1 to 5) per line.
    #[clap(long, value_parser)]
    pub answers_file: Option<String>,

    /// (file path) Where to write the Excel report. By default, the report is named after the
    /// respondent.
    #[clap(short, long, value_parser)]
    pub export: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the category summary will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, the program checks that the
    /// computed summary matches it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// If passed as an argument, prints the configured banks and the files they resolve to.
    #[clap(long, takes_value = false)]
    pub list_banks: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}

// Collecting the answers of the respondent.

use std::io::BufRead;

use likert_scoring::session::Session;

use crate::survey::*;

/// Parses one answer as written by the respondent (1..5) into a selection
/// index (0..4). An empty answer is `None`.
pub fn parse_answer(position: usize, s: &str) -> SurveyResult<Option<u8>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    match s.parse::<u8>() {
        Ok(x) if (1..=LIKERT_POINTS).contains(&x) => Ok(Some(x - 1)),
        _ => InvalidAnswerSnafu {
            position,
            content: s,
        }
        .fail(),
    }
}

fn apply_answers<'a, I>(session: &mut Session, answers: I) -> SurveyResult<()>
where
    I: Iterator<Item = &'a str>,
{
    let answers: Vec<&str> = answers.collect();
    let count = session.question_count();
    ensure!(
        answers.len() <= count,
        TooManyAnswersSnafu {
            given: answers.len(),
            count
        }
    );
    for (idx, s) in answers.iter().enumerate() {
        if let Some(choice) = parse_answer(idx + 1, s)? {
            session.answer(idx, choice).context(ScoringSnafu {})?;
        }
    }
    debug!(
        "apply_answers: {} answers, {} remaining",
        session.responses().len(),
        session.remaining()
    );
    Ok(())
}

/// Applies a comma-separated list of answers, in question order. Empty
/// entries leave the question unanswered.
pub fn apply_answer_list(session: &mut Session, list: &str) -> SurveyResult<()> {
    apply_answers(session, list.split(','))
}

/// Applies the answers of a file with one answer per line. Trailing empty
/// lines are ignored.
pub fn apply_answer_lines(session: &mut Session, contents: &str) -> SurveyResult<()> {
    let mut lines: Vec<&str> = contents.lines().collect();
    while lines.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
        lines.pop();
    }
    apply_answers(session, lines.into_iter())
}

/// Asks every question in turn on `output` and reads the answers from
/// `input`.
///
/// An empty line leaves the question unanswered, `q` (or the end of the
/// input) stops the questionnaire. Invalid answers are asked again. Once all
/// the questions were asked, the unanswered ones are asked again until the
/// form is complete.
pub fn prompt_answers<R: BufRead, W: std::io::Write>(
    session: &mut Session,
    entries: &[QuestionBankEntry],
    mut input: R,
    mut output: W,
) -> SurveyResult<()> {
    writeln!(
        output,
        "{}\nHow much are the following statements like you? (1-5, empty to skip, q to stop)",
        session.bank().unwrap_or_default()
    )
    .context(WritingPromptSnafu {})?;
    for level in LIKERT_LEVELS.iter() {
        writeln!(output, "  {}", level).context(WritingPromptSnafu {})?;
    }

    let mut pass: usize = 0;
    'passes: loop {
        let pending: Vec<usize> = (0..entries.len())
            .filter(|idx| session.responses().get(*idx).is_none())
            .collect();
        if pending.is_empty() {
            break;
        }
        if pass > 0 {
            writeln!(output, "{} question(s) still unanswered.", pending.len())
                .context(WritingPromptSnafu {})?;
        }
        pass += 1;
        debug!("prompt_answers: pass {}, {} questions", pass, pending.len());

        for idx in pending {
            loop {
                write!(output, "{}. {} > ", idx + 1, entries[idx].question)
                    .context(WritingPromptSnafu {})?;
                output.flush().context(WritingPromptSnafu {})?;
                let mut line = String::new();
                let n = input.read_line(&mut line).context(ReadingAnswersSnafu {})?;
                if n == 0 || line.trim().eq_ignore_ascii_case("q") {
                    break 'passes;
                }
                match parse_answer(idx + 1, &line) {
                    Ok(Some(choice)) => {
                        session.answer(idx, choice).context(ScoringSnafu {})?;
                        break;
                    }
                    Ok(None) => break,
                    Err(e) => {
                        writeln!(output, "{}", e).context(WritingPromptSnafu {})?;
                    }
                }
            }
        }
    }
    Ok(())
}

/*!

This is the long-form manual for `likert_scoring` and the `likertsurvey` command.

## Question banks

A question bank is an Excel (.xlsx) file with one worksheet. The first row is the header.
Three columns are looked up by name:

| logical field | accepted header names (first match wins)                       | required |
|---------------|----------------------------------------------------------------|----------|
| question      | `question`, `question_text`, `statement`, `item`, `text`       | yes      |
| category      | `category`, `dimension`                                        | yes      |
| reversed      | `is_reversed`, `reversed`, `flipped`                           | no       |

Header names are compared after trimming, lowercasing, removing accents and replacing
whitespace with underscores, so `Question Text` and `question_text` are the same column.
The header names of the Hungarian banks (`Kérdés`, `Kategória`, `Inverz`, ...)
are accepted after the English ones.

A question is reverse-scored when its reversed cell reads `yes`, `true`, `1`, `y`
(or `igen`), in any case. Rows with an empty question are skipped.

```text
| Question                         | Category | Is reversed |
|----------------------------------|----------|-------------|
| I know what I am good at.        | A        | no          |
| I often give up on hard tasks.   | C        | yes         |
```

## Scoring

Each answer is one of five levels, from `1 – Not at all like me` to `5 – Completely like me`.
The point value of a reverse-scored question is `6 - answer`. Questions are grouped by their
category code; each group gets its number of items, its total and its mean. The codes `A` to `H`
are the eight competency dimensions and are shown with their names; any other code is kept as is.

## Finding the bank file

With the default `fuzzy` resolution the bank title is turned into a set of required words
(the topic, the domain word, the grade range and the grade marker) and every `.xlsx` file in
the bank directories whose name contains all of them is a candidate. The candidate with the
shortest name wins. If nothing matches, the search is repeated once with the full spelling of the
grade marker. Accents, case and separators in file names do not matter:
`Personal_Competencies-5-6 grade.xlsx` matches the title `Personal competencies grades 5-6`.

With the `static` resolution each title is mapped to a `filePath` in the configuration file.

## Configuration

The program works without configuration. A JSON file can be given with `--config`:

```json
{
  "banks": [
    { "title": "Személyes kompetencia 5-6 osztály" },
    { "title": "Társas kompetencia 7-8 osztály", "filePath": "banks/Tarsas_7-8.xlsx" }
  ],
  "bankDirectories": ["KERDESBANKOK"],
  "resolution": "fuzzy",
  "outputDirectory": "results",
  "exportFilePrefix": "kompetencia_eredmeny_",
  "defaultRespondentName": "tanulo",
  "resolverVocabulary": {
    "topicTokens": ["szemelyes", "tarsas"],
    "domainToken": "kompetenciak",
    "gradeRanges": [["5", "6"], ["7", "8"]],
    "gradeMarker": "oszt",
    "gradeMarkerFull": "osztaly"
  }
}
```

Relative paths are resolved from the directory of the configuration file. Options given on the
command line take precedence.

## Output

The report is an Excel file with four worksheets:
 - `responses`: one row per question, with the category, the question, whether it is reversed,
   the selected value and the score.
 - `transformed`: the same table with short column names, for further processing.
 - `categories`: item count, total and mean per category.
 - `categories_wide`: a single row with the mean of each category in its own column.

The file is named after the respondent (`competency_results_Anna_Kovacs.xlsx`).
A JSON summary can also be written with `--out`, and checked against a previous summary with
`--reference`.

 */

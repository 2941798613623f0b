//! Plain-text rendering of generated questions, and the per-run
//! question log.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::generation::Question;

const RULE_WIDTH: usize = 70;

/// Renders questions the way they appear on screen and in the log:
/// numbered stems, lettered options with the correct one marked, then
/// the answer letter and explanation.
pub fn format_questions(questions: &[Question]) -> String {
    let mut out = String::new();

    for (number, question) in questions.iter().enumerate() {
        out.push_str(&format!("QUESTION {}\n", number + 1));
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push('\n');
        out.push_str(question.prompt());
        out.push_str("\n\n");

        for (index, option) in question.options().iter().enumerate() {
            let marker = if index == question.correct_index() {
                '*'
            } else {
                ' '
            };
            out.push_str(&format!("  {marker} {}) {option}\n", option_letter(index)));
        }

        out.push_str(&format!(
            "\nCorrect answer: {}\n",
            option_letter(question.correct_index())
        ));
        if !question.explanation().is_empty() {
            out.push_str(&format!("Explanation: {}\n", question.explanation()));
        }
        out.push('\n');
    }

    out
}

fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// Writes one timestamped log file for this run and returns its path.
/// Failures here are for the caller to report; they never abort a run.
pub fn write_question_log(
    dir: &Path,
    source_label: &str,
    questions: &[Question],
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let now = Local::now();
    let path = dir.join(format!("questions_{}.txt", now.format("%Y%m%d_%H%M%S")));

    let mut file = fs::File::create(&path)?;
    writeln!(file, "Source: {source_label}")?;
    writeln!(file, "Date: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(file)?;
    file.write_all(format_questions(questions).as_bytes())?;

    Ok(path)
}

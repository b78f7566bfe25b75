//! Multiple-Choice Question Parsing
//!
//! The MCQ block written by the model is only loosely formatted, so parsing is
//! split in two steps. Every line is first classified into a tagged token
//! (question, option, answer, ...) by a fixed precedence table, then a single
//! reducer folds the tokens into a draft question.
//!
//! Two passes share that machinery. The structured pass trusts labels such as
//! `Question:` and `Options:`. When it cannot recover a question with at least
//! two options, a lenient pass re-reads the lines with looser rules. If that
//! also fails, the caller gets `None` and must show the raw text verbatim.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::LazyLock};
use tracing::debug;

/// An option line such as `A) Mitochondria` or `C. Nucleus`.
static CHOICE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*([A-D])[.)]").unwrap());
static STANDALONE_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-D])\b").unwrap());
static QUESTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^question\s*:?\s*").unwrap());

/// Lines shorter than this are never promoted to a question by the lenient pass.
const MIN_QUESTION_LEN: usize = 10;

/// One of the four answer letters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; 4] = [Self::A, Self::B, Self::C, Self::D];

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

impl fmt::Display for AnswerLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("expected one of A, B, C or D, got '{0}'")]
pub struct InvalidLetter(pub String);

impl FromStr for AnswerLetter {
    type Err = InvalidLetter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| InvalidLetter(s.to_string())),
            _ => Err(InvalidLetter(s.to_string())),
        }
    }
}

/// A multiple-choice question recovered from model output.
///
/// Only constructed when a non-empty question and at least two options were
/// found.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMcq {
    pub question: String,
    /// Option lines verbatim, letter prefix included (`"A) Molecule"`).
    pub options: Vec<String>,
    pub correct_answer: AnswerLetter,
    /// `false` when no answer letter was found and `correct_answer` is the `A` default.
    pub answer_confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl ParsedMcq {
    /// Returns the option line carrying `letter`, if the model offered one.
    pub fn option_for(&self, letter: AnswerLetter) -> Option<&str> {
        self.options
            .iter()
            .map(String::as_str)
            .find(|option| option_letter(option) == Some(letter))
    }

    pub fn is_correct(&self, letter: AnswerLetter) -> bool {
        self.correct_answer == letter
    }
}

/// Reads the letter prefix of an option line.
pub fn option_letter(option: &str) -> Option<AnswerLetter> {
    CHOICE
        .captures(option)
        .and_then(|caps| caps[1].chars().next())
        .and_then(AnswerLetter::from_char)
}

/// Returns the option text without its letter prefix.
pub fn option_text(option: &str) -> &str {
    match CHOICE.find(option) {
        Some(prefix) => option[prefix.end()..].trim(),
        None => option.trim(),
    }
}

/// Renders an option in the `"<Letter>) <text>"` form used for answer matching.
pub fn render_option(letter: AnswerLetter, text: &str) -> String {
    format!("{}) {}", letter, text.trim())
}

/// Finds the first standalone answer letter in `text`.
fn answer_letter(text: &str) -> Option<AnswerLetter> {
    STANDALONE_LETTER
        .captures(text)
        .and_then(|caps| caps[1].chars().next())
        .and_then(AnswerLetter::from_char)
}

/// Returns the text after `label`, skipping a colon that follows it.
///
/// `lower` must be the ASCII-lowercased `line` so byte offsets line up.
fn after_label<'a>(line: &'a str, lower: &str, label: &str) -> &'a str {
    let Some(at) = lower.find(label) else {
        return line.trim();
    };
    let rest = &line[at + label.len()..];
    match rest.find(':') {
        Some(colon) => rest[colon + 1..].trim(),
        None => rest.trim(),
    }
}

fn is_markup(line: &str) -> bool {
    line.starts_with("---") || line.starts_with('*')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Structured,
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Question,
    OptionsHeader,
    Choice,
    Answer,
    Explanation,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Token<'a> {
    kind: LineKind,
    text: &'a str,
}

impl<'a> Token<'a> {
    fn new(kind: LineKind, text: &'a str) -> Self {
        Self { kind, text }
    }
}

impl Pass {
    /// Tags a trimmed line. Blank lines and markdown decoration yield `None`.
    fn classify(self, line: &str) -> Option<Token<'_>> {
        if line.is_empty() || is_markup(line) {
            return None;
        }
        let lower = line.to_ascii_lowercase();

        let token = match self {
            Pass::Structured => {
                if lower.contains("question") && line.contains(':') {
                    Token::new(LineKind::Question, after_label(line, &lower, "question"))
                } else if lower.contains("options") || lower.contains("choices") {
                    Token::new(LineKind::OptionsHeader, "")
                } else if CHOICE.is_match(line) {
                    Token::new(LineKind::Choice, line)
                } else if lower.contains("correct answer")
                    || (lower.contains("answer") && line.contains(':'))
                {
                    Token::new(LineKind::Answer, after_label(line, &lower, "answer"))
                } else if lower.contains("explanation") {
                    Token::new(LineKind::Explanation, after_label(line, &lower, "explanation"))
                } else {
                    Token::new(LineKind::Text, line)
                }
            }
            Pass::Lenient => {
                if CHOICE.is_match(line) {
                    Token::new(LineKind::Choice, line)
                } else if lower.contains("answer") || lower.contains("correct") {
                    Token::new(LineKind::Answer, after_label(line, &lower, "answer"))
                } else if lower.contains("explanation") {
                    Token::new(LineKind::Explanation, after_label(line, &lower, "explanation"))
                } else {
                    Token::new(LineKind::Text, line)
                }
            }
        };
        Some(token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Question,
    Options,
    Answer,
    Explanation,
}

#[derive(Debug, Default)]
struct Draft {
    question: String,
    options: Vec<String>,
    answer: Option<AnswerLetter>,
    explanation: String,
}

fn append(target: &mut String, text: &str) {
    if target.is_empty() {
        target.push_str(text);
    } else {
        target.push(' ');
        target.push_str(text);
    }
}

impl Draft {
    fn is_complete(&self) -> bool {
        !self.question.trim().is_empty() && self.options.len() >= 2
    }

    fn into_parsed(self) -> Option<ParsedMcq> {
        if !self.is_complete() {
            return None;
        }
        let explanation = self.explanation.trim();
        Some(ParsedMcq {
            question: self.question.trim().to_string(),
            options: self.options,
            correct_answer: self.answer.unwrap_or(AnswerLetter::A),
            answer_confirmed: self.answer.is_some(),
            explanation: (!explanation.is_empty()).then(|| explanation.to_string()),
        })
    }
}

/// Folds tokens into a [`Draft`], tracking which section continuation lines belong to.
struct Reducer {
    pass: Pass,
    section: Section,
    draft: Draft,
}

impl Reducer {
    fn new(pass: Pass) -> Self {
        Self {
            pass,
            section: Section::Question,
            draft: Draft::default(),
        }
    }

    fn feed(&mut self, token: Token<'_>) {
        let draft = &mut self.draft;
        match token.kind {
            LineKind::Question => {
                self.section = Section::Question;
                draft.question = token.text.to_string();
            }
            LineKind::OptionsHeader => self.section = Section::Options,
            LineKind::Choice => {
                self.section = Section::Options;
                draft.options.push(token.text.to_string());
            }
            LineKind::Answer => {
                self.section = Section::Answer;
                if let Some(letter) = answer_letter(token.text) {
                    draft.answer = Some(letter);
                }
            }
            LineKind::Explanation => {
                self.section = Section::Explanation;
                draft.explanation = token.text.to_string();
            }
            LineKind::Text => match self.pass {
                Pass::Structured => match self.section {
                    Section::Question => append(&mut draft.question, token.text),
                    Section::Options => {
                        let starts_with_letter =
                            token.text.starts_with(|c: char| matches!(c, 'A'..='D'));
                        if let Some(last) = draft.options.last_mut() {
                            if !starts_with_letter {
                                append(last, token.text);
                            }
                        }
                    }
                    Section::Explanation => append(&mut draft.explanation, token.text),
                    Section::Answer => {}
                },
                Pass::Lenient => {
                    if draft.question.is_empty() && token.text.chars().count() > MIN_QUESTION_LEN {
                        draft.question = QUESTION_LABEL.replace(token.text, "").trim().to_string();
                    }
                }
            },
        }
    }
}

fn reduce(pass: Pass, lines: &[&str]) -> Draft {
    let mut reducer = Reducer::new(pass);
    for token in lines.iter().filter_map(|line| pass.classify(line)) {
        reducer.feed(token);
    }
    reducer.draft
}

/// Last resort for the lenient pass: the first substantial non-option line.
fn fallback_question<'a>(lines: &[&'a str]) -> &'a str {
    lines
        .iter()
        .copied()
        .find(|line| {
            line.chars().count() > MIN_QUESTION_LEN
                && !CHOICE.is_match(line)
                && !line.to_ascii_lowercase().contains("answer")
                && !line.starts_with("**")
        })
        .or_else(|| lines.first().copied())
        .unwrap_or_default()
}

/// Parses an MCQ block into a [`ParsedMcq`].
///
/// Returns `None` when no question with at least two options can be
/// recovered; the caller should then display `raw` untouched.
pub fn extract_mcq(raw: &str) -> Option<ParsedMcq> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let structured = reduce(Pass::Structured, &lines);
    if structured.is_complete() {
        return structured.into_parsed();
    }

    debug!(
        question_found = !structured.question.is_empty(),
        options = structured.options.len(),
        "Structured MCQ pass incomplete, retrying leniently"
    );
    if lines.len() < 2 {
        return None;
    }

    let mut lenient = reduce(Pass::Lenient, &lines);
    if lenient.question.is_empty() {
        lenient.question = fallback_question(&lines).to_string();
    }
    lenient.into_parsed()
}

//! Structured Response Extraction
//!
//! This module splits the free-form text returned by the model into the headed
//! sections the learning UI renders: an introduction, a numbered list of
//! learning pathways, the raw multiple-choice question block and, for output
//! produced by the retrieval script, a numbered list of sources.
//!
//! Extraction is pure and total. A missing or malformed section degrades to an
//! empty field; nothing here returns an error or panics on input.

use crate::mcq::{ParsedMcq, extract_mcq};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Marker printed by the retrieval script right before the model's answer.
pub const SCRIPT_ANSWER_MARKER: &str = "🤖 Answer:";

static INTRODUCTION: LazyLock<Regex> = LazyLock::new(|| heading("INTRODUCTION"));
static LEARNING_PATHWAYS: LazyLock<Regex> = LazyLock::new(|| heading("LEARNING PATHWAYS"));
static MCQ_QUESTION: LazyLock<Regex> = LazyLock::new(|| heading("MCQ QUESTION"));

/// The script's `📚 Sources:` banner (optionally `(Top N)`), or a bare `Sources:` line.
///
/// Anchored to the start of a line so prose such as "two energy sources:" never matches.
/// The script sometimes prints a literal `\n` before its banners.
static SOURCES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[^\S\n]*(?:\\n)?(?:📚[^\S\n]*sources\b[^:\n]*:|sources:[^\S\n]*$)").unwrap()
});
static RESPONSE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[^\S\n]*(?:\\n)?(?:⏱|response time:)").unwrap()
});

/// A list item such as `3. Cell Respiration`.
static NUMBERED_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\.").unwrap());

/// Builds a case-insensitive matcher for a bold section heading.
///
/// A qualifier opening with `(` or `:` is tolerated inside the bold span, so
/// `**MCQ QUESTION**` and `**MCQ QUESTION:**` open the same section while a bold
/// topic like `**Introduction to Genetics**` does not.
fn heading(name: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)\*\*\s*{}\s*(?:[(:][^*\n]*)?\*\*",
        regex::escape(name)
    ))
    .unwrap()
}

/// The typed result of extracting one model response.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LearningContent {
    pub introduction: String,
    pub learning_pathways: Vec<String>,
    /// The MCQ block exactly as the model wrote it. See [`LearningContent::parsed_mcq`].
    pub mcq_question: String,
    pub sources: Vec<String>,
}

impl LearningContent {
    /// Parses the raw MCQ block, returning `None` when the UI should show it verbatim.
    pub fn parsed_mcq(&self) -> Option<ParsedMcq> {
        extract_mcq(&self.mcq_question)
    }
}

/// Returns the text between `start` and the earliest of `ends` (or end of text).
fn section<'a>(text: &'a str, start: &Regex, ends: &[&Regex]) -> Option<&'a str> {
    let body = &text[start.find(text)?.end()..];
    let end = ends
        .iter()
        .filter_map(|re| re.find(body))
        .map(|m| m.start())
        .min()
        .unwrap_or(body.len());
    Some(&body[..end])
}

fn numbered_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| NUMBERED_LINE.is_match(line))
        .map(|line| line.trim().to_string())
        .collect()
}

/// Splits a model response into its headed sections.
///
/// `sources` stays empty; only [`extract_script_output`] reads a sources list.
pub fn extract_learning_content(raw: &str) -> LearningContent {
    let introduction = section(raw, &INTRODUCTION, &[&LEARNING_PATHWAYS, &MCQ_QUESTION])
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let learning_pathways = section(raw, &LEARNING_PATHWAYS, &[&MCQ_QUESTION, &SOURCES])
        .map(numbered_lines)
        .unwrap_or_default();

    let mcq_question = section(raw, &MCQ_QUESTION, &[&SOURCES, &RESPONSE_TIME])
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    LearningContent {
        introduction,
        learning_pathways,
        mcq_question,
        sources: Vec::new(),
    }
}

/// Collects the numbered lines printed after a `Sources:` marker.
///
/// Scanning stops at the `Response time:` footer even if no sources were seen.
pub fn extract_sources(raw: &str) -> Vec<String> {
    let mut capturing = false;
    let mut sources = Vec::new();

    for line in raw.lines() {
        if SOURCES.is_match(line) {
            capturing = true;
            continue;
        }
        if RESPONSE_TIME.is_match(line) {
            break;
        }
        if capturing && NUMBERED_LINE.is_match(line) {
            sources.push(line.trim().to_string());
        }
    }

    sources
}

/// Extracts the full stdout of the retrieval script.
///
/// Sections are read from the text after [`SCRIPT_ANSWER_MARKER`] so the
/// banner cannot be mistaken for content; sources come from the whole output.
pub fn extract_script_output(raw: &str) -> LearningContent {
    let answer = raw
        .split_once(SCRIPT_ANSWER_MARKER)
        .map(|(_, answer)| answer)
        .unwrap_or(raw);

    LearningContent {
        sources: extract_sources(raw),
        ..extract_learning_content(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESPONSE: &str = "**INTRODUCTION**
Photosynthesis converts light energy into chemical energy.

It happens in chloroplasts.

**LEARNING PATHWAYS**
1. **Chloroplast Structure**: where the reactions happen
2. **Calvin Cycle**: how carbon is fixed
Some commentary the model added.
3. **Cellular Respiration**: the reverse process

**MCQ QUESTION**
Question: Where does photosynthesis take place?
A) Mitochondria
B) Chloroplasts
C) Nucleus
D) Ribosomes
Correct Answer: B";

    #[test]
    fn test_extracts_all_sections() {
        let content = extract_learning_content(FULL_RESPONSE);

        assert_eq!(
            content.introduction,
            "Photosynthesis converts light energy into chemical energy.\n\nIt happens in chloroplasts."
        );
        assert_eq!(
            content.learning_pathways,
            vec![
                "1. **Chloroplast Structure**: where the reactions happen",
                "2. **Calvin Cycle**: how carbon is fixed",
                "3. **Cellular Respiration**: the reverse process",
            ]
        );
        assert!(content.mcq_question.starts_with("Question: Where does photosynthesis"));
        assert!(content.mcq_question.ends_with("Correct Answer: B"));
        assert!(content.sources.is_empty());
    }

    #[test]
    fn test_pathways_keep_only_numbered_lines() {
        let raw = "**LEARNING PATHWAYS**\n1. A\n2. B\nnot-numbered\n**MCQ QUESTION**\nQuestion: x";
        let content = extract_learning_content(raw);
        assert_eq!(content.learning_pathways, vec!["1. A", "2. B"]);
    }

    #[test]
    fn test_missing_mcq_heading_yields_empty_question() {
        let raw = "**INTRODUCTION**\nCells are small.\n**LEARNING PATHWAYS**\n1. Organelles";
        let content = extract_learning_content(raw);

        assert_eq!(content.introduction, "Cells are small.");
        assert_eq!(content.learning_pathways, vec!["1. Organelles"]);
        assert_eq!(content.mcq_question, "");
        assert!(content.parsed_mcq().is_none());
    }

    #[test]
    fn test_headings_are_case_insensitive_and_reorderable() {
        let raw = "**mcq question**\nQuestion: Q?\nA) x\nB) y\n**Introduction**\nIntro text";
        let content = extract_learning_content(raw);

        assert_eq!(content.introduction, "Intro text");
        // The MCQ section has no later boundary marker, so it runs to the end.
        assert!(content.mcq_question.contains("**Introduction**"));
    }

    #[test]
    fn test_headings_with_trailing_qualifiers() {
        let raw = "**INTRODUCTION (approximately 200-250 words):**\nEnzymes are catalysts.\n\n\
                   **LEARNING PATHWAYS (3 recommendations):**\n1. Kinetics: rates\n\n\
                   **MCQ QUESTION:**\nQuestion: What lowers activation energy?";
        let content = extract_learning_content(raw);

        assert_eq!(content.introduction, "Enzymes are catalysts.");
        assert_eq!(content.learning_pathways, vec!["1. Kinetics: rates"]);
        assert_eq!(content.mcq_question, "Question: What lowers activation energy?");
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert_eq!(extract_learning_content(""), LearningContent::default());
        assert_eq!(
            extract_learning_content("The model refused to answer."),
            LearningContent::default()
        );
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let first = serde_json::to_string(&extract_learning_content(FULL_RESPONSE)).unwrap();
        let second = serde_json::to_string(&extract_learning_content(FULL_RESPONSE)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_script_output_with_sources() {
        let raw = "🎓 Biology Learning RAG
❓ Topic: mitosis
━━━━━━━━━━
\\n🤖 Answer:
**INTRODUCTION**
Mitosis divides one nucleus into two.
**LEARNING PATHWAYS**
1. Meiosis
2. Cell cycle checkpoints
\\n📚 Sources:
  1. Relevance: 0.812 | Mitosis is a process of nuclear division...
  2. Relevance: 0.774 | During prophase the chromatin condenses...
**MCQ QUESTION**
Question: How many daughter cells does mitosis produce?
\\n⏱️  Response time: 1840ms (1.8s)
  3. Not a source";
        let content = extract_script_output(raw);

        assert_eq!(content.introduction, "Mitosis divides one nucleus into two.");
        assert_eq!(content.learning_pathways, vec!["1. Meiosis", "2. Cell cycle checkpoints"]);
        assert!(
            content
                .mcq_question
                .starts_with("Question: How many daughter cells does mitosis produce?")
        );
        assert!(!content.mcq_question.contains("Response time"));
        assert_eq!(
            content.sources,
            vec![
                "1. Relevance: 0.812 | Mitosis is a process of nuclear division...",
                "2. Relevance: 0.774 | During prophase the chromatin condenses...",
            ]
        );
    }

    #[test]
    fn test_sources_stop_at_response_time() {
        let raw = "Sources:\n1. first\nResponse time: 10ms\n2. second";
        assert_eq!(extract_sources(raw), vec!["1. first"]);
        assert!(extract_sources("1. no marker").is_empty());
    }

    #[test]
    fn test_sources_in_prose_are_not_a_marker() {
        let raw = "**INTRODUCTION**
Cells rely on two energy sources: glucose and fatty acids.

**LEARNING PATHWAYS**
1. **Glycolysis**: how glucose is split
2. **Nutrition**: dietary sources: carbohydrates and fats
3. **Beta Oxidation**: how fats are broken down

**MCQ QUESTION**
Question: Which pathway splits glucose?
A) Glycolysis
B) Beta oxidation
Correct Answer: A";
        let content = extract_learning_content(raw);

        assert_eq!(
            content.introduction,
            "Cells rely on two energy sources: glucose and fatty acids."
        );
        assert_eq!(
            content.learning_pathways,
            vec![
                "1. **Glycolysis**: how glucose is split",
                "2. **Nutrition**: dietary sources: carbohydrates and fats",
                "3. **Beta Oxidation**: how fats are broken down",
            ]
        );
        assert!(content.sources.is_empty());
        assert!(extract_script_output(raw).sources.is_empty());
        assert!(extract_sources(raw).is_empty());
    }

    #[test]
    fn test_bold_topic_is_not_a_heading() {
        let raw = "## Introduction
Genetics studies heredity.
**LEARNING PATHWAYS**
1. **Introduction to Population Genetics**: allele frequencies
2. **Food Webs**: energy flow
**MCQ QUESTION**
Question: What is an allele?";
        let content = extract_learning_content(raw);

        assert_eq!(content.introduction, "");
        assert_eq!(
            content.learning_pathways,
            vec![
                "1. **Introduction to Population Genetics**: allele frequencies",
                "2. **Food Webs**: energy flow",
            ]
        );
        assert_eq!(content.mcq_question, "Question: What is an allele?");
    }

    #[test]
    fn test_sources_banner_with_count() {
        let raw = "🤖 Answer:\n**INTRODUCTION**\nRibosomes build proteins.\n\
                   **LEARNING PATHWAYS**\n1. Protein synthesis\n\
                   📚 Sources (Top 2):\n  1. Relevance: 0.9 | Ribosomes...\n  2. Relevance: 0.8 | Translation...\n\
                   ⏱️  Response time: 900ms";
        let content = extract_script_output(raw);

        assert_eq!(content.introduction, "Ribosomes build proteins.");
        assert_eq!(content.learning_pathways, vec!["1. Protein synthesis"]);
        assert_eq!(
            content.sources,
            vec!["1. Relevance: 0.9 | Ribosomes...", "2. Relevance: 0.8 | Translation..."]
        );
    }

    #[test]
    fn test_content_serializes_camel_case() {
        let json = serde_json::to_value(LearningContent::default()).unwrap();
        assert!(json.get("learningPathways").is_some());
        assert!(json.get("mcqQuestion").is_some());
    }
}

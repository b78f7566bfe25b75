//! Word Explanations
//!
//! Parsing of the labelled explanation format the word prompt asks for, plus
//! the canned explanations served in demo mode.

use serde::{Deserialize, Serialize};

const EXPLANATION: &str = "Explanation:";
const CONTEXT: &str = "Context:";
const ETYMOLOGY: &str = "Etymology:";
const ALTERNATIVES: &str = "Alternative Words:";

/// Number of characters of raw text kept when no `Explanation:` line exists.
const SUMMARY_CHARS: usize = 200;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WordExplanation {
    pub word: String,
    pub explanation: String,
    pub context: String,
    pub etymology: String,
    pub alternatives: Vec<String>,
}

impl WordExplanation {
    /// Reads the labelled lines of `raw`, filling gaps with neutral defaults.
    pub fn parse(word: &str, raw: &str) -> Self {
        let mut explanation = None;
        let mut context = None;
        let mut etymology = None;
        let mut alternatives = Vec::new();

        for line in raw.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix(EXPLANATION) {
                explanation = Some(rest.trim().to_string());
            } else if let Some(rest) = line.strip_prefix(CONTEXT) {
                context = Some(rest.trim().to_string());
            } else if let Some(rest) = line.strip_prefix(ETYMOLOGY) {
                etymology = Some(rest.trim().to_string());
            } else if let Some(rest) = line.strip_prefix(ALTERNATIVES) {
                alternatives = rest
                    .split(',')
                    .map(str::trim)
                    .filter(|alt| !alt.is_empty())
                    .map(str::to_string)
                    .collect();
            }
        }

        Self {
            word: word.to_string(),
            explanation: explanation.unwrap_or_else(|| summarize(raw)),
            context: context.unwrap_or_else(|| "Used in biology context".to_string()),
            etymology: etymology.unwrap_or_else(|| "Etymology information available".to_string()),
            alternatives,
        }
    }
}

fn summarize(raw: &str) -> String {
    let raw = raw.trim();
    if raw.chars().count() <= SUMMARY_CHARS {
        return raw.to_string();
    }
    let mut summary: String = raw.chars().take(SUMMARY_CHARS).collect();
    summary.push_str("...");
    summary
}

struct DemoWord {
    word: &'static str,
    explanation: &'static str,
    context: &'static str,
    etymology: &'static str,
    alternatives: &'static str,
}

const DEMO_WORDS: [DemoWord; 3] = [
    DemoWord {
        word: "photosynthesis",
        explanation: "Photosynthesis is the process by which green plants and some other organisms use sunlight to synthesize foods with the help of chlorophyll.",
        context: "In biology, photosynthesis is fundamental to understanding how plants produce energy and release oxygen that supports life on Earth.",
        etymology: "From Greek 'photos' (light) and 'synthesis' (putting together), literally meaning 'putting together with light'.",
        alternatives: "light synthesis, chlorophyll process, plant energy production, carbon fixation",
    },
    DemoWord {
        word: "dna",
        explanation: "DNA (deoxyribonucleic acid) is the hereditary material that contains genetic instructions for the development of all living organisms.",
        context: "In genetics, DNA is the molecule that stores genetic information and passes traits from parents to offspring.",
        etymology: "Named for its chemical structure: 'deoxy' (lacking oxygen), 'ribose' (a sugar), and 'nucleic acid'.",
        alternatives: "genetic material, hereditary molecule, genetic code, genome",
    },
    DemoWord {
        word: "cell",
        explanation: "Cells are the smallest structural and functional units of life, containing all the necessary components for an organism to survive.",
        context: "In cell biology, understanding cell structure and function is essential for comprehending how all living organisms operate.",
        etymology: "From Latin 'cella' meaning 'small room', named by Robert Hooke who observed cork cells under a microscope.",
        alternatives: "cellular unit, biological unit, life unit, organism building block",
    },
];

/// A deterministic explanation in the labelled format, used without credentials.
pub fn demo_explanation(word: &str, context: &str) -> String {
    let key = word.trim().to_lowercase();
    match DEMO_WORDS.iter().find(|demo| demo.word == key) {
        Some(demo) => format!(
            "{EXPLANATION} {}\n{CONTEXT} {}\n{ETYMOLOGY} {}\n{ALTERNATIVES} {}",
            demo.explanation, demo.context, demo.etymology, demo.alternatives
        ),
        None => format!(
            "{EXPLANATION} {} is an important term in {context}.\n\
             {CONTEXT} This term is commonly used in {context} to describe key concepts and processes.\n\
             {ETYMOLOGY} The word has roots in scientific terminology developed over centuries of study.\n\
             {ALTERNATIVES} concept, term, element, component",
            title_case(word.trim())
        ),
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

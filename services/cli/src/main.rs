//! `biolearn` command-line front end.
//!
//! Wraps the same content services as the HTTP API: topics are learned in
//! order into a `LearningJourney`, each with its quiz answered or skipped
//! before the follow-up pathways are shown.

mod cli;

use anyhow::{Context, Result, bail};
use biolearn_core::{
    AnswerLetter, LearningContent, ParsedMcq,
    content::{ContentService, build_content_service},
    extract_learning_content, extract_script_output,
    journey::{LearningJourney, TopicResult},
    pathway::pathway_cards,
    prompts::load_prompts,
    quiz::{Quiz, QuizState},
    word::WordExplanation,
};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Command, LlmArgs};
use serde::Serialize;
use std::{
    io::{self, Read, Write},
    path::Path,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ParseOutput {
    #[serde(flatten)]
    content: LearningContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    mcq: Option<ParsedMcq>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(io::stderr)
        .init();

    let mut out = io::stdout().lock();
    match cli.command {
        Command::Learn {
            topics,
            answer,
            json,
        } => {
            let service = content_service(&cli.llm)?;
            let journey = learn(
                service.as_ref(),
                &topics,
                answer,
                cli.llm.timeout(),
                json,
                &mut out,
            )
            .await?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(journey.results())?)?;
            }
        }
        Command::Explain {
            word,
            context,
            json,
        } => {
            let service = content_service(&cli.llm)?;
            explain(service.as_ref(), &word, &context, cli.llm.timeout(), json, &mut out).await?;
        }
        Command::Parse { file, script } => {
            let raw = read_input(file.as_deref())?;
            parse(&raw, script, &mut out)?;
        }
    }
    Ok(())
}

fn content_service(llm: &LlmArgs) -> Result<Arc<dyn ContentService>> {
    let prompts = load_prompts(llm.prompts.as_deref()).context("Failed to load prompt templates")?;
    build_content_service(&llm.settings(), prompts)
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read stdin")?;
            Ok(raw)
        }
    }
}

/// Learns each topic in turn, writing a text report unless `json` is set.
async fn learn(
    service: &dyn ContentService,
    topics: &[String],
    answer: Option<AnswerLetter>,
    timeout: Duration,
    json: bool,
    out: &mut impl Write,
) -> Result<LearningJourney> {
    let mut journey = LearningJourney::new();

    for topic in topics {
        let topic = topic.trim();
        if topic.is_empty() {
            bail!("Topic is required");
        }

        let started = Instant::now();
        let content = tokio::time::timeout(timeout, service.learn_topic(topic))
            .await
            .with_context(|| format!("Request for '{topic}' timed out"))??;
        let response_time = started.elapsed().as_millis() as u64;

        let step = journey.record(TopicResult {
            topic: topic.to_string(),
            content,
            response_time,
            timestamp: Utc::now(),
        });
        info!(%topic, step, response_time, "Topic learned");

        if !json {
            if let Some(result) = journey.latest() {
                write_topic(step, result, answer, out)?;
            }
        }
    }

    Ok(journey)
}

fn write_topic(
    step: usize,
    result: &TopicResult,
    answer: Option<AnswerLetter>,
    out: &mut impl Write,
) -> Result<()> {
    let content = &result.content;
    writeln!(out, "== {step}. {} ({} ms) ==\n", result.topic, result.response_time)?;
    writeln!(out, "{}\n", content.introduction)?;

    let unlocked = match content.parsed_mcq() {
        Some(mcq) => run_quiz(Quiz::new(mcq), answer, out)?,
        None => {
            // Unparseable question: show it as written and keep pathways open.
            if !content.mcq_question.is_empty() {
                writeln!(out, "{}\n", content.mcq_question)?;
            }
            true
        }
    };

    if unlocked && !content.learning_pathways.is_empty() {
        writeln!(out, "Learning pathways:")?;
        for card in pathway_cards(&content.learning_pathways) {
            writeln!(out, "  - {}: {}", card.topic, card.description)?;
        }
        writeln!(out)?;
    }

    if !content.sources.is_empty() {
        writeln!(out, "Sources:")?;
        for source in &content.sources {
            writeln!(out, "  {source}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Answers or skips the quiz and reports the outcome. Returns whether pathways unlocked.
fn run_quiz(mut quiz: Quiz, answer: Option<AnswerLetter>, out: &mut impl Write) -> Result<bool> {
    writeln!(out, "{}", quiz.mcq().question)?;
    for option in &quiz.mcq().options {
        writeln!(out, "  {option}")?;
    }

    match answer {
        Some(letter) => match quiz.select(letter) {
            Ok(()) => {
                quiz.submit()?;
            }
            Err(e) => {
                debug!("Answer not accepted: {}", e);
                writeln!(out, "Answer {letter} not offered; skipping.")?;
                quiz.skip()?;
            }
        },
        None => quiz.skip()?,
    }

    let mcq = quiz.mcq();
    match quiz.state() {
        QuizState::Submitted { correct: true, .. } => writeln!(out, "Correct!")?,
        QuizState::Submitted { correct: false, .. } => {
            writeln!(out, "Not quite. The answer is {}.", mcq.correct_answer)?
        }
        QuizState::Skipped => writeln!(out, "Skipped. The answer is {}.", mcq.correct_answer)?,
        QuizState::Unanswered { .. } => {}
    }
    if !mcq.answer_confirmed {
        writeln!(out, "(The model did not state an answer; {} is assumed.)", mcq.correct_answer)?;
    }
    if let Some(explanation) = &mcq.explanation {
        writeln!(out, "{explanation}")?;
    }
    writeln!(out)?;

    Ok(quiz.unlocks_pathways())
}

async fn explain(
    service: &dyn ContentService,
    word: &str,
    context: &str,
    timeout: Duration,
    json: bool,
    out: &mut impl Write,
) -> Result<WordExplanation> {
    let word = word.trim();
    if word.is_empty() {
        bail!("Word is required");
    }

    let raw = tokio::time::timeout(timeout, service.explain_word(word, context))
        .await
        .with_context(|| format!("Request for '{word}' timed out"))??;
    let details = WordExplanation::parse(word, &raw);

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&details)?)?;
    } else {
        writeln!(out, "{}\n", details.word)?;
        writeln!(out, "{}", details.explanation)?;
        writeln!(out, "Context: {}", details.context)?;
        writeln!(out, "Etymology: {}", details.etymology)?;
        if !details.alternatives.is_empty() {
            writeln!(out, "See also: {}", details.alternatives.join(", "))?;
        }
    }
    Ok(details)
}

fn parse(raw: &str, script: bool, out: &mut impl Write) -> Result<()> {
    let content = if script {
        extract_script_output(raw)
    } else {
        extract_learning_content(raw)
    };
    let output = ParseOutput {
        mcq: content.parsed_mcq(),
        content,
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use biolearn_core::content::DemoContentService;
    use serde_json::Value;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn text(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_learn_records_topics_in_order() {
        let mut out = Vec::new();
        let topics = vec!["Mitosis".to_string(), " Meiosis ".to_string()];
        let journey = learn(&DemoContentService, &topics, None, TIMEOUT, false, &mut out)
            .await
            .unwrap();

        assert_eq!(journey.topics().collect::<Vec<_>>(), ["Mitosis", "Meiosis"]);
        let report = text(out);
        assert!(report.contains("== 1. Mitosis"));
        assert!(report.contains("== 2. Meiosis"));
        assert!(report.contains("Skipped. The answer is B."));
        assert!(report.contains("  - Molecular Biology: 2. aspects of Meiosis"));
    }

    #[tokio::test]
    async fn test_learn_grades_the_given_answer() {
        let topics = vec!["Enzymes".to_string()];

        let mut out = Vec::new();
        learn(&DemoContentService, &topics, Some(AnswerLetter::B), TIMEOUT, false, &mut out)
            .await
            .unwrap();
        assert!(text(out).contains("Correct!"));

        let mut out = Vec::new();
        learn(&DemoContentService, &topics, Some(AnswerLetter::D), TIMEOUT, false, &mut out)
            .await
            .unwrap();
        assert!(text(out).contains("Not quite. The answer is B."));
    }

    #[tokio::test]
    async fn test_learn_rejects_blank_topic() {
        let mut out = Vec::new();
        let err = learn(&DemoContentService, &["  ".to_string()], None, TIMEOUT, false, &mut out)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Topic is required");
    }

    #[tokio::test]
    async fn test_learn_json_mode_writes_nothing_per_topic() {
        let mut out = Vec::new();
        let journey = learn(&DemoContentService, &["DNA".to_string()], None, TIMEOUT, true, &mut out)
            .await
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(journey.len(), 1);
    }

    #[test]
    fn test_unconfirmed_answer_is_flagged() {
        let mcq = biolearn_core::extract_mcq("Question: Which organelle makes ATP?\nA) Nucleus\nB) Mitochondrion")
            .unwrap();
        let mut out = Vec::new();
        let unlocked = run_quiz(Quiz::new(mcq), Some(AnswerLetter::B), &mut out).unwrap();

        assert!(unlocked);
        let report = text(out);
        assert!(report.contains("Not quite. The answer is A."));
        assert!(report.contains("A is assumed"));
    }

    #[test]
    fn test_answer_outside_options_skips() {
        let mcq = biolearn_core::extract_mcq("Question: Which organelle makes ATP?\nA) Nucleus\nB) Mitochondrion\nAnswer: B")
            .unwrap();
        let mut out = Vec::new();
        let unlocked = run_quiz(Quiz::new(mcq), Some(AnswerLetter::D), &mut out).unwrap();

        assert!(unlocked);
        assert!(text(out).contains("Answer D not offered; skipping."));
    }

    #[tokio::test]
    async fn test_explain_uses_demo_table() {
        let mut out = Vec::new();
        let details = explain(&DemoContentService, "DNA", "biology", TIMEOUT, false, &mut out)
            .await
            .unwrap();

        assert_eq!(details.word, "DNA");
        assert_eq!(details.alternatives.len(), 4);
        assert!(text(out).starts_with("DNA\n"));
    }

    #[test]
    fn test_parse_writes_sections_as_json() {
        let raw = "**INTRODUCTION**\nCells are small.\n\n**LEARNING PATHWAYS**\n1. Organelles\n\n\
                   **MCQ QUESTION**\nQuestion: What is a cell?\nA) A unit of life\nB) A rock\nCorrect Answer: A";
        let mut out = Vec::new();
        parse(raw, false, &mut out).unwrap();

        let json: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["introduction"], "Cells are small.");
        assert_eq!(json["learningPathways"][0], "1. Organelles");
        assert_eq!(json["mcq"]["correctAnswer"], "A");
    }

    #[test]
    fn test_read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "🤖 Answer:\n**INTRODUCTION**\nHi").unwrap();

        let raw = read_input(Some(file.path())).unwrap();
        let mut out = Vec::new();
        parse(&raw, true, &mut out).unwrap();

        let json: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["introduction"], "Hi");
        assert!(json.get("mcq").is_none());
    }
}

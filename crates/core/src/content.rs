//! Content Generation Service
//!
//! This module turns a topic or a single word into learning material. The
//! `ContentService` trait is the seam between the HTTP/CLI front ends and the
//! backend: `LLMContentService` asks an OpenAI-compatible model and extracts
//! its sections, while `DemoContentService` answers deterministically when no
//! credential is configured.

use crate::{
    extract::{LearningContent, extract_learning_content},
    llm_client::{ChatPrompt, LLMClient, LlmSettings, OpenAICompatibleClient},
    prompts::{self, EXPLAIN_WORD, LEARN_TOPIC, SYSTEM_PROMPT},
    word,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::{info, warn};

const TOPIC_MAX_TOKENS: u32 = 2000;
const WORD_MAX_TOKENS: u32 = 500;
const EMPTY_EXPLANATION: &str = "No explanation available.";

/// Which backend a service answers from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    Llm,
    Demo,
}

/// Defines the contract for any service that can produce learning content.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Generates the introduction, pathways, MCQ and sources for `topic`.
    async fn learn_topic(&self, topic: &str) -> Result<LearningContent>;

    /// Explains `word` within `context`, in the labelled word-explanation format.
    async fn explain_word(&self, word: &str, context: &str) -> Result<String>;

    fn mode(&self) -> ServiceMode;
}

/// An implementation of `ContentService` backed by an LLM.
pub struct LLMContentService {
    client: Arc<dyn LLMClient>,
    prompts: HashMap<String, String>,
}

impl LLMContentService {
    /// Creates a new LLM-based content service.
    ///
    /// # Arguments
    ///
    /// * `client` - The model client used for every request.
    /// * `prompts` - A map of template strings, which must include the
    ///   `"learn_topic"` and `"explain_word"` keys. `"system_prompt"` is optional.
    pub fn new(client: Arc<dyn LLMClient>, prompts: HashMap<String, String>) -> Self {
        Self { client, prompts }
    }

    fn template(&self, name: &str) -> Result<&str> {
        self.prompts
            .get(name)
            .map(String::as_str)
            .with_context(|| format!("Missing prompt template: '{name}'"))
    }

    fn system_prompt(&self) -> Option<String> {
        self.prompts.get(SYSTEM_PROMPT).map(|p| p.trim().to_string())
    }
}

/// Attribution lines for content the model wrote without retrieval sources.
fn generated_sources(topic: &str, date: NaiveDate) -> Vec<String> {
    vec![
        format!("1. Generated content for \"{topic}\" using AI educational model"),
        format!("2. Biology educational content - {}", date.format("%Y-%m-%d")),
        format!("3. Interactive learning pathway for {topic}"),
    ]
}

#[async_trait]
impl ContentService for LLMContentService {
    async fn learn_topic(&self, topic: &str) -> Result<LearningContent> {
        let prompt = prompts::fill(self.template(LEARN_TOPIC)?, &[("topic", topic)]);

        let answer = self
            .client
            .complete(ChatPrompt {
                system: self.system_prompt(),
                user: prompt,
                max_tokens: TOPIC_MAX_TOKENS,
            })
            .await
            .with_context(|| format!("LLM request for topic '{topic}' failed"))?;

        let content = LearningContent {
            sources: generated_sources(topic, chrono::Utc::now().date_naive()),
            ..extract_learning_content(&answer)
        };
        info!(
            %topic,
            pathways = content.learning_pathways.len(),
            has_mcq = !content.mcq_question.is_empty(),
            "Extracted learning content"
        );
        Ok(content)
    }

    async fn explain_word(&self, word: &str, context: &str) -> Result<String> {
        let prompt = prompts::fill(
            self.template(EXPLAIN_WORD)?,
            &[("word", word), ("context", context)],
        );

        let answer = self
            .client
            .complete(ChatPrompt {
                system: self.system_prompt(),
                user: prompt,
                max_tokens: WORD_MAX_TOKENS,
            })
            .await
            .with_context(|| format!("LLM request for word '{word}' failed"))?;

        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(EMPTY_EXPLANATION.to_string());
        }
        Ok(answer.to_string())
    }

    fn mode(&self) -> ServiceMode {
        ServiceMode::Llm
    }
}

/// A deterministic `ContentService` used when no API key is configured.
pub struct DemoContentService;

#[async_trait]
impl ContentService for DemoContentService {
    async fn learn_topic(&self, topic: &str) -> Result<LearningContent> {
        Ok(LearningContent {
            introduction: format!(
                "This is demo content for \"{topic}\".\n\n\
                 In this educational overview, we explore the fundamental concepts and principles related to {topic}. \
                 This topic plays a crucial role in understanding biological processes and systems.\n\n\
                 Key areas of focus include:\n\
                 - Basic definitions and terminology\n\
                 - Core mechanisms and processes\n\
                 - Biological significance and applications\n\
                 - Connections to other biological concepts\n\n\
                 Understanding {topic} provides students with essential knowledge that serves as a foundation \
                 for more advanced biological studies."
            ),
            learning_pathways: vec![
                format!("1. **Cellular Structure and Function**: related to {topic}"),
                format!("2. **Molecular Biology**: aspects of {topic}"),
                format!("3. **Physiological Processes**: involving {topic}"),
                format!("4. **Evolutionary Perspectives**: on {topic}"),
                format!("5. **Ecological Implications**: of {topic}"),
                format!("6. **Laboratory Techniques**: for studying {topic}"),
                format!("7. **Current Research**: and applications in {topic}"),
            ],
            mcq_question: format!(
                "Question: Which of the following best describes a key characteristic of {topic}?\n\
                 A) It only occurs in prokaryotic organisms\n\
                 B) It is fundamental to many biological processes\n\
                 C) It was discovered in the last decade\n\
                 D) It has no practical applications\n\n\
                 Correct Answer: B"
            ),
            sources: vec![
                format!("1. Demo content for \"{topic}\" - Educational simulation"),
                "2. Biology learning system - Demo mode".to_string(),
            ],
        })
    }

    async fn explain_word(&self, word: &str, context: &str) -> Result<String> {
        Ok(word::demo_explanation(word, context))
    }

    fn mode(&self) -> ServiceMode {
        ServiceMode::Demo
    }
}

/// Picks the LLM backend when `settings` carries a usable key, the demo one otherwise.
pub fn build_content_service(
    settings: &LlmSettings,
    prompts: HashMap<String, String>,
) -> Result<Arc<dyn ContentService>> {
    match settings.credential() {
        Some(api_key) => {
            info!(model = %settings.model, api_base = %settings.api_base, "Using LLM content backend.");
            let client = OpenAICompatibleClient::new(
                settings.openai_config(api_key),
                settings.model.clone(),
                settings.timeout,
            )?;
            Ok(Arc::new(LLMContentService::new(Arc::new(client), prompts)))
        }
        None => {
            warn!("No API key configured; serving demo content.");
            Ok(Arc::new(DemoContentService))
        }
    }
}

//! API Models
//!
//! Request and response bodies for the REST API. Field names are camelCase on
//! the wire to match what the learning UI consumes; `utoipa` derives the
//! OpenAPI schemas from the same types.

use biolearn_core::{
    LearningContent, ParsedMcq, content::ServiceMode, word::WordExplanation,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const SERVICE_NAME: &str = "Biology Learning RAG API";

#[derive(Deserialize, ToSchema, Debug)]
pub struct LearnPayload {
    #[schema(example = "Photosynthesis")]
    pub topic: Option<String>,
}

#[derive(Deserialize, ToSchema, Debug)]
pub struct WordExplanationPayload {
    #[schema(example = "chlorophyll")]
    pub word: Option<String>,
    /// Subject area the word is explained in. Defaults to "biology".
    #[schema(example = "biology")]
    pub context: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LearnResponse {
    pub success: bool,
    pub topic: String,
    pub introduction: String,
    pub learning_pathways: Vec<String>,
    /// The raw MCQ block. Shown verbatim when `mcq` is absent.
    pub mcq_question: String,
    pub sources: Vec<String>,
    #[schema(value_type = Option<Object>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcq: Option<ParsedMcq>,
    /// Upstream time in milliseconds.
    pub response_time: u64,
    pub timestamp: DateTime<Utc>,
}

impl LearnResponse {
    pub fn new(topic: String, content: LearningContent, response_time: u64) -> Self {
        let mcq = content.parsed_mcq();
        Self {
            success: true,
            topic,
            introduction: content.introduction,
            learning_pathways: content.learning_pathways,
            mcq_question: content.mcq_question,
            sources: content.sources,
            mcq,
            response_time,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WordExplanationResponse {
    pub success: bool,
    pub word: String,
    pub explanation: String,
    #[schema(value_type = Object)]
    pub details: WordExplanation,
    pub response_time: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct HealthResponse {
    #[schema(example = "OK")]
    pub status: String,
    pub service: String,
    #[schema(value_type = String, example = "llm")]
    pub mode: ServiceMode,
    pub timestamp: DateTime<Utc>,
}

/// Body of every failed request.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

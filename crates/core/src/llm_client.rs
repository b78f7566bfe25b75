use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse,
    },
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Groq's OpenAI-compatible endpoint.
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_CHAT_MODEL: &str = "llama3-8b-8192";
/// The value shipped in `.env.example`; treated the same as an unset key.
pub const PLACEHOLDER_API_KEY: &str = "your_groq_api_key_here";

const TEMPERATURE: f32 = 0.3;

/// A single-turn request to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system: Option<String>,
    pub user: String,
    pub max_tokens: u32,
}

/// A generic client for interacting with an LLM.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Makes a single, non-streaming completion call and returns the text of the first choice.
    async fn complete(&self, prompt: ChatPrompt) -> Result<String>;
}

/// Connection settings shared by the API service and the CLI.
#[derive(Clone, Debug)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
}

impl LlmSettings {
    /// Returns the API key if it is set to something usable.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    pub fn openai_config(&self, api_key: &str) -> OpenAIConfig {
        OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&self.api_base)
    }
}

/// An implementation of `LLMClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The specific model identifier to use for chat completions (e.g., "llama3-8b-8192").
    /// * `timeout` - Upper bound for a whole request, enforced by the HTTP client.
    pub fn new(config: OpenAIConfig, model: String, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client: Client::with_config(config).with_http_client(http_client),
            model,
        })
    }
}

#[async_trait]
impl LLMClient for OpenAICompatibleClient {
    async fn complete(&self, prompt: ChatPrompt) -> Result<String> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);
        if let Some(system) = prompt.system {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()?
                    .into(),
            );
        }
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.user)
                .build()?
                .into(),
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(TEMPERATURE)
            .max_completion_tokens(prompt.max_tokens)
            .build()?;

        let response: CreateChatCompletionResponse = self.client.chat().create(request).await?;
        let choice = response
            .choices
            .first()
            .context("No response choice from LLM")?;
        debug!(model = %self.model, finish_reason = ?choice.finish_reason, "LLM call completed");

        Ok(choice.message.content.clone().unwrap_or_default())
    }
}

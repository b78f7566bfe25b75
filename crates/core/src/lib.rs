//! Core logic for the biology learning service: model access, extraction of
//! the model's semi-structured answers, and the quiz and journey state the
//! front ends drive.

pub mod content;
pub mod extract;
pub mod journey;
pub mod llm_client;
pub mod mcq;
pub mod pathway;
pub mod prompts;
pub mod quiz;
pub mod word;

pub use extract::{LearningContent, extract_learning_content, extract_script_output};
pub use mcq::{AnswerLetter, ParsedMcq, extract_mcq};

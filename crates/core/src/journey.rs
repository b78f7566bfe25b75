//! Learning Journey
//!
//! The ordered history of topics a learner explored in one sitting. It is a
//! plain value owned by the caller and passed to whatever needs it.

use crate::extract::LearningContent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The content produced for one topic request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicResult {
    pub topic: String,
    #[serde(flatten)]
    pub content: LearningContent,
    /// Wall-clock time of the upstream request, in milliseconds.
    pub response_time: u64,
    pub timestamp: DateTime<Utc>,
}

/// Append-only list of [`TopicResult`]s, in completion order.
#[derive(Debug, Clone, Default)]
pub struct LearningJourney {
    results: Vec<TopicResult>,
}

impl LearningJourney {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result and returns its 1-based step number.
    pub fn record(&mut self, result: TopicResult) -> usize {
        self.results.push(result);
        self.results.len()
    }

    pub fn results(&self) -> &[TopicResult] {
        &self.results
    }

    pub fn latest(&self) -> Option<&TopicResult> {
        self.results.last()
    }

    /// Returns the result recorded at 1-based `step`.
    pub fn step_of(&self, step: usize) -> Option<&TopicResult> {
        step.checked_sub(1).and_then(|i| self.results.get(i))
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.topic.as_str())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Drops all results to start a new journey.
    pub fn clear(&mut self) {
        self.results.clear();
    }
}

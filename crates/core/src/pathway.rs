//! Learning pathway cards: the clickable form of a numbered pathway line.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static BOLD_TOPIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*:?\s*").unwrap());

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PathwayCard {
    /// The follow-up topic a learner can request next.
    pub topic: String,
    pub description: String,
}

impl PathwayCard {
    /// Builds a card from a pathway line such as `2. **Calvin Cycle**: how carbon is fixed`.
    ///
    /// `index` is zero-based and only used to name topics the model did not bold.
    pub fn from_line(index: usize, line: &str) -> Self {
        match BOLD_TOPIC.captures(line) {
            Some(caps) => Self {
                topic: caps[1].trim().to_string(),
                description: BOLD_TOPIC.replace(line, "").trim().to_string(),
            },
            None => Self {
                topic: format!("Related Topic {}", index + 1),
                description: line.trim().to_string(),
            },
        }
    }
}

pub fn pathway_cards(pathways: &[String]) -> Vec<PathwayCard> {
    pathways
        .iter()
        .enumerate()
        .map(|(index, line)| PathwayCard::from_line(index, line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_topic_is_extracted() {
        let card = PathwayCard::from_line(1, "2. **Calvin Cycle**: how carbon is fixed");
        assert_eq!(card.topic, "Calvin Cycle");
        assert_eq!(card.description, "2. how carbon is fixed");
    }

    #[test]
    fn test_plain_line_gets_numbered_topic() {
        let cards = pathway_cards(&["1. Meiosis".to_string(), "2. Cell cycle".to_string()]);
        assert_eq!(cards[1].topic, "Related Topic 2");
        assert_eq!(cards[1].description, "2. Cell cycle");
    }
}

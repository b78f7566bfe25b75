//! Prompt Templates
//!
//! Templates ship inside the binary and can be overridden file by file from a
//! directory of `<name>.md` files. Placeholders use `{name}` syntax.

use anyhow::{Context, Result};
use std::{collections::HashMap, fs, path::Path};
use tracing::info;

pub const LEARN_TOPIC: &str = "learn_topic";
pub const EXPLAIN_WORD: &str = "explain_word";
pub const SYSTEM_PROMPT: &str = "system_prompt";

const BUILTIN: [(&str, &str); 3] = [
    (LEARN_TOPIC, include_str!("../prompts/learn_topic.md")),
    (EXPLAIN_WORD, include_str!("../prompts/explain_word.md")),
    (SYSTEM_PROMPT, include_str!("../prompts/system_prompt.md")),
];

/// Loads the built-in templates, then any `.md` files found in `dir`.
pub fn load_prompts(dir: Option<&Path>) -> Result<HashMap<String, String>> {
    let mut prompts: HashMap<String, String> = BUILTIN
        .iter()
        .map(|(name, body)| (name.to_string(), body.to_string()))
        .collect();

    let Some(dir) = dir else {
        return Ok(prompts);
    };

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read prompts directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md") {
            let prompt_key = path
                .file_stem()
                .and_then(|s| s.to_str())
                .context("Could not get file stem")?
                .to_string();
            let content = fs::read_to_string(&path)?;
            info!(prompt = %prompt_key, path = %path.display(), "Loaded prompt override");
            prompts.insert(prompt_key, content);
        }
    }
    Ok(prompts)
}

/// Substitutes every `{key}` in `template`.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("{{{key}}}"), value)
    })
}

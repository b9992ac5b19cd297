//! Bullet augmentation — rewrites one resume bullet into three stronger alternatives.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::TextGenerator;
use crate::review::parse::{lenient, parse_reply, LlmOutcome};
use crate::review::prompts::augment_prompt;

pub const ALTERNATIVE_COUNT: usize = 3;

#[derive(Debug, Deserialize)]
pub struct AugmentRequest {
    pub bullet_point: String,
}

/// Exactly three distinct, non-empty rewrites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentResult {
    pub alternatives: [String; ALTERNATIVE_COUNT],
}

#[derive(Debug, Deserialize)]
pub struct RawAugmentReply {
    #[serde(
        default,
        alias = "options",
        alias = "Options",
        deserialize_with = "lenient::string_list"
    )]
    alternatives: Vec<String>,
}

impl TryFrom<RawAugmentReply> for AugmentResult {
    type Error = String;

    fn try_from(raw: RawAugmentReply) -> Result<Self, String> {
        let mut seen: Vec<String> = Vec::new();
        let mut alternatives: Vec<String> = Vec::new();

        for option in raw.alternatives {
            let cleaned = option
                .trim()
                .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•'))
                .trim()
                .to_string();
            if cleaned.is_empty() {
                continue;
            }
            let key = cleaned.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            alternatives.push(cleaned);
        }

        let found = alternatives.len();
        alternatives.truncate(ALTERNATIVE_COUNT);
        let alternatives: [String; ALTERNATIVE_COUNT] = alternatives.try_into().map_err(|_| {
            format!("expected {ALTERNATIVE_COUNT} distinct alternatives, got {found}")
        })?;

        Ok(AugmentResult { alternatives })
    }
}

/// Rewrites `bullet_point` via the LLM.
pub async fn augment_bullet(
    bullet_point: &str,
    llm: &dyn TextGenerator,
) -> Result<LlmOutcome<AugmentResult>, AppError> {
    let prompt = augment_prompt(bullet_point);
    let reply = llm.generate(&prompt, JSON_ONLY_SYSTEM).await?;
    Ok(parse_reply::<RawAugmentReply, AugmentResult>(&reply))
}

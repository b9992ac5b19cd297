// Shared prompt constants.
// Endpoint-specific templates live in review::prompts.

/// System instruction that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Closing line appended to every endpoint prompt.
pub const RETURN_JSON_ONLY: &str = "Return only the JSON object, no extra commentary.";

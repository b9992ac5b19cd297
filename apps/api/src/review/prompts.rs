// Prompt templates for the three review endpoints.
// Each builder is pure: identical inputs give identical prompts.

use crate::llm_client::prompts::RETURN_JSON_ONLY;

/// Augment prompt template. Replace `{bullet_point}` before sending.
pub const AUGMENT_PROMPT_TEMPLATE: &str = r#"Using the bullet point provided, rewrite it as three augmented resume bullet point options that maximize impact across the following categories:

1. Action Verb: Starts with a strong, clear action verb relevant to the skill or task.
2. Quantifiable Impact: Includes specific numbers, percentages, or measurable outcomes.
3. Skill Relevance: Uses relevant keywords or skills.
4. Length and Clarity: Maintains a professional tone, keeps the bullet between 50-150 characters, and avoids unnecessary filler words.

Original Bullet Point:
{bullet_point}

Augment the given text by providing 3 distinct options.

Expected JSON format: {"alternatives": ["option1", "option2", "option3"]}"#;

/// Grader prompt template. Replace `{resume_text}` before sending.
pub const GRADER_PROMPT_TEMPLATE: &str = r#"You are an expert resume evaluator specializing in various roles at FAANG/MANGA-level companies.

Analyze the following resume content and produce a structured JSON assessment focusing on both ATS optimization and recruiter-readability. Use the following evaluation criteria:

1. ATS-friendly formatting: Are sections (e.g., "Work Experience", "Skills") clear and in standard order? Is the plain text optimized for parsing?
2. Clarity & action-oriented language: Do bullets start with strong action verbs? Is the phrasing clear and concise?
3. Quantifiable impact: Are measurable achievements present (e.g., "increased X by 20%")?
4. Keyword relevance: Does the text include at least 5 role-specific keywords?
5. Brevity & formatting: Is the resume one page? Is it easy to scan?

Return a JSON object with this EXACT schema:
{
  "grade": "A" | "B" | "C" | "D" | "F",
  "score": 0-100 integer based on the overall evaluation,
  "keywords": ["at least 5 unique, high-impact technical keywords found"],
  "section_formatting": {"status": "ok" | "needs_work", "note": "short reasoning on section headings and order"},
  "clarity_action": {"status": "ok" | "needs_work", "note": "brief note on action verbs and phrasing"},
  "quantifiable_impact": {"status": "ok" | "needs_work", "note": "presence or absence of measurable results"},
  "keyword_relevance": {"status": "ok" | "needs_work", "note": "reasoning"},
  "brevity_formatting": {"status": "ok" | "needs_work", "note": "page length and scannability"},
  "highlights": ["3-4 sentences, one per item, on the strongest aspects"],
  "suggestions": ["3-4 sentences, one per item, on the key areas to improve"]
}

Resume Content:
"{resume_text}""#;

/// Comparison prompt template. Replace `{resume_text}` and `{job_application_text}`.
pub const COMPARISON_PROMPT_TEMPLATE: &str = r#"You are a seasoned technical recruiter and resume coach specializing in various roles.

Carefully compare the provided resume content with the job application description, analyzing alignment in skills, experience, and language.

Return a JSON object with this EXACT schema:
{
  "alignment_score": 0-100 integer for how well the resume matches the job application, factoring in relevance of skills, clarity, and demonstrated impact,
  "grade": "A" | "B" | "C" | "D" | "F",
  "keyword_gaps": ["important keywords or key phrases in the job application that are missing or underemphasized in the resume"],
  "skill_gaps": "specific technical skills, tools, or experiences requested by the job that are absent or insufficiently demonstrated",
  "impact_clarity_gaps": "missing quantifiable achievements, action verbs, or clear descriptions relative to the job's expectations",
  "recommendations": ["practical advice on tailoring the resume to this job, one item per recommendation"]
}

Use an empty array when there are no keyword gaps.

Resume Content:
"{resume_text}"

Job Application Text:
"{job_application_text}""#;

/// Substitutes `{name}` placeholders in one left-to-right pass, so inserted text
/// is never scanned again. Unknown braces are copied through.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let placeholder = values.iter().find(|(name, _)| {
            tail[1..]
                .strip_prefix(*name)
                .is_some_and(|after| after.starts_with('}'))
        });
        match placeholder {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn augment_prompt(bullet_point: &str) -> String {
    let body = fill_template(AUGMENT_PROMPT_TEMPLATE, &[("bullet_point", bullet_point.trim())]);
    format!("{body}\n\n{RETURN_JSON_ONLY}")
}

pub fn grader_prompt(resume_text: &str) -> String {
    let body = fill_template(GRADER_PROMPT_TEMPLATE, &[("resume_text", resume_text.trim())]);
    format!("{body}\n\n{RETURN_JSON_ONLY}")
}

pub fn comparison_prompt(resume_text: &str, job_application_text: &str) -> String {
    let body = fill_template(
        COMPARISON_PROMPT_TEMPLATE,
        &[
            ("resume_text", resume_text.trim()),
            ("job_application_text", job_application_text.trim()),
        ],
    );
    format!("{body}\n\n{RETURN_JSON_ONLY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_augment_prompt_embeds_bullet_and_schema() {
        let prompt = augment_prompt("  Managed team tasks.  ");
        assert!(prompt.contains("Original Bullet Point:\nManaged team tasks.\n"));
        assert!(prompt.contains(r#"{"alternatives": ["option1", "option2", "option3"]}"#));
        assert!(prompt.ends_with(RETURN_JSON_ONLY));
        assert!(!prompt.contains("{bullet_point}"));
    }

    #[test]
    fn test_grader_prompt_embeds_resume() {
        let prompt = grader_prompt("Jane Doe\nRust Engineer");
        assert!(prompt.contains("\"Jane Doe\nRust Engineer\""));
        assert!(prompt.contains("\"suggestions\""));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_comparison_prompt_embeds_both_texts() {
        let prompt = comparison_prompt("Rust, Tokio", "Looking for Go developers");
        assert!(prompt.contains("\"Rust, Tokio\""));
        assert!(prompt.contains("\"Looking for Go developers\""));
        assert!(!prompt.contains("{job_application_text}"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_comparison_prompt_keeps_placeholder_text_in_inputs() {
        let prompt = comparison_prompt("Rust, Tokio", "Paste {resume_text} into the portal");
        assert!(prompt.contains("\"Paste {resume_text} into the portal\""));
        assert_eq!(prompt.matches("Rust, Tokio").count(), 1);

        let prompt = comparison_prompt("Skills: {job_application_text}", "Go developer");
        assert!(prompt.contains("\"Skills: {job_application_text}\""));
        assert_eq!(prompt.matches("Go developer").count(), 1);
    }

    #[test]
    fn test_schema_braces_survive_filling() {
        let prompt = grader_prompt("Jane Doe");
        assert!(prompt.contains(r#""section_formatting": {"status": "ok" | "needs_work""#));
    }

    #[test]
    fn test_prompts_are_deterministic() {
        assert_eq!(grader_prompt("same"), grader_prompt("same"));
        assert_eq!(comparison_prompt("a", "b"), comparison_prompt("a", "b"));
    }
}

//! Resume grading — ATS and recruiter-readability assessment of one document.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::TextGenerator;
use crate::review::parse::{lenient, parse_reply, LlmOutcome};
use crate::review::prompts::grader_prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionStatus {
    Ok,
    NeedsWork,
    Unrated,
}

impl CriterionStatus {
    fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase().replace(|c: char| c == '_' || c == '-', " ");
        if label.starts_with("needs work") {
            CriterionStatus::NeedsWork
        } else if label.starts_with("ok") {
            CriterionStatus::Ok
        } else {
            CriterionStatus::Unrated
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionAssessment {
    pub status: CriterionStatus,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeCriteria {
    pub section_formatting: Option<CriterionAssessment>,
    pub clarity_action: Option<CriterionAssessment>,
    pub quantifiable_impact: Option<CriterionAssessment>,
    pub keyword_relevance: Option<CriterionAssessment>,
    pub brevity_formatting: Option<CriterionAssessment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeReport {
    pub grade: String,
    pub score: u8,
    pub highlights: Vec<String>,
    pub suggestions: Vec<String>,
    pub keywords: Vec<String>,
    pub criteria: GradeCriteria,
}

/// Wire shape of the grader reply. Accepts both snake_case and the
/// capitalised keys older prompts produced.
#[derive(Debug, Deserialize)]
pub struct RawGradeReply {
    #[serde(default, alias = "Grade", deserialize_with = "lenient::text")]
    grade: Option<String>,
    #[serde(default, alias = "Score", deserialize_with = "lenient::score")]
    score: Option<u8>,
    #[serde(default, alias = "Highlights", deserialize_with = "lenient::string_list")]
    highlights: Vec<String>,
    #[serde(
        default,
        alias = "Suggestions",
        alias = "Improvements",
        alias = "improvements",
        deserialize_with = "lenient::string_list"
    )]
    suggestions: Vec<String>,
    #[serde(default, alias = "Keywords", deserialize_with = "lenient::string_list")]
    keywords: Vec<String>,
    #[serde(default, alias = "SectionFormatting", deserialize_with = "criterion")]
    section_formatting: Option<CriterionAssessment>,
    #[serde(default, alias = "ClarityAction", deserialize_with = "criterion")]
    clarity_action: Option<CriterionAssessment>,
    #[serde(default, alias = "QuantifiableImpact", deserialize_with = "criterion")]
    quantifiable_impact: Option<CriterionAssessment>,
    #[serde(default, alias = "KeywordRelevance", deserialize_with = "criterion")]
    keyword_relevance: Option<CriterionAssessment>,
    #[serde(default, alias = "BrevityFormatting", deserialize_with = "criterion")]
    brevity_formatting: Option<CriterionAssessment>,
}

/// `{"status": "ok", "note": "..."}` or a bare `"needs work: ..."` string.
fn criterion<'de, D>(deserializer: D) -> Result<Option<CriterionAssessment>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => {
            let status = map
                .get("status")
                .and_then(Value::as_str)
                .map(CriterionStatus::from_label)
                .unwrap_or(CriterionStatus::Unrated);
            let note = map
                .get("note")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string();
            Some(CriterionAssessment { status, note })
        }
        Some(Value::String(text)) => {
            let status = CriterionStatus::from_label(&text);
            let note = strip_status_label(&text, status);
            Some(CriterionAssessment { status, note })
        }
        _ => None,
    })
}

fn strip_status_label(text: &str, status: CriterionStatus) -> String {
    let label_len = match status {
        CriterionStatus::Ok => "ok".len(),
        CriterionStatus::NeedsWork => "needs work".len(),
        CriterionStatus::Unrated => 0,
    };
    let trimmed = text.trim();
    trimmed
        .get(label_len..)
        .unwrap_or(trimmed)
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | ',' | '.'))
        .to_string()
}

/// Accepts `A`–`F` with an optional `+`/`-`, normalised to upper case.
pub(crate) fn normalize_grade(grade: &str) -> Option<String> {
    let grade = grade.trim().to_uppercase();
    let mut chars = grade.chars();
    let letter = chars.next()?;
    let modifier: String = chars.collect();
    let valid = matches!(letter, 'A'..='D' | 'F') && matches!(modifier.as_str(), "" | "+" | "-");
    valid.then_some(grade)
}

impl TryFrom<RawGradeReply> for GradeReport {
    type Error = String;

    fn try_from(raw: RawGradeReply) -> Result<Self, String> {
        let grade_text = raw.grade.ok_or("missing grade")?;
        let grade = normalize_grade(&grade_text)
            .ok_or_else(|| format!("unrecognised grade '{grade_text}'"))?;
        let score = raw.score.ok_or("missing or non-numeric score")?;

        Ok(GradeReport {
            grade,
            score,
            highlights: raw.highlights,
            suggestions: raw.suggestions,
            keywords: raw.keywords,
            criteria: GradeCriteria {
                section_formatting: raw.section_formatting,
                clarity_action: raw.clarity_action,
                quantifiable_impact: raw.quantifiable_impact,
                keyword_relevance: raw.keyword_relevance,
                brevity_formatting: raw.brevity_formatting,
            },
        })
    }
}

/// Grades extracted resume text via the LLM.
pub async fn grade_resume(
    resume_text: &str,
    llm: &dyn TextGenerator,
) -> Result<LlmOutcome<GradeReport>, AppError> {
    let prompt = grader_prompt(resume_text);
    let reply = llm.generate(&prompt, JSON_ONLY_SYSTEM).await?;
    Ok(parse_reply::<RawGradeReply, GradeReport>(&reply))
}

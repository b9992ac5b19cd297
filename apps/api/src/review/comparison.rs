//! Resume vs job application comparison — alignment score, keyword gaps, tailoring advice.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::TextGenerator;
use crate::review::grader::normalize_grade;
use crate::review::parse::{lenient, parse_reply, LlmOutcome};
use crate::review::prompts::comparison_prompt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub alignment_score: u8,
    /// Possibly empty.
    pub keyword_gaps: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_gaps: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact_clarity_gaps: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawComparisonReply {
    #[serde(
        default,
        alias = "AlignmentScore",
        alias = "Alignment Score",
        deserialize_with = "lenient::score"
    )]
    alignment_score: Option<u8>,
    #[serde(
        default,
        alias = "Keyword difference",
        alias = "keyword_difference",
        alias = "KeywordGaps",
        deserialize_with = "lenient::string_list"
    )]
    keyword_gaps: Vec<String>,
    #[serde(default, alias = "Recommendations", deserialize_with = "lenient::string_list")]
    recommendations: Vec<String>,
    #[serde(default, alias = "Grade", deserialize_with = "lenient::text")]
    grade: Option<String>,
    #[serde(
        default,
        alias = "Skill Gap Analysis",
        alias = "skill_gap_analysis",
        deserialize_with = "lenient::text"
    )]
    skill_gaps: Option<String>,
    #[serde(
        default,
        alias = "Impact & Clarity Gap",
        alias = "impact_clarity_gap",
        deserialize_with = "lenient::text"
    )]
    impact_clarity_gaps: Option<String>,
}

impl TryFrom<RawComparisonReply> for ComparisonReport {
    type Error = String;

    fn try_from(raw: RawComparisonReply) -> Result<Self, String> {
        let alignment_score = raw
            .alignment_score
            .ok_or("missing or non-numeric alignment_score")?;

        Ok(ComparisonReport {
            alignment_score,
            keyword_gaps: raw.keyword_gaps,
            recommendations: raw.recommendations,
            // Optional here: an unrecognised grade is omitted.
            grade: raw.grade.as_deref().and_then(normalize_grade),
            skill_gaps: raw.skill_gaps,
            impact_clarity_gaps: raw.impact_clarity_gaps,
        })
    }
}

/// Compares extracted resume text with a job application via the LLM.
pub async fn compare_resume(
    resume_text: &str,
    job_application_text: &str,
    llm: &dyn TextGenerator,
) -> Result<LlmOutcome<ComparisonReport>, AppError> {
    let prompt = comparison_prompt(resume_text, job_application_text);
    let reply = llm.generate(&prompt, JSON_ONLY_SYSTEM).await?;
    Ok(parse_reply::<RawComparisonReply, ComparisonReport>(&reply))
}

//! Insight Gateway — formats prompts for and parses responses from the LLM
//! (career guides, resume parsing, resume/job comparison), plus the saved
//! analyses a user keeps. The model is an external collaborator reached only
//! through `LlmClient`.

pub mod handlers;
pub mod prompts;

use serde_json::Value;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::insights::prompts::{
    CAREER_GUIDE_PROMPT, CAREER_GUIDE_SYSTEM, RESUME_COMPARE_PROMPT, RESUME_COMPARE_SYSTEM,
    RESUME_PARSE_PROMPT, RESUME_PARSE_SYSTEM,
};

/// Structured career guide for a role title.
pub async fn career_guide(llm: &LlmClient, job_title: &str) -> Result<Value, AppError> {
    let prompt = CAREER_GUIDE_PROMPT.replace("{job_title}", job_title);
    llm.call_json(&prompt, CAREER_GUIDE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("career guide generation failed: {e}")))
}

/// Extracts text from an uploaded PDF and has the model structure it.
pub async fn parse_resume(llm: &LlmClient, pdf: &[u8]) -> Result<Value, AppError> {
    let text = pdf_extract::extract_text_from_mem(pdf)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF text extraction failed: {e}")))?;
    let prompt = RESUME_PARSE_PROMPT.replace("{resume_text}", &text);
    llm.call_json(&prompt, RESUME_PARSE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("resume parsing failed: {e}")))
}

/// Compares a parsed resume against job insights.
pub async fn compare_resume(
    llm: &LlmClient,
    resume: &Value,
    job_insights: &Value,
) -> Result<Value, AppError> {
    let prompt = RESUME_COMPARE_PROMPT
        .replace("{resume}", &resume.to_string())
        .replace("{job_insights}", &job_insights.to_string());
    llm.call_json(&prompt, RESUME_COMPARE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("resume comparison failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::prompts::*;

    #[test]
    fn career_guide_prompt_substitutes_every_placeholder() {
        let prompt = CAREER_GUIDE_PROMPT.replace("{job_title}", "Backend Engineer");
        assert!(prompt.contains("Backend Engineer"));
        assert!(!prompt.contains("{job_title}"));
    }

    #[test]
    fn parse_and_compare_prompts_carry_their_payloads() {
        let prompt = RESUME_PARSE_PROMPT.replace("{resume_text}", "ten years of Rust");
        assert!(prompt.contains("ten years of Rust"));

        let prompt = RESUME_COMPARE_PROMPT
            .replace("{resume}", "{\"skills\":[\"rust\"]}")
            .replace("{job_insights}", "{\"roleOverview\":\"x\"}");
        assert!(prompt.contains("\"rust\""));
        assert!(prompt.contains("roleOverview"));
    }
}

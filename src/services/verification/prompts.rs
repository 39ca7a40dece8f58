//! Role Prompts
//!
//! Builds the user prompt and system prompt for each model role.

use cyrano_verify_core::{ModelRole, VerificationLevel};
use cyrano_verify_llm::CallOptions;

use crate::models::request::VerificationRequest;
use crate::models::settings::EngineConfig;

/// Shared opening: the claim, optional context, optional sources.
pub fn base_prompt(request: &VerificationRequest) -> String {
    let mut prompt = format!("Fact-check the following claim: \"{}\"\n\n", request.claim.trim());

    if let Some(context) = request.context.as_deref().filter(|c| !c.trim().is_empty()) {
        prompt.push_str(&format!("Context: {}\n\n", context.trim()));
    }

    if !request.sources.is_empty() {
        prompt.push_str("Please verify against these sources:\n");
        for source in &request.sources {
            prompt.push_str(&format!("- {}\n", source));
        }
        prompt.push('\n');
    }

    prompt
}

fn fact_check_section(level: VerificationLevel) -> String {
    let checklist = match level {
        VerificationLevel::Exhaustive => {
            "Provide a comprehensive fact-check including:\n\
             - Verification status (VERIFIED, LIKELY_TRUE, UNCERTAIN, LIKELY_FALSE, UNVERIFIED)\n\
             - Supporting evidence found\n\
             - Contradictory evidence found\n\
             - Confidence level (0-1)\n\
             - Specific sources that support or contradict the claim\n\
             - Recommendations for further verification if needed"
        }
        VerificationLevel::Thorough => {
            "Provide a thorough fact-check including:\n\
             - Verification status\n\
             - Key evidence found\n\
             - Confidence level (0-1)\n\
             - Main sources"
        }
        VerificationLevel::Basic => {
            "Provide a basic fact-check including:\n\
             - Verification status\n\
             - Brief summary\n\
             - Confidence level (0-1)"
        }
    };
    format!("Verification level: {}\n\n{}", level, checklist)
}

const TRUST_CHAIN_SECTION: &str = "Analyze the trust chain and source credibility:\n\
     - Trace the origin of the claim\n\
     - Assess the reliability of sources\n\
     - Identify potential bias or conflicts of interest\n\
     - Evaluate the credibility chain\n\
     - Provide confidence in source reliability (0-1)";

const REASONING_SECTION: &str = "Apply Socratic reasoning to evaluate the claim:\n\
     - Question the assumptions underlying the claim\n\
     - Examine logical consistency\n\
     - Identify potential fallacies\n\
     - Evaluate the strength of reasoning\n\
     - Provide logical confidence score (0-1)";

/// Full user prompt for `role`.
pub fn role_prompt(request: &VerificationRequest, role: ModelRole) -> String {
    let mut prompt = base_prompt(request);
    match role {
        ModelRole::FactCheck => prompt.push_str(&fact_check_section(request.verification_level)),
        ModelRole::TrustChain => prompt.push_str(TRUST_CHAIN_SECTION),
        ModelRole::Reasoning => prompt.push_str(REASONING_SECTION),
    }
    prompt
}

pub fn system_prompt(role: ModelRole, level: VerificationLevel) -> &'static str {
    match (role, level) {
        (ModelRole::FactCheck, VerificationLevel::Exhaustive) => {
            "You are an expert fact-checker with access to real-time information. Provide comprehensive, accurate fact-checking with detailed evidence and sources."
        }
        (ModelRole::FactCheck, _) => {
            "You are an expert fact-checker. Provide accurate fact-checking with evidence and sources."
        }
        (ModelRole::TrustChain, _) => {
            "You are a source credibility analyst. Analyze the trust chain and evaluate the reliability of sources and information pathways."
        }
        (ModelRole::Reasoning, _) => {
            "You are a logical reasoning specialist. Apply Socratic questioning to evaluate claims for logical consistency and sound reasoning."
        }
    }
}

/// Gateway options for `role` under `config`.
pub fn call_options(config: &EngineConfig, role: ModelRole, level: VerificationLevel) -> CallOptions {
    CallOptions {
        system_prompt: Some(system_prompt(role, level).to_string()),
        temperature: config.temperature,
        max_tokens: config.max_tokens.for_role(role),
    }
}

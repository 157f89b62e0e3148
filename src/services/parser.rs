use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{
    FollowUpPlan, LabTestSuggestion, PrescriptionSuggestion, ReportAnalysis, VitalsAnalysis,
    MAX_OVERALL_SCORE, MIN_OVERALL_SCORE,
};
use crate::services::markdown;

lazy_static! {
    // First `{` through last `}`, across lines
    static ref JSON_SPAN: Regex = Regex::new(r"(?s)\{.*\}").expect("json span pattern");
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON object found in model reply")]
    NoJson,
    #[error("model reply is not valid JSON for this schema: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Schema a model reply is parsed into, with the cleanup applied after parsing
pub trait ModelReply: DeserializeOwned {
    fn normalize(&mut self);
}

/// Locate the JSON object embedded in free-form model text
pub fn extract_json_span(text: &str) -> Option<&str> {
    JSON_SPAN.find(text).map(|m| m.as_str())
}

/// Extract, deserialize and normalize a model reply
pub fn parse_reply<T: ModelReply>(text: &str) -> Result<T, ParseError> {
    let span = extract_json_span(text).ok_or(ParseError::NoJson)?;
    let mut reply: T = serde_json::from_str(span)?;
    reply.normalize();
    Ok(reply)
}

impl ModelReply for ReportAnalysis {
    fn normalize(&mut self) {
        self.summary = markdown::clean(&self.summary);
        self.recommendations = markdown::clean(&self.recommendations);
    }
}

impl ModelReply for VitalsAnalysis {
    fn normalize(&mut self) {
        self.overall_score = self.overall_score.clamp(MIN_OVERALL_SCORE, MAX_OVERALL_SCORE);
        self.summary = markdown::clean(&self.summary);
        self.recommendations = markdown::clean(&self.recommendations);
        for factor in &mut self.risk_factors {
            *factor = markdown::clean(factor);
        }
    }
}

impl ModelReply for PrescriptionSuggestion {
    fn normalize(&mut self) {
        self.notes = markdown::clean(&self.notes);
    }
}

impl ModelReply for LabTestSuggestion {
    fn normalize(&mut self) {
        self.instructions = markdown::clean(&self.instructions);
    }
}

impl ModelReply for FollowUpPlan {
    fn normalize(&mut self) {
        self.monitoring = markdown::clean(&self.monitoring);
        self.goals = markdown::clean(&self.goals);
    }
}

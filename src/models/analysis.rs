use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const MIN_OVERALL_SCORE: u8 = 50;
pub const MAX_OVERALL_SCORE: u8 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MetricStatus {
    #[serde(alias = "normal", alias = "NORMAL")]
    Normal,
    #[serde(alias = "warning", alias = "WARNING")]
    Warning,
    #[serde(alias = "critical", alias = "CRITICAL")]
    Critical,
}

/// A single displayed health indicator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metric {
    pub name: String,
    #[serde(deserialize_with = "display_value")]
    pub value: String,
    pub status: MetricStatus,
}

impl Metric {
    pub fn new(name: &str, value: impl Into<String>, status: MetricStatus) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            status,
        }
    }
}

/// Result of a lab report upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportAnalysis {
    pub metrics: Vec<Metric>,
    pub summary: String,
    pub recommendations: String,
}

/// Result of a vitals analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VitalsAnalysis {
    #[serde(deserialize_with = "score_value")]
    pub overall_score: u8,
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    pub summary: String,
    pub recommendations: String,
}

/// Model replies sometimes carry metric values as bare numbers
fn display_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected metric value, got {}",
            other
        ))),
    }
}

fn score_value<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw.filter(|n| n.is_finite()) {
        Some(score) => Ok(score.round().clamp(0.0, f64::from(MAX_OVERALL_SCORE)) as u8),
        None => Err(serde::de::Error::custom("overallScore is not a number")),
    }
}

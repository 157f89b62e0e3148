use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Patient demographics as sent by the frontend forms
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub age: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub gender: String,
}

impl Patient {
    pub fn new(name: impl Into<String>, age: impl Into<String>, gender: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            gender: gender.into(),
        }
    }
}

/// Vital signs and medical history flags.
///
/// Every field is optional. Number inputs arrive either as JSON numbers or as
/// the raw strings of an HTML form; anything that does not parse to a finite
/// number is treated as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub systolic: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub diastolic: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>, // °F
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>, // kg
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>, // cm

    #[serde(default, deserialize_with = "lenient_flag")]
    pub heart_disease: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub diabetes: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub hypertension: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub asthma: bool,

    #[serde(default, deserialize_with = "lenient_opt_text", skip_serializing_if = "Option::is_none")]
    pub other_conditions: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_text", skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,

    /// Score of a previous vitals analysis, carried by suggestion requests
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
}

impl Vitals {
    /// Body mass index from weight (kg) and height (cm), when both are positive
    pub fn bmi(&self) -> Option<f64> {
        match (self.weight, self.height) {
            (Some(weight), Some(height)) if weight > 0.0 && height > 0.0 => {
                let meters = height / 100.0;
                Some(weight / (meters * meters))
            }
            _ => None,
        }
    }

    pub fn blood_pressure_elevated(&self) -> bool {
        self.systolic.is_some_and(|s| s > 130.0) || self.diastolic.is_some_and(|d| d > 85.0)
    }

    pub fn blood_pressure_critical(&self) -> bool {
        self.systolic.is_some_and(|s| s > 140.0) || self.diastolic.is_some_and(|d| d > 90.0)
    }

    pub fn heart_rate_abnormal(&self) -> bool {
        self.heart_rate.is_some_and(|hr| !(60.0..=100.0).contains(&hr))
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "on" | "1"
        ),
        _ => false,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_text(deserializer)?.unwrap_or_default())
}

fn lenient_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

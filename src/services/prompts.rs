use crate::models::{Patient, SuggestionRequest, Vitals};

/// Prompt templates sent to Gemini.
/// Each one spells out the exact JSON shape the response parser expects.

const STATUS_RULE: &str = r#"Status can be: "Normal", "Warning", or "Critical""#;
const JSON_ONLY: &str = "Respond with the JSON object only.";

pub fn report_analysis(patient: &Patient, report_text: Option<&str>) -> String {
    let report = match report_text {
        Some(text) if !text.trim().is_empty() => text.trim(),
        Some(_) | None => "See the attached lab report.",
    };

    format!(
        r#"You are a medical AI assistant analyzing health data for cardiovascular risk assessment.

Patient Information:
- Name: {name}
- Age: {age}
- Gender: {gender}

Lab Report Data:
{report}

Please analyze this data and provide a response in the following exact JSON structure:
{{
    "metrics": [
        {{"name": "Blood Pressure", "value": "120/80", "status": "Normal"}},
        {{"name": "Cholesterol", "value": "190 mg/dL", "status": "Normal"}},
        {{"name": "Heart Rate", "value": "72 bpm", "status": "Normal"}},
        {{"name": "Blood Sugar", "value": "95 mg/dL", "status": "Normal"}},
        {{"name": "BMI", "value": "24.5", "status": "Normal"}}
    ],
    "summary": "A detailed analysis summary of the patient's cardiovascular health based on the lab results.",
    "recommendations": "Specific recommendations for maintaining or improving heart health."
}}

{status}
Focus on cardiovascular health metrics. If specific values aren't in the report, make reasonable estimates based on age and gender.
{json_only}"#,
        name = patient.name,
        age = patient.age,
        gender = patient.gender,
        report = report,
        status = STATUS_RULE,
        json_only = JSON_ONLY,
    )
}

pub fn vitals_analysis(patient: &Patient, vitals: &Vitals) -> String {
    format!(
        r#"You are a medical AI assistant assessing cardiovascular risk from patient vital signs.

Patient Information:
- Name: {name}
- Age: {age}
- Gender: {gender}

Vital Signs:
{vitals}

Provide a response in the following exact JSON structure:
{{
    "overallScore": 85,
    "metrics": [
        {{"name": "Blood Pressure", "value": "120/80 mmHg", "status": "Normal"}},
        {{"name": "Heart Rate", "value": "72 bpm", "status": "Normal"}},
        {{"name": "Temperature", "value": "98.6 °F", "status": "Normal"}},
        {{"name": "Respiratory Rate", "value": "16 breaths/min", "status": "Normal"}},
        {{"name": "Oxygen Saturation", "value": "98 %", "status": "Normal"}},
        {{"name": "BMI", "value": "22.9", "status": "Normal"}}
    ],
    "riskFactors": ["List each identified cardiovascular risk factor"],
    "summary": "A concise assessment of the patient's cardiovascular health.",
    "recommendations": "Specific, actionable recommendations."
}}

overallScore is an integer from 0 to 100 where 100 is optimal health.
{status}
Use "N/A" for values that were not provided.
{json_only}"#,
        name = patient.name,
        age = patient.age,
        gender = patient.gender,
        vitals = vitals_block(vitals),
        status = STATUS_RULE,
        json_only = JSON_ONLY,
    )
}

pub fn prescription(request: &SuggestionRequest) -> String {
    format!(
        r#"You are a clinical decision-support assistant helping a physician choose medications.

{context}

Suggest medications in the following exact JSON structure:
{{
    "medications": [
        {{"name": "Medication name", "dosage": "5 mg", "frequency": "Once daily", "duration": "3 months", "priority": "High", "notes": "Monitoring or caution"}}
    ],
    "notes": "Overall prescribing considerations, contraindications and allergy checks."
}}

priority can be: "High", "Medium", or "Low"
All suggestions will be reviewed by a licensed physician before use.
{json_only}"#,
        context = suggestion_context(request),
        json_only = JSON_ONLY,
    )
}

pub fn lab_tests(request: &SuggestionRequest) -> String {
    format!(
        r#"You are a clinical decision-support assistant recommending laboratory tests.

{context}

Suggest tests in the following exact JSON structure:
{{
    "tests": [
        {{"name": "Lipid Panel", "urgency": "Routine", "reason": "Why this test is needed"}}
    ],
    "instructions": "Patient preparation instructions such as fasting."
}}

urgency can be: "Urgent", "Soon", or "Routine"
{json_only}"#,
        context = suggestion_context(request),
        json_only = JSON_ONLY,
    )
}

pub fn follow_up(request: &SuggestionRequest) -> String {
    format!(
        r#"You are a clinical decision-support assistant planning patient follow-up care.

{context}

Provide a follow-up plan in the following exact JSON structure:
{{
    "schedule": [
        {{"timeframe": "2 weeks", "action": "What should happen", "details": "Additional details"}}
    ],
    "monitoring": "What the patient should monitor at home.",
    "goals": "Measurable treatment goals."
}}

{json_only}"#,
        context = suggestion_context(request),
        json_only = JSON_ONLY,
    )
}

fn suggestion_context(request: &SuggestionRequest) -> String {
    let mut context = format!(
        "Patient Information:\n- Name: {}\n- Age: {}\n- Gender: {}\n\nVital Signs:\n{}",
        request.patient.name,
        request.patient.age,
        request.patient.gender,
        vitals_block(&request.vitals)
    );
    if let Some(score) = request.vitals.overall_score {
        context.push_str(&format!("\n- Overall health score: {:.0}/100", score));
    }
    if !request.lab_reports.is_empty() {
        let reports = serde_json::to_string_pretty(&request.lab_reports)
            .unwrap_or_else(|_| "[]".to_string());
        context.push_str(&format!("\n\nPrevious Lab Analyses:\n{}", reports));
    }
    context
}

fn vitals_block(vitals: &Vitals) -> String {
    let line = |label: &str, value: Option<f64>, unit: &str| match value {
        Some(v) => format!("- {}: {} {}", label, v, unit),
        None => format!("- {}: N/A", label),
    };
    let flag = |b: bool| if b { "Yes" } else { "No" };

    let mut lines = vec![
        line("Systolic", vitals.systolic, "mmHg"),
        line("Diastolic", vitals.diastolic, "mmHg"),
        line("Heart Rate", vitals.heart_rate, "bpm"),
        line("Temperature", vitals.temperature, "°F"),
        line("Respiratory Rate", vitals.respiratory_rate, "breaths/min"),
        line("Oxygen Saturation", vitals.oxygen_saturation, "%"),
        line("Weight", vitals.weight, "kg"),
        line("Height", vitals.height, "cm"),
        format!("- Heart Disease: {}", flag(vitals.heart_disease)),
        format!("- Diabetes: {}", flag(vitals.diabetes)),
        format!("- Hypertension: {}", flag(vitals.hypertension)),
        format!("- Asthma: {}", flag(vitals.asthma)),
    ];
    if let Some(other) = &vitals.other_conditions {
        lines.push(format!("- Other Conditions: {}", other));
    }
    if let Some(allergies) = &vitals.allergies {
        lines.push(format!("- Allergies: {}", allergies));
    }
    lines.join("\n")
}

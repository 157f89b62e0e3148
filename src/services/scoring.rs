use crate::models::{Metric, MetricStatus, Patient, Vitals, VitalsAnalysis, MIN_OVERALL_SCORE};

/// Rule-based vitals scorer
/// Used whenever the model path is unavailable; every deduction is a fixed threshold rule

// Neutral readings assumed when a measurement is missing or unreadable
const ASSUMED_SYSTOLIC: f64 = 120.0;
const ASSUMED_DIASTOLIC: f64 = 80.0;
const ASSUMED_HEART_RATE: f64 = 72.0;
const ASSUMED_OXYGEN_SATURATION: f64 = 98.0;

const NO_RISK_FACTORS: &str = "No immediate risk factors identified";
const NOT_AVAILABLE: &str = "N/A";

/// Score vitals from 100 down, floored at 50
pub fn score_vitals(patient: &Patient, vitals: &Vitals) -> VitalsAnalysis {
    let mut score: i32 = 100;
    let mut risk_factors = Vec::new();
    let mut metrics = Vec::with_capacity(6);

    // Blood pressure
    let systolic = vitals.systolic.unwrap_or(ASSUMED_SYSTOLIC);
    let diastolic = vitals.diastolic.unwrap_or(ASSUMED_DIASTOLIC);
    let bp_status = if systolic > 140.0 || diastolic > 90.0 {
        score -= 20;
        risk_factors.push("High blood pressure (Stage 2 hypertension range)".to_string());
        MetricStatus::Critical
    } else if systolic > 130.0 || diastolic > 85.0 {
        score -= 10;
        risk_factors.push("Elevated blood pressure".to_string());
        MetricStatus::Warning
    } else {
        MetricStatus::Normal
    };
    metrics.push(Metric::new(
        "Blood Pressure",
        blood_pressure_display(vitals),
        bp_status,
    ));

    // Heart rate
    let heart_rate = vitals.heart_rate.unwrap_or(ASSUMED_HEART_RATE);
    let hr_status = if heart_rate > 100.0 || heart_rate < 60.0 {
        score -= 5;
        if heart_rate > 100.0 {
            risk_factors.push("Elevated resting heart rate (tachycardia)".to_string());
        }
        MetricStatus::Warning
    } else {
        MetricStatus::Normal
    };
    metrics.push(Metric::new(
        "Heart Rate",
        with_unit(vitals.heart_rate, "bpm"),
        hr_status,
    ));

    metrics.push(Metric::new(
        "Temperature",
        with_unit(vitals.temperature, "°F"),
        MetricStatus::Normal,
    ));
    metrics.push(Metric::new(
        "Respiratory Rate",
        with_unit(vitals.respiratory_rate, "breaths/min"),
        MetricStatus::Normal,
    ));

    // Oxygen saturation: both deductions apply below 90
    let spo2 = vitals.oxygen_saturation.unwrap_or(ASSUMED_OXYGEN_SATURATION);
    let mut spo2_status = MetricStatus::Normal;
    if spo2 < 95.0 {
        score -= 10;
        spo2_status = MetricStatus::Warning;
        if spo2 < 90.0 {
            score -= 20;
            spo2_status = MetricStatus::Critical;
            risk_factors.push("Critically low oxygen saturation (hypoxemia)".to_string());
        } else {
            risk_factors.push("Low oxygen saturation".to_string());
        }
    }
    metrics.push(Metric::new(
        "Oxygen Saturation",
        with_unit(vitals.oxygen_saturation, "%"),
        spo2_status,
    ));

    // BMI
    let bmi_metric = match vitals.bmi() {
        Some(bmi) => {
            let status = if !(18.5..=25.0).contains(&bmi) {
                score -= 5;
                MetricStatus::Warning
            } else {
                MetricStatus::Normal
            };
            Metric::new("BMI", format!("{:.1}", bmi), status)
        }
        None => Metric::new("BMI", NOT_AVAILABLE, MetricStatus::Normal),
    };
    metrics.push(bmi_metric);

    // Medical history
    if vitals.heart_disease {
        score -= 10;
        risk_factors.push("History of heart disease".to_string());
    }
    if vitals.diabetes {
        score -= 5;
        risk_factors.push("Diabetes (elevated cardiovascular risk)".to_string());
    }
    if vitals.hypertension {
        score -= 5;
        risk_factors.push("Diagnosed hypertension".to_string());
    }

    let overall_score = score.max(i32::from(MIN_OVERALL_SCORE)) as u8;

    if risk_factors.is_empty() {
        risk_factors.push(NO_RISK_FACTORS.to_string());
    }

    VitalsAnalysis {
        overall_score,
        metrics,
        risk_factors,
        summary: summary_for(patient, overall_score),
        recommendations: recommendations_for(overall_score).to_string(),
    }
}

fn summary_for(patient: &Patient, score: u8) -> String {
    let name = if patient.name.trim().is_empty() {
        "The patient"
    } else {
        patient.name.trim()
    };

    if score > 85 {
        format!(
            "{}'s vital signs are within healthy ranges (overall score {}/100). Blood pressure, heart rate and oxygen saturation show no signs of acute cardiovascular strain. Continue current lifestyle habits and routine monitoring.",
            name, score
        )
    } else if score > 70 {
        format!(
            "{}'s vital signs show some values outside the optimal range (overall score {}/100). The findings are not acute but indicate moderate cardiovascular risk that should be reviewed with a healthcare provider.",
            name, score
        )
    } else {
        format!(
            "{}'s vital signs show several concerning values (overall score {}/100). Multiple indicators suggest significant cardiovascular risk; a prompt clinical evaluation is advised.",
            name, score
        )
    }
}

fn recommendations_for(score: u8) -> &'static str {
    if score > 85 {
        "Maintain a balanced diet rich in fruits, vegetables and whole grains. Keep at least 150 minutes of moderate aerobic activity per week. Recheck vital signs at your annual checkup."
    } else if score > 70 {
        "Monitor blood pressure and heart rate at home several times per week. Reduce sodium intake below 2,300 mg per day and limit alcohol. Schedule a follow-up with your physician within the next few weeks."
    } else {
        "Consult a physician as soon as possible for a full cardiovascular assessment. Track blood pressure, heart rate and oxygen saturation daily and seek emergency care for chest pain, shortness of breath or dizziness. Review current medications and risk factors with your care team."
    }
}

fn blood_pressure_display(vitals: &Vitals) -> String {
    match (vitals.systolic, vitals.diastolic) {
        (None, None) => NOT_AVAILABLE.to_string(),
        (systolic, diastolic) => format!("{}/{} mmHg", reading(systolic), reading(diastolic)),
    }
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(_) => format!("{} {}", reading(value), unit),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn reading(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{:.0}", v),
        Some(v) => format!("{}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

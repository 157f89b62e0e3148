use crate::models::{
    FollowUpItem, FollowUpPlan, LabTest, LabTestSuggestion, Medication, Metric, MetricStatus,
    Patient, PrescriptionSuggestion, Priority, ReportAnalysis, SuggestionRequest, Urgency,
};
use crate::services::scoring;

/// Deterministic stand-ins for model output.
/// Served when no Gemini key is configured or the model reply cannot be used.

pub fn report_analysis(patient: &Patient) -> ReportAnalysis {
    ReportAnalysis {
        metrics: vec![
            Metric::new("Blood Pressure", "118/78", MetricStatus::Normal),
            Metric::new("Cholesterol", "185 mg/dL", MetricStatus::Normal),
            Metric::new("Heart Rate", "68 bpm", MetricStatus::Normal),
            Metric::new("Blood Sugar", "92 mg/dL", MetricStatus::Normal),
            Metric::new("Triglycerides", "145 mg/dL", MetricStatus::Normal),
        ],
        summary: format!(
            "Based on the analysis of {}'s lab reports (Age: {}, Gender: {}), the cardiovascular health indicators are within normal ranges. Blood pressure readings show healthy systolic and diastolic values. Cholesterol levels are optimal, with good HDL/LDL ratio. Heart rate is stable and within expected parameters. Blood sugar levels indicate no signs of diabetes risk. Overall cardiovascular health appears good with no immediate concerns.",
            patient.name, patient.age, patient.gender
        ),
        recommendations: "Continue maintaining a balanced diet rich in omega-3 fatty acids and fiber. Engage in at least 150 minutes of moderate aerobic activity per week. Monitor blood pressure regularly at home. Stay hydrated and limit sodium intake to less than 2,300mg daily. Schedule routine cardiovascular checkups annually. Consider stress management techniques like meditation or yoga.".to_string(),
    }
}

/// Score used by the suggestion rules: the one the frontend already showed, or a fresh one
fn effective_score(request: &SuggestionRequest) -> f64 {
    request.vitals.overall_score.unwrap_or_else(|| {
        f64::from(scoring::score_vitals(&request.patient, &request.vitals).overall_score)
    })
}

pub fn prescription(request: &SuggestionRequest) -> PrescriptionSuggestion {
    let vitals = &request.vitals;
    let mut medications = Vec::new();

    if vitals.blood_pressure_elevated() || vitals.hypertension {
        let priority = if vitals.blood_pressure_critical() {
            Priority::High
        } else {
            Priority::Medium
        };
        medications.push(Medication {
            name: "Amlodipine".into(),
            dosage: "5 mg".into(),
            frequency: "Once daily".into(),
            duration: "3 months, then reassess".into(),
            priority: Some(priority),
            notes: Some("Recheck blood pressure in 2-4 weeks; watch for ankle swelling.".into()),
        });
    }

    if vitals.heart_disease || vitals.diabetes {
        medications.push(Medication {
            name: "Atorvastatin".into(),
            dosage: "20 mg".into(),
            frequency: "Once daily at bedtime".into(),
            duration: "6 months, then reassess".into(),
            priority: Some(Priority::Medium),
            notes: Some("Repeat lipid panel and liver enzymes after 6-8 weeks.".into()),
        });
    }

    if vitals.diabetes {
        medications.push(Medication {
            name: "Metformin".into(),
            dosage: "500 mg".into(),
            frequency: "Twice daily with meals".into(),
            duration: "3 months, then reassess".into(),
            priority: Some(Priority::Medium),
            notes: Some("Titrate according to HbA1c; check renal function first.".into()),
        });
    }

    if medications.is_empty() {
        medications.push(Medication {
            name: "Omega-3 Fatty Acids".into(),
            dosage: "1000 mg".into(),
            frequency: "Once daily with food".into(),
            duration: "3 months".into(),
            priority: Some(Priority::Low),
            notes: Some("Supportive cardiovascular supplement; no acute indication found.".into()),
        });
    }

    let mut notes = format!(
        "AI-assisted suggestions for physician review only (health score {:.0}/100). Confirm current medications, contraindications and renal function before prescribing.",
        effective_score(request)
    );
    if let Some(allergies) = &vitals.allergies {
        notes.push_str(&format!("\nRecorded allergies: {}.", allergies.trim()));
    }

    PrescriptionSuggestion { medications, notes }
}

pub fn lab_tests(request: &SuggestionRequest) -> LabTestSuggestion {
    let vitals = &request.vitals;
    let score = effective_score(request);
    let mut tests = vec![
        LabTest {
            name: "Complete Blood Count (CBC)".into(),
            urgency: Some(Urgency::Routine),
            reason: Some("Baseline screening for anemia and infection.".into()),
        },
        LabTest {
            name: "Lipid Panel".into(),
            urgency: Some(if score < 70.0 { Urgency::Soon } else { Urgency::Routine }),
            reason: Some("Assess LDL, HDL and triglycerides for cardiovascular risk.".into()),
        },
    ];

    if vitals.diabetes {
        tests.push(LabTest {
            name: "HbA1c".into(),
            urgency: Some(Urgency::Soon),
            reason: Some("Evaluate glycemic control over the past three months.".into()),
        });
    }

    if vitals.blood_pressure_elevated() || vitals.hypertension {
        tests.push(LabTest {
            name: "Basic Metabolic Panel".into(),
            urgency: Some(Urgency::Soon),
            reason: Some("Check electrolytes and kidney function given elevated blood pressure.".into()),
        });
    }

    if vitals.heart_rate_abnormal() || vitals.heart_disease {
        tests.push(LabTest {
            name: "12-lead ECG".into(),
            urgency: Some(if score < 60.0 { Urgency::Urgent } else { Urgency::Soon }),
            reason: Some("Evaluate heart rhythm and signs of ischemia.".into()),
        });
    }

    if let Some(spo2) = vitals.oxygen_saturation.filter(|s| *s < 95.0) {
        tests.push(LabTest {
            name: "Arterial Blood Gas".into(),
            urgency: Some(if spo2 < 90.0 { Urgency::Urgent } else { Urgency::Soon }),
            reason: Some(format!("Oxygen saturation of {:.0}% needs confirmation.", spo2)),
        });
    }

    LabTestSuggestion {
        tests,
        instructions: "Fast for 9-12 hours before the lipid panel. Bring a list of current medications and any previous lab results to the appointment.".into(),
    }
}

pub fn follow_up(request: &SuggestionRequest) -> FollowUpPlan {
    let vitals = &request.vitals;
    let score = effective_score(request);

    let first_visit = if score < 60.0 {
        "1 week"
    } else if score < 75.0 {
        "2 weeks"
    } else {
        "1 month"
    };

    let schedule = vec![
        FollowUpItem {
            timeframe: first_visit.into(),
            action: "Clinical review of vital signs and lab results".into(),
            details: Some(format!("Current health score {:.0}/100.", score)),
        },
        FollowUpItem {
            timeframe: "3 months".into(),
            action: "Reassess treatment response".into(),
            details: Some("Repeat blood pressure and any abnormal labs.".into()),
        },
        FollowUpItem {
            timeframe: "6 months".into(),
            action: "Comprehensive cardiovascular checkup".into(),
            details: None,
        },
    ];

    let mut monitoring = vec!["Record resting heart rate and blood pressure at home."];
    if vitals.diabetes {
        monitoring.push("Check fasting blood glucose daily.");
    }
    if vitals.oxygen_saturation.is_some_and(|s| s < 95.0) {
        monitoring.push("Measure oxygen saturation twice daily with a pulse oximeter.");
    }

    FollowUpPlan {
        schedule,
        monitoring: monitoring.join("\n"),
        goals: "Keep blood pressure below 130/80 mmHg, resting heart rate between 60 and 100 bpm, and work toward a BMI between 18.5 and 25.".into(),
    }
}

// Request and response shapes. Field names follow the frontend's JSON.

mod analysis;
mod patient;
mod suggestion;

pub use analysis::{
    Metric, MetricStatus, ReportAnalysis, VitalsAnalysis, MAX_OVERALL_SCORE, MIN_OVERALL_SCORE,
};
pub use patient::{Patient, Vitals};
pub use suggestion::{
    FollowUpItem, FollowUpPlan, LabTest, LabTestSuggestion, Medication, PrescriptionSuggestion,
    Priority, SuggestionRequest, Urgency,
};

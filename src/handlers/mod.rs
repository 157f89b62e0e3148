// HTTP handlers — thin wrappers over services::analysis
pub mod analyze;
pub mod suggest;
pub mod system;

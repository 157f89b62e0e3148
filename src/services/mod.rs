// Services module — analysis logic kept apart from the HTTP handlers
pub mod analysis;
pub mod gemini;
pub mod markdown;
pub mod mock;
pub mod parser;
pub mod prompts;
pub mod scoring;

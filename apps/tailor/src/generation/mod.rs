// Document generation: prompts, validator, retry orchestrator and the run pipeline.
// All service calls go through llm_client::TextGenerator.

pub mod job_summary;
pub mod orchestrator;
pub mod pipeline;
pub mod prompts;
pub mod validator;

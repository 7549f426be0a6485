pub mod analyzer;
pub mod engine;
pub mod export;
pub mod fallback;
pub mod generation;
pub mod llm_client;
pub mod orchestrator;
pub mod prompt_builder;
pub mod protocol;
pub mod sanitizer;
pub mod testing;

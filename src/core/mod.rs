pub mod orchestrator;
pub mod prompt_builder;
pub mod snippet_sampler;

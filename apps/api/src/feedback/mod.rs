// Feedback: AI evaluation of an interview transcript, persisted per (interview, user).
// All LLM calls go through llm_client; nothing here talks to Anthropic directly.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod repository;

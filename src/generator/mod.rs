//! Skill Generation Backend
//!
//! The external natural-language collaborator: composes the generation
//! instruction and talks to an OpenAI-compatible chat completions
//! endpoint. Everything downstream treats its output as untrusted text
//! to be repaired by the normalizer.

pub mod openai;
pub mod prompt;

pub use openai::OpenAiGenerator;
pub use prompt::{compose_user_message, SYSTEM_PROMPT};

//! Stackable -- Paid Skill Package Builder
//!
//! Generates Claude Code skills from natural language, repairs and
//! validates the generated markdown, and sells the packaged result
//! behind an HTTP 402 (x402) payment gate.

pub mod types;
pub mod config;
pub mod skill;
pub mod generator;
pub mod store;
pub mod payment;
pub mod package;
pub mod server;

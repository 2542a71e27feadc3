//! LLM extraction: prompt, response parsing, and the OpenAI extractor.
//!
//! Parsing is always available so any extractor implementation can reuse it.
//! The OpenAI client requires the `openai` feature.

pub mod parse;
pub mod prompts;

#[cfg(feature = "openai")]
mod openai;

pub use parse::parse_extraction_response;

#[cfg(feature = "openai")]
pub use openai::{OpenAiExtractor, DEFAULT_MODEL};

//! LLM inference engine
//!
//! This module handles all interaction with llama.cpp for model loading and
//! chat completion.

pub mod engine;
pub mod model;

pub use engine::{BrainError, FastBrain};
pub use model::resolve_model_path;

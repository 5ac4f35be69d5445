//! Model artifact storage
//!
//! This module handles fetching model files from HuggingFace Hub into the
//! local model directory.

pub mod huggingface;

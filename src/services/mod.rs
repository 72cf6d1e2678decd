// src/services/mod.rs
pub mod gemini;
pub mod image_codec;
pub mod parser;
pub mod prompt;

pub use gemini::{GeminiClient, VisionModel};

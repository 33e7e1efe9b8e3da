pub mod gemini;
pub mod noop;

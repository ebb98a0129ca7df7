pub mod client;
pub mod prompts;
pub mod stream;

pub use client::GenAiClient;

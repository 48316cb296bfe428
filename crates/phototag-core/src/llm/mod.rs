//! Vision API integration for keyword generation.
//!
//! Provides a provider abstraction (so the tagger can be driven by a fake in
//! tests), the OpenAI Chat Completions backend, and retry classification.

pub(crate) mod openai;
pub(crate) mod provider;
pub(crate) mod retry;

pub use openai::OpenAiProvider;
pub use provider::{
    resolve_env_var, Detail, ImageInput, VisionProvider, VisionProviderFactory, VisionRequest,
    VisionResponse,
};
pub use retry::{backoff_duration, is_retryable};

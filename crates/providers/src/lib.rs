//! LLM Provider implementations for Outly.
//!
//! All providers implement the `outly_core::Provider` trait.
//! [`router::build_from_config`] picks the backend from configuration.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;

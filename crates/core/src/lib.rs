//! # Outly Core
//!
//! Domain types, traits, and error definitions for the Outly weather advisor.
//! This crate has **no HTTP dependencies**. It defines the domain model that
//! the provider, weather, agent and gateway crates implement against.
//!
//! The LLM backend is a trait here; implementations live in `outly-providers`.

pub mod error;
pub mod language;
pub mod message;
pub mod provider;
pub mod weather;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, WeatherError};
pub use language::Language;
pub use message::{ConversationTurn, Message, Role, TurnRole};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use weather::WeatherSnapshot;

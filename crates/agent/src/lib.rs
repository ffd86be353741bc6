//! The advisory core of Outly.
//!
//! A chat request flows through three pieces:
//!
//! 1. **Admit**: the [`RateGovernor`] checks the caller's fixed-window budget
//! 2. **Ground**: the weather snapshot becomes a context sentence and is
//!    embedded in the system instruction ([`context`], [`prompt`])
//! 3. **Ask**: the [`ConversationOrchestrator`] sends system instruction,
//!    history and the new message to the LLM provider and returns the reply

pub mod context;
pub mod orchestrator;
pub mod prompt;
pub mod rate_limit;

pub use context::{WEATHER_UNAVAILABLE, format_weather_context};
pub use orchestrator::{ChatInput, ChatReply, ConversationOrchestrator, FALLBACK_REPLY, GenerationSettings};
pub use prompt::{activity_request, build_messages, system_instruction, weather_question};
pub use rate_limit::{Admission, ClientIdentity, RateGovernor};

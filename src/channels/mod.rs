//! Conversation transport abstraction.
//!
//! The survey runner never talks to a messaging platform directly; it asks
//! a [`Conversation`] for the three things a scripted survey needs: sending
//! ordered response texts, asking a yes/no question, and capturing one
//! free-text answer. Transports own input recognition, so the runner always
//! receives an actual boolean from a choice prompt.

pub mod cli;

pub use cli::CliChannel;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ChannelError;

/// Capability surface the survey runner needs from a transport.
#[async_trait]
pub trait Conversation: Send + Sync {
    /// Channel name for diagnostics ("cli", "sms", ...).
    fn name(&self) -> &str;

    /// Emit the given response texts to the user, in order.
    async fn send_responses(&self, texts: &[String]) -> Result<(), ChannelError>;

    /// Ask a yes/no question. Implementations must keep prompting until the
    /// answer parses as a boolean.
    async fn prompt_choice(&self, prompt: &str) -> Result<bool, ChannelError>;

    /// Ask an open question and return the user's answer verbatim.
    async fn prompt_free_text(&self, prompt: &str) -> Result<String, ChannelError>;
}

/// Recognize a yes/no confirmation. Returns `None` when the input is
/// neither, in which case the transport should re-prompt.
pub fn parse_choice(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "yeah" | "yep" | "sure" | "ok" | "okay" => Some(true),
        "no" | "n" | "nope" | "nah" => Some(false),
        _ => None,
    }
}

/// Upper bound on any single pacing delay.
const MAX_TYPING_DELAY: Duration = Duration::from_secs(3);

/// Pacing delay for a response of the given length, as if someone were
/// typing it. Zero `per_char` disables pacing. Presentation only; skipping
/// it changes nothing about the survey.
pub fn typing_delay(text: &str, per_char: Duration) -> Duration {
    let delay = per_char.saturating_mul(text.chars().count() as u32);
    delay.min(MAX_TYPING_DELAY)
}

//! CLI channel — stdin/stdout transport for local runs.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::channels::{Conversation, parse_choice, typing_delay};
use crate::error::ChannelError;

/// A simple CLI transport that reads from stdin and writes to stdout.
///
/// Prompts are strictly sequential (one step is active at a time), so a
/// single mutex over the line reader is all the coordination needed.
pub struct CliChannel {
    typing_delay_per_char: Duration,
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl CliChannel {
    pub fn new(typing_delay_per_char: Duration) -> Self {
        Self {
            typing_delay_per_char,
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Read the next non-empty line, re-printing the prompt marker on blanks.
    async fn read_line(&self) -> Result<String, ChannelError> {
        let mut lines = self.lines.lock().await;
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        eprint!("> ");
                        continue;
                    }
                    return Ok(line);
                }
                Ok(None) => {
                    return Err(ChannelError::ConversationClosed {
                        name: "cli".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ChannelError::ReadFailed {
                        name: "cli".to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    async fn emit(&self, text: &str) {
        let delay = typing_delay(text, self.typing_delay_per_char);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        println!("{text}");
    }
}

#[async_trait]
impl Conversation for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn send_responses(&self, texts: &[String]) -> Result<(), ChannelError> {
        for text in texts {
            self.emit(text).await;
        }
        Ok(())
    }

    async fn prompt_choice(&self, prompt: &str) -> Result<bool, ChannelError> {
        self.emit(prompt).await;
        loop {
            eprint!("> ");
            let line = self.read_line().await?;
            match parse_choice(&line) {
                Some(choice) => return Ok(choice),
                None => println!("Please answer yes or no."),
            }
        }
    }

    async fn prompt_free_text(&self, prompt: &str) -> Result<String, ChannelError> {
        self.emit(prompt).await;
        eprint!("> ");
        self.read_line().await
    }
}

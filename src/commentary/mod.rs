//! Game-over commentary
//!
//! After a crash the game asks a text-generation service for a short remark
//! about the final score. The request runs outside the game loop and may
//! finish long after the player has restarted, so every request is tagged
//! with the [`SessionId`] of the run that produced it.

pub mod gemini;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shown when the request fails for any reason
pub const FALLBACK_COMMENTARY: &str = "Try harder next time!";
/// Shown when the service answers with no text
pub const EMPTY_COMMENTARY: &str = "Game over!";

/// Identifies one run; bumped on every start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl SessionId {
    pub fn next(self) -> Self {
        SessionId(self.0 + 1)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Commentary shown on the game-over screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commentary {
    pub text: String,
    /// A request for this run is in flight
    pub pending: bool,
}

impl Commentary {
    pub fn clear(&mut self) {
        self.text.clear();
        self.pending = false;
    }
}

/// A commentary request waiting to be dispatched by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentaryRequest {
    pub session: SessionId,
    pub score: u32,
}

/// Why commentary could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentaryError {
    /// Turned off in settings
    Disabled,
    /// No API key configured
    MissingApiKey,
    /// Network or client failure
    Transport(String),
    /// Service answered with a non-success status
    Status(u16),
    /// Response body was not the expected JSON
    Malformed(String),
}

impl fmt::Display for CommentaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentaryError::Disabled => write!(f, "commentary disabled"),
            CommentaryError::MissingApiKey => write!(f, "no API key configured"),
            CommentaryError::Transport(msg) => write!(f, "request failed: {}", msg),
            CommentaryError::Status(code) => write!(f, "service returned HTTP {}", code),
            CommentaryError::Malformed(msg) => write!(f, "unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for CommentaryError {}

/// Commentary service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentaryConfig {
    pub enabled: bool,
    /// Never written back out with the rest of the settings
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    /// Language the remark should be written in
    pub language: String,
    pub temperature: f32,
    /// Upper bound on the remark's length
    pub max_words: u32,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: "gemini-3-flash-preview".to_string(),
            language: "English".to_string(),
            temperature: 0.8,
            max_words: 15,
        }
    }
}

impl CommentaryConfig {
    /// API key, or the reason a request can't be made
    pub fn credentials(&self) -> Result<&str, CommentaryError> {
        if !self.enabled {
            return Err(CommentaryError::Disabled);
        }
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(CommentaryError::MissingApiKey),
        }
    }
}

/// Score above which the remark should sound impressed
pub const IMPRESSIVE_SCORE: u32 = 20;

/// Prompt sent to the model for a final score
pub fn build_prompt(score: u32, config: &CommentaryConfig) -> String {
    let tone = if score == 0 {
        "The player scored zero, so be extra sarcastic."
    } else if score > IMPRESSIVE_SCORE {
        "That is a high score, so sound genuinely impressed."
    } else {
        "Keep it playful."
    };
    format!(
        "The player just finished a Flappy Bird game with a score of {score}. \
         Give a very short, witty, and slightly snarky comment in {language} \
         (max {max_words} words) about their performance. {tone}",
        language = config.language,
        max_words = config.max_words,
    )
}

/// Text to display for a finished request
pub fn resolve_text(result: Result<String, CommentaryError>) -> String {
    match result {
        Ok(text) if text.trim().is_empty() => EMPTY_COMMENTARY.to_string(),
        Ok(text) => text.trim().to_string(),
        Err(CommentaryError::Disabled) => {
            log::debug!("Commentary disabled, using fallback");
            FALLBACK_COMMENTARY.to_string()
        }
        Err(e) => {
            log::warn!("Commentary error: {}", e);
            FALLBACK_COMMENTARY.to_string()
        }
    }
}

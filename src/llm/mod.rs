pub mod gemini;
pub mod prompts;
pub mod types;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Model => write!(f, "model"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

/// Deep = slow reasoning model for chart work and chat, Fast = cheap model
/// for JSON and search-grounded calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelTier {
    Deep,
    Fast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data_base64: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub tier: ModelTier,
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub history: Vec<ChatTurn>,
    pub image: Option<InlineImage>,
    pub json_output: bool,
    pub thinking: bool,
    pub search_grounding: bool,
}

impl GenerationRequest {
    pub fn new(tier: ModelTier, prompt: impl Into<String>) -> Self {
        Self {
            tier,
            prompt: prompt.into(),
            system_instruction: None,
            history: Vec::new(),
            image: None,
            json_output: false,
            thinking: false,
            search_grounding: false,
        }
    }

    pub fn system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn history(mut self, history: Vec<ChatTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }

    pub fn thinking(mut self) -> Self {
        self.thinking = true;
        self
    }

    pub fn grounded(mut self) -> Self {
        self.search_grounding = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedText {
    /// `None` when the model produced no text at all.
    pub text: Option<String>,
    pub sources: Vec<GroundingSource>,
}

impl GeneratedText {
    pub fn text_or(&self, fallback: &str) -> String {
        match self.text.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// The hosted language model, seen from this crate as prompt in, text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedText>;
}

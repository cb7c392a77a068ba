// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Chat collaborator boundary.
//!
//! The chat panel talks *about* the active option but never moves the path. The actual model
//! call sits behind [`ChatCollaborator`]; this module owns what surrounds it: the card context,
//! per-option histories, user-facing placeholders for failures, and conversation summaries.

use std::collections::HashMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::model::{NodeId, NodeRef};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

pub const API_KEY_VAR: &str = "NARRATIVE_CHAT_API_KEY";
pub const BASE_URL_VAR: &str = "NARRATIVE_CHAT_BASE_URL";
pub const MODEL_VAR: &str = "NARRATIVE_CHAT_MODEL";

/// Selectable models as `(id, label)`; the first one is the default.
pub const MODEL_OPTIONS: [(&str, &str); 5] = [
    ("openai/gpt-4o-mini", "GPT-4o Mini"),
    ("openai/gpt-4o", "GPT-4o"),
    ("anthropic/claude-3.5-sonnet", "Claude 3.5 Sonnet"),
    ("google/gemini-1.5-flash", "Gemini 1.5 Flash"),
    ("mistral/mistral-large", "Mistral Large"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub model: String,
    /// System prompt first, then the option's history ending with the new user message.
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    MissingCredentials,
    Status(u16),
    Network(String),
    EmptyReply,
}

impl ChatError {
    /// Text shown in the conversation in place of a reply.
    pub fn placeholder(&self) -> String {
        match self {
            Self::MissingCredentials => {
                format!("API key is missing. Set {API_KEY_VAR} to continue.")
            }
            Self::Status(status) => {
                format!("Request failed ({status}). Please check your chat setup.")
            }
            Self::Network(_) => "Network error. Please try again.".to_owned(),
            Self::EmptyReply => "No response received.".to_owned(),
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "chat credentials are not configured"),
            Self::Status(status) => write!(f, "chat request failed with status {status}"),
            Self::Network(message) => write!(f, "chat network error: {message}"),
            Self::EmptyReply => write!(f, "chat reply was empty"),
        }
    }
}

impl std::error::Error for ChatError {}

/// Whatever answers chat requests (a hosted model, a test double, ...).
pub trait ChatCollaborator: Send + Sync {
    fn complete(&self, request: &ChatRequest) -> Result<String, ChatError>;
}

/// Stand-in used when no API key is configured: every request fails with
/// [`ChatError::MissingCredentials`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Unconfigured;

impl ChatCollaborator for Unconfigured {
    fn complete(&self, _request: &ChatRequest) -> Result<String, ChatError> {
        Err(ChatError::MissingCredentials)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: MODEL_OPTIONS[0].0.to_owned(),
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            api_key: get(API_KEY_VAR),
            base_url: get(BASE_URL_VAR).unwrap_or(defaults.base_url),
            model: get(MODEL_VAR).unwrap_or(defaults.model),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// The context block describing a card to the model.
pub fn card_context(node: NodeRef<'_>) -> String {
    format!(
        "Card Title: {}\nSubtitle: {}\nDescription: {}",
        node.display_name(),
        node.subtitle(),
        node.description()
    )
}

pub fn system_prompt(node: NodeRef<'_>) -> String {
    format!(
        "You are a scenario analyst helping refine a card. Use the card context below.\n\n{}",
        card_context(node)
    )
}

/// Per-option conversations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPanel {
    model: String,
    histories: HashMap<NodeId, Vec<ChatMessage>>,
}

impl Default for ChatPanel {
    fn default() -> Self {
        Self::new(MODEL_OPTIONS[0].0)
    }
}

impl ChatPanel {
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into(), histories: HashMap::new() }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn history(&self, node_id: &NodeId) -> &[ChatMessage] {
        self.histories.get(node_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Send `input` about `node`. Blank input is ignored and returns `None`; otherwise the
    /// assistant message appended to the history (a reply or an error placeholder).
    pub fn send(
        &mut self,
        collaborator: &dyn ChatCollaborator,
        node: NodeRef<'_>,
        input: &str,
    ) -> Option<&ChatMessage> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        let history = self.histories.entry(node.id().clone()).or_default();
        history.push(ChatMessage::user(trimmed));

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(system_prompt(node)));
        messages.extend(history.iter().cloned());
        let request = ChatRequest { model: self.model.clone(), messages };

        let reply = match collaborator.complete(&request) {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => ChatError::EmptyReply.placeholder(),
            Err(err) => {
                tracing::warn!(node_id = %node.id(), error = %err, "chat request failed");
                err.placeholder()
            }
        };
        history.push(ChatMessage::assistant(reply));
        history.last()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub option_id: NodeId,
    pub option_title: String,
    pub summary: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub message_count: usize,
}

const SUMMARY_PROMPT: &str = "Summarize the following conversation in two or three concise \
     sentences. Include the key insights and conclusions.";

/// One summary per option, replaced on regeneration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryBook {
    summaries: Vec<ConversationSummary>,
}

impl SummaryBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summaries(&self) -> &[ConversationSummary] {
        &self.summaries
    }

    pub fn upsert(&mut self, summary: ConversationSummary) {
        match self.summaries.iter_mut().find(|s| s.option_id == summary.option_id) {
            Some(existing) => *existing = summary,
            None => self.summaries.push(summary),
        }
    }

    pub fn get(&self, option_id: &NodeId) -> Option<&ConversationSummary> {
        self.summaries.iter().find(|s| &s.option_id == option_id)
    }

    pub fn clear(&mut self) {
        self.summaries.clear();
    }

    /// Summarize `messages` with the collaborator, falling back to a local one-liner when it
    /// fails. An empty conversation is not stored.
    pub fn generate(
        &mut self,
        collaborator: &dyn ChatCollaborator,
        option_id: &NodeId,
        option_title: &str,
        messages: &[ChatMessage],
    ) -> String {
        if messages.is_empty() {
            return "No conversation yet.".to_owned();
        }

        let transcript = messages
            .iter()
            .map(|m| {
                let speaker = match m.role {
                    Role::User => "User",
                    Role::Assistant | Role::System => "AI",
                };
                format!("{speaker}: {}", m.content)
            })
            .collect::<Vec<_>>()
            .join("\n");
        let request = ChatRequest {
            model: MODEL_OPTIONS[0].0.to_owned(),
            messages: vec![ChatMessage::system(SUMMARY_PROMPT), ChatMessage::user(transcript)],
        };

        let summary = match collaborator.complete(&request) {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_owned(),
            outcome => {
                if let Err(err) = outcome {
                    tracing::debug!(option_id = %option_id, error = %err, "using local summary");
                }
                let questions = messages.iter().filter(|m| m.role == Role::User).count();
                let noun = if questions == 1 { "question" } else { "questions" };
                format!("Discussed {questions} {noun} about {option_title}.")
            }
        };

        self.upsert(ConversationSummary {
            option_id: option_id.clone(),
            option_title: option_title.to_owned(),
            summary: summary.clone(),
            timestamp: now_millis(),
            message_count: messages.len(),
        });
        summary
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests;

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::sync::Mutex;

use rstest::{fixture, rstest};

use super::*;
use crate::source::{DataSource, TreeSource};

/// Replays a fixed outcome and records every request it saw.
struct Scripted {
    outcome: Result<String, ChatError>,
    seen: Mutex<Vec<ChatRequest>>,
}

impl Scripted {
    fn replying(reply: &str) -> Self {
        Self { outcome: Ok(reply.to_owned()), seen: Mutex::new(Vec::new()) }
    }

    fn failing(err: ChatError) -> Self {
        Self { outcome: Err(err), seen: Mutex::new(Vec::new()) }
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.seen.lock().expect("lock").clone()
    }
}

impl ChatCollaborator for Scripted {
    fn complete(&self, request: &ChatRequest) -> Result<String, ChatError> {
        self.seen.lock().expect("lock").push(request.clone());
        self.outcome.clone()
    }
}

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

#[fixture]
fn steps() -> DataSource {
    DataSource::demo_steps().expect("demo steps")
}

#[fixture]
fn tree() -> DataSource {
    DataSource::demo_tree().expect("demo tree")
}

#[rstest]
fn card_context_uses_option_fields(steps: DataSource) {
    let node = steps.find_by_id(&nid("memory_sector")).expect("memory_sector");
    let option = node.as_option().expect("flat option");
    assert_eq!(
        card_context(node),
        format!(
            "Card Title: HBM & Next-Gen Memory\nSubtitle: {}\nDescription: {}",
            option.subtitle(),
            option.desc()
        )
    );
}

#[rstest]
fn card_context_uses_tree_fields(tree: DataSource) {
    let node = tree.find_by_id(&nid("stock_sk")).expect("stock_sk");
    let tree_node = node.as_tree().expect("tree node");
    assert!(card_context(node).starts_with("Card Title: SK hynix\nSubtitle: "));
    assert!(card_context(node).ends_with(&format!("Description: {}", tree_node.description())));
}

#[rstest]
#[case::missing(ChatError::MissingCredentials, "API key is missing. Set NARRATIVE_CHAT_API_KEY to continue.")]
#[case::status(ChatError::Status(401), "Request failed (401). Please check your chat setup.")]
#[case::network(ChatError::Network("reset".into()), "Network error. Please try again.")]
#[case::empty(ChatError::EmptyReply, "No response received.")]
fn placeholders(#[case] err: ChatError, #[case] expected: &str) {
    assert_eq!(err.placeholder(), expected);
}

#[rstest]
fn blank_input_is_ignored(tree: DataSource) {
    let node = tree.find_by_id(&nid("stock_sk")).expect("stock_sk");
    let collaborator = Scripted::replying("unused");
    let mut panel = ChatPanel::default();

    assert!(panel.send(&collaborator, node, "   \n").is_none());
    assert!(panel.history(node.id()).is_empty());
    assert!(collaborator.requests().is_empty());
}

#[rstest]
fn send_builds_request_and_keeps_per_option_history(tree: DataSource) {
    let sk = tree.find_by_id(&nid("stock_sk")).expect("stock_sk");
    let alt = tree.find_by_id(&nid("stock_alt")).expect("stock_alt");
    let collaborator = Scripted::replying("Memory demand is strong.");
    let mut panel = ChatPanel::new("openai/gpt-4o");

    let reply = panel.send(&collaborator, sk, "  why HBM?  ").expect("reply").clone();
    assert_eq!(reply, ChatMessage::assistant("Memory demand is strong."));
    panel.send(&collaborator, sk, "and next year?");
    panel.send(&collaborator, alt, "what about biotech?");

    assert_eq!(panel.history(sk.id()).len(), 4);
    assert_eq!(panel.history(alt.id()).len(), 2);
    assert_eq!(panel.history(sk.id())[0], ChatMessage::user("why HBM?"));

    let requests = collaborator.requests();
    assert_eq!(requests.len(), 3);
    let second = &requests[1];
    assert_eq!(second.model, "openai/gpt-4o");
    assert_eq!(second.messages[0].role, Role::System);
    assert!(second.messages[0].content.contains("Card Title: SK hynix"));
    // System prompt, first exchange, new question.
    assert_eq!(second.messages.len(), 4);
    assert_eq!(second.messages[3], ChatMessage::user("and next year?"));
    assert!(!requests[2].messages.iter().any(|m| m.content == "why HBM?"));
}

#[rstest]
#[case::status(Scripted::failing(ChatError::Status(500)), "Request failed (500). Please check your chat setup.")]
#[case::blank_reply(Scripted::replying("  "), "No response received.")]
#[case::no_key(Scripted::failing(ChatError::MissingCredentials), "API key is missing. Set NARRATIVE_CHAT_API_KEY to continue.")]
fn failures_become_placeholders(tree: DataSource, #[case] collaborator: Scripted, #[case] expected: &str) {
    let node = tree.find_by_id(&nid("stock_hd")).expect("stock_hd");
    let mut panel = ChatPanel::default();

    let reply = panel.send(&collaborator, node, "hello").expect("reply");
    assert_eq!(reply, &ChatMessage::assistant(expected));
}

#[test]
fn unconfigured_collaborator_reports_missing_credentials() {
    let request = ChatRequest { model: MODEL_OPTIONS[0].0.into(), messages: Vec::new() };
    assert_eq!(Unconfigured.complete(&request), Err(ChatError::MissingCredentials));
}

#[test]
fn config_defaults_when_env_is_empty() {
    let config = ChatConfig::from_lookup(|_| None);
    assert_eq!(config, ChatConfig::default());
    assert_eq!(config.model, "openai/gpt-4o-mini");
    assert!(!config.has_credentials());
    assert_eq!(config.completions_url(), "https://openrouter.ai/api/v1/chat/completions");
}

#[test]
fn config_reads_overrides_and_ignores_blanks() {
    let env: HashMap<&str, &str> = HashMap::from([
        (API_KEY_VAR, "sk-test"),
        (BASE_URL_VAR, "http://localhost:8080/v1/"),
        (MODEL_VAR, "   "),
    ]);
    let config = ChatConfig::from_lookup(|key| env.get(key).map(|v| (*v).to_owned()));

    assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.completions_url(), "http://localhost:8080/v1/chat/completions");
    assert_eq!(config.model, MODEL_OPTIONS[0].0);
}

fn conversation() -> Vec<ChatMessage> {
    vec![
        ChatMessage::user("is it cheap?"),
        ChatMessage::assistant("not really"),
        ChatMessage::user("what is the catalyst?"),
    ]
}

#[test]
fn summary_uses_collaborator_reply() {
    let collaborator = Scripted::replying(" HBM leadership drives margins. ");
    let mut book = SummaryBook::new();

    let summary = book.generate(&collaborator, &nid("stock_sk"), "SK hynix", &conversation());
    assert_eq!(summary, "HBM leadership drives margins.");

    let stored = book.get(&nid("stock_sk")).expect("stored");
    assert_eq!(stored.message_count, 3);
    assert_eq!(stored.option_title, "SK hynix");

    let request = &collaborator.requests()[0];
    assert_eq!(request.messages[0].role, Role::System);
    assert_eq!(
        request.messages[1].content,
        "User: is it cheap?\nAI: not really\nUser: what is the catalyst?"
    );
}

#[test]
fn summary_falls_back_locally_and_upserts() {
    let mut book = SummaryBook::new();
    let first = book.generate(&Unconfigured, &nid("stock_sk"), "SK hynix", &conversation());
    assert_eq!(first, "Discussed 2 questions about SK hynix.");

    let second =
        book.generate(&Unconfigured, &nid("stock_sk"), "SK hynix", &conversation()[..1]);
    assert_eq!(second, "Discussed 1 question about SK hynix.");
    assert_eq!(book.summaries().len(), 1);
    assert_eq!(book.get(&nid("stock_sk")).map(|s| s.message_count), Some(1));

    book.clear();
    assert!(book.get(&nid("stock_sk")).is_none());
}

#[test]
fn empty_conversation_is_not_stored() {
    let mut book = SummaryBook::new();
    let summary = book.generate(&Unconfigured, &nid("stock_sk"), "SK hynix", &[]);
    assert_eq!(summary, "No conversation yet.");
    assert!(book.summaries().is_empty());
}

#[test]
fn summaries_serialize_with_camel_case_keys() {
    let mut book = SummaryBook::new();
    book.upsert(ConversationSummary {
        option_id: nid("tsmc"),
        option_title: "TSMC".into(),
        summary: "Foundry moat.".into(),
        timestamp: 1_700_000_000_000,
        message_count: 2,
    });
    let json = serde_json::to_value(&book).expect("serialize");
    assert_eq!(json[0]["optionId"], "tsmc");
    assert_eq!(json[0]["messageCount"], 2);
}

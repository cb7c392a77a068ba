// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::{NodeId, StepId};

/// How an option is framed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionKind {
    Main,
    Alternative,
    Risky,
}

impl OptionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Alternative => "alternative",
            Self::Risky => "risky",
        }
    }
}

/// Analyst commentary attached to an option card. Opaque to navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub easy_term: String,
}

/// One option of a step in the flat (per-step list) source shape.
///
/// `parent_id` points at an option of the *previous* step; options without one are
/// offered regardless of the upstream selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatOption {
    id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<NodeId>,
    #[serde(rename = "type")]
    kind: OptionKind,
    #[serde(default)]
    badge: String,
    title: String,
    #[serde(default)]
    subtitle: String,
    probability: u8,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    icon: String,
    #[serde(default, rename = "aiAnalysis")]
    analysis: Analysis,
}

impl FlatOption {
    pub fn new(id: NodeId, kind: OptionKind, title: impl Into<String>, probability: u8) -> Self {
        Self {
            id,
            parent_id: None,
            kind,
            badge: String::new(),
            title: title.into(),
            subtitle: String::new(),
            probability,
            desc: String::new(),
            icon: String::new(),
            analysis: Analysis::default(),
        }
    }

    pub fn with_parent(mut self, parent_id: NodeId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = badge.into();
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn parent_id(&self) -> Option<&NodeId> {
        self.parent_id.as_ref()
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    pub fn badge(&self) -> &str {
        &self.badge
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn probability(&self) -> u8 {
        self.probability
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    pub fn analysis_mut(&mut self) -> &mut Analysis {
        &mut self.analysis
    }
}

/// A single depth of the flat source: a question plus every option offered at that depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    id: StepId,
    title: String,
    #[serde(default)]
    question: String,
    #[serde(default)]
    options: Vec<FlatOption>,
}

impl Step {
    pub fn new(id: StepId, title: impl Into<String>) -> Self {
        Self { id, title: title.into(), question: String::new(), options: Vec::new() }
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }

    pub fn id(&self) -> &StepId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[FlatOption] {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Vec<FlatOption> {
        &mut self.options
    }
}

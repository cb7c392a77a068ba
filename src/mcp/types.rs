// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DepthSummary {
    pub depth: usize,
    pub label: Option<String>,
    /// Whether the depth is shown (depth 0, or the depth above is committed).
    pub visible: bool,
    /// Number of options offered at this depth under the current path.
    pub offered: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StepsListResponse {
    pub shape: String,
    pub mode: String,
    pub depth_count: usize,
    pub depths: Vec<DepthSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpNode {
    pub node_id: String,
    pub display_name: String,
    pub subtitle: String,
    pub description: String,
    pub probability: Option<u8>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OptionsListParams {
    pub depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OptionsListResponse {
    pub depth: usize,
    pub label: Option<String>,
    pub visible: bool,
    pub selected_node_id: Option<String>,
    pub options: Vec<McpNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpPathEntry {
    pub depth: usize,
    pub node_id: String,
    pub display_name: String,
    pub committed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpPath {
    pub rev: u64,
    pub entries: Vec<McpPathEntry>,
    pub aggregate_probability: u8,
    pub focus_depth: usize,
    pub active_node_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PathReadResponse {
    pub path: McpPath,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpDelta {
    pub set: Vec<usize>,
    pub cleared: Vec<usize>,
    pub committed: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct McpHandoff {
    pub primary_id: String,
    pub display_name: String,
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PathSelectParams {
    pub depth: usize,
    pub node_id: String,
    /// Reject the call when the path moved past this revision.
    pub base_rev: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PathConfirmParams {
    pub depth: usize,
    pub base_rev: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PathChangeResponse {
    pub new_rev: u64,
    pub applied: usize,
    pub delta: McpDelta,
    pub path: McpPath,
    /// Set when the change published a handoff record.
    pub handoff: Option<McpHandoff>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PathFindParams {
    pub target: String,
    /// Maximum number of suggestions returned when nothing matches (default 5).
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpFoundPath {
    pub path: Vec<String>,
    pub match_kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpSuggestion {
    pub node_id: String,
    pub display_name: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PathFindResponse {
    pub found: Option<McpFoundPath>,
    pub suggestions: Vec<McpSuggestion>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PathResumeParams {
    pub focus_depth: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PathResumeResponse {
    /// One of `record_path`, `primary_id`, `display_name`, `default`.
    pub resumed_from: String,
    pub path: McpPath,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HandoffReadResponse {
    pub handoff: Option<McpHandoff>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HandoffClearResponse {
    pub cleared: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpPick {
    pub node_id: String,
    pub display_name: String,
    pub depth: usize,
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PicksListResponse {
    pub picks: Vec<McpPick>,
    pub expanded_node_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PicksToggleParams {
    pub node_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PicksToggleResponse {
    /// One of `expanded`, `collapsed`, `ignored`.
    pub change: String,
    pub expanded_node_id: Option<String>,
    pub handoff: Option<McpHandoff>,
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

fn parse_node_id(raw: &str) -> Result<NodeId, ErrorData> {
    NodeId::new(raw)
        .map_err(|err| ErrorData::invalid_params(format!("invalid node_id {raw:?}: {err}"), None))
}

fn check_depth(navigator: &Navigator, depth: usize) -> Result<(), ErrorData> {
    let depth_count = navigator.source().depth_count();
    if depth >= depth_count {
        return Err(ErrorData::invalid_params(
            format!("depth {depth} is out of range (depth_count={depth_count})"),
            None,
        ));
    }
    Ok(())
}

fn apply_error_to_mcp(err: ApplyError) -> ErrorData {
    match err {
        ApplyError::Conflict { base_rev, current_rev } => ErrorData::invalid_request(
            "conflict: stale base_rev",
            Some(serde_json::json!({
                "base_rev": base_rev,
                "current_rev": current_rev,
                "snapshot_tool": "path.read",
            })),
        ),
        other => ErrorData::invalid_params(other.to_string(), None),
    }
}

fn open_shelf<'a>(state: &'a mut McpState, handoff: &Arc<dyn HandoffStore>) -> &'a mut PickShelf {
    let McpState { navigator, shelf } = state;
    shelf.get_or_insert_with(|| {
        PickShelf::from_source(navigator.source(), DEFAULT_PICK_DEPTH, handoff.clone())
    })
}

fn shelf_change_label(change: &ShelfChange) -> &'static str {
    match change {
        ShelfChange::Expanded(_) => "expanded",
        ShelfChange::Collapsed => "collapsed",
        ShelfChange::Ignored => "ignored",
    }
}

fn mcp_node(node: NodeRef<'_>) -> McpNode {
    McpNode {
        node_id: node.id().as_str().to_owned(),
        display_name: node.display_name().to_owned(),
        subtitle: node.subtitle().to_owned(),
        description: node.description().to_owned(),
        probability: node.probability(),
    }
}

fn mcp_path(navigator: &Navigator) -> McpPath {
    let source = navigator.source();
    let entries = navigator
        .path()
        .iter()
        .enumerate()
        .map(|(depth, node_id)| McpPathEntry {
            depth,
            node_id: node_id.as_str().to_owned(),
            display_name: source
                .find_by_id(node_id)
                .map(|node| node.display_name().to_owned())
                .unwrap_or_default(),
            committed: navigator.state().is_committed(depth),
        })
        .collect();

    McpPath {
        rev: navigator.rev(),
        entries,
        aggregate_probability: navigator.aggregate_probability(),
        focus_depth: navigator.focus_depth(),
        active_node_id: navigator.active_node().map(|node| node.id().as_str().to_owned()),
    }
}

fn mcp_delta(delta: &PathDelta) -> McpDelta {
    McpDelta {
        set: delta.set.clone(),
        cleared: delta.cleared.clone(),
        committed: delta.committed.clone(),
    }
}

fn mcp_handoff(record: &HandoffRecord) -> McpHandoff {
    McpHandoff {
        primary_id: record.primary_id.as_str().to_owned(),
        display_name: record.display_name.clone(),
        path: record.path.to_strings(),
    }
}

fn mcp_pick(pick: &crate::query::LeafPick) -> McpPick {
    McpPick {
        node_id: pick.node_id.as_str().to_owned(),
        display_name: pick.display_name.clone(),
        depth: pick.depth,
        path: pick.path.to_strings(),
    }
}

fn change_response(
    navigator: &Navigator,
    result: ApplyResult,
    handoff: Option<McpHandoff>,
) -> PathChangeResponse {
    PathChangeResponse {
        new_rev: result.new_rev,
        applied: result.applied,
        delta: mcp_delta(&result.delta),
        path: mcp_path(navigator),
        handoff,
    }
}

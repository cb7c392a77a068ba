// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use tokio::sync::Mutex;

use crate::model::{NodeId, NodeRef};
use crate::navigator::Navigator;
use crate::ops::{ApplyError, ApplyResult, PathDelta};
use crate::query::{suggest_nodes, DEFAULT_PICK_DEPTH};
use crate::shelf::{PickShelf, ShelfChange};
use crate::source::TreeSource;
use crate::store::{HandoffRecord, HandoffStore};

use super::types::*;

const DEFAULT_SUGGESTION_LIMIT: usize = 5;

#[derive(Debug)]
struct McpState {
    navigator: Navigator,
    /// Opened lazily; opening clears the handoff.
    shelf: Option<PickShelf>,
}

#[derive(Clone)]
pub struct NarrativeMcp {
    state: Arc<Mutex<McpState>>,
    handoff: Arc<dyn HandoffStore>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl NarrativeMcp {
    /// Serve `navigator`, attaching `handoff` as its handoff store.
    pub fn new(navigator: Navigator, handoff: Arc<dyn HandoffStore>) -> Self {
        let navigator = navigator.with_handoff(handoff.clone());
        Self {
            state: Arc::new(Mutex::new(McpState { navigator, shelf: None })),
            handoff,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// List the depths of the loaded source with their labels and visibility.
    #[tool(name = "steps.list")]
    async fn steps_list(&self) -> Result<Json<StepsListResponse>, ErrorData> {
        let state = self.state.lock().await;
        let navigator = &state.navigator;
        let source = navigator.source();

        let depths = (0..source.depth_count())
            .map(|depth| DepthSummary {
                depth,
                label: source.depth_label(depth).map(str::to_owned),
                visible: navigator.is_depth_visible(depth),
                offered: navigator.children_of(depth).len(),
            })
            .collect();

        Ok(Json(StepsListResponse {
            shape: source.shape().as_str().to_owned(),
            mode: navigator.mode().as_str().to_owned(),
            depth_count: source.depth_count(),
            depths,
        }))
    }

    /// Options offered at a depth under the current path (empty when the depth above has no
    /// selection).
    #[tool(name = "options.list")]
    async fn options_list(
        &self,
        params: Parameters<OptionsListParams>,
    ) -> Result<Json<OptionsListResponse>, ErrorData> {
        let OptionsListParams { depth } = params.0;
        let state = self.state.lock().await;
        let navigator = &state.navigator;
        check_depth(navigator, depth)?;

        Ok(Json(OptionsListResponse {
            depth,
            label: navigator.source().depth_label(depth).map(str::to_owned),
            visible: navigator.is_depth_visible(depth),
            selected_node_id: navigator.path().get(depth).map(|id| id.as_str().to_owned()),
            options: navigator.children_of(depth).into_iter().map(mcp_node).collect(),
        }))
    }

    #[tool(name = "path.read")]
    async fn path_read(&self) -> Result<Json<PathReadResponse>, ErrorData> {
        let state = self.state.lock().await;
        Ok(Json(PathReadResponse { path: mcp_path(&state.navigator) }))
    }

    /// Select an option at a depth; everything below is replaced by the first-child chain.
    /// Pass `base_rev` (from `path.read`) to fail instead of overwriting a newer path.
    #[tool(name = "path.select")]
    async fn path_select(
        &self,
        params: Parameters<PathSelectParams>,
    ) -> Result<Json<PathChangeResponse>, ErrorData> {
        let PathSelectParams { depth, node_id, base_rev } = params.0;
        let node_id = parse_node_id(&node_id)?;

        let mut state = self.state.lock().await;
        let result =
            state.navigator.try_select(depth, &node_id, base_rev).map_err(apply_error_to_mcp)?;

        Ok(Json(change_response(&state.navigator, result, None)))
    }

    /// Commit the selection at a depth and publish it as the handoff record.
    #[tool(name = "path.confirm")]
    async fn path_confirm(
        &self,
        params: Parameters<PathConfirmParams>,
    ) -> Result<Json<PathChangeResponse>, ErrorData> {
        let PathConfirmParams { depth, base_rev } = params.0;

        let mut state = self.state.lock().await;
        let result =
            state.navigator.try_confirm_step(depth, base_rev).map_err(apply_error_to_mcp)?;
        let handoff = self.handoff.read_or_absent().as_ref().map(mcp_handoff);

        Ok(Json(change_response(&state.navigator, result, handoff)))
    }

    /// Drop the whole path and clear the handoff record.
    #[tool(name = "path.reset")]
    async fn path_reset(&self) -> Result<Json<PathChangeResponse>, ErrorData> {
        let mut state = self.state.lock().await;
        let delta = state.navigator.reset();
        let result = ApplyResult { new_rev: state.navigator.rev(), applied: 1, delta };

        Ok(Json(change_response(&state.navigator, result, None)))
    }

    /// Locate a node by id, then name (ignoring a parenthetical suffix), then substring.
    /// Returns close-name suggestions when nothing matches.
    #[tool(name = "path.find")]
    async fn path_find(
        &self,
        params: Parameters<PathFindParams>,
    ) -> Result<Json<PathFindResponse>, ErrorData> {
        let PathFindParams { target, limit } = params.0;
        if target.trim().is_empty() {
            return Err(ErrorData::invalid_params("target must not be empty", None));
        }

        let state = self.state.lock().await;
        let navigator = &state.navigator;
        let found = navigator.find_path_to_node(&target).map(|found| McpFoundPath {
            path: found.path.to_strings(),
            match_kind: found.kind.as_str().to_owned(),
        });
        let suggestions = match found {
            Some(_) => Vec::new(),
            None => suggest_nodes(
                navigator.source(),
                &target,
                limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT),
            )
            .into_iter()
            .map(|suggestion| McpSuggestion {
                node_id: suggestion.node_id.into_string(),
                display_name: suggestion.display_name,
                score: suggestion.score,
            })
            .collect(),
        };

        Ok(Json(PathFindResponse { found, suggestions }))
    }

    /// Rebuild the path from the current handoff record.
    #[tool(name = "path.resume")]
    async fn path_resume(
        &self,
        params: Parameters<PathResumeParams>,
    ) -> Result<Json<PathResumeResponse>, ErrorData> {
        let Some(record) = self.handoff.read_or_absent() else {
            return Err(ErrorData::resource_not_found("no handoff record to resume", None));
        };

        let mut state = self.state.lock().await;
        let resumed_from = state.navigator.resume(&record, params.0.focus_depth);

        Ok(Json(PathResumeResponse {
            resumed_from: resumed_from.as_str().to_owned(),
            path: mcp_path(&state.navigator),
        }))
    }

    #[tool(name = "handoff.read")]
    async fn handoff_read(&self) -> Result<Json<HandoffReadResponse>, ErrorData> {
        let record = self.handoff.read().map_err(|err| {
            ErrorData::internal_error(format!("failed to read handoff: {err}"), None)
        })?;
        Ok(Json(HandoffReadResponse { handoff: record.as_ref().map(mcp_handoff) }))
    }

    #[tool(name = "handoff.clear")]
    async fn handoff_clear(&self) -> Result<Json<HandoffClearResponse>, ErrorData> {
        let mut state = self.state.lock().await;
        let cleared = self.handoff.read_or_absent().is_some();
        self.handoff.clear().map_err(|err| {
            ErrorData::internal_error(format!("failed to clear handoff: {err}"), None)
        })?;
        if let Some(shelf) = state.shelf.as_mut() {
            shelf.collapse();
        }
        Ok(Json(HandoffClearResponse { cleared }))
    }

    /// Leaf-level picks (depth 3 and below) with their full paths. The first call opens the
    /// pick shelf, which clears any handoff record.
    #[tool(name = "picks.list")]
    async fn picks_list(&self) -> Result<Json<PicksListResponse>, ErrorData> {
        let mut guard = self.state.lock().await;
        let shelf = open_shelf(&mut guard, &self.handoff);

        Ok(Json(PicksListResponse {
            picks: shelf.picks().iter().map(mcp_pick).collect(),
            expanded_node_id: shelf.expanded().map(|pick| pick.node_id.as_str().to_owned()),
        }))
    }

    /// Expand a pick (publishing it as the handoff) or collapse it when already expanded.
    #[tool(name = "picks.toggle")]
    async fn picks_toggle(
        &self,
        params: Parameters<PicksToggleParams>,
    ) -> Result<Json<PicksToggleResponse>, ErrorData> {
        let node_id = parse_node_id(&params.0.node_id)?;

        let mut guard = self.state.lock().await;
        let shelf = open_shelf(&mut guard, &self.handoff);
        let change = shelf.toggle(&node_id);
        let expanded_node_id = shelf.expanded().map(|pick| pick.node_id.as_str().to_owned());

        Ok(Json(PicksToggleResponse {
            change: shelf_change_label(&change).to_owned(),
            expanded_node_id,
            handoff: self.handoff.read_or_absent().as_ref().map(mcp_handoff),
        }))
    }
}

#[tool_handler]
impl ServerHandler for NarrativeMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Narrative scenario path server (tools: steps.list, options.list, path.read, path.select, path.confirm, path.reset, path.find, path.resume, handoff.read, handoff.clear, picks.list, picks.toggle)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// Mapping helpers between navigator types and MCP payloads.
include!("server/helpers.rs");

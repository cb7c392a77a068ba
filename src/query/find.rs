// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{NodeId, NodeRef, Path};
use crate::source::TreeSource;

/// How `find_path_to_node` matched its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    Id,
    Name,
    Contains,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Contains => "contains",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundPath {
    pub path: Path,
    pub kind: MatchKind,
}

fn parenthetical() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(.*\)").expect("hard-coded regex compiles"))
}

/// Lowercased name with the first parenthesised span removed, e.g. `"Merck (MRK)"` → `"merck"`.
pub fn normalize_name(name: &str) -> String {
    parenthetical().replace(name, "").trim().to_lowercase()
}

/// Resolve a node id or a loose display name to the ancestor chain of the first match.
///
/// Matching runs as three depth-first passes over the whole source, in precedence order:
/// exact id, then normalized name equality, then normalized name containment. Containment is
/// deliberately loose, so overlapping names resolve to whichever node comes first.
/// A target that normalizes to the empty string never matches by name.
pub fn find_path_to_node<S>(source: &S, target: &str) -> Option<FoundPath>
where
    S: TreeSource + ?Sized,
{
    if let Ok(node_id) = NodeId::new(target) {
        if let Some(path) = first_path(source, &mut |node: NodeRef<'_>| node.id() == &node_id) {
            return Some(FoundPath { path, kind: MatchKind::Id });
        }
    }

    let wanted = normalize_name(target);
    if wanted.is_empty() {
        return None;
    }

    if let Some(path) = first_path(source, &mut |node: NodeRef<'_>| {
        normalize_name(node.display_name()) == wanted
    }) {
        return Some(FoundPath { path, kind: MatchKind::Name });
    }

    first_path(source, &mut |node: NodeRef<'_>| {
        normalize_name(node.display_name()).contains(&wanted)
    })
        .map(|path| FoundPath { path, kind: MatchKind::Contains })
}

fn first_path<S>(source: &S, matches: &mut dyn FnMut(NodeRef<'_>) -> bool) -> Option<Path>
where
    S: TreeSource + ?Sized,
{
    let mut prefix = Path::new();
    descend(source, &mut prefix, matches).then_some(prefix)
}

fn descend<S>(source: &S, prefix: &mut Path, matches: &mut dyn FnMut(NodeRef<'_>) -> bool) -> bool
where
    S: TreeSource + ?Sized,
{
    let depth = prefix.len();
    if depth >= source.depth_count() {
        return false;
    }

    for node in source.children_of(depth, prefix) {
        prefix.push(node.id().clone());
        if matches(node) || descend(source, prefix, matches) {
            return true;
        }
        prefix.truncate(depth);
    }
    false
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub node_id: NodeId,
    pub display_name: String,
    pub score: f64,
}

/// Closest display names to `target` by normalized similarity, best first.
pub fn suggest_nodes<S>(source: &S, target: &str, limit: usize) -> Vec<Suggestion>
where
    S: TreeSource + ?Sized,
{
    let wanted = normalize_name(target);
    if wanted.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut suggestions = Vec::new();
    let mut prefix = Path::new();
    collect_all(source, &mut prefix, &mut |node: NodeRef<'_>| {
        let name = normalize_name(node.display_name());
        let score = rapidfuzz::fuzz::ratio(wanted.chars(), name.chars());
        if score > 0.0 {
            suggestions.push(Suggestion {
                node_id: node.id().clone(),
                display_name: node.display_name().to_owned(),
                score,
            });
        }
    });

    suggestions.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.node_id.cmp(&b.node_id))
    });
    suggestions.dedup_by(|a, b| a.node_id == b.node_id);
    suggestions.truncate(limit);
    suggestions
}

fn collect_all<S>(source: &S, prefix: &mut Path, visit: &mut dyn FnMut(NodeRef<'_>))
where
    S: TreeSource + ?Sized,
{
    let depth = prefix.len();
    if depth >= source.depth_count() {
        return;
    }
    for node in source.children_of(depth, prefix) {
        visit(node);
        prefix.push(node.id().clone());
        collect_all(source, prefix, visit);
        prefix.truncate(depth);
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::source::DataSource;

    fn tree() -> DataSource {
        DataSource::demo_tree().expect("demo tree")
    }

    fn strings(found: &FoundPath) -> Vec<String> {
        found.path.to_strings()
    }

    #[rstest]
    #[case("Merck (MRK)", "merck")]
    #[case("  SK hynix ", "sk hynix")]
    #[case("(only parens)", "")]
    #[case("A (x) B (y)", "a")]
    fn normalize_strips_first_parenthetical_span(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_name(raw), expected);
    }

    #[test]
    fn exact_id_returns_ancestor_chain() {
        let found = find_path_to_node(&tree(), "stock_ss").expect("found");
        assert_eq!(found.kind, MatchKind::Id);
        assert_eq!(strings(&found), ["macro_ai", "sector_semi", "theme_hbm", "stock_ss"]);
    }

    #[test]
    fn name_match_ignores_case_and_parenthetical() {
        let found = find_path_to_node(&tree(), "merck").expect("found");
        assert_eq!(found.kind, MatchKind::Name);
        assert_eq!(found.path.last().map(NodeId::as_str), Some("vc_alt_1"));
    }

    #[test]
    fn exact_name_beats_earlier_substring() {
        // "Samsung Electronics" appears before "Samsung Biologics" but does not equal it.
        let found = find_path_to_node(&tree(), "samsung biologics").expect("found");
        assert_eq!(found.kind, MatchKind::Name);
        assert_eq!(found.path.last().map(NodeId::as_str), Some("vc_alt_2"));
    }

    #[test]
    fn substring_match_takes_the_first_node_in_depth_first_order() {
        let found = find_path_to_node(&tree(), "samsung").expect("found");
        assert_eq!(found.kind, MatchKind::Contains);
        assert_eq!(found.path.last().map(NodeId::as_str), Some("stock_ss"));
    }

    #[rstest]
    #[case("no such company")]
    #[case("")]
    #[case("(MRK)")]
    fn unmatched_targets_are_not_found(#[case] target: &str) {
        assert_eq!(find_path_to_node(&tree(), target), None);
    }

    #[test]
    fn works_over_the_flat_shape() {
        let steps = DataSource::demo_steps().expect("demo steps");
        let found = find_path_to_node(&steps, "tsmc_value").expect("found");
        assert_eq!(strings(&found), ["ai_supercycle", "logic_sector", "nvidia", "tsmc_value"]);
    }

    #[test]
    fn suggestions_rank_close_names_first() {
        let suggestions = suggest_nodes(&tree(), "hynx", 3);
        assert!(!suggestions.is_empty());
        assert!(suggestions.len() <= 3);
        assert_eq!(suggestions[0].node_id.as_str(), "stock_sk");
    }
}

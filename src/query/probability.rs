// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::Path;
use crate::source::TreeSource;

/// Rounded mean of the `probability` of every selected option on `path`.
///
/// Entries without a probability (tree nodes, unknown ids) are skipped; with nothing to
/// average the result is 0. Halves round up.
pub fn aggregate_probability<S>(source: &S, path: &Path) -> u8
where
    S: TreeSource + ?Sized,
{
    let (sum, count) = path
        .iter()
        .filter_map(|node_id| source.find_by_id(node_id)?.probability())
        .fold((0u32, 0u32), |(sum, count), probability| {
            (sum + u32::from(probability), count + 1)
        });

    if count == 0 {
        return 0;
    }

    let rounded = (2 * sum + count) / (2 * count);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeId;
    use crate::source::DataSource;

    fn path(ids: &[&str]) -> Path {
        ids.iter().map(|id| NodeId::new(id).expect("node id")).collect()
    }

    #[test]
    fn empty_path_is_zero() {
        let steps = DataSource::demo_steps().expect("demo steps");
        assert_eq!(aggregate_probability(&steps, &Path::new()), 0);
    }

    #[test]
    fn mean_is_rounded_half_up() {
        let steps = DataSource::demo_steps().expect("demo steps");
        // (90 + 95) / 2 = 92.5
        assert_eq!(aggregate_probability(&steps, &path(&["ai_supercycle", "memory_sector"])), 93);
        // (90 + 95 + 93 + 92) / 4 = 92.5
        let full = path(&["ai_supercycle", "memory_sector", "sk_hynix", "hanmi_semi_eq"]);
        assert_eq!(aggregate_probability(&steps, &full), 93);
    }

    #[test]
    fn tree_nodes_carry_no_weight() {
        let tree = DataSource::demo_tree().expect("demo tree");
        assert_eq!(aggregate_probability(&tree, &path(&["macro_ai", "sector_semi"])), 0);
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let steps = DataSource::demo_steps().expect("demo steps");
        assert_eq!(aggregate_probability(&steps, &path(&["geopolitics", "ghost"])), 40);
    }
}
